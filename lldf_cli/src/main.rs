//! # lldf CLI
//!
//! Command line front end for `lldf_core`: writes sample bridge models,
//! prints distribution factor tables, dumps detailed results as JSON and
//! writes regression records.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `warn`, `-v` for `info`, `-vv` for `debug`).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lldf_core::driver::{PierDetails, ReactionDetails, SpanDetails};
use lldf_core::providers::BridgeGeometry;
use lldf_core::regression::write_records;
use lldf_core::{
    load_model, save_model, BridgeModel, LimitState, LldfEngine, LldfError, LldfResult, PierFace, StatusCenter,
};

#[derive(Parser)]
#[command(name = "lldf", version, about = "Live load distribution factors for girder bridges")]
struct Cli {
    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a sample bridge model
    Init {
        #[arg(value_enum, default_value_t = Sample::IGirder)]
        sample: Sample,
        /// Output file
        #[arg(short, long, default_value = "bridge.lldf.json")]
        output: PathBuf,
    },
    /// Print controlling factors for every girder
    Factors {
        model: PathBuf,
        #[arg(short, long, value_enum, default_value_t = LimitStateArg::StrengthI)]
        limit_state: LimitStateArg,
    },
    /// Print detailed results for one girder as JSON
    Details {
        model: PathBuf,
        #[arg(long, default_value_t = 0)]
        span: usize,
        #[arg(long)]
        girder: usize,
        #[arg(short, long, value_enum, default_value_t = LimitStateArg::StrengthI)]
        limit_state: LimitStateArg,
    },
    /// Write regression records
    Regression {
        model: PathBuf,
        #[arg(long, default_value_t = 0)]
        pid: u32,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Sample {
    IGirder,
    UBeam,
    SpreadSlab,
    VoidedSlab,
    BoxBeam,
    DoubleTee,
}

impl Sample {
    fn model(self) -> BridgeModel {
        match self {
            Sample::IGirder => BridgeModel::sample_i_girder(),
            Sample::UBeam => BridgeModel::sample_u_beam(),
            Sample::SpreadSlab => BridgeModel::sample_spread_slab(),
            Sample::VoidedSlab => BridgeModel::sample_voided_slab(),
            Sample::BoxBeam => BridgeModel::sample_box_beam(),
            Sample::DoubleTee => BridgeModel::sample_double_tee(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LimitStateArg {
    ServiceI,
    ServiceIa,
    ServiceIii,
    StrengthI,
    StrengthIi,
    FatigueI,
}

impl From<LimitStateArg> for LimitState {
    fn from(arg: LimitStateArg) -> Self {
        match arg {
            LimitStateArg::ServiceI => LimitState::ServiceI,
            LimitStateArg::ServiceIa => LimitState::ServiceIA,
            LimitStateArg::ServiceIii => LimitState::ServiceIII,
            LimitStateArg::StrengthI => LimitState::StrengthI,
            LimitStateArg::StrengthIi => LimitState::StrengthII,
            LimitStateArg::FatigueI => LimitState::FatigueI,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {}", e.error_code(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> LldfResult<()> {
    match command {
        Command::Init { sample, output } => {
            let mut model = sample.model();
            model.touch();
            save_model(&model, &output)?;
            println!("Wrote {} ({})", output.display(), model.meta.bridge_id);
            Ok(())
        }
        Command::Factors { model, limit_state } => {
            let bridge = load_model(&model)?;
            print_factors(&bridge, limit_state.into())
        }
        Command::Details {
            model,
            span,
            girder,
            limit_state,
        } => {
            let bridge = load_model(&model)?;
            print_details(&bridge, span, girder, limit_state.into())
        }
        Command::Regression { model, pid, output } => {
            let bridge = load_model(&model)?;
            regression(&bridge, pid, output.as_deref())
        }
    }
}

fn print_factors(bridge: &BridgeModel, ls: LimitState) -> LldfResult<()> {
    let mut engine = LldfEngine::new(bridge, bridge.criteria.clone(), StatusCenter::new())?;
    info!("Method: {:?}", engine.bridge_method()?);

    println!("{} - {}", bridge.meta.bridge_id, ls.display_name());
    println!("{:>4} {:>6} {:>8} {:>8} {:>8} {:>8}", "Span", "Girder", "+M", "-M", "V", "R");
    for span in 0..bridge.span_count() {
        for girder in 0..bridge.girder_count(span) {
            let f = engine.df_results(span, girder, ls)?;
            println!(
                "{:>4} {:>6} {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
                span,
                girder,
                f.positive_moment.controlling,
                f.negative_moment.controlling,
                f.shear.controlling,
                f.reaction.controlling
            );
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct GirderReport {
    span: SpanDetails,
    negative_moment: PierDetails,
    reaction: ReactionDetails,
}

fn print_details(bridge: &BridgeModel, span: usize, girder: usize, ls: LimitState) -> LldfResult<()> {
    let mut engine = LldfEngine::new(bridge, bridge.criteria.clone(), StatusCenter::new())?;
    let report = GirderReport {
        span: engine.span_details(span, girder, ls)?,
        negative_moment: engine.pier_details(span, girder, ls, PierFace::Ahead)?,
        reaction: engine.reaction_details(span, girder, ls)?,
    };
    let json = serde_json::to_string_pretty(&report).map_err(|e| LldfError::SerializationError {
        reason: e.to_string(),
    })?;
    println!("{}", json);
    Ok(())
}

fn regression(bridge: &BridgeModel, pid: u32, output: Option<&Path>) -> LldfResult<()> {
    let mut engine = LldfEngine::new(bridge, bridge.criteria.clone(), StatusCenter::new())?;
    let id = &bridge.meta.bridge_id;
    let written = match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| LldfError::file_error("create", path.display().to_string(), e.to_string()))?;
            let mut out = BufWriter::new(file);
            let written = write_records(&mut engine, id, pid, &mut out)?;
            out.flush()
                .map_err(|e| LldfError::file_error("flush", path.display().to_string(), e.to_string()))?;
            written
        }
        None => write_records(&mut engine, id, pid, &mut io::stdout().lock())?,
    };
    info!("Wrote {} regression records", written);
    Ok(())
}
