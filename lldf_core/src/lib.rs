//! # lldf_core - Live Load Distribution Factor Engine
//!
//! `lldf_core` computes AASHTO LRFD live load distribution factors for
//! multi-girder bridge cross-sections, with the WSDOT and TxDOT deviations.
//! For each girder it reports the one-lane and multi-lane factors for
//! positive moment, negative moment at piers, shear and reactions, together
//! with the method that controlled each value.
//!
//! ## Design Philosophy
//!
//! - **Provider-driven**: bridge data is read through traits, never owned
//! - **JSON-First**: models, criteria, results and errors are serializable
//! - **Rich Errors**: structured error types, with refined-analysis failures
//!   also posted to a status sink
//!
//! ## Quick Start
//!
//! ```rust
//! use lldf_core::{BridgeModel, LimitState, LldfEngine, StatusCenter};
//!
//! let bridge = BridgeModel::sample_u_beam();
//! let mut engine = LldfEngine::new(&bridge, bridge.criteria.clone(), StatusCenter::new()).unwrap();
//! let factors = engine.df_results(0, 1, LimitState::StrengthI).unwrap();
//! assert!(factors.positive_moment.controlling > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Cached factor requests and the exterior floor rule
//! - [`driver`] - One-lane/multi-lane results for one girder
//! - [`families`] - Section parameters and formula selection per beam family
//! - [`equations`] - Closed-form equations, lever rule, rigid method, skew
//! - [`geometry`] - Cross-section sampling shared by every family
//! - [`span_length`] - Effective span length for spans, piers and reactions
//! - [`providers`] - Bridge data traits and the status sink
//! - [`model`] - Serializable bridge model implementing the providers
//! - [`file_io`] - Model files with atomic saves
//! - [`regression`] - Regression record output
//! - [`criteria`], [`types`], [`errors`]

pub mod criteria;
pub mod driver;
pub mod engine;
pub mod equations;
pub mod errors;
pub mod families;
pub mod file_io;
pub mod geometry;
pub mod model;
pub mod providers;
pub mod regression;
pub mod span_length;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use criteria::LldfCriteria;
pub use engine::{FactorBreakdown, GirderFactors, LldfEngine};
pub use errors::{LldfError, LldfResult};
pub use file_io::{load_model, save_model};
pub use model::BridgeModel;
pub use providers::{BridgeData, StatusCenter, StatusItem, StatusSink};
pub use types::{ForceEffect, LimitState, PierFace};
