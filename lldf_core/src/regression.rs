//! Regression records for comparison against reference datasets.
//!
//! One line per quantity:
//!
//! ```text
//! <bridge id>, <pid>, <code>, 0.0, <value>, 2, <girder>
//! ```
//!
//! Deflection factors are reported equal to the moment factors.

use std::io::Write;

use crate::engine::LldfEngine;
use crate::errors::{LldfError, LldfResult};
use crate::providers::{BridgeData, StatusSink};
use crate::types::LimitState;

/// First code of the six exterior girder records
pub const EXTERIOR_BASE_CODE: u32 = 12024;
/// First code of the six interior girder records
pub const INTERIOR_BASE_CODE: u32 = 12054;

/// One regression line.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionRecord {
    pub code: u32,
    pub value: f64,
    pub girder: usize,
}

/// Records for one girder in a span, in code order: moment 1 lane,
/// moment 2+ lanes, shear 1 lane, shear 2+ lanes, deflection 1 lane,
/// deflection 2+ lanes.
pub fn girder_records<B: BridgeData + ?Sized, S: StatusSink>(
    engine: &mut LldfEngine<'_, B, S>,
    span: usize,
    girder: usize,
) -> LldfResult<Vec<RegressionRecord>> {
    let details = engine.span_details(span, girder, LimitState::StrengthI)?;
    let base = if details.base.is_exterior {
        EXTERIOR_BASE_CODE
    } else {
        INTERIOR_BASE_CODE
    };
    let values = [
        details.gm1.mg,
        details.gm2.mg,
        details.gv1.mg,
        details.gv2.mg,
        details.gm1.mg,
        details.gm2.mg,
    ];
    Ok(values
        .iter()
        .enumerate()
        .map(|(offset, &value)| RegressionRecord {
            code: base + offset as u32,
            value,
            girder,
        })
        .collect())
}

/// Write records for every girder of every span.
pub fn write_records<B: BridgeData + ?Sized, S: StatusSink, W: Write>(
    engine: &mut LldfEngine<'_, B, S>,
    bridge_id: &str,
    pid: u32,
    out: &mut W,
) -> LldfResult<usize> {
    let bridge = engine.bridge();
    let mut written = 0;
    for span in 0..bridge.span_count() {
        for girder in 0..bridge.girder_count(span) {
            for record in girder_records(engine, span, girder)? {
                writeln!(
                    out,
                    "{}, {}, {}, 0.0, {:.6}, 2, {}",
                    bridge_id, pid, record.code, record.value, record.girder
                )
                .map_err(|e| LldfError::file_error("write", "regression output", e.to_string()))?;
                written += 1;
            }
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::LldfCriteria;
    use crate::model::BridgeModel;
    use crate::providers::StatusCenter;

    #[test]
    fn test_record_codes() {
        let bridge = BridgeModel::sample_i_girder();
        let mut engine = LldfEngine::new(&bridge, LldfCriteria::default(), StatusCenter::new()).unwrap();
        let exterior = girder_records(&mut engine, 0, 0).unwrap();
        let codes: Vec<u32> = exterior.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![12024, 12025, 12026, 12027, 12028, 12029]);
        assert_eq!(exterior[4].value, exterior[0].value);

        let interior = girder_records(&mut engine, 0, 2).unwrap();
        assert_eq!(interior[0].code, 12054);
        assert_eq!(interior[5].code, 12059);
    }

    #[test]
    fn test_write_records_format() {
        let bridge = BridgeModel::sample_i_girder();
        let mut engine = LldfEngine::new(&bridge, LldfCriteria::default(), StatusCenter::new()).unwrap();
        let mut out = Vec::new();
        let written = write_records(&mut engine, "B1", 7, &mut out).unwrap();
        assert_eq!(written, 5 * 6);

        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        let fields: Vec<&str> = first.split(", ").collect();
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], "B1");
        assert_eq!(fields[1], "7");
        assert_eq!(fields[2], "12024");
        assert_eq!(fields[3], "0.0");
        assert_eq!(fields[5], "2");
        assert_eq!(fields[6], "0");
    }
}
