//! TxDOT spread slab beams. Distributed with the type b/c equations; the
//! TxDOT method does not let the beam depth fall below 18 in.

use crate::errors::LldfResult;
use crate::families::ubeam::{box_params, method};
use crate::families::{FamilyDetails, FamilyParams, Request};
use crate::providers::BridgeData;
use crate::types::LldfMethodFamily;

/// Minimum beam depth used by the TxDOT method (in)
pub const TXDOT_MIN_DEPTH_IN: f64 = 18.0;

pub(crate) fn extract<B: BridgeData + ?Sized>(request: Request<'_, B>) -> LldfResult<FamilyDetails> {
    let min_depth = if request.criteria.method_family == LldfMethodFamily::Txdot {
        Some(TXDOT_MIN_DEPTH_IN)
    } else {
        None
    };
    let params = box_params(&request, min_depth);
    let method = method(request, &params);
    Ok(FamilyDetails {
        params: FamilyParams::SpreadSlab(params),
        method,
    })
}

#[cfg(test)]
mod tests {
    use crate::criteria::LldfCriteria;
    use crate::families::{extract_parameters, FamilyParams};
    use crate::model::BridgeModel;
    use crate::types::{DfLocation, DistributionFactorMethod, LldfMethodFamily};

    fn depth(bridge: &BridgeModel, criteria: &LldfCriteria) -> f64 {
        let details = extract_parameters(
            bridge,
            criteria,
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            1,
            None,
        )
        .unwrap();
        match details.params {
            FamilyParams::SpreadSlab(p) => p.d,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_txdot_minimum_depth() {
        let mut bridge = BridgeModel::sample_spread_slab();
        bridge.section.height_in = 15.0;

        let txdot = LldfCriteria {
            method_family: LldfMethodFamily::Txdot,
            ..LldfCriteria::default()
        };
        assert_eq!(depth(&bridge, &txdot), 18.0);
        assert_eq!(depth(&bridge, &LldfCriteria::default()), 15.0);
    }
}
