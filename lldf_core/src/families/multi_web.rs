//! Double tees and other multi-web beams.
//!
//! Beams connected to act as a unit use the slab-on-girder equations with the
//! top flange counted as part of the slab. Otherwise, and always for TxDOT,
//! the type i/j formulas apply with `J = A⁴ / (40·Ip)`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::{FormulaSet, LldfMethod, TypeAek, TypeHij};
use crate::errors::{LldfError, LldfResult};
use crate::families::voided_slab::{TorsionalConstant, POISSON_RATIO};
use crate::families::{FamilyDetails, FamilyParams, Request};
use crate::providers::BridgeData;
use crate::span_length::effective_span_length;
use crate::types::{LldfMethodFamily, TransverseConnectivity};

/// Longitudinal stiffness of a beam acting with its neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiWebStiffness {
    /// Slab plus top flange (in)
    pub ts: f64,
    /// Girder-to-deck modular ratio
    pub n: f64,
    /// Girder centroid to top of girder (in)
    pub yt: f64,
    /// Girder centroid to the combined slab centroid (in)
    pub eg: f64,
    /// Longitudinal stiffness parameter (in⁴)
    pub kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiWebParams {
    /// Effective span length (ft)
    pub span_length: f64,
    pub web_count: usize,
    /// Moment of inertia (in⁴)
    pub i: f64,
    /// Area (in²)
    pub a: f64,
    pub torsion: TorsionalConstant,
    pub connectivity: TransverseConnectivity,
    pub poisson_ratio: f64,
    /// Present when the slab-on-girder equations apply
    pub stiffness: Option<MultiWebStiffness>,
}

impl MultiWebParams {
    pub fn j(&self) -> f64 {
        self.torsion.value()
    }
}

/// Depth of the combined slab and top flange centroid above the top of
/// the girder (in). The top flange sits inside the slab depth.
pub fn combined_slab_centroid(slab_depth: f64, top_flange: f64) -> f64 {
    (slab_depth * slab_depth / 2.0 - top_flange * top_flange / 2.0) / (slab_depth + top_flange)
}

pub(crate) fn extract<B: BridgeData + ?Sized>(request: Request<'_, B>) -> LldfResult<FamilyDetails> {
    let bridge = request.bridge;
    let criteria = request.criteria;
    let poi = request.poi;
    let girder = request.base.girder;

    let shape = bridge
        .multi_web_shape(request.span, girder)
        .ok_or_else(|| LldfError::missing_data(format!("Multi-web shape for span {} girder {}", request.span, girder)))?;

    let i = bridge.ix(&poi);
    let a = bridge.area(&poi);
    let torsion = TorsionalConstant::solid(a, i + bridge.iy(&poi));
    let span_length = effective_span_length(bridge, request.index, request.location, girder);
    let connectivity = bridge.transverse_connectivity();
    let txdot = criteria.method_family == LldfMethodFamily::Txdot;

    let (formulas, stiffness, settings) = if !txdot && connectivity == TransverseConnectivity::ConnectedAsUnit {
        let slab = bridge.structural_slab_depth(&poi);
        let tf = shape.top_flange_thickness;
        let n = request.modular_ratio()?;
        let yt = bridge.yt(&poi);
        let ts = slab + tf;
        let eg = yt + combined_slab_centroid(slab, tf);
        let kg = n * (i + a * eg * eg);
        debug!("Multi-web acting as a unit: Kg = {:.0} in^4", kg);

        let formulas = FormulaSet::Aek(TypeAek {
            variant: LldfMethodFamily::Lrfd,
            l: span_length,
            ts,
            kg,
        });
        let (skew_moment, skew_shear) = request.skew_flags();
        let settings = request.settings(skew_moment, skew_shear, false);
        (formulas, Some(MultiWebStiffness { ts, n, yt, eg, kg }), settings)
    } else {
        let j = torsion.value();
        if !(j.is_finite() && j > 0.0) {
            return Err(LldfError::invalid_input(
                "torsional_constant",
                j.to_string(),
                "Torsional constant must be positive; check Ix and Iy",
            ));
        }
        debug!("Multi-web type i/j: J = {:.0} in^4", j);

        let formulas = FormulaSet::Hij(TypeHij {
            variant: criteria.method_family,
            l: span_length,
            i,
            j,
            poisson_ratio: POISSON_RATIO,
            txdot_k: shape.txdot_k,
        });
        (formulas, None, request.settings(false, false, false))
    };

    let params = MultiWebParams {
        span_length,
        web_count: shape.web_count,
        i,
        a,
        torsion,
        connectivity,
        poisson_ratio: POISSON_RATIO,
        stiffness,
    };

    Ok(FamilyDetails {
        params: FamilyParams::MultiWeb(params),
        method: LldfMethod::new(request.base, formulas, settings),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::LldfCriteria;
    use crate::families::extract_parameters;
    use crate::model::BridgeModel;
    use crate::types::{DfLocation, DistributionFactorMethod};

    fn details(bridge: &BridgeModel, criteria: &LldfCriteria, girder: usize) -> FamilyDetails {
        extract_parameters(
            bridge,
            criteria,
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            girder,
            None,
        )
        .unwrap()
    }

    fn params(details: &FamilyDetails) -> &MultiWebParams {
        match &details.params {
            FamilyParams::MultiWeb(p) => p,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_combined_slab_centroid() {
        // 3 in slab over a 4 in flange: (4.5 - 8) / 7
        assert!((combined_slab_centroid(3.0, 4.0) + 0.5).abs() < 1e-12);
        assert_eq!(combined_slab_centroid(4.0, 4.0), 0.0);
    }

    #[test]
    fn test_connected_tees_use_slab_on_girder_equations() {
        let bridge = BridgeModel::sample_double_tee();
        let details = details(&bridge, &bridge.criteria, 1);
        let p = params(&details);
        let stiffness = p.stiffness.as_ref().unwrap();
        assert!((stiffness.ts - 7.0).abs() < 1e-12);
        assert!((stiffness.eg - (bridge.section.yt_in - 0.5)).abs() < 1e-12);
        assert!((stiffness.kg - stiffness.n * (p.i + p.a * stiffness.eg * stiffness.eg)).abs() < 1e-6);
        match &details.method.formulas {
            FormulaSet::Aek(f) => {
                assert_eq!(f.variant, LldfMethodFamily::Lrfd);
                assert_eq!(f.kg, stiffness.kg);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unconnected_tees_use_type_ij() {
        let mut bridge = BridgeModel::sample_double_tee();
        bridge.connectivity = TransverseConnectivity::PreventRelativeDisplacement;
        let details = details(&bridge, &bridge.criteria, 1);
        let p = params(&details);
        assert!(p.stiffness.is_none());
        let ip = bridge.section.ix_in4 + bridge.section.iy_in4;
        assert!((p.j() - bridge.section.area_in2.powi(4) / (40.0 * ip)).abs() < 1e-6);
        assert!(matches!(details.method.formulas, FormulaSet::Hij(_)));
    }

    #[test]
    fn test_txdot_ignores_connectivity_and_skew() {
        let mut bridge = BridgeModel::sample_double_tee();
        for pier in &mut bridge.piers {
            pier.skew_deg = 30.0;
        }
        let criteria = LldfCriteria {
            method_family: LldfMethodFamily::Txdot,
            ..LldfCriteria::default()
        };
        let details = details(&bridge, &criteria, 0);
        match &details.method.formulas {
            FormulaSet::Hij(f) => assert_eq!(f.k(), 2.2),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!details.method.settings.skew_moment);
        assert!(!details.method.settings.skew_shear);
    }
}
