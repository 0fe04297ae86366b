//! Adjacent hollow box beams.
//!
//! `J` treats the box as one closed cell whose walls run along the web and
//! flange centerlines. A composite overlay or deck thickens the top flange.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::type_fg::SlabBeamSection;
use crate::equations::{FormulaSet, LldfMethod, TypeF, TypeG};
use crate::errors::{LldfError, LldfResult};
use crate::families::voided_slab::{TorsionalConstant, WallElement, POISSON_RATIO};
use crate::families::{FamilyDetails, FamilyParams, Request};
use crate::providers::{BoxBeamShape, BridgeData};
use crate::span_length::effective_span_length;
use crate::types::{DeckType, LldfMethodFamily, TransverseConnectivity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacentBoxParams {
    /// Effective span length (ft)
    pub span_length: f64,
    /// Beam width (in)
    pub b: f64,
    /// Beam depth (in)
    pub d: f64,
    /// Moment of inertia (in⁴)
    pub i: f64,
    pub torsion: TorsionalConstant,
    pub connectivity: TransverseConnectivity,
    /// Exterior web to curb, left and right (ft)
    pub left_de: f64,
    pub right_de: f64,
    pub poisson_ratio: f64,
}

impl AdjacentBoxParams {
    pub fn j(&self) -> f64 {
        self.torsion.value()
    }
}

/// Closed cell through the web and flange centerlines. `slab_depth` is added
/// to the top flange.
pub fn box_torsional_constant(shape: &BoxBeamShape, slab_depth: f64) -> TorsionalConstant {
    let t_top = shape.top_flange + slab_depth;
    let t_bot = shape.bottom_flange;
    let s_top = shape.web_spacing;
    let s_side = shape.height - shape.top_flange - shape.bottom_flange + (t_top + t_bot) / 2.0;

    let elements = vec![
        WallElement { s: s_top, t: t_top },
        WallElement { s: s_top, t: t_bot },
        WallElement {
            s: s_side,
            t: shape.web_thickness,
        },
        WallElement {
            s: s_side,
            t: shape.web_thickness,
        },
    ];
    TorsionalConstant::cell(elements, s_top * s_side)
}

pub(crate) fn extract<B: BridgeData + ?Sized>(request: Request<'_, B>) -> LldfResult<FamilyDetails> {
    let bridge = request.bridge;
    let criteria = request.criteria;
    let poi = request.poi;
    let girder = request.base.girder;

    let shape = bridge
        .box_beam_shape(request.span, girder)
        .ok_or_else(|| LldfError::missing_data(format!("Box beam shape for span {} girder {}", request.span, girder)))?;

    let slab_depth = match bridge.deck_type() {
        DeckType::None => 0.0,
        _ => bridge.structural_slab_depth(&poi),
    };
    let torsion = box_torsional_constant(&shape, slab_depth);
    let j = torsion.value();
    if !(j.is_finite() && j > 0.0) {
        return Err(LldfError::invalid_input(
            "torsional_constant",
            j.to_string(),
            "Torsional constant must be positive; check the box walls",
        ));
    }
    debug!("Box beam J = {:.0} in^4", j);

    let (left_de, right_de) = request.web_to_curb();
    let params = AdjacentBoxParams {
        span_length: effective_span_length(bridge, request.index, request.location, girder),
        b: shape.width,
        d: shape.height,
        i: bridge.ix(&poi),
        torsion,
        connectivity: bridge.transverse_connectivity(),
        left_de,
        right_de,
        poisson_ratio: POISSON_RATIO,
    };

    let section = SlabBeamSection {
        variant: criteria.method_family,
        l: params.span_length,
        b: params.b,
        d: params.d,
        i: params.i,
        j,
        left_de,
        right_de,
    };

    // TxDOT treats every box as connected to act as a unit
    let txdot = criteria.method_family == LldfMethodFamily::Txdot;
    let formulas = if txdot || params.connectivity == TransverseConnectivity::ConnectedAsUnit {
        FormulaSet::F(TypeF { section })
    } else {
        FormulaSet::G(TypeG {
            section,
            poisson_ratio: params.poisson_ratio,
        })
    };

    let (skew_moment, skew_shear) = request.skew_flags();
    let settings = request.settings(skew_moment && !txdot, skew_shear, false);

    Ok(FamilyDetails {
        params: FamilyParams::BoxBeam(params),
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

    fn b48() -> BoxBeamShape {
        BoxBeamShape {
            width: 48.0,
            height: 33.0,
            top_flange: 5.5,
            bottom_flange: 5.5,
            web_thickness: 5.0,
            web_spacing: 43.0,
        }
    }

    fn details(bridge: &BridgeModel, criteria: &LldfCriteria) -> FamilyDetails {
        extract_parameters(
            bridge,
            criteria,
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            0,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_thin_walled_box_closed_form() {
        let (b, d, t, tf): (f64, f64, f64, f64) = (48.0, 33.0, 5.0, 5.5);
        let closed_form = 2.0 * t * tf * (b - t).powi(2) * (d - tf).powi(2) / (b * t + d * tf - t * t - tf * tf);
        let j = box_torsional_constant(&b48(), 0.0).value();
        assert!((j - closed_form).abs() < 1e-6 * closed_form);
        assert!((j - 209_984.0).abs() < 10.0);
    }

    #[test]
    fn test_overlay_thickens_top_wall() {
        match box_torsional_constant(&b48(), 2.0) {
            TorsionalConstant::Voided { elements, ao, .. } => {
                assert_eq!(elements.len(), 4);
                assert!((elements[0].t - 7.5).abs() < 1e-12);
                assert!((elements[1].t - 5.5).abs() < 1e-12);
                // 33 - 11 + (7.5 + 5.5) / 2
                assert!((elements[2].s - 28.5).abs() < 1e-12);
                assert!((ao - 43.0 * 28.5).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_connectivity_selects_formula_set() {
        let mut bridge = BridgeModel::sample_box_beam();
        assert!(matches!(details(&bridge, &bridge.criteria).method.formulas, FormulaSet::F(_)));

        bridge.connectivity = TransverseConnectivity::PreventRelativeDisplacement;
        assert!(matches!(details(&bridge, &bridge.criteria).method.formulas, FormulaSet::G(_)));

        let txdot = LldfCriteria {
            method_family: LldfMethodFamily::Txdot,
            ..LldfCriteria::default()
        };
        assert!(matches!(details(&bridge, &txdot).method.formulas, FormulaSet::F(_)));
    }

    #[test]
    fn test_txdot_drops_moment_skew_only() {
        let mut bridge = BridgeModel::sample_box_beam();
        for pier in &mut bridge.piers {
            pier.skew_deg = 20.0;
        }
        let lrfd = details(&bridge, &LldfCriteria::default());
        assert!(lrfd.method.settings.skew_moment);

        let txdot = LldfCriteria {
            method_family: LldfMethodFamily::Txdot,
            ..LldfCriteria::default()
        };
        let settings = details(&bridge, &txdot).method.settings;
        assert!(!settings.skew_moment);
        assert_eq!(settings.skew_shear, lrfd.method.settings.skew_shear);
    }

    #[test]
    fn test_missing_shape_is_reported() {
        let mut bridge = BridgeModel::sample_box_beam();
        bridge.box_beam = None;
        let err = extract_parameters(
            &bridge,
            &LldfCriteria::default(),
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            0,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "MISSING_DATA");
    }
}
