//! Adjacent voided and solid slab beams.
//!
//! The St. Venant torsional constant comes from one of two approximations:
//!
//! - Solid slab: `J = A⁴ / (40·Ip)`
//! - Voided slab: thin-walled closed cell, `J = 4·Ao² / Σ(s/t)`, where the
//!   walls are the top and bottom flanges, the two edges and the webs
//!   between voids.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::type_fg::SlabBeamSection;
use crate::equations::{FormulaSet, LldfMethod, TypeF, TypeG};
use crate::errors::{LldfError, LldfResult};
use crate::families::{FamilyDetails, FamilyParams, Request};
use crate::providers::{BridgeData, VoidedSlabShape};
use crate::span_length::effective_span_length;
use crate::types::{LldfMethodFamily, LrfdEdition, TransverseConnectivity};

/// Poisson's ratio for concrete
pub const POISSON_RATIO: f64 = 0.2;

/// One wall of the thin-walled cell (in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallElement {
    /// Length along the wall centerline
    pub s: f64,
    /// Wall thickness
    pub t: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TorsionalConstant {
    Solid {
        /// Area (in²)
        a: f64,
        /// Polar moment of inertia Ix + Iy (in⁴)
        ip: f64,
        j: f64,
    },
    Voided {
        elements: Vec<WallElement>,
        /// Area enclosed by the wall centerlines (in²)
        ao: f64,
        j: f64,
    },
}

impl TorsionalConstant {
    pub fn solid(a: f64, ip: f64) -> Self {
        TorsionalConstant::Solid {
            a,
            ip,
            j: a.powi(4) / (40.0 * ip),
        }
    }

    /// Thin-walled approximation for a slab with at least one void.
    /// `slab_depth` is the structural deck or overlay on top of the beam (in).
    pub fn voided(shape: &VoidedSlabShape, slab_depth: f64) -> Self {
        let n_ext = shape.void_count.min(2);
        let n_int = shape.void_count - n_ext;
        let w = shape.width;
        let h = shape.height;

        let t_ext = if n_int == 0 {
            (w - (n_ext as f64 - 1.0) * shape.exterior_void_spacing - shape.exterior_void_diameter) / 2.0
        } else {
            (w - (n_int as f64 - 1.0) * shape.interior_void_spacing
                - 2.0 * shape.exterior_void_spacing
                - shape.exterior_void_diameter)
                / 2.0
        };
        let t_int = shape.interior_void_spacing - shape.interior_void_diameter;
        let t_ext_int = if n_int == 0 {
            shape.exterior_void_spacing - shape.exterior_void_diameter
        } else {
            shape.exterior_void_spacing - shape.exterior_void_diameter / 2.0 - shape.interior_void_diameter / 2.0
        };

        let ext_bottom = shape.exterior_void_center - shape.exterior_void_diameter / 2.0;
        let ext_top = shape.exterior_void_center + shape.exterior_void_diameter / 2.0;
        let (t_bot, void_top) = if n_int == 0 {
            (ext_bottom, ext_top)
        } else {
            (
                ext_bottom.min(shape.interior_void_center - shape.interior_void_diameter / 2.0),
                ext_top.max(shape.interior_void_center + shape.interior_void_diameter / 2.0),
            )
        };
        let t_top = h - void_top + slab_depth;

        let s_flange = w - t_ext;
        let s_web = h + slab_depth - t_top / 2.0 - t_bot / 2.0;

        let mut elements = vec![
            WallElement { s: s_flange, t: t_top },
            WallElement { s: s_flange, t: t_bot },
            WallElement { s: s_web, t: t_ext },
        ];
        if n_int == 0 {
            if n_ext == 2 {
                elements.push(WallElement { s: s_web, t: t_ext_int });
            }
        } else {
            elements.push(WallElement { s: s_web, t: t_ext_int });
            elements.extend((1..n_int).map(|_| WallElement { s: s_web, t: t_int }));
            elements.push(WallElement { s: s_web, t: t_ext_int });
        }
        elements.push(WallElement { s: s_web, t: t_ext });

        TorsionalConstant::cell(elements, s_flange * s_web)
    }

    /// Single closed cell, `J = 4·Ao² / Σ(s/t)`.
    pub fn cell(elements: Vec<WallElement>, ao: f64) -> Self {
        let sum_s_over_t: f64 = elements.iter().map(|e| e.s / e.t).sum();
        TorsionalConstant::Voided {
            j: 4.0 * ao * ao / sum_s_over_t,
            elements,
            ao,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            TorsionalConstant::Solid { j, .. } | TorsionalConstant::Voided { j, .. } => *j,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidedSlabParams {
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

impl VoidedSlabParams {
    pub fn j(&self) -> f64 {
        self.torsion.value()
    }
}

pub(crate) fn extract<B: BridgeData + ?Sized>(request: Request<'_, B>) -> LldfResult<FamilyDetails> {
    let bridge = request.bridge;
    let criteria = request.criteria;
    let poi = request.poi;
    let girder = request.base.girder;

    let mut shape = bridge
        .voided_slab_shape(request.span, girder)
        .ok_or_else(|| LldfError::missing_data(format!("Voided slab shape for span {} girder {}", request.span, girder)))?;
    shape.width = shape.effective_width(request.base.is_exterior);

    let torsion = if shape.void_count == 0 {
        TorsionalConstant::solid(bridge.area(&poi), bridge.ix(&poi) + bridge.iy(&poi))
    } else {
        TorsionalConstant::voided(&shape, bridge.structural_slab_depth(&poi))
    };
    let j = torsion.value();
    if !(j.is_finite() && j > 0.0) {
        return Err(LldfError::invalid_input(
            "torsional_constant",
            j.to_string(),
            "Torsional constant must be positive; check the void layout",
        ));
    }
    debug!("Voided slab J = {:.0} in^4 ({} voids)", j, shape.void_count);

    let (left_de, right_de) = request.web_to_curb();
    let params = VoidedSlabParams {
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

    let txdot = criteria.method_family == LldfMethodFamily::Txdot;
    let formulas = if txdot
        || params.connectivity == TransverseConnectivity::ConnectedAsUnit
        || criteria.edition >= LrfdEdition::SeventhEdition2014
    {
        FormulaSet::F(TypeF { section })
    } else {
        FormulaSet::G(TypeG {
            section,
            poisson_ratio: params.poisson_ratio,
        })
    };

    let (skew_moment, skew_shear) = if txdot { (false, false) } else { request.skew_flags() };
    let settings = request.settings(skew_moment, skew_shear, false);

    Ok(FamilyDetails {
        params: FamilyParams::VoidedSlab(params),
        method: LldfMethod::new(request.base, formulas, settings),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(void_count: usize) -> VoidedSlabShape {
        VoidedSlabShape {
            width: 48.0,
            height: 18.0,
            void_count,
            exterior_void_spacing: 11.5,
            interior_void_spacing: 11.5,
            exterior_void_diameter: 10.0,
            interior_void_diameter: 10.0,
            exterior_void_center: 9.0,
            interior_void_center: 9.0,
            c1: 0.0,
            c3: 0.0,
        }
    }

    #[test]
    fn test_solid_slab_torsional_constant() {
        let a = 48.0 * 18.0;
        let ip = 48.0 * 18.0f64.powi(3) / 12.0 + 18.0 * 48.0f64.powi(3) / 12.0;
        let torsion = TorsionalConstant::solid(a, ip);
        assert!((torsion.value() - a.powi(4) / (40.0 * ip)).abs() < 1e-6);
        assert!(torsion.value() > 0.0);
    }

    #[test]
    fn test_two_void_cell_walls() {
        let torsion = TorsionalConstant::voided(&shape(2), 0.0);
        match &torsion {
            TorsionalConstant::Voided { elements, ao, j } => {
                // Top, bottom, two edges and the web between the voids
                assert_eq!(elements.len(), 5);
                let t_ext = (48.0 - 11.5 - 10.0) / 2.0;
                assert!((elements[2].t - t_ext).abs() < 1e-12);
                assert!((elements[3].t - 1.5).abs() < 1e-12);
                assert!((elements[0].t - 4.0).abs() < 1e-12);
                assert!((elements[1].t - 4.0).abs() < 1e-12);
                assert!((*ao - (48.0 - t_ext) * 14.0).abs() < 1e-9);
                assert!(j.is_finite() && *j > 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_interior_voids_add_webs() {
        let torsion = TorsionalConstant::voided(&shape(3), 0.0);
        match torsion {
            TorsionalConstant::Voided { elements, .. } => {
                // Top, bottom, two edges, two exterior-interior webs
                assert_eq!(elements.len(), 6);
            }
            other => panic!("unexpected {:?}", other),
        }
        let four = TorsionalConstant::voided(&shape(4), 0.0);
        match four {
            TorsionalConstant::Voided { elements, .. } => assert_eq!(elements.len(), 7),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_overlay_thickens_top_flange() {
        let bare = TorsionalConstant::voided(&shape(2), 0.0).value();
        let topped = TorsionalConstant::voided(&shape(2), 5.0).value();
        assert!(topped > bare);
    }

    #[test]
    fn test_shear_key_chamfers_narrow_the_beam() {
        let keyed = VoidedSlabShape {
            c1: 0.75,
            c3: 0.5,
            ..shape(2)
        };
        assert!((keyed.effective_width(true) - 47.0).abs() < 1e-12);
        assert!((keyed.effective_width(false) - 46.5).abs() < 1e-12);
        assert_eq!(shape(2).effective_width(false), 48.0);
    }

    #[test]
    fn test_extracted_width_excludes_chamfers() {
        use crate::criteria::LldfCriteria;
        use crate::families::extract_parameters;
        use crate::model::BridgeModel;
        use crate::types::{DfLocation, DistributionFactorMethod};

        let bridge = BridgeModel::sample_voided_slab();
        let width = |girder| {
            let details = extract_parameters(
                &bridge,
                &LldfCriteria::default(),
                DistributionFactorMethod::Calculated,
                0,
                DfLocation::Span,
                girder,
                None,
            )
            .unwrap();
            match details.params {
                FamilyParams::VoidedSlab(p) => p.b,
                other => panic!("unexpected {:?}", other),
            }
        };
        assert!((width(0) - 47.0).abs() < 1e-12);
        assert!((width(3) - 46.5).abs() < 1e-12);
    }
}
