//! Concrete deck on spread box beams and U-beams, AASHTO types b and c.
//! Also used for TxDOT spread slab beams.
//!
//! Moment: LRFD Table 4.6.2.2.2b-1 (interior), 4.6.2.2.2d-1 (exterior).
//! Shear: LRFD Table 4.6.2.2.3a-1 (interior), 4.6.2.2.3b-1 (exterior).

use serde::{Deserialize, Serialize};

use crate::equations::{skew, EquationData, Governing};
use crate::geometry::BaseDetails;
use crate::types::{ForceEffect, LldfMethodFamily, LoadedLanes};

const S_MIN: f64 = 6.0;
const S_MAX: f64 = 18.0;
const L_MIN: f64 = 20.0;
const L_MAX: f64 = 140.0;
const D_MIN: f64 = 18.0;
const D_MAX: f64 = 65.0;
const DE_MIN: f64 = 0.0;
const DE_MAX: f64 = 4.5;

/// Factor applied to the one-lane lever rule for TxDOT exterior beams
pub const TXDOT_LEVER_RULE_FACTOR: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBc {
    pub variant: LldfMethodFamily,
    /// Effective span length (ft)
    pub l: f64,
    /// Beam depth (in)
    pub d: f64,
    /// Exterior web to curb distance on each side (ft)
    pub left_de: f64,
    pub right_de: f64,
}

impl TypeBc {
    fn de(&self, base: &BaseDetails) -> f64 {
        match base.side {
            crate::types::DfSide::Left => self.left_de,
            crate::types::DfSide::Right => self.right_de,
        }
    }

    fn interior_moment_equation(&self, s: f64, lanes: LoadedLanes) -> f64 {
        let stiffness = s * self.d / (12.0 * self.l * self.l);
        match lanes {
            LoadedLanes::One => (s / 3.0).powf(0.35) * stiffness.powf(0.25),
            LoadedLanes::TwoOrMore => (s / 6.3).powf(0.6) * stiffness.powf(0.125),
        }
    }

    fn interior_shear_equation(&self, s: f64, lanes: LoadedLanes) -> f64 {
        let depth = (self.d / (12.0 * self.l)).powf(0.1);
        match lanes {
            LoadedLanes::One => (s / 10.0).powf(0.6) * depth,
            LoadedLanes::TwoOrMore => (s / 7.4).powf(0.8) * depth,
        }
    }

    fn exterior_uses_interior_factor(&self, base: &BaseDetails) -> bool {
        self.variant == LldfMethodFamily::Wsdot && base.slab_overhang() <= base.savg / 2.0
    }

    fn exterior_one_lane(&self) -> Governing {
        if self.variant == LldfMethodFamily::Txdot {
            Governing::ScaledLeverRule(TXDOT_LEVER_RULE_FACTOR)
        } else {
            Governing::LeverRule
        }
    }

    pub fn moment(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        let g = self.interior_moment_equation(base.savg, lanes);
        if !base.is_exterior || self.exterior_uses_interior_factor(base) {
            return Governing::Equation(EquationData::interior(g));
        }
        match lanes {
            LoadedLanes::One => self.exterior_one_lane(),
            LoadedLanes::TwoOrMore => {
                let e = 0.97 + self.de(base) / 28.5;
                Governing::Equation(EquationData::exterior(e, g))
            }
        }
    }

    pub fn shear(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        let g = self.interior_shear_equation(base.savg, lanes);
        if !base.is_exterior || self.exterior_uses_interior_factor(base) {
            return Governing::Equation(EquationData::interior(g));
        }
        match lanes {
            LoadedLanes::One => self.exterior_one_lane(),
            LoadedLanes::TwoOrMore => {
                let e = 0.8 + self.de(base) / 10.0;
                Governing::Equation(EquationData::exterior(e, g))
            }
        }
    }

    pub fn bridge_wide_violation(&self, base: &BaseDetails) -> Option<String> {
        if base.girder_count < 3 {
            return Some(format!("Number of beams ({}) is less than 3", base.girder_count));
        }
        let (s_min, s_max) = base.spacing_range();
        if s_min < S_MIN || s_max > S_MAX {
            return Some(format!(
                "Beam spacing ({:.3} ft to {:.3} ft) is outside {} ft <= S <= {} ft",
                s_min, s_max, S_MIN, S_MAX
            ));
        }
        if self.l < L_MIN || self.l > L_MAX {
            return Some(format!(
                "Span length L = {:.3} ft is outside {} ft <= L <= {} ft",
                self.l, L_MIN, L_MAX
            ));
        }
        if self.d < D_MIN || self.d > D_MAX {
            return Some(format!(
                "Beam depth d = {:.3} in is outside {} in <= d <= {} in",
                self.d, D_MIN, D_MAX
            ));
        }
        None
    }

    pub fn girder_violation(&self, base: &BaseDetails, _effect: ForceEffect, lanes: LoadedLanes) -> Option<String> {
        if base.is_exterior && lanes == LoadedLanes::TwoOrMore && !self.exterior_uses_interior_factor(base) {
            let de = self.de(base);
            if !(DE_MIN..=DE_MAX).contains(&de) {
                return Some(format!(
                    "Beam {}: exterior web to curb distance de = {:.3} ft is outside {} ft <= de <= {} ft",
                    base.girder, de, DE_MIN, DE_MAX
                ));
            }
        }
        None
    }

    pub fn moment_skew(&self, base: &BaseDetails) -> f64 {
        skew::governing(base, skew::moment_bcfg)
    }

    pub fn shear_skew(&self, base: &BaseDetails) -> f64 {
        skew::governing(base, |theta| skew::shear_bc(self.l, self.d, base.savg, theta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DfSide, DistributionFactorMethod};

    fn cross_section(girder: usize, overhang: f64) -> BaseDetails {
        BaseDetails {
            method: DistributionFactorMethod::Calculated,
            controlling_location: 60.0,
            girder,
            is_exterior: girder == 0 || girder == 3,
            side: if girder <= 2 { DfSide::Left } else { DfSide::Right },
            girder_count: 4,
            savg: 10.0,
            spacings: vec![10.0; 3],
            left_curb_overhang: overhang - 1.5,
            right_curb_overhang: overhang - 1.5,
            left_slab_overhang: overhang,
            right_slab_overhang: overhang,
            bridge_width: 30.0 + 2.0 * overhang,
            lane_count: 2,
            lane_width: 12.0,
            curb_to_curb: 30.0 + 2.0 * (overhang - 1.5),
            skew1: 0.0,
            skew2: 0.0,
        }
    }

    fn formulas(variant: LldfMethodFamily) -> TypeBc {
        TypeBc {
            variant,
            l: 120.0,
            d: 54.0,
            left_de: 1.0,
            right_de: 1.0,
        }
    }

    #[test]
    fn test_interior_moment_one_lane() {
        let f = formulas(LldfMethodFamily::Lrfd);
        let expected = (10.0f64 / 3.0).powf(0.35) * (10.0 * 54.0 / (12.0 * 120.0f64.powi(2))).powf(0.25);
        match f.moment(&cross_section(1, 4.0), LoadedLanes::One) {
            Governing::Equation(data) => assert!((data.mg - expected).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_exterior_shear_two_lanes() {
        let f = formulas(LldfMethodFamily::Lrfd);
        match f.shear(&cross_section(3, 6.0), LoadedLanes::TwoOrMore) {
            Governing::Equation(data) => assert!((data.e.unwrap() - 0.9).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_exterior_one_lane_by_variant() {
        let base = cross_section(0, 6.0);
        assert_eq!(formulas(LldfMethodFamily::Lrfd).moment(&base, LoadedLanes::One), Governing::LeverRule);
        assert_eq!(
            formulas(LldfMethodFamily::Txdot).moment(&base, LoadedLanes::One),
            Governing::ScaledLeverRule(0.9)
        );
        // WSDOT overhang is beyond S/2 here, so the exterior rules still apply
        assert_eq!(formulas(LldfMethodFamily::Wsdot).shear(&base, LoadedLanes::One), Governing::LeverRule);
    }

    #[test]
    fn test_wsdot_short_overhang_uses_interior() {
        let f = formulas(LldfMethodFamily::Wsdot);
        let exterior = f.moment(&cross_section(0, 4.0), LoadedLanes::One);
        let interior = f.moment(&cross_section(1, 4.0), LoadedLanes::One);
        assert_eq!(exterior, interior);
    }

    #[test]
    fn test_range_of_applicability() {
        let mut f = formulas(LldfMethodFamily::Lrfd);
        let base = cross_section(1, 4.0);
        assert!(f.bridge_wide_violation(&base).is_none());
        f.d = 12.0;
        assert!(f.bridge_wide_violation(&base).unwrap().contains("Beam depth"));

        let mut f = formulas(LldfMethodFamily::Lrfd);
        f.left_de = 5.0;
        let exterior = cross_section(0, 6.0);
        assert!(f.girder_violation(&exterior, ForceEffect::Shear, LoadedLanes::TwoOrMore).is_some());
        assert!(f.girder_violation(&exterior, ForceEffect::Shear, LoadedLanes::One).is_none());
    }
}
