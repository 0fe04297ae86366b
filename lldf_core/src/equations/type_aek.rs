//! Concrete deck on I-girders, AASHTO cross-section types a, e and k.
//!
//! Moment: LRFD Table 4.6.2.2.2b-1 (interior), 4.6.2.2.2d-1 (exterior).
//! Shear: LRFD Table 4.6.2.2.3a-1 (interior), 4.6.2.2.3b-1 (exterior).
//!
//! The WSDOT and TxDOT variants assign the interior girder factor to the
//! exterior girder whenever the slab overhang does not exceed half the girder
//! spacing.

use serde::{Deserialize, Serialize};

use crate::equations::{skew, EquationData, Governing};
use crate::geometry::BaseDetails;
use crate::types::{ForceEffect, LldfMethodFamily, LoadedLanes};

/// Range of applicability limits
const S_MIN: f64 = 3.5;
const S_MAX: f64 = 16.0;
const TS_MIN: f64 = 4.5;
const TS_MAX: f64 = 12.0;
const L_MIN: f64 = 20.0;
const L_MAX: f64 = 240.0;
const KG_MIN: f64 = 10_000.0;
const KG_MAX: f64 = 7_000_000.0;
const DE_MIN: f64 = -1.0;
const DE_MAX: f64 = 5.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAek {
    pub variant: LldfMethodFamily,
    /// Effective span length (ft)
    pub l: f64,
    /// Structural slab thickness (in)
    pub ts: f64,
    /// Longitudinal stiffness parameter n·(I + A·eg²) (in⁴)
    pub kg: f64,
}

impl TypeAek {
    fn stiffness_term(&self) -> f64 {
        self.kg / (12.0 * self.l * self.ts.powi(3))
    }

    fn interior_moment_equation(&self, s: f64, lanes: LoadedLanes) -> f64 {
        let k = self.stiffness_term().powf(0.1);
        match lanes {
            LoadedLanes::One => 0.06 + (s / 14.0).powf(0.4) * (s / self.l).powf(0.3) * k,
            LoadedLanes::TwoOrMore => 0.075 + (s / 9.5).powf(0.6) * (s / self.l).powf(0.2) * k,
        }
    }

    fn interior_shear_equation(&self, s: f64, lanes: LoadedLanes) -> f64 {
        match lanes {
            LoadedLanes::One => 0.36 + s / 25.0,
            LoadedLanes::TwoOrMore => 0.2 + s / 12.0 - (s / 35.0).powi(2),
        }
    }

    fn exterior_uses_interior_factor(&self, base: &BaseDetails) -> bool {
        self.variant != LldfMethodFamily::Lrfd && base.slab_overhang() <= 0.5 * base.savg
    }

    fn interior_moment(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        let data = EquationData::interior(self.interior_moment_equation(base.savg, lanes));
        if base.girder_count == 3 {
            Governing::LesserOfEquationAndLeverRule(data)
        } else {
            Governing::Equation(data)
        }
    }

    fn interior_shear(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        if base.girder_count == 3 {
            Governing::LeverRule
        } else {
            Governing::Equation(EquationData::interior(self.interior_shear_equation(base.savg, lanes)))
        }
    }

    pub fn moment(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        if !base.is_exterior || self.exterior_uses_interior_factor(base) {
            return self.interior_moment(base, lanes);
        }
        match lanes {
            LoadedLanes::One => Governing::LeverRule,
            LoadedLanes::TwoOrMore => {
                let e = 0.77 + base.curb_overhang() / 9.1;
                let g = self.interior_moment_equation(base.savg, lanes);
                Governing::Equation(EquationData::exterior(e, g))
            }
        }
    }

    pub fn shear(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        if !base.is_exterior || self.exterior_uses_interior_factor(base) {
            return self.interior_shear(base, lanes);
        }
        match lanes {
            LoadedLanes::One => Governing::LeverRule,
            LoadedLanes::TwoOrMore => {
                let e = 0.6 + base.curb_overhang() / 10.0;
                let g = self.interior_shear_equation(base.savg, lanes);
                Governing::Equation(EquationData::exterior(e, g))
            }
        }
    }

    pub fn bridge_wide_violation(&self, base: &BaseDetails) -> Option<String> {
        let (s_min, s_max) = base.spacing_range();
        if base.girder_count < 3 {
            return Some(format!(
                "Number of girders ({}) is less than 3",
                base.girder_count
            ));
        }
        if s_min < S_MIN || s_max > S_MAX {
            return Some(format!(
                "Girder spacing ({:.3} ft to {:.3} ft) is outside {} ft <= S <= {} ft",
                s_min, s_max, S_MIN, S_MAX
            ));
        }
        if self.ts < TS_MIN || self.ts > TS_MAX {
            return Some(format!(
                "Slab thickness ts = {:.3} in is outside {} in <= ts <= {} in",
                self.ts, TS_MIN, TS_MAX
            ));
        }
        if self.l < L_MIN || self.l > L_MAX {
            return Some(format!(
                "Span length L = {:.3} ft is outside {} ft <= L <= {} ft",
                self.l, L_MIN, L_MAX
            ));
        }
        None
    }

    pub fn girder_violation(&self, base: &BaseDetails, _effect: ForceEffect, lanes: LoadedLanes) -> Option<String> {
        if self.kg < KG_MIN || self.kg > KG_MAX {
            return Some(format!(
                "Stiffness parameter Kg = {:.0} in^4 is outside {} <= Kg <= {}",
                self.kg, KG_MIN, KG_MAX
            ));
        }
        if base.is_exterior && lanes == LoadedLanes::TwoOrMore && !self.exterior_uses_interior_factor(base) {
            let de = base.curb_overhang();
            if !(DE_MIN..=DE_MAX).contains(&de) {
                return Some(format!(
                    "Girder {}: curb to exterior girder distance de = {:.3} ft is outside {} ft <= de <= {} ft",
                    base.girder, de, DE_MIN, DE_MAX
                ));
            }
        }
        None
    }

    pub fn moment_skew(&self, base: &BaseDetails) -> f64 {
        skew::governing(base, |theta| skew::moment_aek(self.kg, self.l, self.ts, base.savg, theta))
    }

    pub fn shear_skew(&self, base: &BaseDetails) -> f64 {
        skew::governing(base, |theta| skew::shear_aek(self.kg, self.l, self.ts, theta))
    }
}
