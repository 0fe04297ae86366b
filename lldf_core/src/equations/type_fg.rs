//! Adjacent voided and solid slab beams, AASHTO types f and g.
//!
//! [`TypeF`] applies to beams connected to act as a unit (and to every
//! adjacent beam from the 2014 edition onward). [`TypeG`] applies to beams
//! connected only enough to prevent relative vertical displacement; its
//! interior moment factor is `S/D`. Both share the exterior moment factors
//! and the shear equations.

use serde::{Deserialize, Serialize};

use crate::equations::{skew, EquationData, Governing};
use crate::geometry::BaseDetails;
use crate::types::{DfSide, ForceEffect, LldfMethodFamily, LoadedLanes};

const B_MIN: f64 = 35.0;
const B_MAX: f64 = 60.0;
const L_MIN: f64 = 20.0;
const L_MAX: f64 = 120.0;
const NB_MIN: usize = 5;
const NB_MAX: usize = 20;
const J_MIN: f64 = 25_000.0;
const J_MAX: f64 = 610_000.0;
const I_MIN: f64 = 40_000.0;
const I_MAX: f64 = 610_000.0;
const DE_MAX: f64 = 2.0;

/// Section and span facts shared by both slab-beam formula sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabBeamSection {
    pub variant: LldfMethodFamily,
    /// Effective span length (ft)
    pub l: f64,
    /// Beam width (in)
    pub b: f64,
    /// Beam depth (in)
    pub d: f64,
    /// Moment of inertia (in⁴)
    pub i: f64,
    /// St. Venant torsional constant (in⁴)
    pub j: f64,
    /// Exterior web to curb distance on each side (ft)
    pub left_de: f64,
    pub right_de: f64,
}

impl SlabBeamSection {
    fn de(&self, base: &BaseDetails) -> f64 {
        match base.side {
            DfSide::Left => self.left_de,
            DfSide::Right => self.right_de,
        }
    }

    fn interior_shear_equation(&self, lanes: LoadedLanes) -> f64 {
        let ij = (self.i / self.j).powf(0.05);
        match lanes {
            LoadedLanes::One => (self.b / (130.0 * self.l)).powf(0.15) * ij,
            LoadedLanes::TwoOrMore => {
                (self.b / 156.0).powf(0.4) * (self.b / (12.0 * self.l)).powf(0.1) * ij * (self.b / 48.0).max(1.0)
            }
        }
    }

    fn exterior_moment(&self, base: &BaseDetails, lanes: LoadedLanes, interior_mg: f64) -> Governing {
        let de = self.de(base);
        let e = match lanes {
            LoadedLanes::One => 1.125 + de / 30.0,
            LoadedLanes::TwoOrMore => 1.04 + de / 25.0,
        };
        Governing::Equation(EquationData::exterior(e.max(1.0), interior_mg))
    }

    fn shear(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        let g = self.interior_shear_equation(lanes);
        if !base.is_exterior {
            return Governing::Equation(EquationData::interior(g));
        }
        let de = self.de(base);
        let e = match lanes {
            LoadedLanes::One => (1.25 + de / 20.0).max(1.0),
            LoadedLanes::TwoOrMore => {
                let e = 1.0 + ((de + self.b / 12.0 - 2.0).max(0.0) / 40.0).sqrt();
                e.max(1.0) * (48.0 / self.b).min(1.0)
            }
        };
        Governing::Equation(EquationData::exterior(e, g))
    }

    fn bridge_wide_violation(&self, base: &BaseDetails) -> Option<String> {
        if self.b < B_MIN || self.b > B_MAX {
            return Some(format!(
                "Beam width b = {:.3} in is outside {} in <= b <= {} in",
                self.b, B_MIN, B_MAX
            ));
        }
        if self.l < L_MIN || self.l > L_MAX {
            return Some(format!(
                "Span length L = {:.3} ft is outside {} ft <= L <= {} ft",
                self.l, L_MIN, L_MAX
            ));
        }
        if base.girder_count < NB_MIN || base.girder_count > NB_MAX {
            return Some(format!(
                "Number of beams Nb = {} is outside {} <= Nb <= {}",
                base.girder_count, NB_MIN, NB_MAX
            ));
        }
        None
    }

    fn girder_violation(&self, base: &BaseDetails) -> Option<String> {
        if self.j < J_MIN || self.j > J_MAX {
            return Some(format!(
                "Torsional constant J = {:.0} in^4 is outside {} <= J <= {}",
                self.j, J_MIN, J_MAX
            ));
        }
        if self.i < I_MIN || self.i > I_MAX {
            return Some(format!(
                "Moment of inertia I = {:.0} in^4 is outside {} <= I <= {}",
                self.i, I_MIN, I_MAX
            ));
        }
        if base.is_exterior && self.de(base) > DE_MAX {
            return Some(format!(
                "Beam {}: exterior web to curb distance de = {:.3} ft exceeds {} ft",
                base.girder,
                self.de(base),
                DE_MAX
            ));
        }
        None
    }

    fn moment_skew(&self, base: &BaseDetails) -> f64 {
        skew::governing(base, skew::moment_bcfg)
    }

    fn shear_skew(&self, base: &BaseDetails) -> f64 {
        skew::governing(base, |theta| skew::shear_fg(self.l, self.d, theta))
    }
}

/// Beams connected to act as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeF {
    pub section: SlabBeamSection,
}

impl TypeF {
    /// `k = 2.5·Nb^-0.2 >= 1.5`
    pub fn k(girder_count: usize) -> f64 {
        (2.5 * (girder_count as f64).powf(-0.2)).max(1.5)
    }

    fn interior_moment_equation(&self, base: &BaseDetails, lanes: LoadedLanes) -> f64 {
        let s = &self.section;
        let k = TypeF::k(base.girder_count);
        match lanes {
            LoadedLanes::One => k * (s.b / (33.3 * s.l)).sqrt() * (s.i / s.j).powf(0.25),
            LoadedLanes::TwoOrMore => {
                k * (s.b / 305.0).powf(0.6) * (s.b / (12.0 * s.l)).powf(0.2) * (s.i / s.j).powf(0.06)
            }
        }
    }

    pub fn moment(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        let g = self.interior_moment_equation(base, lanes);
        if base.is_exterior {
            self.section.exterior_moment(base, lanes, g)
        } else {
            Governing::Equation(EquationData::interior(g))
        }
    }

    pub fn shear(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        self.section.shear(base, lanes)
    }

    pub fn bridge_wide_violation(&self, base: &BaseDetails) -> Option<String> {
        self.section.bridge_wide_violation(base)
    }

    pub fn girder_violation(&self, base: &BaseDetails, _effect: ForceEffect, _lanes: LoadedLanes) -> Option<String> {
        self.section.girder_violation(base)
    }

    pub fn moment_skew(&self, base: &BaseDetails) -> f64 {
        self.section.moment_skew(base)
    }

    pub fn shear_skew(&self, base: &BaseDetails) -> f64 {
        self.section.shear_skew(base)
    }
}

/// Beams connected only enough to prevent relative vertical displacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeG {
    pub section: SlabBeamSection,
    /// Poisson's ratio of the beam concrete
    pub poisson_ratio: f64,
}

impl TypeG {
    /// Stiffness constant `C = K·W/L <= K`, `K = sqrt((1 + μ)·I/J)`
    pub fn stiffness_constant(&self, bridge_width: f64) -> f64 {
        let s = &self.section;
        let k = ((1.0 + self.poisson_ratio) * s.i / s.j).sqrt();
        (k * bridge_width / s.l).min(k)
    }

    /// Denominator of `g = S/D` for `lanes` design lanes
    pub fn d_factor(&self, bridge_width: f64, lanes: usize) -> f64 {
        let c = self.stiffness_constant(bridge_width);
        let nl = lanes as f64;
        if c <= 5.0 {
            11.5 - nl + 1.4 * nl * (1.0 - 0.2 * c).powi(2)
        } else {
            11.5 - nl
        }
    }

    fn interior_moment_equation(&self, base: &BaseDetails, lanes: LoadedLanes) -> f64 {
        let nl = match lanes {
            LoadedLanes::One => 1,
            LoadedLanes::TwoOrMore => base.lane_count.max(2),
        };
        (self.section.b / 12.0) / self.d_factor(base.bridge_width, nl)
    }

    pub fn moment(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        let g = self.interior_moment_equation(base, lanes);
        if base.is_exterior {
            self.section.exterior_moment(base, lanes, g)
        } else {
            Governing::Equation(EquationData::interior(g))
        }
    }

    pub fn shear(&self, base: &BaseDetails, lanes: LoadedLanes) -> Governing {
        self.section.shear(base, lanes)
    }

    pub fn bridge_wide_violation(&self, base: &BaseDetails) -> Option<String> {
        self.section.bridge_wide_violation(base)
    }

    pub fn girder_violation(&self, base: &BaseDetails, _effect: ForceEffect, _lanes: LoadedLanes) -> Option<String> {
        self.section.girder_violation(base)
    }

    pub fn moment_skew(&self, base: &BaseDetails) -> f64 {
        self.section.moment_skew(base)
    }

    pub fn shear_skew(&self, base: &BaseDetails) -> f64 {
        self.section.shear_skew(base)
    }
}
