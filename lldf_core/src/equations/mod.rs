//! # Distribution Factor Methods
//!
//! Formula sets for each AASHTO cross-section type, the lever rule, the rigid
//! method and the lanes/beams ratio, plus [`LldfMethod`], which binds a formula
//! set to one sampled cross-section and turns formula outcomes into
//! [`DfResult`] values.
//!
//! All equations use US customary units: S, L, de and W in feet; ts, d, b and
//! eg in inches; I, J and Kg in in⁴.
//!
//! ## Modules
//!
//! - [`lever_rule`] - Statics of wheel lines on a deck hinged at the girders
//! - [`rigid`] - Rigid cross-section distribution for exterior girders
//! - [`skew`] - Skew corrections for moment and shear
//! - [`type_aek`] - Slab on I-girders (types a, e, k)
//! - [`type_bc`] - Slab on spread box and U-beams (types b, c)
//! - [`type_fg`] - Adjacent box and slab beams (types f, g)
//! - [`type_hij`] - Multi-web beams not connected as a unit (types i, j)

pub mod lever_rule;
pub mod rigid;
pub mod skew;
pub mod type_aek;
pub mod type_bc;
pub mod type_fg;
pub mod type_hij;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::{LldfError, LldfResult};
use crate::geometry::BaseDetails;
use crate::types::{ForceEffect, LimitState, LldfMethodFamily, LoadedLanes, RangeOfApplicabilityAction};

pub use lever_rule::LeverRuleData;
pub use rigid::RigidData;
pub use type_aek::TypeAek;
pub use type_bc::TypeBc;
pub use type_fg::{TypeF, TypeG};
pub use type_hij::TypeHij;

/// Multiple presence factor for a number of loaded lanes (LRFD 3.6.1.1.2).
pub fn multiple_presence_factor(loaded_lanes: usize) -> f64 {
    match loaded_lanes {
        0 | 1 => 1.2,
        2 => 1.0,
        3 => 0.85,
        _ => 0.65,
    }
}

/// Method that produced a distribution factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Method {
    Equation,
    LeverRule,
    RigidMethod,
    LanesBeams,
}

/// Rule that replaced the value the method would otherwise have produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverrideReason {
    /// Exterior factor raised to the adjacent interior factor
    InteriorOverride,
    /// Factor raised to lanes/beams
    LanesBeamsOverride,
    /// Multi-lane factor used for the one-lane case
    MultiLaneForcedControls,
    /// Equation out of range; lever rule used instead
    RangeOfApplicabilityFallback,
}

/// How a distribution factor was arrived at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllingMethod {
    pub method: Method,
    pub overrides: BTreeSet<OverrideReason>,
    /// Skew correction for this force effect was applied
    pub skew_applied: bool,
}

impl ControllingMethod {
    pub fn new(method: Method) -> Self {
        ControllingMethod {
            method,
            overrides: BTreeSet::new(),
            skew_applied: false,
        }
    }

    pub fn has_override(&self, reason: OverrideReason) -> bool {
        self.overrides.contains(&reason)
    }
}

/// Inputs and outcome of a closed-form equation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationData {
    pub mg: f64,
    /// Exterior girder correction factor, if one was applied
    pub e: Option<f64>,
    /// Interior girder factor the exterior factor was derived from
    pub interior_mg: Option<f64>,
}

impl EquationData {
    pub fn interior(mg: f64) -> Self {
        EquationData {
            mg,
            e: None,
            interior_mg: None,
        }
    }

    pub fn exterior(e: f64, interior_mg: f64) -> Self {
        EquationData {
            mg: e * interior_mg,
            e: Some(e),
            interior_mg: Some(interior_mg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanesBeamsData {
    pub mg: f64,
    pub lanes: usize,
    pub beams: usize,
    pub scale: f64,
}

/// One-lane or multi-lane distribution factor with the data that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfResult {
    pub mg: f64,
    pub controlling: ControllingMethod,
    /// Multiple presence factor already contained in `mg`
    pub multiple_presence: f64,
    /// Skew correction factor multiplied into `mg`
    pub skew_correction: f64,
    pub equation: Option<EquationData>,
    pub lever_rule: Option<LeverRuleData>,
    pub rigid: Option<RigidData>,
    pub lanes_beams: Option<LanesBeamsData>,
}

impl DfResult {
    fn from_method(mg: f64, method: Method, multiple_presence: f64) -> Self {
        DfResult {
            mg,
            controlling: ControllingMethod::new(method),
            multiple_presence,
            skew_correction: 1.0,
            equation: None,
            lever_rule: None,
            rigid: None,
            lanes_beams: None,
        }
    }

    /// Placeholder for a lane case that does not apply (multi-lane with a
    /// single design lane, or any fatigue multi-lane case).
    pub fn unused() -> Self {
        DfResult::from_method(0.0, Method::Equation, 1.0)
    }

    pub fn has_override(&self, reason: OverrideReason) -> bool {
        self.controlling.has_override(reason)
    }

    /// Replace this result with the lanes/beams value if that is larger.
    pub fn floor_to_lanes_beams(&mut self, lanes_beams: &DfResult) {
        if self.mg < lanes_beams.mg {
            let mut floor = lanes_beams.clone();
            floor.controlling.overrides.insert(OverrideReason::LanesBeamsOverride);
            *self = floor;
        }
    }
}

/// What a formula set prescribes for one girder, force effect and lane case.
#[derive(Debug, Clone, PartialEq)]
pub enum Governing {
    Equation(EquationData),
    LeverRule,
    /// Lever rule times a factor, without the multiple presence factor
    ScaledLeverRule(f64),
    /// Lesser of the equation and the lever rule
    LesserOfEquationAndLeverRule(EquationData),
}

impl Governing {
    fn uses_equation(&self) -> bool {
        matches!(self, Governing::Equation(_) | Governing::LesserOfEquationAndLeverRule(_))
    }
}

/// Closed set of AASHTO formula sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormulaSet {
    Aek(TypeAek),
    Bc(TypeBc),
    F(TypeF),
    G(TypeG),
    Hij(TypeHij),
}

impl FormulaSet {
    /// Range violations that do not depend on the girder being evaluated.
    pub fn bridge_wide_violation(&self, base: &BaseDetails) -> Option<String> {
        match self {
            FormulaSet::Aek(f) => f.bridge_wide_violation(base),
            FormulaSet::Bc(f) => f.bridge_wide_violation(base),
            FormulaSet::F(f) => f.bridge_wide_violation(base),
            FormulaSet::G(f) => f.bridge_wide_violation(base),
            FormulaSet::Hij(f) => f.bridge_wide_violation(base),
        }
    }

    /// Range violations for one girder, including the bridge-wide ones.
    pub fn violation(&self, base: &BaseDetails, effect: ForceEffect, lanes: LoadedLanes) -> Option<String> {
        self.bridge_wide_violation(base).or_else(|| match self {
            FormulaSet::Aek(f) => f.girder_violation(base, effect, lanes),
            FormulaSet::Bc(f) => f.girder_violation(base, effect, lanes),
            FormulaSet::F(f) => f.girder_violation(base, effect, lanes),
            FormulaSet::G(f) => f.girder_violation(base, effect, lanes),
            FormulaSet::Hij(f) => f.girder_violation(base, effect, lanes),
        })
    }

    pub fn evaluate(&self, base: &BaseDetails, effect: ForceEffect, lanes: LoadedLanes) -> Governing {
        match (self, effect) {
            (FormulaSet::Aek(f), ForceEffect::Moment) => f.moment(base, lanes),
            (FormulaSet::Aek(f), ForceEffect::Shear) => f.shear(base, lanes),
            (FormulaSet::Bc(f), ForceEffect::Moment) => f.moment(base, lanes),
            (FormulaSet::Bc(f), ForceEffect::Shear) => f.shear(base, lanes),
            (FormulaSet::F(f), ForceEffect::Moment) => f.moment(base, lanes),
            (FormulaSet::F(f), ForceEffect::Shear) => f.shear(base, lanes),
            (FormulaSet::G(f), ForceEffect::Moment) => f.moment(base, lanes),
            (FormulaSet::G(f), ForceEffect::Shear) => f.shear(base, lanes),
            (FormulaSet::Hij(f), ForceEffect::Moment) => f.moment(base, lanes),
            (FormulaSet::Hij(f), ForceEffect::Shear) => f.shear(base, lanes),
        }
    }

    /// Skew correction before any policy suppresses it.
    pub fn skew_correction(&self, base: &BaseDetails, effect: ForceEffect) -> f64 {
        match (self, effect) {
            (FormulaSet::Aek(f), ForceEffect::Moment) => f.moment_skew(base),
            (FormulaSet::Aek(f), ForceEffect::Shear) => f.shear_skew(base),
            (FormulaSet::Bc(f), ForceEffect::Moment) => f.moment_skew(base),
            (FormulaSet::Bc(f), ForceEffect::Shear) => f.shear_skew(base),
            (FormulaSet::F(f), ForceEffect::Moment) => f.moment_skew(base),
            (FormulaSet::F(f), ForceEffect::Shear) => f.shear_skew(base),
            (FormulaSet::G(f), ForceEffect::Moment) => f.moment_skew(base),
            (FormulaSet::G(f), ForceEffect::Shear) => f.shear_skew(base),
            (FormulaSet::Hij(f), ForceEffect::Moment) => f.moment_skew(base),
            (FormulaSet::Hij(f), ForceEffect::Shear) => f.shear_skew(base),
        }
    }
}

/// Policy switches bound into a method object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodSettings {
    pub variant: LldfMethodFamily,
    pub roa_action: RangeOfApplicabilityAction,
    pub skew_moment: bool,
    pub skew_shear: bool,
    pub rigid_method: bool,
    pub lanes_beams_scale: f64,
}

/// A formula set bound to one sampled cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LldfMethod {
    pub base: BaseDetails,
    pub formulas: FormulaSet,
    pub settings: MethodSettings,
}

impl LldfMethod {
    pub fn new(base: BaseDetails, formulas: FormulaSet, settings: MethodSettings) -> Self {
        LldfMethod {
            base,
            formulas,
            settings,
        }
    }

    pub fn bridge_wide_violation(&self) -> Option<String> {
        self.formulas.bridge_wide_violation(&self.base)
    }

    /// Skew correction applied to `effect` results (1.0 when suppressed).
    pub fn skew_correction(&self, effect: ForceEffect) -> f64 {
        let enabled = match effect {
            ForceEffect::Moment => self.settings.skew_moment,
            ForceEffect::Shear => self.settings.skew_shear,
        };
        if enabled {
            self.formulas.skew_correction(&self.base, effect)
        } else {
            1.0
        }
    }

    /// Distribution factor by the closed-form equations, honoring the range
    /// of applicability action.
    pub fn calculated(&self, effect: ForceEffect, lanes: LoadedLanes, ls: LimitState) -> LldfResult<DfResult> {
        let governing = self.formulas.evaluate(&self.base, effect, lanes);

        let mut result = if governing.uses_equation() {
            match self.formulas.violation(&self.base, effect, lanes) {
                Some(reason) => match self.settings.roa_action {
                    RangeOfApplicabilityAction::Enforce => {
                        return Err(LldfError::range_of_applicability(reason));
                    }
                    RangeOfApplicabilityAction::Ignore => self.resolve(governing, lanes),
                    RangeOfApplicabilityAction::UseLeverRule => {
                        let mut fallback = self.lever_rule_result(lanes);
                        fallback
                            .controlling
                            .overrides
                            .insert(OverrideReason::RangeOfApplicabilityFallback);
                        fallback
                    }
                },
                None => self.resolve(governing, lanes),
            }
        } else {
            self.resolve(governing, lanes)
        };

        if self.settings.rigid_method && self.base.is_exterior {
            let rigid = rigid::rigid_method(&self.base, lanes);
            if rigid.mg > result.mg {
                let mut floor = DfResult::from_method(rigid.mg, Method::RigidMethod, rigid.multiple_presence);
                floor.rigid = Some(rigid);
                floor.controlling.overrides = result.controlling.overrides.clone();
                result = floor;
            }
        }

        Ok(self.finish(result, effect, lanes, ls))
    }

    /// Distribution factor by the lever rule.
    pub fn by_lever_rule(&self, effect: ForceEffect, lanes: LoadedLanes, ls: LimitState) -> DfResult {
        let result = self.lever_rule_result(lanes);
        self.finish(result, effect, lanes, ls)
    }

    /// Lanes/beams ratio for a number of loaded lanes. Never skew corrected.
    pub fn lanes_beams(&self, lanes: usize) -> DfResult {
        let beams = self.base.girder_count.max(1);
        let mg = self.settings.lanes_beams_scale * lanes as f64 / beams as f64;
        let mut result = DfResult::from_method(mg, Method::LanesBeams, 1.0);
        result.lanes_beams = Some(LanesBeamsData {
            mg,
            lanes,
            beams,
            scale: self.settings.lanes_beams_scale,
        });
        result
    }

    fn lever_rule_result(&self, lanes: LoadedLanes) -> DfResult {
        let data = lever_rule::lever_rule(&self.base, lanes);
        let mut result = DfResult::from_method(data.mg, Method::LeverRule, data.multiple_presence);
        result.lever_rule = Some(data);
        result
    }

    fn resolve(&self, governing: Governing, lanes: LoadedLanes) -> DfResult {
        match governing {
            Governing::Equation(data) => {
                let mut result = DfResult::from_method(data.mg, Method::Equation, multiple_presence_factor(1));
                result.equation = Some(data);
                result
            }
            Governing::LeverRule => self.lever_rule_result(lanes),
            Governing::ScaledLeverRule(factor) => {
                let data = lever_rule::lever_rule_scaled(&self.base, lanes, factor);
                let mut result = DfResult::from_method(data.mg, Method::LeverRule, data.multiple_presence);
                result.lever_rule = Some(data);
                result
            }
            Governing::LesserOfEquationAndLeverRule(data) => {
                let lever = self.lever_rule_result(lanes);
                if lever.mg < data.mg {
                    lever
                } else {
                    let mut result = DfResult::from_method(data.mg, Method::Equation, multiple_presence_factor(1));
                    result.equation = Some(data);
                    result
                }
            }
        }
    }

    fn finish(&self, mut result: DfResult, effect: ForceEffect, lanes: LoadedLanes, ls: LimitState) -> DfResult {
        let skew = self.skew_correction(effect);
        result.mg *= skew;
        result.skew_correction = skew;
        result.controlling.skew_applied = skew != 1.0;

        if ls.is_fatigue() && lanes == LoadedLanes::One {
            result.mg /= result.multiple_presence;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_presence_factors() {
        assert_eq!(multiple_presence_factor(1), 1.2);
        assert_eq!(multiple_presence_factor(2), 1.0);
        assert_eq!(multiple_presence_factor(3), 0.85);
        assert_eq!(multiple_presence_factor(4), 0.65);
        assert_eq!(multiple_presence_factor(7), 0.65);
    }

    #[test]
    fn test_floor_to_lanes_beams_flags_override() {
        let mut result = DfResult::from_method(0.30, Method::Equation, 1.2);
        let mut floor = DfResult::from_method(0.40, Method::LanesBeams, 1.0);
        floor.lanes_beams = Some(LanesBeamsData {
            mg: 0.40,
            lanes: 2,
            beams: 5,
            scale: 1.0,
        });
        result.floor_to_lanes_beams(&floor);
        assert_eq!(result.mg, 0.40);
        assert_eq!(result.controlling.method, Method::LanesBeams);
        assert!(result.has_override(OverrideReason::LanesBeamsOverride));
        assert!(!result.controlling.skew_applied);

        let mut larger = DfResult::from_method(0.55, Method::Equation, 1.2);
        larger.floor_to_lanes_beams(&floor);
        assert_eq!(larger.mg, 0.55);
        assert!(!larger.has_override(OverrideReason::LanesBeamsOverride));
    }

    #[test]
    fn test_exterior_equation_data() {
        let data = EquationData::exterior(1.1, 0.6);
        assert!((data.mg - 0.66).abs() < 1e-12);
        assert_eq!(data.interior_mg, Some(0.6));
    }
}
