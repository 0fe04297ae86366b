//! # Factor Computation Driver
//!
//! Turns a [`FamilyDetails`] into one-lane and multi-lane results for each
//! force effect: picks the computation path, applies the lanes/beams floor
//! and the forced multi-lane rule, and reduces each pair to its controlling
//! value. Cross-girder rules (the exterior floor) and caching live in
//! [`crate::engine`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::criteria::LldfCriteria;
use crate::equations::{DfResult, OverrideReason};
use crate::errors::LldfResult;
use crate::families::{multi_lane_forced_controls, FamilyDetails, FamilyParams};
use crate::geometry::BaseDetails;
use crate::types::{DistributionFactorMethod, ForceEffect, LimitState, LoadedLanes};

/// Positive moment and shear factors for a girder in a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanDetails {
    pub base: BaseDetails,
    pub params: FamilyParams,
    /// Moment, one loaded lane
    pub gm1: DfResult,
    /// Moment, two or more loaded lanes
    pub gm2: DfResult,
    /// Shear, one loaded lane
    pub gv1: DfResult,
    /// Shear, two or more loaded lanes
    pub gv2: DfResult,
    /// Controlling moment factor
    pub gm: f64,
    /// Controlling shear factor
    pub gv: f64,
    pub skew_moment: f64,
    pub skew_shear: f64,
}

/// Negative moment factors for a girder at one face of a pier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PierDetails {
    pub base: BaseDetails,
    pub params: FamilyParams,
    pub gm1: DfResult,
    pub gm2: DfResult,
    pub gm: f64,
    pub skew_moment: f64,
}

/// Reaction factors for a girder at a pier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionDetails {
    pub base: BaseDetails,
    pub params: FamilyParams,
    pub gr1: DfResult,
    pub gr2: DfResult,
    pub gr: f64,
    pub skew_shear: f64,
}

/// Larger of the one-lane and multi-lane factors.
pub fn controlling(one: &DfResult, multi: &DfResult) -> f64 {
    one.mg.max(multi.mg)
}

/// One-lane and multi-lane results for one force effect.
pub(crate) fn lane_results(
    details: &FamilyDetails,
    criteria: &LldfCriteria,
    effect: ForceEffect,
    ls: LimitState,
) -> LldfResult<(DfResult, DfResult)> {
    let method = &details.method;
    let base = &method.base;

    let compute = |lanes: LoadedLanes| -> LldfResult<DfResult> {
        match base.method {
            DistributionFactorMethod::Calculated => method.calculated(effect, lanes, ls),
            DistributionFactorMethod::LeverRule => Ok(method.by_lever_rule(effect, lanes, ls)),
        }
    };

    let mut one = compute(LoadedLanes::One)?;
    let multi_lane_used = !ls.is_fatigue() && base.lane_count >= 2;
    let mut multi = if multi_lane_used {
        compute(LoadedLanes::TwoOrMore)?
    } else {
        DfResult::unused()
    };

    if criteria.limit_to_lanes_beams {
        one.floor_to_lanes_beams(&method.lanes_beams(1));
        if multi_lane_used {
            multi.floor_to_lanes_beams(&method.lanes_beams(base.lane_count));
        }
    }

    if multi_lane_used && multi_lane_forced_controls(criteria, details.params.beam_family(), base) {
        debug!("Girder {}: multi-lane {:?} factor controls", base.girder, effect);
        one = multi.clone();
        one.controlling.overrides.insert(OverrideReason::MultiLaneForcedControls);
    }

    Ok((one, multi))
}

pub fn span_factors(details: &FamilyDetails, criteria: &LldfCriteria, ls: LimitState) -> LldfResult<SpanDetails> {
    let (gm1, gm2) = lane_results(details, criteria, ForceEffect::Moment, ls)?;
    let (gv1, gv2) = lane_results(details, criteria, ForceEffect::Shear, ls)?;
    Ok(SpanDetails {
        base: details.method.base.clone(),
        params: details.params.clone(),
        gm: controlling(&gm1, &gm2),
        gv: controlling(&gv1, &gv2),
        skew_moment: details.method.skew_correction(ForceEffect::Moment),
        skew_shear: details.method.skew_correction(ForceEffect::Shear),
        gm1,
        gm2,
        gv1,
        gv2,
    })
}

pub fn pier_factors(details: &FamilyDetails, criteria: &LldfCriteria, ls: LimitState) -> LldfResult<PierDetails> {
    let (gm1, gm2) = lane_results(details, criteria, ForceEffect::Moment, ls)?;
    Ok(PierDetails {
        base: details.method.base.clone(),
        params: details.params.clone(),
        gm: controlling(&gm1, &gm2),
        skew_moment: details.method.skew_correction(ForceEffect::Moment),
        gm1,
        gm2,
    })
}

pub fn reaction_factors(
    details: &FamilyDetails,
    criteria: &LldfCriteria,
    ls: LimitState,
) -> LldfResult<ReactionDetails> {
    let (gr1, gr2) = lane_results(details, criteria, ForceEffect::Shear, ls)?;
    Ok(ReactionDetails {
        base: details.method.base.clone(),
        params: details.params.clone(),
        gr: controlling(&gr1, &gr2),
        skew_shear: details.method.skew_correction(ForceEffect::Shear),
        gr1,
        gr2,
    })
}
