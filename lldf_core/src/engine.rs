//! # Distribution Factor Engine
//!
//! [`LldfEngine`] is the public face of the crate. It owns the result caches
//! for one analysis pass, applies the exterior floor rule across girders,
//! resolves the bridge-wide computation method, and converts range of
//! applicability failures into a diagnostic plus a fatal error.
//!
//! ## Example
//!
//! ```rust
//! use lldf_core::{BridgeModel, LimitState, LldfEngine, StatusCenter};
//!
//! let bridge = BridgeModel::sample_i_girder();
//! let mut engine = LldfEngine::new(&bridge, bridge.criteria.clone(), StatusCenter::new()).unwrap();
//! let gm = engine.moment_distribution_factor(0, 0, LimitState::StrengthI, None).unwrap();
//! assert!(gm > 0.0);
//! ```

use std::collections::HashMap;

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::criteria::LldfCriteria;
use crate::driver::{self, PierDetails, ReactionDetails, SpanDetails};
use crate::equations::{DfResult, OverrideReason};
use crate::errors::{LldfError, LldfResult};
use crate::families::extract_parameters;
use crate::geometry::resolve_indices;
use crate::providers::{BridgeData, StatusItem, StatusSink};
use crate::types::{
    DfLocation, DistributionFactorMethod, ForceEffect, LimitState, LimitStateCategory, LrfdEdition, PierFace,
    RangeOfApplicabilityAction, SpanEnd,
};

/// An interior factor must exceed the exterior factor by more than this to
/// replace it.
pub const EXTERIOR_FLOOR_TOLERANCE: f64 = 1.0e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    index: usize,
    girder: usize,
    category: LimitStateCategory,
    face: Option<PierFace>,
}

impl CacheKey {
    fn new(index: usize, girder: usize, ls: LimitState, face: Option<PierFace>) -> Self {
        CacheKey {
            index,
            girder,
            category: ls.category(),
            face,
        }
    }
}

/// Controlling, one-lane and multi-lane values of one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub controlling: f64,
    pub one_lane: f64,
    pub multi_lane: f64,
}

impl FactorBreakdown {
    fn new(one: &DfResult, multi: &DfResult, controlling: f64) -> Self {
        FactorBreakdown {
            controlling,
            one_lane: one.mg,
            multi_lane: multi.mg,
        }
    }
}

/// Every distribution factor for a girder in a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderFactors {
    pub span: usize,
    pub girder: usize,
    pub limit_state: LimitState,
    pub positive_moment: FactorBreakdown,
    /// Ahead face of the pier at the start of the span
    pub negative_moment: FactorBreakdown,
    pub shear: FactorBreakdown,
    /// Reaction at the pier at the start of the span
    pub reaction: FactorBreakdown,
}

/// Live load distribution factor engine for one analysis pass.
///
/// Results are cached per span or pier, girder, limit state category and
/// pier face. Calls that supply a girder concrete strength override are
/// always recomputed and never touch the cache. Construct a new engine (or
/// call [`LldfEngine::clear`]) when the bridge changes.
pub struct LldfEngine<'a, B: BridgeData + ?Sized, S: StatusSink> {
    bridge: &'a B,
    criteria: LldfCriteria,
    sink: S,
    spans: HashMap<CacheKey, SpanDetails>,
    piers: HashMap<CacheKey, PierDetails>,
    reactions: HashMap<CacheKey, ReactionDetails>,
    method: OnceCell<DistributionFactorMethod>,
}

impl<'a, B: BridgeData + ?Sized, S: StatusSink> LldfEngine<'a, B, S> {
    pub fn new(bridge: &'a B, criteria: LldfCriteria, sink: S) -> LldfResult<Self> {
        criteria.validate()?;
        Ok(LldfEngine {
            bridge,
            criteria,
            sink,
            spans: HashMap::new(),
            piers: HashMap::new(),
            reactions: HashMap::new(),
            method: OnceCell::new(),
        })
    }

    pub fn bridge(&self) -> &'a B {
        self.bridge
    }

    pub fn criteria(&self) -> &LldfCriteria {
        &self.criteria
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Drop every cached result and the resolved bridge-wide method.
    pub fn clear(&mut self) {
        self.spans.clear();
        self.piers.clear();
        self.reactions.clear();
        self.method = OnceCell::new();
    }

    /// Computation method in effect for the whole bridge.
    ///
    /// With the lever-rule fallback action, a calculated bridge switches to
    /// the lever rule when any girder at any span or pier face violates a
    /// bridge-wide range of applicability limit.
    pub fn bridge_method(&self) -> LldfResult<DistributionFactorMethod> {
        self.method
            .get_or_try_init(|| resolve_bridge_method(self.bridge, &self.criteria))
            .copied()
    }

    // ------------------------------------------------------------------
    // Public factors
    // ------------------------------------------------------------------

    /// Positive moment distribution factor.
    pub fn moment_distribution_factor(
        &mut self,
        span: usize,
        girder: usize,
        ls: LimitState,
        fc: Option<f64>,
    ) -> LldfResult<f64> {
        let result = self.span_lookup(span, girder, ls, fc).map(|d| d.gm);
        self.escalate(result)
    }

    /// Negative moment distribution factor at one face of a pier.
    pub fn negative_moment_distribution_factor(
        &mut self,
        pier: usize,
        girder: usize,
        ls: LimitState,
        face: PierFace,
        fc: Option<f64>,
    ) -> LldfResult<f64> {
        let result = self.pier_lookup(pier, girder, ls, face, fc).map(|d| d.gm);
        self.escalate(result)
    }

    pub fn shear_distribution_factor(
        &mut self,
        span: usize,
        girder: usize,
        ls: LimitState,
        fc: Option<f64>,
    ) -> LldfResult<f64> {
        let result = self.span_lookup(span, girder, ls, fc).map(|d| d.gv);
        self.escalate(result)
    }

    pub fn reaction_distribution_factor(
        &mut self,
        pier: usize,
        girder: usize,
        ls: LimitState,
        fc: Option<f64>,
    ) -> LldfResult<f64> {
        let result = self.reaction_lookup(pier, girder, ls, fc).map(|d| d.gr);
        self.escalate(result)
    }

    /// Skew correction factor for a girder in a span.
    pub fn skew_correction_factor(
        &mut self,
        span: usize,
        girder: usize,
        ls: LimitState,
        effect: ForceEffect,
    ) -> LldfResult<f64> {
        let result = self.span_lookup(span, girder, ls, None).map(|d| match effect {
            ForceEffect::Moment => d.skew_moment,
            ForceEffect::Shear => d.skew_shear,
        });
        self.escalate(result)
    }

    /// Shear distribution factor at `x` ft from the start pier centerline.
    ///
    /// From the 2014 edition the shear skew correction applies at an obtuse
    /// corner and tapers linearly to 1.0 at mid-span.
    pub fn shear_distribution_factor_at(
        &mut self,
        span: usize,
        girder: usize,
        ls: LimitState,
        x: f64,
    ) -> LldfResult<f64> {
        let details = self.span_details(span, girder, ls)?;
        let governing = if details.gv1.mg >= details.gv2.mg {
            &details.gv1
        } else {
            &details.gv2
        };
        let skew = governing.skew_correction;
        if self.criteria.edition < LrfdEdition::SeventhEdition2014 || skew == 1.0 {
            return Ok(details.gv);
        }

        let bridge = self.bridge;
        let base_gv = details.gv / skew;
        let length = bridge.span_length(span, girder);
        let half = length / 2.0;
        let mut obtuse_start = bridge.has_obtuse_corner(span, girder, SpanEnd::Start);
        let mut obtuse_end = bridge.has_obtuse_corner(span, girder, SpanEnd::End);
        if !obtuse_start && !obtuse_end {
            if bridge.pier_skew(span) == 0.0 {
                obtuse_start = true;
            } else {
                obtuse_end = true;
            }
        }

        let from_start = |x: f64| (half - x) * (skew - 1.0) / half + 1.0;
        let from_end = |x: f64| (x - half) * (skew - 1.0) / (length - half) + 1.0;
        let adjustment = if x <= half {
            if obtuse_start {
                from_start(x)
            } else {
                1.0
            }
        } else if obtuse_end {
            from_end(x)
        } else {
            1.0
        };
        Ok(base_gv * adjustment)
    }

    // ------------------------------------------------------------------
    // Detailed results
    // ------------------------------------------------------------------

    pub fn span_details(&mut self, span: usize, girder: usize, ls: LimitState) -> LldfResult<SpanDetails> {
        let result = self.span_lookup(span, girder, ls, None);
        self.escalate(result)
    }

    pub fn pier_details(
        &mut self,
        pier: usize,
        girder: usize,
        ls: LimitState,
        face: PierFace,
    ) -> LldfResult<PierDetails> {
        let result = self.pier_lookup(pier, girder, ls, face, None);
        self.escalate(result)
    }

    pub fn reaction_details(&mut self, pier: usize, girder: usize, ls: LimitState) -> LldfResult<ReactionDetails> {
        let result = self.reaction_lookup(pier, girder, ls, None);
        self.escalate(result)
    }

    /// Positive moment, negative moment, shear and reaction factors for a
    /// girder in a span.
    pub fn df_results(&mut self, span: usize, girder: usize, ls: LimitState) -> LldfResult<GirderFactors> {
        let result = self.collect_results(span, girder, ls);
        self.escalate(result)
    }

    fn collect_results(&mut self, span: usize, girder: usize, ls: LimitState) -> LldfResult<GirderFactors> {
        let positive = self.span_lookup(span, girder, ls, None)?;
        let negative = self.pier_lookup(span, girder, ls, PierFace::Ahead, None)?;
        let reaction = self.reaction_lookup(span, girder, ls, None)?;
        Ok(GirderFactors {
            span,
            girder,
            limit_state: ls,
            positive_moment: FactorBreakdown::new(&positive.gm1, &positive.gm2, positive.gm),
            negative_moment: FactorBreakdown::new(&negative.gm1, &negative.gm2, negative.gm),
            shear: FactorBreakdown::new(&positive.gv1, &positive.gv2, positive.gv),
            reaction: FactorBreakdown::new(&reaction.gr1, &reaction.gr2, reaction.gr),
        })
    }

    // ------------------------------------------------------------------
    // Cached lookups
    // ------------------------------------------------------------------

    fn span_lookup(&mut self, span: usize, girder: usize, ls: LimitState, fc: Option<f64>) -> LldfResult<SpanDetails> {
        self.check_span(span)?;
        let key = CacheKey::new(span, girder, ls, None);
        if fc.is_none() {
            if let Some(hit) = self.spans.get(&key) {
                debug!("Span {} girder {}: cached factors", span, girder);
                return Ok(hit.clone());
            }
        }

        let method = self.bridge_method()?;
        let family = extract_parameters(self.bridge, &self.criteria, method, span, DfLocation::Span, girder, fc)?;
        let mut details = driver::span_factors(&family, &self.criteria, ls)?;

        if let Some(adjacent) = self.adjacent_interior(girder, details.base.girder_count, details.base.is_exterior) {
            let interior = self.span_lookup(span, adjacent, ls, fc)?;
            if interior.gm > details.gm + EXTERIOR_FLOOR_TOLERANCE {
                debug!("Span {} girder {}: moment raised to girder {}", span, girder, adjacent);
                details.gm1 = with_interior_override(&interior.gm1);
                details.gm2 = with_interior_override(&interior.gm2);
                details.gm = interior.gm;
                details.skew_moment = interior.skew_moment;
            }
            if interior.gv > details.gv + EXTERIOR_FLOOR_TOLERANCE {
                debug!("Span {} girder {}: shear raised to girder {}", span, girder, adjacent);
                details.gv1 = with_interior_override(&interior.gv1);
                details.gv2 = with_interior_override(&interior.gv2);
                details.gv = interior.gv;
                details.skew_shear = interior.skew_shear;
            }
        }

        if fc.is_none() {
            self.spans.insert(key, details.clone());
        }
        Ok(details)
    }

    fn pier_lookup(
        &mut self,
        pier: usize,
        girder: usize,
        ls: LimitState,
        face: PierFace,
        fc: Option<f64>,
    ) -> LldfResult<PierDetails> {
        self.check_pier(pier)?;
        let key = CacheKey::new(pier, girder, ls, Some(face));
        if fc.is_none() {
            if let Some(hit) = self.piers.get(&key) {
                debug!("Pier {} {:?} girder {}: cached factors", pier, face, girder);
                return Ok(hit.clone());
            }
        }

        let method = self.bridge_method()?;
        let location = DfLocation::for_pier_face(face);
        let family = extract_parameters(self.bridge, &self.criteria, method, pier, location, girder, fc)?;
        let mut details = driver::pier_factors(&family, &self.criteria, ls)?;

        if let Some(adjacent) = self.adjacent_interior(girder, details.base.girder_count, details.base.is_exterior) {
            let interior = self.pier_lookup(pier, adjacent, ls, face, fc)?;
            if interior.gm > details.gm + EXTERIOR_FLOOR_TOLERANCE {
                details.gm1 = with_interior_override(&interior.gm1);
                details.gm2 = with_interior_override(&interior.gm2);
                details.gm = interior.gm;
                details.skew_moment = interior.skew_moment;
            }
        }

        if fc.is_none() {
            self.piers.insert(key, details.clone());
        }
        Ok(details)
    }

    fn reaction_lookup(
        &mut self,
        pier: usize,
        girder: usize,
        ls: LimitState,
        fc: Option<f64>,
    ) -> LldfResult<ReactionDetails> {
        self.check_pier(pier)?;
        let key = CacheKey::new(pier, girder, ls, None);
        if fc.is_none() {
            if let Some(hit) = self.reactions.get(&key) {
                debug!("Pier {} girder {}: cached reaction factors", pier, girder);
                return Ok(hit.clone());
            }
        }

        let method = self.bridge_method()?;
        let family = extract_parameters(self.bridge, &self.criteria, method, pier, DfLocation::Reaction, girder, fc)?;
        let mut details = driver::reaction_factors(&family, &self.criteria, ls)?;

        if let Some(adjacent) = self.adjacent_interior(girder, details.base.girder_count, details.base.is_exterior) {
            let interior = self.reaction_lookup(pier, adjacent, ls, fc)?;
            if interior.gr > details.gr + EXTERIOR_FLOOR_TOLERANCE {
                details.gr1 = with_interior_override(&interior.gr1);
                details.gr2 = with_interior_override(&interior.gr2);
                details.gr = interior.gr;
                details.skew_shear = interior.skew_shear;
            }
        }

        if fc.is_none() {
            self.reactions.insert(key, details.clone());
        }
        Ok(details)
    }

    /// Interior girder next to an exterior girder, when the exterior floor applies.
    fn adjacent_interior(&self, girder: usize, girder_count: usize, is_exterior: bool) -> Option<usize> {
        if !(self.criteria.use_exterior_floor && is_exterior && girder_count > 2) {
            return None;
        }
        Some(if girder == 0 { 1 } else { girder_count - 2 })
    }

    fn check_span(&self, span: usize) -> LldfResult<()> {
        let count = self.bridge.span_count();
        if span >= count {
            return Err(LldfError::index_out_of_range("Span", span, count));
        }
        Ok(())
    }

    fn check_pier(&self, pier: usize) -> LldfResult<()> {
        let count = self.bridge.pier_count();
        if pier >= count {
            return Err(LldfError::index_out_of_range("Pier", pier, count));
        }
        Ok(())
    }

    /// Record a range of applicability failure and abort the pass.
    fn escalate<T>(&mut self, result: LldfResult<T>) -> LldfResult<T> {
        match result {
            Err(LldfError::RangeOfApplicability { reason }) => {
                warn!("Refined analysis required: {}", reason);
                self.sink.add(StatusItem::refined_analysis_required(&reason));
                Err(LldfError::refined_analysis_required(reason))
            }
            other => other,
        }
    }
}

fn with_interior_override(result: &DfResult) -> DfResult {
    let mut result = result.clone();
    result.controlling.overrides.insert(OverrideReason::InteriorOverride);
    result
}

fn resolve_bridge_method<B: BridgeData + ?Sized>(
    bridge: &B,
    criteria: &LldfCriteria,
) -> LldfResult<DistributionFactorMethod> {
    if criteria.distribution_method == DistributionFactorMethod::LeverRule
        || criteria.roa_action != RangeOfApplicabilityAction::UseLeverRule
    {
        return Ok(criteria.distribution_method);
    }

    let calculated = DistributionFactorMethod::Calculated;
    let violation = |index: usize, location: DfLocation, girder: usize| -> LldfResult<Option<String>> {
        let family = extract_parameters(bridge, criteria, calculated, index, location, girder, None)?;
        Ok(family.method.bridge_wide_violation())
    };

    for span in 0..bridge.span_count() {
        for girder in 0..bridge.girder_count(span) {
            if let Some(reason) = violation(span, DfLocation::Span, girder)? {
                info!("Span {}: {}. Using the lever rule for the whole bridge", span, reason);
                return Ok(DistributionFactorMethod::LeverRule);
            }
        }
    }

    for pier in 0..bridge.pier_count() {
        for face in [PierFace::Back, PierFace::Ahead] {
            let location = DfLocation::for_pier_face(face);
            let span = resolve_indices(bridge.span_count(), pier, location).span;
            for girder in 0..bridge.girder_count(span) {
                if let Some(reason) = violation(pier, location, girder)? {
                    info!("Pier {} {:?}: {}. Using the lever rule for the whole bridge", pier, face, reason);
                    return Ok(DistributionFactorMethod::LeverRule);
                }
            }
        }
    }

    Ok(calculated)
}
