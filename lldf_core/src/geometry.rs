//! # Cross-Section Sampler
//!
//! Builds the [`BaseDetails`] block shared by every beam family: where along
//! the girder the cross-section is sampled, the girder spacings and overhangs
//! at that point, the design lanes, and the skew angles at the bounding piers.
//!
//! The sampler is a pure read of the bridge; nothing is cached here.

use serde::{Deserialize, Serialize};

use crate::criteria::LldfCriteria;
use crate::errors::{LldfError, LldfResult};
use crate::providers::BridgeGeometry;
use crate::types::{DeckType, DfLocation, DfSide, DistributionFactorMethod, GirderLocation, PointOfInterest};

/// Roadway widths between these bounds carry two design lanes of half the width
const TWO_LANE_MIN_WIDTH_FT: f64 = 20.0;
const TWO_LANE_MAX_WIDTH_FT: f64 = 24.0;

/// Standard design lane width (ft)
pub const DESIGN_LANE_WIDTH_FT: f64 = 12.0;

/// Spacing and overhang values are rounded to this before formula selection.
/// Branches such as "overhang ≤ S/2" are sensitive to the last few digits.
pub const GEOMETRY_ROUNDING_FT: f64 = 0.0001;

/// Number of design lanes for a curb-to-curb roadway width (ft).
pub fn design_lane_count(curb_to_curb_ft: f64) -> usize {
    if (TWO_LANE_MIN_WIDTH_FT..=TWO_LANE_MAX_WIDTH_FT).contains(&curb_to_curb_ft) {
        2
    } else {
        ((curb_to_curb_ft / DESIGN_LANE_WIDTH_FT).floor() as usize).max(1)
    }
}

/// Design lane width for a curb-to-curb roadway width (ft).
pub fn design_lane_width(curb_to_curb_ft: f64) -> f64 {
    if (TWO_LANE_MIN_WIDTH_FT..=TWO_LANE_MAX_WIDTH_FT).contains(&curb_to_curb_ft) {
        curb_to_curb_ft / 2.0
    } else {
        DESIGN_LANE_WIDTH_FT.min(curb_to_curb_ft)
    }
}

/// Round `value` to the nearest multiple of `accuracy`.
pub fn round_off(value: f64, accuracy: f64) -> f64 {
    (value / accuracy).round() * accuracy
}

/// Span and pier indices surrounding a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indices {
    /// Span whose cross-section is sampled
    pub span: usize,
    /// The pier, for pier and reaction requests
    pub pier: Option<usize>,
    pub prev_span: Option<usize>,
    pub next_span: Option<usize>,
    pub prev_pier: Option<usize>,
    pub next_pier: Option<usize>,
}

/// Resolve the spans and piers around a span or pier index.
///
/// For a pier request the sampled span is the span on the requested face;
/// when that face has no span (an end abutment) the other span is used.
pub fn resolve_indices(span_count: usize, index: usize, location: DfLocation) -> Indices {
    match location {
        DfLocation::Span => Indices {
            span: index,
            pier: None,
            prev_span: None,
            next_span: None,
            prev_pier: Some(index),
            next_pier: Some(index + 1),
        },
        _ => {
            let prev_span = index.checked_sub(1);
            let next_span = if index < span_count { Some(index) } else { None };
            let preferred = match location {
                DfLocation::PierBack => prev_span,
                _ => next_span,
            };
            Indices {
                span: preferred.or(prev_span).or(next_span).unwrap_or(0),
                pier: Some(index),
                prev_span,
                next_span,
                prev_pier: None,
                next_pier: None,
            }
        }
    }
}

/// Geometric facts common to every beam family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseDetails {
    /// Bridge-wide computation path in effect for this request
    pub method: DistributionFactorMethod,
    /// Sampling location, from the start pier centerline (ft)
    pub controlling_location: f64,
    pub girder: usize,
    pub is_exterior: bool,
    pub side: DfSide,
    pub girder_count: usize,
    /// Average of the bays adjacent to the girder (ft)
    pub savg: f64,
    /// Girder spacings, left to right (ft)
    pub spacings: Vec<f64>,
    pub left_curb_overhang: f64,
    pub right_curb_overhang: f64,
    pub left_slab_overhang: f64,
    pub right_slab_overhang: f64,
    /// Total deck width, sum of spacings plus both slab overhangs (ft)
    pub bridge_width: f64,
    pub lane_count: usize,
    pub lane_width: f64,
    pub curb_to_curb: f64,
    /// Skew at the start (or only) pier (radians)
    pub skew1: f64,
    /// Skew at the end pier (radians)
    pub skew2: f64,
}

impl BaseDetails {
    pub fn location(&self) -> GirderLocation {
        if self.is_exterior {
            GirderLocation::Exterior
        } else {
            GirderLocation::Interior
        }
    }

    /// Curb overhang on the girder's side of the bridge
    pub fn curb_overhang(&self) -> f64 {
        match self.side {
            DfSide::Left => self.left_curb_overhang,
            DfSide::Right => self.right_curb_overhang,
        }
    }

    /// Slab overhang on the girder's side of the bridge
    pub fn slab_overhang(&self) -> f64 {
        match self.side {
            DfSide::Left => self.left_slab_overhang,
            DfSide::Right => self.right_slab_overhang,
        }
    }

    /// Smallest and largest girder spacing, `(0, 0)` for a single girder
    pub fn spacing_range(&self) -> (f64, f64) {
        self.spacings.iter().fold(None, |acc: Option<(f64, f64)>, &s| match acc {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
        .unwrap_or((0.0, 0.0))
    }

    /// Average of the end skews. Reporting only; corrections use each end.
    pub fn average_skew(&self) -> f64 {
        (self.skew1 + self.skew2) / 2.0
    }

    /// Larger absolute end skew (radians)
    pub fn max_skew(&self) -> f64 {
        self.skew1.abs().max(self.skew2.abs())
    }

    pub(crate) fn round_geometry(&mut self) {
        self.savg = round_off(self.savg, GEOMETRY_ROUNDING_FT);
        self.left_slab_overhang = round_off(self.left_slab_overhang, GEOMETRY_ROUNDING_FT);
        self.right_slab_overhang = round_off(self.right_slab_overhang, GEOMETRY_ROUNDING_FT);
    }
}

/// Sample the cross-section for a span or pier request.
pub fn sample_cross_section<B: BridgeGeometry + ?Sized>(
    bridge: &B,
    criteria: &LldfCriteria,
    method: DistributionFactorMethod,
    index: usize,
    location: DfLocation,
    girder: usize,
) -> LldfResult<BaseDetails> {
    let indices = resolve_indices(bridge.span_count(), index, location);
    let span = indices.span;
    let girder_count = bridge.girder_count(span);
    if girder_count == 0 {
        return Err(LldfError::invalid_input("girder_count", "0", "A span must have at least one girder"));
    }
    // The far side of a pier may carry fewer girders than the near side
    let girder = girder.min(girder_count - 1);

    // Lanes are determined where the roadway is widest
    let span_length = bridge.span_length(span, girder);
    let fraction = criteria.girder_spacing_location;
    let loc1 = fraction * span_length;
    let loc2 = (1.0 - fraction) * span_length;
    let w1 = bridge.curb_to_curb_width(span, loc1);
    let w2 = bridge.curb_to_curb_width(span, loc2);
    let (lane_sample, curb_to_curb) = if w2 > w1 { (loc2, w2) } else { (loc1, w1) };

    let mut controlling_location = if lane_sample <= span_length / 2.0 {
        loc1.min(loc2)
    } else {
        loc1.max(loc2)
    };
    controlling_location += bridge.bearing_offset(span, girder);
    let (girder_start, girder_end) = bridge.girder_extent(span, girder);
    controlling_location = controlling_location.clamp(girder_start, girder_end.max(girder_start));

    let (left_slab_overhang, right_slab_overhang) = if matches!(bridge.deck_type(), DeckType::Overlay | DeckType::None) {
        let left = PointOfInterest::new(span, 0, controlling_location);
        let right = PointOfInterest::new(span, girder_count - 1, controlling_location);
        (bridge.girder_top_width(&left) / 2.0, bridge.girder_top_width(&right) / 2.0)
    } else {
        bridge.slab_overhangs(span, controlling_location)
    };
    let (left_barrier, right_barrier) = bridge.barrier_interface_widths();

    let spacings = if girder_count > 1 {
        bridge.girder_spacings(span, controlling_location)
    } else {
        Vec::new()
    };
    if spacings.len() + 1 != girder_count {
        return Err(LldfError::invalid_input(
            "girder_spacings",
            spacings.len().to_string(),
            format!("Expected {} spacings for {} girders", girder_count.saturating_sub(1), girder_count),
        ));
    }

    let savg = if spacings.is_empty() {
        0.0
    } else if girder == 0 {
        spacings[0]
    } else if girder == girder_count - 1 {
        spacings[spacings.len() - 1]
    } else {
        (spacings[girder - 1] + spacings[girder]) / 2.0
    };

    let total_spacing: f64 = spacings.iter().sum();

    let (skew1, skew2) = match indices.pier {
        None => (bridge.pier_skew(span), bridge.pier_skew(span + 1)),
        Some(pier) => {
            let skew = bridge.pier_skew(pier);
            (skew, skew)
        }
    };

    Ok(BaseDetails {
        method,
        controlling_location,
        girder,
        is_exterior: girder == 0 || girder == girder_count - 1,
        side: if girder <= girder_count / 2 { DfSide::Left } else { DfSide::Right },
        girder_count,
        savg,
        spacings,
        left_curb_overhang: left_slab_overhang - left_barrier,
        right_curb_overhang: right_slab_overhang - right_barrier,
        left_slab_overhang,
        right_slab_overhang,
        bridge_width: total_spacing + left_slab_overhang + right_slab_overhang,
        lane_count: design_lane_count(curb_to_curb),
        lane_width: design_lane_width(curb_to_curb),
        curb_to_curb,
        skew1,
        skew2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BridgeModel;

    #[test]
    fn test_design_lanes() {
        assert_eq!(design_lane_count(18.0), 1);
        assert_eq!(design_lane_count(20.0), 2);
        assert_eq!(design_lane_count(24.0), 2);
        assert_eq!(design_lane_count(30.0), 2);
        assert_eq!(design_lane_count(36.0), 3);
        assert_eq!(design_lane_count(8.0), 1);

        assert!((design_lane_width(22.0) - 11.0).abs() < 1e-12);
        assert!((design_lane_width(40.0) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_off() {
        assert!((round_off(3.999_96, 0.0001) - 4.0).abs() < 1e-12);
        assert!((round_off(6.123_44, 0.0001) - 6.1234).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_indices_for_piers() {
        // Three spans, four piers
        let first = resolve_indices(3, 0, DfLocation::PierBack);
        assert_eq!(first.span, 0);
        assert_eq!(first.prev_span, None);
        assert_eq!(first.next_span, Some(0));

        let interior = resolve_indices(3, 2, DfLocation::PierBack);
        assert_eq!(interior.span, 1);
        let ahead = resolve_indices(3, 2, DfLocation::PierAhead);
        assert_eq!(ahead.span, 2);

        let last = resolve_indices(3, 3, DfLocation::PierAhead);
        assert_eq!(last.span, 2);
        assert_eq!(last.next_span, None);
    }

    #[test]
    fn test_sampled_cross_section() {
        let bridge = BridgeModel::sample_i_girder();
        let criteria = LldfCriteria::default();
        let interior =
            sample_cross_section(&bridge, &criteria, DistributionFactorMethod::Calculated, 0, DfLocation::Span, 2)
                .unwrap();

        assert_eq!(interior.girder_count, 5);
        assert!(!interior.is_exterior);
        assert_eq!(interior.side, DfSide::Left);
        assert!((interior.savg - 8.0).abs() < 1e-9);
        assert!((interior.bridge_width - (32.0 + 2.0 * 3.0)).abs() < 1e-9);
        assert_eq!(interior.lane_count, design_lane_count(interior.curb_to_curb));

        let exterior =
            sample_cross_section(&bridge, &criteria, DistributionFactorMethod::Calculated, 0, DfLocation::Span, 4)
                .unwrap();
        assert!(exterior.is_exterior);
        assert_eq!(exterior.side, DfSide::Right);
        assert!((exterior.curb_overhang() - (3.0 - 1.5)).abs() < 1e-9);
    }

    #[test]
    fn test_girder_index_clamped_to_last_girder() {
        let bridge = BridgeModel::sample_i_girder();
        let sample = |girder| {
            sample_cross_section(
                &bridge,
                &LldfCriteria::default(),
                DistributionFactorMethod::Calculated,
                0,
                DfLocation::Span,
                girder,
            )
            .unwrap()
        };
        let beyond = sample(9);
        assert_eq!(beyond.girder, 4);
        assert!(beyond.is_exterior);
        assert_eq!(beyond, sample(4));
    }

    #[test]
    fn test_pier_request_uses_pier_skew_at_both_ends() {
        let mut bridge = BridgeModel::sample_i_girder();
        bridge.piers[0].skew_deg = 20.0;
        bridge.piers[1].skew_deg = -35.0;
        let criteria = LldfCriteria::default();
        let method = DistributionFactorMethod::Calculated;

        let span = sample_cross_section(&bridge, &criteria, method, 0, DfLocation::Span, 2).unwrap();
        assert!((span.skew1 - 20f64.to_radians()).abs() < 1e-12);
        assert!((span.skew2 + 35f64.to_radians()).abs() < 1e-12);

        let pier = sample_cross_section(&bridge, &criteria, method, 1, DfLocation::PierBack, 2).unwrap();
        assert_eq!(pier.skew1, pier.skew2);
        assert!((pier.skew1 + 35f64.to_radians()).abs() < 1e-12);
    }
}
