//! Lever rule.
//!
//! The deck is treated as simply supported between girders and cantilevered
//! past the exterior girders. A design truck is a pair of half-unit wheel
//! loads 6 ft apart, no closer than 2 ft to the edge of its design lane.
//! Loaded lanes are contiguous and may slide anywhere between the curbs; the
//! reaction at the girder is maximized over every lane and truck placement.

use serde::{Deserialize, Serialize};

use crate::equations::multiple_presence_factor;
use crate::geometry::BaseDetails;
use crate::types::LoadedLanes;

/// Transverse distance between the wheels of a design truck (ft)
pub const WHEEL_SPACING_FT: f64 = 6.0;

/// Minimum distance from a wheel to the edge of its design lane (ft)
pub const WHEEL_TO_LANE_EDGE_FT: f64 = 2.0;

const WHEEL_LOAD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverRuleData {
    pub mg: f64,
    pub loaded_lanes: usize,
    /// Multiple presence factor contained in `mg` (1.0 when not applied)
    pub multiple_presence: f64,
    /// Factor applied in place of the multiple presence factor
    pub scale: f64,
    /// Wheel positions, measured from the left curb (ft)
    pub wheel_positions: Vec<f64>,
    /// Sum of wheel reactions at the girder, in lane units
    pub reaction: f64,
}

/// Girder and curb positions with the left exterior girder at x = 0.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Deck {
    pub girders: Vec<f64>,
    pub left_curb: f64,
    pub right_curb: f64,
}

impl Deck {
    pub fn from_details(base: &BaseDetails) -> Self {
        let mut girders = Vec::with_capacity(base.spacings.len() + 1);
        let mut x = 0.0;
        girders.push(x);
        for s in &base.spacings {
            x += s;
            girders.push(x);
        }
        Deck {
            left_curb: -base.left_curb_overhang,
            right_curb: x + base.right_curb_overhang,
            girders,
        }
    }

    pub fn roadway_width(&self) -> f64 {
        self.right_curb - self.left_curb
    }

    /// Reaction at `girder` from a unit load at `p`. Loads on a cantilever
    /// lift the first interior girder.
    pub fn ordinate(&self, girder: usize, p: f64) -> f64 {
        let x = &self.girders;
        let last = x.len() - 1;
        if last == 0 {
            return 1.0;
        }
        let xg = x[girder];
        if p <= xg {
            if girder == 0 {
                (x[1] - p) / (x[1] - xg)
            } else if p > x[girder - 1] || girder == 1 {
                (p - x[girder - 1]) / (xg - x[girder - 1])
            } else {
                0.0
            }
        } else if girder == last {
            (p - x[last - 1]) / (xg - x[last - 1])
        } else if p < x[girder + 1] || girder + 1 == last {
            (x[girder + 1] - p) / (x[girder + 1] - xg)
        } else {
            0.0
        }
    }

    /// Reaction from a truck whose first wheel is at `p`.
    fn truck(&self, girder: usize, p: f64) -> f64 {
        WHEEL_LOAD * (self.ordinate(girder, p) + self.ordinate(girder, p + WHEEL_SPACING_FT))
    }

    /// Best position of the first wheel within `[lo, hi]`.
    fn best_truck(&self, girder: usize, lo: f64, hi: f64) -> (f64, f64) {
        let hi = hi.max(lo);
        let mut candidates = vec![lo, hi];
        for &xg in &self.girders {
            for p in [xg, xg - WHEEL_SPACING_FT] {
                if p > lo && p < hi {
                    candidates.push(p);
                }
            }
        }
        candidates
            .into_iter()
            .map(|p| (self.truck(girder, p), p))
            .fold((f64::MIN, lo), |best, c| if c.0 > best.0 { c } else { best })
    }

    /// Maximum reaction with `lanes` contiguous loaded lanes of width `lane_width`.
    /// Returns the reaction and the wheel positions from the left curb.
    pub fn max_reaction(&self, girder: usize, lanes: usize, lane_width: f64) -> (f64, Vec<f64>) {
        let window = lane_width - WHEEL_SPACING_FT - 2.0 * WHEEL_TO_LANE_EDGE_FT;
        let slack = (self.roadway_width() - lanes as f64 * lane_width).max(0.0);

        // The total reaction is piecewise linear in the lane offset; its
        // breakpoints are where a truck window edge meets a wheel-on-girder position.
        let mut offsets = vec![0.0, slack];
        for k in 0..lanes {
            let lane_start = self.left_curb + k as f64 * lane_width;
            for &xg in &self.girders {
                for p in [xg, xg - WHEEL_SPACING_FT] {
                    for edge in [WHEEL_TO_LANE_EDGE_FT, WHEEL_TO_LANE_EDGE_FT + window] {
                        let s = p - lane_start - edge;
                        if s > 0.0 && s < slack {
                            offsets.push(s);
                        }
                    }
                }
            }
        }

        let mut best = (f64::MIN, Vec::new());
        for s in offsets {
            let mut total = 0.0;
            let mut wheels = Vec::with_capacity(2 * lanes);
            for k in 0..lanes {
                let lo = self.left_curb + s + k as f64 * lane_width + WHEEL_TO_LANE_EDGE_FT;
                let (reaction, p) = self.best_truck(girder, lo, lo + window.max(0.0));
                total += reaction;
                wheels.push(p - self.left_curb);
                wheels.push(p + WHEEL_SPACING_FT - self.left_curb);
            }
            if total > best.0 {
                best = (total, wheels);
            }
        }
        best
    }
}

fn lane_counts(base: &BaseDetails, lanes: LoadedLanes) -> std::ops::RangeInclusive<usize> {
    match lanes {
        LoadedLanes::One => 1..=1,
        LoadedLanes::TwoOrMore => 2..=base.lane_count.max(2),
    }
}

/// Lever rule distribution factor including the multiple presence factor.
/// For two or more lanes the most severe number of loaded lanes governs.
pub fn lever_rule(base: &BaseDetails, lanes: LoadedLanes) -> LeverRuleData {
    let deck = Deck::from_details(base);
    lane_counts(base, lanes)
        .map(|n| {
            let (reaction, wheel_positions) = deck.max_reaction(base.girder, n, base.lane_width);
            let m = multiple_presence_factor(n);
            LeverRuleData {
                mg: m * reaction,
                loaded_lanes: n,
                multiple_presence: m,
                scale: 1.0,
                wheel_positions,
                reaction,
            }
        })
        .fold(None, |best: Option<LeverRuleData>, data| match best {
            Some(b) if b.mg >= data.mg => Some(b),
            _ => Some(data),
        })
        .unwrap_or_else(|| LeverRuleData {
            mg: 0.0,
            loaded_lanes: 0,
            multiple_presence: 1.0,
            scale: 1.0,
            wheel_positions: Vec::new(),
            reaction: 0.0,
        })
}

/// Lever rule multiplied by `scale` in place of the multiple presence factor.
pub fn lever_rule_scaled(base: &BaseDetails, lanes: LoadedLanes, scale: f64) -> LeverRuleData {
    let mut data = lever_rule(base, lanes);
    data.mg = scale * data.reaction;
    data.multiple_presence = 1.0;
    data.scale = scale;
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DfSide, DistributionFactorMethod};

    fn cross_section(girder: usize, spacing: f64, nb: usize, curb_overhang: f64, lanes: usize) -> BaseDetails {
        BaseDetails {
            method: DistributionFactorMethod::LeverRule,
            controlling_location: 50.0,
            girder,
            is_exterior: girder == 0 || girder == nb - 1,
            side: if girder <= nb / 2 { DfSide::Left } else { DfSide::Right },
            girder_count: nb,
            savg: spacing,
            spacings: vec![spacing; nb - 1],
            left_curb_overhang: curb_overhang,
            right_curb_overhang: curb_overhang,
            left_slab_overhang: curb_overhang + 1.5,
            right_slab_overhang: curb_overhang + 1.5,
            bridge_width: spacing * (nb - 1) as f64 + 2.0 * (curb_overhang + 1.5),
            lane_count: lanes,
            lane_width: 12.0,
            curb_to_curb: spacing * (nb - 1) as f64 + 2.0 * curb_overhang,
            skew1: 0.0,
            skew2: 0.0,
        }
    }

    #[test]
    fn test_exterior_one_lane_textbook_case() {
        // S = 8 ft, curb at 2 ft outside the exterior girder: the first wheel
        // sits on the girder line, the second 6 ft inboard.
        let base = cross_section(0, 8.0, 5, 2.0, 2);
        let data = lever_rule(&base, LoadedLanes::One);
        let expected_reaction = 0.5 * (1.0 + 2.0 / 8.0);
        assert!((data.reaction - expected_reaction).abs() < 1e-9, "R = {}", data.reaction);
        assert!((data.mg - 1.2 * expected_reaction).abs() < 1e-9);
        assert_eq!(data.loaded_lanes, 1);
    }

    #[test]
    fn test_interior_one_lane_straddles_girder() {
        // Best placement puts a wheel over the girder: 0.5 * (1 + 2/8)
        let base = cross_section(2, 8.0, 5, 2.0, 2);
        let data = lever_rule(&base, LoadedLanes::One);
        assert!((data.reaction - 0.625).abs() < 1e-9, "R = {}", data.reaction);
    }

    #[test]
    fn test_interior_two_lanes_picks_up_adjacent_truck() {
        let base = cross_section(2, 8.0, 5, 2.0, 2);
        let one = lever_rule(&base, LoadedLanes::One);
        let two = lever_rule(&base, LoadedLanes::TwoOrMore);
        assert_eq!(two.loaded_lanes, 2);
        assert!(two.reaction >= one.reaction - 1e-12);
        assert!(two.reaction <= 1.0 + 1e-12);
    }

    #[test]
    fn test_ordinates_sum_to_one_between_girders() {
        let base = cross_section(0, 8.0, 4, 2.0, 2);
        let deck = Deck::from_details(&base);
        for p in [-1.5, 0.0, 3.0, 11.0, 20.0, 25.5] {
            let total: f64 = (0..4).map(|g| deck.ordinate(g, p)).sum();
            assert!((total - 1.0).abs() < 1e-9, "sum at {} = {}", p, total);
        }
    }

    #[test]
    fn test_scaled_lever_rule_drops_multiple_presence() {
        let base = cross_section(0, 8.0, 5, 2.0, 2);
        let data = lever_rule_scaled(&base, LoadedLanes::One, 0.9);
        assert!((data.mg - 0.9 * data.reaction).abs() < 1e-12);
        assert_eq!(data.multiple_presence, 1.0);
    }
}
