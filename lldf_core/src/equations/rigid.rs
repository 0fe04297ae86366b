//! Rigid method for exterior girders (LRFD 4.6.2.2.2d).
//!
//! R = NL/Nb + X_ext·Σe / Σx²
//!
//! Trucks are placed as close to the curb on the girder's side as the wheel
//! clearance allows, one per design lane.

use serde::{Deserialize, Serialize};

use crate::equations::lever_rule::{Deck, WHEEL_SPACING_FT, WHEEL_TO_LANE_EDGE_FT};
use crate::equations::multiple_presence_factor;
use crate::geometry::BaseDetails;
use crate::types::{DfSide, LoadedLanes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidData {
    pub mg: f64,
    pub loaded_lanes: usize,
    pub multiple_presence: f64,
    /// Distance from the girder group centroid to the girder (ft)
    pub x_ext: f64,
    /// Girder distances from the centroid (ft)
    pub x: Vec<f64>,
    /// Truck eccentricities from the centroid, positive toward the girder (ft)
    pub e: Vec<f64>,
}

pub fn rigid_method(base: &BaseDetails, lanes: LoadedLanes) -> RigidData {
    let deck = Deck::from_details(base);
    let nb = deck.girders.len();
    let centroid = deck.girders.iter().sum::<f64>() / nb as f64;

    let toward_girder = |p: f64| match base.side {
        DfSide::Left => centroid - p,
        DfSide::Right => p - centroid,
    };

    let x: Vec<f64> = deck.girders.iter().map(|&g| g - centroid).collect();
    let sum_x2: f64 = x.iter().map(|v| v * v).sum();
    let x_ext = toward_girder(deck.girders[base.girder]);

    let first_truck = WHEEL_TO_LANE_EDGE_FT + WHEEL_SPACING_FT / 2.0;
    let max_lanes = match lanes {
        LoadedLanes::One => 1,
        LoadedLanes::TwoOrMore => base.lane_count.max(2),
    };
    let e: Vec<f64> = (0..max_lanes)
        .map(|k| {
            let offset = first_truck + k as f64 * base.lane_width;
            let p = match base.side {
                DfSide::Left => deck.left_curb + offset,
                DfSide::Right => deck.right_curb - offset,
            };
            toward_girder(p)
        })
        .collect();

    let reaction = |n: usize| {
        let direct = n as f64 / nb as f64;
        if sum_x2 > 0.0 {
            direct + x_ext * e[..n].iter().sum::<f64>() / sum_x2
        } else {
            direct
        }
    };

    let min_lanes = match lanes {
        LoadedLanes::One => 1,
        LoadedLanes::TwoOrMore => 2,
    };
    let (loaded_lanes, mg) = (min_lanes..=max_lanes)
        .map(|n| (n, multiple_presence_factor(n) * reaction(n)))
        .fold((min_lanes, f64::MIN), |best, c| if c.1 > best.1 { c } else { best });

    RigidData {
        mg,
        loaded_lanes,
        multiple_presence: multiple_presence_factor(loaded_lanes),
        x_ext,
        x,
        e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DistributionFactorMethod;

    fn five_girders(girder: usize) -> BaseDetails {
        BaseDetails {
            method: DistributionFactorMethod::Calculated,
            controlling_location: 50.0,
            girder,
            is_exterior: true,
            side: if girder <= 2 { DfSide::Left } else { DfSide::Right },
            girder_count: 5,
            savg: 8.0,
            spacings: vec![8.0; 4],
            left_curb_overhang: 2.0,
            right_curb_overhang: 2.0,
            left_slab_overhang: 3.5,
            right_slab_overhang: 3.5,
            bridge_width: 39.0,
            lane_count: 3,
            lane_width: 12.0,
            curb_to_curb: 36.0,
            skew1: 0.0,
            skew2: 0.0,
        }
    }

    #[test]
    fn test_one_lane_rigid_reaction() {
        // Centroid at 16 ft; first truck 5 ft from the curb at x = 3 ft, e = 13 ft
        let data = rigid_method(&five_girders(0), LoadedLanes::One);
        let sum_x2 = 2.0 * (16.0f64.powi(2) + 8.0f64.powi(2));
        let expected = 1.2 * (1.0 / 5.0 + 16.0 * 13.0 / sum_x2);
        assert!((data.mg - expected).abs() < 1e-9, "mg = {}", data.mg);
        assert!((data.x_ext - 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_rigid_method_is_symmetric() {
        let left = rigid_method(&five_girders(0), LoadedLanes::TwoOrMore);
        let right = rigid_method(&five_girders(4), LoadedLanes::TwoOrMore);
        assert!((left.mg - right.mg).abs() < 1e-9);
        assert!(left.loaded_lanes >= 2);
    }
}
