//! Skew correction factors (LRFD 4.6.2.2.2e and 4.6.2.2.3c).
//!
//! Angles are absolute values in radians. When the two ends of a span have
//! different skews the larger correction factor governs.

use crate::geometry::BaseDetails;

const THIRTY_DEGREES: f64 = std::f64::consts::PI / 6.0;
const SIXTY_DEGREES: f64 = std::f64::consts::PI / 3.0;

/// Larger correction of the two end skews.
pub fn governing(base: &BaseDetails, correction: impl Fn(f64) -> f64) -> f64 {
    correction(base.skew1.abs()).max(correction(base.skew2.abs()))
}

/// Moment reduction for slab on I-girders (types a, e, k).
pub fn moment_aek(kg: f64, l: f64, ts: f64, s: f64, theta: f64) -> f64 {
    if theta < THIRTY_DEGREES {
        return 1.0;
    }
    let theta = theta.min(SIXTY_DEGREES);
    let c1 = 0.25 * (kg / (12.0 * l * ts.powi(3))).powf(0.25) * (s / l).sqrt();
    1.0 - c1 * theta.tan().powf(1.5)
}

/// Shear increase for slab on I-girders (types a, e, k).
pub fn shear_aek(kg: f64, l: f64, ts: f64, theta: f64) -> f64 {
    let theta = theta.min(SIXTY_DEGREES);
    1.0 + 0.2 * (12.0 * l * ts.powi(3) / kg).powf(0.3) * theta.tan()
}

/// Moment reduction for box and slab beams (types b, c, f, g).
pub fn moment_bcfg(theta: f64) -> f64 {
    let theta = theta.min(SIXTY_DEGREES);
    (1.05 - 0.25 * theta.tan()).min(1.0)
}

/// Shear increase for spread box beams (types b, c). `d` in inches.
pub fn shear_bc(l: f64, d: f64, s: f64, theta: f64) -> f64 {
    let theta = theta.min(SIXTY_DEGREES);
    1.0 + (l * d / 12.0).sqrt() / (6.0 * s) * theta.tan()
}

/// Shear increase for adjacent box and slab beams (types f, g). `d` in inches.
pub fn shear_fg(l: f64, d: f64, theta: f64) -> f64 {
    let theta = theta.min(SIXTY_DEGREES);
    1.0 + 12.0 * l / (90.0 * d) * theta.tan().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degrees(value: f64) -> f64 {
        value.to_radians()
    }

    #[test]
    fn test_moment_aek_below_thirty_degrees() {
        assert_eq!(moment_aek(1.0e6, 100.0, 8.0, 8.0, degrees(20.0)), 1.0);
    }

    #[test]
    fn test_moment_aek_at_forty_five_degrees() {
        let factor = moment_aek(1.0e6, 100.0, 8.0, 8.0, degrees(45.0));
        assert!((factor - 0.9201).abs() < 1e-3, "factor = {}", factor);
    }

    #[test]
    fn test_skew_capped_at_sixty_degrees() {
        let at_sixty = moment_bcfg(degrees(60.0));
        let at_seventy = moment_bcfg(degrees(70.0));
        assert!((at_sixty - at_seventy).abs() < 1e-12);
        assert!((shear_aek(1.0e6, 100.0, 8.0, degrees(60.0)) - shear_aek(1.0e6, 100.0, 8.0, degrees(75.0))).abs() < 1e-12);
    }

    #[test]
    fn test_no_skew_no_correction() {
        assert_eq!(moment_bcfg(0.0), 1.0);
        assert_eq!(shear_aek(1.0e6, 100.0, 8.0, 0.0), 1.0);
        assert_eq!(shear_bc(100.0, 54.0, 9.0, 0.0), 1.0);
        assert_eq!(shear_fg(60.0, 21.0, 0.0), 1.0);
    }

    #[test]
    fn test_shear_corrections_increase_with_skew() {
        let low = shear_bc(100.0, 54.0, 9.0, degrees(15.0));
        let high = shear_bc(100.0, 54.0, 9.0, degrees(40.0));
        assert!(low > 1.0);
        assert!(high > low);
    }
}
