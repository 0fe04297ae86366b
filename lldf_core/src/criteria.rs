//! # Design Criteria
//!
//! `LldfCriteria` collects the specification and live-load policy settings
//! that steer distribution factor computation. It is stored with the bridge
//! model and serializes as part of the `.lldf.json` file.
//!
//! ## Example
//!
//! ```rust
//! use lldf_core::criteria::LldfCriteria;
//! use lldf_core::types::LldfMethodFamily;
//!
//! let criteria = LldfCriteria {
//!     method_family: LldfMethodFamily::Wsdot,
//!     ..LldfCriteria::default()
//! };
//! assert!(criteria.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{LldfError, LldfResult};
use crate::types::{
    DistributionFactorMethod, LldfMethodFamily, LrfdEdition, RangeOfApplicabilityAction,
};

/// Specification and live-load policy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LldfCriteria {
    /// Governing AASHTO LRFD edition
    pub edition: LrfdEdition,

    /// Agency formula set (LRFD, WSDOT, TxDOT)
    pub method_family: LldfMethodFamily,

    /// Bridge-wide computation method as entered by the user
    pub distribution_method: DistributionFactorMethod,

    /// Fraction of span length where girder spacing is sampled (0.0 to 0.5)
    pub girder_spacing_location: f64,

    /// Exterior girder factors may not be less than the adjacent interior factor
    pub use_exterior_floor: bool,

    /// Distribution factors may not be less than lanes/beams
    pub limit_to_lanes_beams: bool,

    /// Scale applied to the lanes/beams ratio
    pub lanes_beams_scale: f64,

    /// Skip the moment skew reduction (shear skew correction still applies)
    pub ignore_skew_reduction_for_moment: bool,

    /// Re-enable the rigid method for editions that dropped it
    pub use_rigid_method: bool,

    /// Include the haunch in the slab-to-girder eccentricity
    pub include_haunch_in_eccentricity: bool,

    /// Action taken when an equation is outside its range of applicability
    pub roa_action: RangeOfApplicabilityAction,
}

impl Default for LldfCriteria {
    fn default() -> Self {
        LldfCriteria {
            edition: LrfdEdition::default(),
            method_family: LldfMethodFamily::Lrfd,
            distribution_method: DistributionFactorMethod::Calculated,
            girder_spacing_location: 0.5,
            use_exterior_floor: true,
            limit_to_lanes_beams: false,
            lanes_beams_scale: 1.0,
            ignore_skew_reduction_for_moment: false,
            use_rigid_method: false,
            include_haunch_in_eccentricity: false,
            roa_action: RangeOfApplicabilityAction::Enforce,
        }
    }
}

impl LldfCriteria {
    /// Validate criteria values.
    pub fn validate(&self) -> LldfResult<()> {
        if !(0.0..=0.5).contains(&self.girder_spacing_location) {
            return Err(LldfError::invalid_input(
                "girder_spacing_location",
                self.girder_spacing_location.to_string(),
                "Sampling fraction must be between 0.0 and 0.5",
            ));
        }
        if self.lanes_beams_scale <= 0.0 || !self.lanes_beams_scale.is_finite() {
            return Err(LldfError::invalid_input(
                "lanes_beams_scale",
                self.lanes_beams_scale.to_string(),
                "Lanes/beams scale must be a positive number",
            ));
        }
        Ok(())
    }

    /// True if the obtuse-corner shear skew rule of the 7th edition applies.
    pub fn uses_obtuse_corner_shear_skew(&self) -> bool {
        self.edition >= LrfdEdition::SeventhEdition2014
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_criteria_is_valid() {
        let criteria = LldfCriteria::default();
        assert!(criteria.validate().is_ok());
        assert!(criteria.use_exterior_floor);
        assert_eq!(criteria.lanes_beams_scale, 1.0);
    }

    #[test]
    fn test_rejects_bad_sampling_fraction() {
        let criteria = LldfCriteria {
            girder_spacing_location: 0.75,
            ..LldfCriteria::default()
        };
        let err = criteria.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let criteria: LldfCriteria =
            serde_json::from_str(r#"{ "method_family": "Txdot", "limit_to_lanes_beams": true }"#).unwrap();
        assert_eq!(criteria.method_family, LldfMethodFamily::Txdot);
        assert!(criteria.limit_to_lanes_beams);
        assert_eq!(criteria.girder_spacing_location, 0.5);
    }

    #[test]
    fn test_obtuse_corner_rule_by_edition() {
        let mut criteria = LldfCriteria {
            edition: LrfdEdition::SixthEdition2012,
            ..LldfCriteria::default()
        };
        assert!(!criteria.uses_obtuse_corner_shear_skew());
        criteria.edition = LrfdEdition::SeventhEdition2014;
        assert!(criteria.uses_obtuse_corner_shear_skew());
    }
}
