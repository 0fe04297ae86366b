//! # Beam Family Parameter Extraction
//!
//! Each beam family reads its own section and material facts from the bridge
//! and binds the matching AASHTO formula set to the sampled cross-section.
//! [`extract_parameters`] dispatches on [`BeamFamily`]; everything downstream
//! works with the resulting [`FamilyDetails`] without knowing the family.
//!
//! ## Families
//!
//! - [`ibeam`] - Slab on I-girders (types a, e, k)
//! - [`ubeam`] - Slab on U-beams and spread boxes (types b, c)
//! - [`spread_slab`] - TxDOT spread slab beams (types b, c, 18 in minimum depth)
//! - [`voided_slab`] - Adjacent voided and solid slab beams (types f, g)
//! - [`box_beam`] - Adjacent hollow box beams (types f, g)
//! - [`multi_web`] - Double tees and other multi-web beams (types i, j, k)

pub mod box_beam;
pub mod ibeam;
pub mod multi_web;
pub mod spread_slab;
pub mod ubeam;
pub mod voided_slab;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::criteria::LldfCriteria;
use crate::equations::{LldfMethod, MethodSettings};
use crate::errors::LldfResult;
use crate::geometry::{resolve_indices, sample_cross_section, BaseDetails};
use crate::providers::BridgeData;
use crate::types::{
    BeamFamily, DfLocation, DistributionFactorMethod, LldfMethodFamily, PointOfInterest, SpanEnd,
};

pub use box_beam::AdjacentBoxParams;
pub use ibeam::IBeamParams;
pub use multi_web::MultiWebParams;
pub use ubeam::BoxBeamParams;
pub use voided_slab::{TorsionalConstant, VoidedSlabParams};

/// Family-specific inputs to the distribution factor equations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", content = "params")]
pub enum FamilyParams {
    IBeam(IBeamParams),
    UBeam(BoxBeamParams),
    SpreadSlab(BoxBeamParams),
    VoidedSlab(VoidedSlabParams),
    BoxBeam(AdjacentBoxParams),
    MultiWeb(MultiWebParams),
}

impl FamilyParams {
    pub fn beam_family(&self) -> BeamFamily {
        match self {
            FamilyParams::IBeam(_) => BeamFamily::IBeam,
            FamilyParams::UBeam(_) => BeamFamily::UBeam,
            FamilyParams::SpreadSlab(_) => BeamFamily::SpreadSlab,
            FamilyParams::VoidedSlab(_) => BeamFamily::VoidedSlab,
            FamilyParams::BoxBeam(_) => BeamFamily::BoxBeam,
            FamilyParams::MultiWeb(_) => BeamFamily::MultiWeb,
        }
    }

    /// Effective span length used in the equations (ft)
    pub fn span_length(&self) -> f64 {
        match self {
            FamilyParams::IBeam(p) => p.span_length,
            FamilyParams::UBeam(p) | FamilyParams::SpreadSlab(p) => p.span_length,
            FamilyParams::VoidedSlab(p) => p.span_length,
            FamilyParams::BoxBeam(p) => p.span_length,
            FamilyParams::MultiWeb(p) => p.span_length,
        }
    }
}

/// Parameters for one request together with the bound method object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyDetails {
    pub params: FamilyParams,
    pub method: LldfMethod,
}

impl FamilyDetails {
    pub fn base(&self) -> &BaseDetails {
        &self.method.base
    }
}

/// Sampled cross-section plus the facts every family extractor needs.
pub(crate) struct Request<'a, B: BridgeData + ?Sized> {
    pub bridge: &'a B,
    pub criteria: &'a LldfCriteria,
    pub index: usize,
    pub location: DfLocation,
    pub span: usize,
    pub base: BaseDetails,
    pub poi: PointOfInterest,
    /// Girder concrete strength override (ksi)
    pub fc: Option<f64>,
}

impl<'a, B: BridgeData + ?Sized> Request<'a, B> {
    /// Girder-to-deck modular ratio
    pub fn modular_ratio(&self) -> LldfResult<f64> {
        let girder = self.base.girder;
        let eg = match self.fc {
            Some(fc) => self.bridge.ec_girder_at_strength(self.span, girder, fc),
            None => self.bridge.ec_girder(self.span, girder),
        };
        let ed = self.bridge.ec_slab();
        if ed <= 0.0 {
            return Err(crate::errors::LldfError::invalid_input(
                "ec_slab",
                ed.to_string(),
                "Deck modulus of elasticity must be positive",
            ));
        }
        Ok(eg / ed)
    }

    /// Distance from the exterior web centerline to the curb on each side (ft)
    pub fn web_to_curb(&self) -> (f64, f64) {
        let web = self.bridge.cl_to_exterior_web(&self.poi);
        (self.base.left_curb_overhang - web, self.base.right_curb_overhang - web)
    }

    pub fn settings(&self, skew_moment: bool, skew_shear: bool, rigid_method: bool) -> MethodSettings {
        MethodSettings {
            variant: self.criteria.method_family,
            roa_action: self.criteria.roa_action,
            skew_moment,
            skew_shear,
            rigid_method,
            lanes_beams_scale: self.criteria.lanes_beams_scale,
        }
    }

    /// Moment and shear skew switches.
    ///
    /// From the 2014 edition the shear correction applies only to girders
    /// framing into an obtuse corner of the deck.
    pub fn skew_flags(&self) -> (bool, bool) {
        let skewed = self.base.skew1 != 0.0 || self.base.skew2 != 0.0;
        let moment = skewed && !self.criteria.ignore_skew_reduction_for_moment;
        let shear = skewed && (!self.criteria.uses_obtuse_corner_shear_skew() || self.obtuse_corner());
        (moment, shear)
    }

    fn obtuse_corner(&self) -> bool {
        let bridge = self.bridge;
        let girder = self.base.girder;
        let obtuse = |span: usize, end: SpanEnd| {
            let last = bridge.girder_count(span).saturating_sub(1);
            bridge.has_obtuse_corner(span, girder.min(last), end)
        };
        match self.location {
            DfLocation::Reaction => {
                let indices = resolve_indices(self.bridge.span_count(), self.index, self.location);
                indices.prev_span.map_or(false, |s| obtuse(s, SpanEnd::End))
                    || indices.next_span.map_or(false, |s| obtuse(s, SpanEnd::Start))
            }
            _ => obtuse(self.span, SpanEnd::Start) || obtuse(self.span, SpanEnd::End),
        }
    }
}

/// Sample the cross-section, read the family parameters and build the
/// method object for one girder.
///
/// `fc` overrides the girder concrete strength (ksi) used for the modular
/// ratio; `None` uses the strength from the bridge materials.
pub fn extract_parameters<B: BridgeData + ?Sized>(
    bridge: &B,
    criteria: &LldfCriteria,
    method: DistributionFactorMethod,
    index: usize,
    location: DfLocation,
    girder: usize,
    fc: Option<f64>,
) -> LldfResult<FamilyDetails> {
    let mut base = sample_cross_section(bridge, criteria, method, index, location, girder)?;
    base.round_geometry();

    let span = resolve_indices(bridge.span_count(), index, location).span;
    let poi = PointOfInterest::new(span, girder, base.controlling_location);
    let request = Request {
        bridge,
        criteria,
        index,
        location,
        span,
        base,
        poi,
        fc,
    };

    let family = bridge.beam_family(span);
    debug!(
        "Extracting {} parameters: {:?} {} girder {}",
        family.display_name(),
        location,
        index,
        girder
    );

    match family {
        BeamFamily::IBeam => ibeam::extract(request),
        BeamFamily::UBeam => ubeam::extract(request),
        BeamFamily::SpreadSlab => spread_slab::extract(request),
        BeamFamily::VoidedSlab => voided_slab::extract(request),
        BeamFamily::BoxBeam => box_beam::extract(request),
        BeamFamily::MultiWeb => multi_web::extract(request),
    }
}

/// TxDOT spread slabs and U-beams with a roadway of at least 20 ft, three or
/// more beams and two or more lanes report the multi-lane exterior factor for
/// the one-lane case as well.
pub fn multi_lane_forced_controls(criteria: &LldfCriteria, family: BeamFamily, base: &BaseDetails) -> bool {
    criteria.method_family == LldfMethodFamily::Txdot
        && matches!(family, BeamFamily::UBeam | BeamFamily::SpreadSlab)
        && base.is_exterior
        && base.curb_to_curb >= 20.0
        && base.girder_count >= 3
        && base.lane_count >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BridgeModel, PierData};
    use crate::types::{LrfdEdition, PierConnection};

    #[test]
    fn test_extract_dispatches_on_family() {
        let bridge = BridgeModel::sample_i_girder();
        let details = extract_parameters(
            &bridge,
            &LldfCriteria::default(),
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            1,
            None,
        )
        .unwrap();
        assert_eq!(details.params.beam_family(), BeamFamily::IBeam);
        assert!((details.params.span_length() - bridge.spans[0].length_ft).abs() < 1e-9);
    }

    #[test]
    fn test_no_skew_disables_corrections() {
        let bridge = BridgeModel::sample_i_girder();
        let details = extract_parameters(
            &bridge,
            &LldfCriteria::default(),
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            0,
            None,
        )
        .unwrap();
        assert!(!details.method.settings.skew_moment);
        assert!(!details.method.settings.skew_shear);
    }

    #[test]
    fn test_shear_skew_limited_to_obtuse_corners() {
        let mut bridge = BridgeModel::sample_i_girder();
        for pier in &mut bridge.piers {
            pier.skew_deg = 30.0;
        }
        let criteria = LldfCriteria {
            edition: LrfdEdition::NinthEdition2020,
            ..LldfCriteria::default()
        };
        let extract = |girder| {
            extract_parameters(
                &bridge,
                &criteria,
                DistributionFactorMethod::Calculated,
                0,
                DfLocation::Span,
                girder,
                None,
            )
            .unwrap()
        };

        // Girder 2 of 5 is not next to either edge
        let middle = extract(2);
        assert!(middle.method.settings.skew_moment);
        assert!(!middle.method.settings.skew_shear);
        assert!(extract(0).method.settings.skew_shear);

        let older = LldfCriteria {
            edition: LrfdEdition::SixthEdition2012,
            ..criteria.clone()
        };
        let details = extract_parameters(
            &bridge,
            &older,
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            2,
            None,
        )
        .unwrap();
        assert!(details.method.settings.skew_shear);
    }

    #[test]
    fn test_pier_face_checks_both_ends_of_sampled_span() {
        let mut bridge = BridgeModel::sample_i_girder();
        bridge.spans.push(bridge.spans[0].clone());
        bridge.piers.insert(1, PierData::new(PierConnection::Continuous));
        // Negative skew at pier 1: span 0 ends obtuse on the right, span 1
        // starts obtuse on the left
        bridge.piers[1].skew_deg = -30.0;
        let criteria = LldfCriteria {
            edition: LrfdEdition::NinthEdition2020,
            ..LldfCriteria::default()
        };
        let extract = |location| {
            extract_parameters(
                &bridge,
                &criteria,
                DistributionFactorMethod::Calculated,
                1,
                location,
                0,
                None,
            )
            .unwrap()
        };

        // The back face samples span 0, whose left edge has no obtuse corner
        let back = extract(DfLocation::PierBack);
        assert!(back.method.settings.skew_moment);
        assert!(!back.method.settings.skew_shear);
        // The reaction collects both girder ends framing into the pier
        assert!(extract(DfLocation::Reaction).method.settings.skew_shear);
        assert!(extract(DfLocation::PierAhead).method.settings.skew_shear);
    }

    #[test]
    fn test_multi_lane_forced_controls_predicate() {
        let bridge = BridgeModel::sample_i_girder();
        let criteria = LldfCriteria {
            method_family: LldfMethodFamily::Txdot,
            ..LldfCriteria::default()
        };
        let base = sample_cross_section(
            &bridge,
            &criteria,
            DistributionFactorMethod::Calculated,
            0,
            DfLocation::Span,
            0,
        )
        .unwrap();
        assert!(multi_lane_forced_controls(&criteria, BeamFamily::UBeam, &base));
        assert!(!multi_lane_forced_controls(&criteria, BeamFamily::IBeam, &base));
        assert!(!multi_lane_forced_controls(&LldfCriteria::default(), BeamFamily::UBeam, &base));
    }
}
