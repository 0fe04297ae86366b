//! # Bridge Data Providers
//!
//! The engine never owns bridge geometry. It reads everything it needs
//! through the capability traits below, so any bridge representation can be
//! plugged in. [`crate::model::BridgeModel`] is the bundled implementation.
//!
//! Units: plan dimensions in feet, section dimensions in inches, section
//! properties in inches, moduli in ksi, angles in radians.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    BeamFamily, DeckType, PierConnection, PierFace, PointOfInterest, SpanEnd, TransverseConnectivity,
};

/// Bridge topology and plan geometry.
pub trait BridgeGeometry {
    fn span_count(&self) -> usize;

    /// Piers are numbered 0..=span_count; abutments are piers too.
    fn pier_count(&self) -> usize {
        self.span_count() + 1
    }

    fn girder_count(&self, span: usize) -> usize;

    fn beam_family(&self, span: usize) -> BeamFamily;

    /// Span length for a girder line, CL bearing to CL bearing (ft)
    fn span_length(&self, span: usize, girder: usize) -> f64;

    /// Distance from the start pier centerline to the start bearing (ft)
    fn bearing_offset(&self, span: usize, girder: usize) -> f64;

    /// Start and end of the physical girder, measured from the start pier centerline (ft)
    fn girder_extent(&self, span: usize, girder: usize) -> (f64, f64);

    /// Curb-to-curb roadway width at a distance from the start pier (ft)
    fn curb_to_curb_width(&self, span: usize, distance_ft: f64) -> f64;

    /// Girder spacings, left to right, normal to the alignment (ft)
    fn girder_spacings(&self, span: usize, distance_ft: f64) -> Vec<f64>;

    /// Left and right slab overhangs measured from the exterior girder centerlines (ft)
    fn slab_overhangs(&self, span: usize, distance_ft: f64) -> (f64, f64);

    fn deck_type(&self) -> DeckType;

    /// Top flange width of a girder (ft)
    fn girder_top_width(&self, poi: &PointOfInterest) -> f64;

    /// Left and right traffic barrier interface widths (ft)
    fn barrier_interface_widths(&self) -> (f64, f64);

    /// Pier skew angle (radians, signed)
    fn pier_skew(&self, pier: usize) -> f64;

    fn pier_connection(&self, pier: usize, face: PierFace) -> PierConnection;

    /// True if the girder end sits at an obtuse corner of the deck
    fn has_obtuse_corner(&self, span: usize, girder: usize, end: SpanEnd) -> bool;

    fn has_intermediate_diaphragms(&self, span: usize, girder: usize) -> bool;

    fn transverse_connectivity(&self) -> TransverseConnectivity;

    /// Distance from the girder centerline to the centerline of its exterior web (ft)
    fn cl_to_exterior_web(&self, poi: &PointOfInterest) -> f64;

    /// Void layout for slab beams, `None` for other families
    fn voided_slab_shape(&self, span: usize, girder: usize) -> Option<VoidedSlabShape>;

    /// Wall dimensions of adjacent box beams, `None` for other families
    fn box_beam_shape(&self, span: usize, girder: usize) -> Option<BoxBeamShape>;

    /// Stem and flange facts of multi-web beams, `None` for other families
    fn multi_web_shape(&self, span: usize, girder: usize) -> Option<MultiWebShape>;
}

/// Cross-section properties of the girder in service (inches).
pub trait SectionProperties {
    /// Moment of inertia about the horizontal axis (in⁴)
    fn ix(&self, poi: &PointOfInterest) -> f64;

    /// Moment of inertia about the vertical axis (in⁴)
    fn iy(&self, poi: &PointOfInterest) -> f64;

    /// Gross area (in²)
    fn area(&self, poi: &PointOfInterest) -> f64;

    /// Distance from the girder centroid to its top fiber (in)
    fn yt(&self, poi: &PointOfInterest) -> f64;

    /// Overall girder height (in)
    fn girder_height(&self, poi: &PointOfInterest) -> f64;

    /// Structural deck thickness (in)
    fn structural_slab_depth(&self, poi: &PointOfInterest) -> f64;

    /// Haunch (fillet) depth between girder top and deck soffit (in)
    fn haunch_depth(&self, poi: &PointOfInterest) -> f64;
}

/// Concrete material properties.
pub trait Materials {
    /// Girder concrete modulus (ksi)
    fn ec_girder(&self, span: usize, girder: usize) -> f64;

    /// Girder concrete modulus evaluated at an override strength f'c (ksi)
    fn ec_girder_at_strength(&self, span: usize, girder: usize, fc_ksi: f64) -> f64;

    /// Deck concrete modulus (ksi)
    fn ec_slab(&self) -> f64;
}

/// Everything the engine reads from a bridge.
pub trait BridgeData: BridgeGeometry + SectionProperties + Materials {}

impl<T: BridgeGeometry + SectionProperties + Materials> BridgeData for T {}

/// Concrete modulus of elasticity, Ec = 33,000·K1·wc^1.5·√f'c (ksi).
///
/// `density_kcf` is the unit weight of concrete in kcf, `fc_ksi` the
/// compressive strength in ksi.
pub fn modulus_of_elasticity(fc_ksi: f64, density_kcf: f64, k1: f64) -> f64 {
    33_000.0 * k1 * density_kcf.powf(1.5) * fc_ksi.sqrt()
}

/// Void layout of a slab beam (inches).
///
/// The two outermost voids are exterior voids; any others are interior voids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoidedSlabShape {
    /// Beam width
    pub width: f64,
    /// Beam height
    pub height: f64,
    pub void_count: usize,
    /// Center-to-center spacing between an exterior void and its neighbour
    pub exterior_void_spacing: f64,
    /// Center-to-center spacing between interior voids
    pub interior_void_spacing: f64,
    pub exterior_void_diameter: f64,
    pub interior_void_diameter: f64,
    /// Height of the exterior void centers above the bottom of the beam
    pub exterior_void_center: f64,
    /// Height of the interior void centers above the bottom of the beam
    pub interior_void_center: f64,
    /// Shear key chamfer at the top corners
    #[serde(default)]
    pub c1: f64,
    /// Shear key chamfer at the bottom corners
    #[serde(default)]
    pub c3: f64,
}

impl VoidedSlabShape {
    /// Width left for load sharing once the shear key chamfers are removed.
    /// An exterior beam has a keyway on one side only.
    pub fn effective_width(&self, exterior: bool) -> f64 {
        if exterior {
            self.width - 2.0 * self.c3
        } else {
            self.width - 2.0 * self.c1.max(self.c3)
        }
    }
}

/// Hollow box beam walls (inches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxBeamShape {
    /// Larger of the top and bottom widths
    pub width: f64,
    pub height: f64,
    pub top_flange: f64,
    pub bottom_flange: f64,
    pub web_thickness: f64,
    /// Web centerline to web centerline
    pub web_spacing: f64,
}

/// Multi-web beams such as double tees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiWebShape {
    pub web_count: usize,
    /// Thinnest part of the top flange (in)
    pub top_flange_thickness: f64,
    /// TxDOT stiffness constant K for this beam type
    #[serde(default = "default_txdot_k")]
    pub txdot_k: f64,
}

fn default_txdot_k() -> f64 {
    2.2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusSeverity {
    Information,
    Warning,
    Error,
}

/// Diagnostic record delivered to the status sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusItem {
    pub severity: StatusSeverity,
    pub message: String,
    pub created: DateTime<Utc>,
}

impl StatusItem {
    pub fn new(severity: StatusSeverity, message: impl Into<String>) -> Self {
        StatusItem {
            severity,
            message: message.into(),
            created: Utc::now(),
        }
    }

    /// The record posted when distribution factors require a refined analysis.
    pub fn refined_analysis_required(reason: &str) -> Self {
        StatusItem::new(
            StatusSeverity::Error,
            format!("Live Load Distribution Factors could not be calculated: {}", reason),
        )
    }
}

/// Receives diagnostics that must outlive a failed computation.
pub trait StatusSink {
    fn add(&mut self, item: StatusItem);
}

/// Vector-backed status sink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCenter {
    items: Vec<StatusItem>,
}

impl StatusCenter {
    pub fn new() -> Self {
        StatusCenter::default()
    }

    pub fn items(&self) -> &[StatusItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl StatusSink for StatusCenter {
    fn add(&mut self, item: StatusItem) {
        self.items.push(item);
    }
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn add(&mut self, item: StatusItem) {
        (**self).add(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulus_of_elasticity() {
        // 5 ksi normal weight concrete, wc = 0.145 kcf
        let ec = modulus_of_elasticity(5.0, 0.145, 1.0);
        assert!((ec - 4074.0).abs() < 1.0, "Ec = {}", ec);
    }

    #[test]
    fn test_status_center_collects_items() {
        let mut center = StatusCenter::new();
        assert!(center.is_empty());
        center.add(StatusItem::refined_analysis_required("Nb < 4"));
        assert_eq!(center.len(), 1);
        assert_eq!(center.items()[0].severity, StatusSeverity::Error);
        assert!(center.items()[0].message.contains("Nb < 4"));
    }

    #[test]
    fn test_sink_by_mutable_reference() {
        fn post(mut sink: impl StatusSink) {
            sink.add(StatusItem::new(StatusSeverity::Information, "note"));
        }

        let mut center = StatusCenter::new();
        post(&mut center);
        post(&mut center);
        assert_eq!(center.len(), 2);
    }
}
