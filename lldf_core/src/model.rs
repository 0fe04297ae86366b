//! # Bridge Model
//!
//! `BridgeModel` is the bundled, serializable bridge description. It
//! implements every provider trait, so it can be handed straight to
//! [`crate::engine::LldfEngine`], and it is what `.lldf.json` files hold.
//!
//! ## Structure
//!
//! ```text
//! BridgeModel
//! ├── meta: BridgeMetadata (version, bridge id, timestamps)
//! ├── criteria: LldfCriteria
//! ├── deck, barriers
//! ├── spans: Vec<SpanData>   (girder spacings per span)
//! ├── piers: Vec<PierData>   (skew and connections, span_count + 1 entries)
//! └── section, concrete      (one girder section for the whole bridge)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lldf_core::model::BridgeModel;
//! use lldf_core::providers::BridgeGeometry;
//!
//! let bridge = BridgeModel::sample_i_girder();
//! assert_eq!(bridge.span_count(), 1);
//! assert_eq!(bridge.girder_count(0), 5);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::LldfCriteria;
use crate::errors::{LldfError, LldfResult};
use crate::providers::{
    modulus_of_elasticity, BoxBeamShape, BridgeGeometry, Materials, MultiWebShape, SectionProperties,
    VoidedSlabShape,
};
use crate::types::{
    BeamFamily, DeckType, LldfMethodFamily, PierConnection, PierFace, PointOfInterest, SpanEnd,
    TransverseConnectivity,
};

/// Current schema version for model files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A bridge cross-section and framing plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeModel {
    pub meta: BridgeMetadata,

    /// Distribution factor settings for this bridge
    #[serde(default)]
    pub criteria: LldfCriteria,

    pub beam_family: BeamFamily,

    pub deck: DeckData,

    pub barriers: BarrierData,

    /// Spans in order along the alignment
    pub spans: Vec<SpanData>,

    /// Piers and abutments, one more than the number of spans
    pub piers: Vec<PierData>,

    /// Girder section, same for every girder
    pub section: GirderSection,

    pub girder_concrete: ConcreteData,

    pub deck_concrete: ConcreteData,

    #[serde(default)]
    pub has_intermediate_diaphragms: bool,

    #[serde(default = "default_connectivity")]
    pub connectivity: TransverseConnectivity,

    /// Void layout, slab beams only
    #[serde(default)]
    pub voided_slab: Option<VoidedSlabShape>,

    /// Box walls, adjacent box beams only
    #[serde(default)]
    pub box_beam: Option<BoxBeamShape>,

    /// Web count and flange, multi-web beams only
    #[serde(default)]
    pub multi_web: Option<MultiWebShape>,
}

fn default_connectivity() -> TransverseConnectivity {
    TransverseConnectivity::ConnectedAsUnit
}

/// Model metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Bridge identifier written to regression output
    pub bridge_id: String,

    /// Name of the responsible engineer
    #[serde(default)]
    pub engineer: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl BridgeMetadata {
    pub fn new(bridge_id: impl Into<String>) -> Self {
        let now = Utc::now();
        BridgeMetadata {
            version: SCHEMA_VERSION.to_string(),
            bridge_id: bridge_id.into(),
            engineer: String::new(),
            created: now,
            modified: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckData {
    pub deck_type: DeckType,
    /// Deck edge to CL of the left exterior girder (ft)
    pub left_overhang_ft: f64,
    /// Deck edge to CL of the right exterior girder (ft)
    pub right_overhang_ft: f64,
    /// Structural thickness; overlay thickness for adjacent beams (in)
    pub slab_depth_in: f64,
}

/// Traffic barrier widths at the deck interface (ft).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrierData {
    pub left_width_ft: f64,
    pub right_width_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    /// CL bearing to CL bearing (ft)
    pub length_ft: f64,
    /// Girder spacings left to right (ft); girder count is one more
    pub spacings_ft: Vec<f64>,
    /// Pier centerline to CL bearing (ft)
    #[serde(default)]
    pub bearing_offset_ft: f64,
    /// Girder end to CL bearing (ft)
    #[serde(default)]
    pub end_distance_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PierData {
    /// Skew angle (degrees, positive counterclockwise)
    #[serde(default)]
    pub skew_deg: f64,
    /// Connection of the span ending here
    pub back: PierConnection,
    /// Connection of the span starting here
    pub ahead: PierConnection,
}

impl PierData {
    pub fn new(connection: PierConnection) -> Self {
        PierData {
            skew_deg: 0.0,
            back: connection,
            ahead: connection,
        }
    }
}

/// Non-composite girder section (inches unless noted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderSection {
    pub name: String,
    pub ix_in4: f64,
    pub iy_in4: f64,
    pub area_in2: f64,
    /// Centroid to top fiber
    pub yt_in: f64,
    pub height_in: f64,
    #[serde(default)]
    pub haunch_depth_in: f64,
    /// Top flange width (ft)
    pub top_width_ft: f64,
    /// Girder CL to CL of the exterior web (ft); zero for single-web sections
    #[serde(default)]
    pub cl_to_exterior_web_ft: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteData {
    /// Compressive strength (ksi)
    pub fc_ksi: f64,
    /// Unit weight (kcf)
    pub density_kcf: f64,
    /// Aggregate correction factor
    #[serde(default = "default_k1")]
    pub k1: f64,
}

fn default_k1() -> f64 {
    1.0
}

impl ConcreteData {
    pub fn new(fc_ksi: f64, density_kcf: f64) -> Self {
        ConcreteData {
            fc_ksi,
            density_kcf,
            k1: 1.0,
        }
    }

    pub fn modulus(&self) -> f64 {
        modulus_of_elasticity(self.fc_ksi, self.density_kcf, self.k1)
    }
}

impl BridgeModel {
    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Check that the framing plan is self-consistent.
    pub fn validate(&self) -> LldfResult<()> {
        if self.spans.is_empty() {
            return Err(LldfError::missing_data("At least one span"));
        }
        if self.piers.len() != self.spans.len() + 1 {
            return Err(LldfError::invalid_input(
                "piers",
                self.piers.len().to_string(),
                format!("Expected {} piers for {} spans", self.spans.len() + 1, self.spans.len()),
            ));
        }
        for (i, span) in self.spans.iter().enumerate() {
            if span.length_ft <= 0.0 {
                return Err(LldfError::invalid_input(
                    format!("spans[{}].length_ft", i),
                    span.length_ft.to_string(),
                    "Span length must be positive",
                ));
            }
            if span.spacings_ft.is_empty() {
                return Err(LldfError::invalid_input(
                    format!("spans[{}].spacings_ft", i),
                    "[]",
                    "A span needs at least two girders",
                ));
            }
            if let Some(s) = span.spacings_ft.iter().find(|s| **s <= 0.0) {
                return Err(LldfError::invalid_input(
                    format!("spans[{}].spacings_ft", i),
                    s.to_string(),
                    "Girder spacing must be positive",
                ));
            }
        }
        match self.beam_family {
            BeamFamily::VoidedSlab if self.voided_slab.is_none() => {
                return Err(LldfError::missing_data("Voided slab shape"));
            }
            BeamFamily::BoxBeam if self.box_beam.is_none() => {
                return Err(LldfError::missing_data("Box beam shape"));
            }
            BeamFamily::MultiWeb if self.multi_web.is_none() => {
                return Err(LldfError::missing_data("Multi-web shape"));
            }
            _ => {}
        }
        self.criteria.validate()
    }

    /// Single 100 ft span, five AASHTO Type IV girders at 8 ft with an 8 in deck.
    pub fn sample_i_girder() -> Self {
        BridgeModel {
            meta: BridgeMetadata::new("I-GIRDER"),
            criteria: LldfCriteria::default(),
            beam_family: BeamFamily::IBeam,
            deck: DeckData {
                deck_type: DeckType::CompositeCip,
                left_overhang_ft: 3.0,
                right_overhang_ft: 3.0,
                slab_depth_in: 8.0,
            },
            barriers: BarrierData {
                left_width_ft: 1.5,
                right_width_ft: 1.5,
            },
            spans: vec![SpanData {
                length_ft: 100.0,
                spacings_ft: vec![8.0; 4],
                bearing_offset_ft: 1.0,
                end_distance_ft: 0.75,
            }],
            piers: vec![PierData::new(PierConnection::Hinged), PierData::new(PierConnection::Roller)],
            section: GirderSection {
                name: "AASHTO Type IV".to_string(),
                ix_in4: 260_741.0,
                iy_in4: 24_374.0,
                area_in2: 789.0,
                yt_in: 29.27,
                height_in: 54.0,
                haunch_depth_in: 2.0,
                top_width_ft: 20.0 / 12.0,
                cl_to_exterior_web_ft: 0.0,
            },
            girder_concrete: ConcreteData::new(7.0, 0.155),
            deck_concrete: ConcreteData::new(4.0, 0.150),
            has_intermediate_diaphragms: false,
            connectivity: TransverseConnectivity::ConnectedAsUnit,
            voided_slab: None,
            box_beam: None,
            multi_web: None,
        }
    }

    /// Single 110 ft span, four TxDOT U54 beams at 10 ft.
    pub fn sample_u_beam() -> Self {
        BridgeModel {
            meta: BridgeMetadata::new("U-BEAM"),
            criteria: LldfCriteria {
                method_family: LldfMethodFamily::Txdot,
                ..LldfCriteria::default()
            },
            beam_family: BeamFamily::UBeam,
            deck: DeckData {
                deck_type: DeckType::CompositeSip,
                left_overhang_ft: 3.5,
                right_overhang_ft: 3.5,
                slab_depth_in: 8.5,
            },
            barriers: BarrierData {
                left_width_ft: 1.5,
                right_width_ft: 1.5,
            },
            spans: vec![SpanData {
                length_ft: 110.0,
                spacings_ft: vec![10.0; 3],
                bearing_offset_ft: 1.0,
                end_distance_ft: 0.75,
            }],
            piers: vec![PierData::new(PierConnection::Hinged), PierData::new(PierConnection::Roller)],
            section: GirderSection {
                name: "U54".to_string(),
                ix_in4: 403_020.0,
                iy_in4: 1_475_000.0,
                area_in2: 1_120.0,
                yt_in: 31.71,
                height_in: 54.0,
                haunch_depth_in: 0.0,
                top_width_ft: 96.0 / 12.0,
                cl_to_exterior_web_ft: 1.5,
            },
            girder_concrete: ConcreteData::new(8.5, 0.155),
            deck_concrete: ConcreteData::new(4.0, 0.150),
            has_intermediate_diaphragms: false,
            connectivity: TransverseConnectivity::ConnectedAsUnit,
            voided_slab: None,
            box_beam: None,
            multi_web: None,
        }
    }

    /// Single 40 ft span, five 5SB15 spread slab beams at 8 ft.
    pub fn sample_spread_slab() -> Self {
        BridgeModel {
            meta: BridgeMetadata::new("SPREAD-SLAB"),
            criteria: LldfCriteria {
                method_family: LldfMethodFamily::Txdot,
                ..LldfCriteria::default()
            },
            beam_family: BeamFamily::SpreadSlab,
            deck: DeckData {
                deck_type: DeckType::CompositeCip,
                left_overhang_ft: 4.0,
                right_overhang_ft: 4.0,
                slab_depth_in: 8.0,
            },
            barriers: BarrierData {
                left_width_ft: 1.5,
                right_width_ft: 1.5,
            },
            spans: vec![SpanData {
                length_ft: 40.0,
                spacings_ft: vec![8.0; 4],
                bearing_offset_ft: 0.75,
                end_distance_ft: 0.5,
            }],
            piers: vec![PierData::new(PierConnection::Hinged), PierData::new(PierConnection::Roller)],
            section: GirderSection {
                name: "5SB15".to_string(),
                ix_in4: 16_875.0,
                iy_in4: 388_800.0,
                area_in2: 900.0,
                yt_in: 7.5,
                height_in: 15.0,
                haunch_depth_in: 0.0,
                top_width_ft: 5.0,
                cl_to_exterior_web_ft: 2.0,
            },
            girder_concrete: ConcreteData::new(5.0, 0.150),
            deck_concrete: ConcreteData::new(4.0, 0.150),
            has_intermediate_diaphragms: false,
            connectivity: TransverseConnectivity::ConnectedAsUnit,
            voided_slab: None,
            box_beam: None,
            multi_web: None,
        }
    }

    /// Single 50 ft span, seven adjacent 4 ft by 2 ft voided slab beams with two voids each.
    pub fn sample_voided_slab() -> Self {
        BridgeModel {
            meta: BridgeMetadata::new("VOIDED-SLAB"),
            criteria: LldfCriteria::default(),
            beam_family: BeamFamily::VoidedSlab,
            deck: DeckData {
                deck_type: DeckType::Overlay,
                left_overhang_ft: 2.0,
                right_overhang_ft: 2.0,
                slab_depth_in: 0.0,
            },
            barriers: BarrierData {
                left_width_ft: 1.5,
                right_width_ft: 1.5,
            },
            spans: vec![SpanData {
                length_ft: 50.0,
                spacings_ft: vec![4.0; 6],
                bearing_offset_ft: 0.75,
                end_distance_ft: 0.5,
            }],
            piers: vec![PierData::new(PierConnection::Hinged), PierData::new(PierConnection::Roller)],
            section: GirderSection {
                name: "4SB24 voided".to_string(),
                ix_in4: 53_860.0,
                iy_in4: 207_580.0,
                area_in2: 962.0,
                yt_in: 12.0,
                height_in: 24.0,
                haunch_depth_in: 0.0,
                top_width_ft: 4.0,
                cl_to_exterior_web_ft: 1.5,
            },
            girder_concrete: ConcreteData::new(6.0, 0.150),
            deck_concrete: ConcreteData::new(4.0, 0.150),
            has_intermediate_diaphragms: false,
            connectivity: TransverseConnectivity::ConnectedAsUnit,
            voided_slab: Some(VoidedSlabShape {
                width: 48.0,
                height: 24.0,
                void_count: 2,
                exterior_void_spacing: 16.0,
                interior_void_spacing: 16.0,
                exterior_void_diameter: 11.0,
                interior_void_diameter: 11.0,
                exterior_void_center: 12.0,
                interior_void_center: 12.0,
                c1: 0.75,
                c3: 0.5,
            }),
            box_beam: None,
            multi_web: None,
        }
    }

    /// Single 80 ft span, eight adjacent 4 ft by 33 in box beams under an overlay.
    pub fn sample_box_beam() -> Self {
        BridgeModel {
            meta: BridgeMetadata::new("BOX-BEAM"),
            criteria: LldfCriteria::default(),
            beam_family: BeamFamily::BoxBeam,
            deck: DeckData {
                deck_type: DeckType::Overlay,
                left_overhang_ft: 2.0,
                right_overhang_ft: 2.0,
                slab_depth_in: 0.0,
            },
            barriers: BarrierData {
                left_width_ft: 1.5,
                right_width_ft: 1.5,
            },
            spans: vec![SpanData {
                length_ft: 80.0,
                spacings_ft: vec![4.0; 7],
                bearing_offset_ft: 0.75,
                end_distance_ft: 0.5,
            }],
            piers: vec![PierData::new(PierConnection::Hinged), PierData::new(PierConnection::Roller)],
            section: GirderSection {
                name: "B48-33".to_string(),
                ix_in4: 170_100.0,
                iy_in4: 300_000.0,
                area_in2: 813.0,
                yt_in: 16.5,
                height_in: 33.0,
                haunch_depth_in: 0.0,
                top_width_ft: 4.0,
                cl_to_exterior_web_ft: 21.5 / 12.0,
            },
            girder_concrete: ConcreteData::new(7.0, 0.155),
            deck_concrete: ConcreteData::new(4.0, 0.150),
            has_intermediate_diaphragms: false,
            connectivity: TransverseConnectivity::ConnectedAsUnit,
            voided_slab: None,
            box_beam: Some(BoxBeamShape {
                width: 48.0,
                height: 33.0,
                top_flange: 5.5,
                bottom_flange: 5.5,
                web_thickness: 5.0,
                web_spacing: 43.0,
            }),
            multi_web: None,
        }
    }

    /// Single 60 ft span, five 8 ft wide 24 in double tees with a 3 in topping.
    pub fn sample_double_tee() -> Self {
        BridgeModel {
            meta: BridgeMetadata::new("DOUBLE-TEE"),
            criteria: LldfCriteria::default(),
            beam_family: BeamFamily::MultiWeb,
            deck: DeckData {
                deck_type: DeckType::CompositeCip,
                left_overhang_ft: 4.0,
                right_overhang_ft: 4.0,
                slab_depth_in: 3.0,
            },
            barriers: BarrierData {
                left_width_ft: 1.5,
                right_width_ft: 1.5,
            },
            spans: vec![SpanData {
                length_ft: 60.0,
                spacings_ft: vec![8.0; 4],
                bearing_offset_ft: 0.75,
                end_distance_ft: 0.5,
            }],
            piers: vec![PierData::new(PierConnection::Hinged), PierData::new(PierConnection::Roller)],
            section: GirderSection {
                name: "8DT24".to_string(),
                ix_in4: 20_985.0,
                iy_in4: 127_000.0,
                area_in2: 401.0,
                yt_in: 6.85,
                height_in: 24.0,
                haunch_depth_in: 0.0,
                top_width_ft: 8.0,
                cl_to_exterior_web_ft: 2.0,
            },
            girder_concrete: ConcreteData::new(7.0, 0.150),
            deck_concrete: ConcreteData::new(4.0, 0.150),
            has_intermediate_diaphragms: false,
            connectivity: TransverseConnectivity::ConnectedAsUnit,
            voided_slab: None,
            box_beam: None,
            multi_web: Some(MultiWebShape {
                web_count: 2,
                top_flange_thickness: 4.0,
                txdot_k: 2.2,
            }),
        }
    }

    fn span(&self, span: usize) -> Option<&SpanData> {
        self.spans.get(span)
    }
}

impl BridgeGeometry for BridgeModel {
    fn span_count(&self) -> usize {
        self.spans.len()
    }

    fn girder_count(&self, span: usize) -> usize {
        self.span(span).map_or(0, |s| s.spacings_ft.len() + 1)
    }

    fn beam_family(&self, _span: usize) -> BeamFamily {
        self.beam_family
    }

    fn span_length(&self, span: usize, _girder: usize) -> f64 {
        self.span(span).map_or(0.0, |s| s.length_ft)
    }

    fn bearing_offset(&self, span: usize, _girder: usize) -> f64 {
        self.span(span).map_or(0.0, |s| s.bearing_offset_ft)
    }

    fn girder_extent(&self, span: usize, _girder: usize) -> (f64, f64) {
        self.span(span).map_or((0.0, 0.0), |s| {
            let start = s.bearing_offset_ft - s.end_distance_ft;
            (start, s.bearing_offset_ft + s.length_ft + s.end_distance_ft)
        })
    }

    fn curb_to_curb_width(&self, span: usize, _distance_ft: f64) -> f64 {
        let girders: f64 = self.span(span).map_or(0.0, |s| s.spacings_ft.iter().sum());
        girders + self.deck.left_overhang_ft + self.deck.right_overhang_ft
            - self.barriers.left_width_ft
            - self.barriers.right_width_ft
    }

    fn girder_spacings(&self, span: usize, _distance_ft: f64) -> Vec<f64> {
        self.span(span).map(|s| s.spacings_ft.clone()).unwrap_or_default()
    }

    fn slab_overhangs(&self, _span: usize, _distance_ft: f64) -> (f64, f64) {
        (self.deck.left_overhang_ft, self.deck.right_overhang_ft)
    }

    fn deck_type(&self) -> DeckType {
        self.deck.deck_type
    }

    fn girder_top_width(&self, _poi: &PointOfInterest) -> f64 {
        self.section.top_width_ft
    }

    fn barrier_interface_widths(&self) -> (f64, f64) {
        (self.barriers.left_width_ft, self.barriers.right_width_ft)
    }

    fn pier_skew(&self, pier: usize) -> f64 {
        self.piers.get(pier).map_or(0.0, |p| p.skew_deg.to_radians())
    }

    fn pier_connection(&self, pier: usize, face: PierFace) -> PierConnection {
        self.piers.get(pier).map_or(PierConnection::Hinged, |p| match face {
            PierFace::Back => p.back,
            PierFace::Ahead => p.ahead,
        })
    }

    /// With a positive skew the span start is obtuse at the right edge and
    /// the span end at the left edge; a negative skew mirrors this. The two
    /// girders nearest the corner are flagged.
    fn has_obtuse_corner(&self, span: usize, girder: usize, end: SpanEnd) -> bool {
        let pier = match end {
            SpanEnd::Start => span,
            SpanEnd::End => span + 1,
        };
        let skew = self.pier_skew(pier);
        if skew == 0.0 {
            return false;
        }
        let count = self.girder_count(span);
        let left = girder <= 1;
        let right = girder + 2 >= count;
        match (end, skew > 0.0) {
            (SpanEnd::Start, true) | (SpanEnd::End, false) => right,
            (SpanEnd::End, true) | (SpanEnd::Start, false) => left,
        }
    }

    fn has_intermediate_diaphragms(&self, _span: usize, _girder: usize) -> bool {
        self.has_intermediate_diaphragms
    }

    fn transverse_connectivity(&self) -> TransverseConnectivity {
        self.connectivity
    }

    fn cl_to_exterior_web(&self, _poi: &PointOfInterest) -> f64 {
        self.section.cl_to_exterior_web_ft
    }

    fn voided_slab_shape(&self, _span: usize, _girder: usize) -> Option<VoidedSlabShape> {
        self.voided_slab
    }

    fn box_beam_shape(&self, _span: usize, _girder: usize) -> Option<BoxBeamShape> {
        self.box_beam
    }

    fn multi_web_shape(&self, _span: usize, _girder: usize) -> Option<MultiWebShape> {
        self.multi_web
    }
}

impl SectionProperties for BridgeModel {
    fn ix(&self, _poi: &PointOfInterest) -> f64 {
        self.section.ix_in4
    }

    fn iy(&self, _poi: &PointOfInterest) -> f64 {
        self.section.iy_in4
    }

    fn area(&self, _poi: &PointOfInterest) -> f64 {
        self.section.area_in2
    }

    fn yt(&self, _poi: &PointOfInterest) -> f64 {
        self.section.yt_in
    }

    fn girder_height(&self, _poi: &PointOfInterest) -> f64 {
        self.section.height_in
    }

    fn structural_slab_depth(&self, _poi: &PointOfInterest) -> f64 {
        self.deck.slab_depth_in
    }

    fn haunch_depth(&self, _poi: &PointOfInterest) -> f64 {
        self.section.haunch_depth_in
    }
}

impl Materials for BridgeModel {
    fn ec_girder(&self, _span: usize, _girder: usize) -> f64 {
        self.girder_concrete.modulus()
    }

    fn ec_girder_at_strength(&self, _span: usize, _girder: usize, fc_ksi: f64) -> f64 {
        modulus_of_elasticity(fc_ksi, self.girder_concrete.density_kcf, self.girder_concrete.k1)
    }

    fn ec_slab(&self) -> f64 {
        self.deck_concrete.modulus()
    }
}
