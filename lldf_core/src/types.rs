//! # Shared Types
//!
//! Enumerations shared by every layer of the engine: limit states, pier faces,
//! request locations, beam families and the code-edition/method selections
//! that steer formula choice.

use serde::{Deserialize, Serialize};

/// Design limit states for which distribution factors are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitState {
    ServiceI,
    ServiceIA,
    ServiceIII,
    StrengthI,
    StrengthII,
    FatigueI,
}

impl LimitState {
    /// All limit states, in reporting order
    pub const ALL: [LimitState; 6] = [
        LimitState::ServiceI,
        LimitState::ServiceIA,
        LimitState::ServiceIII,
        LimitState::StrengthI,
        LimitState::StrengthII,
        LimitState::FatigueI,
    ];

    /// Map a specific limit state to its cache category.
    pub fn category(self) -> LimitStateCategory {
        match self {
            LimitState::FatigueI => LimitStateCategory::Fatigue,
            _ => LimitStateCategory::StrengthService,
        }
    }

    pub fn is_fatigue(self) -> bool {
        self.category() == LimitStateCategory::Fatigue
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LimitState::ServiceI => "Service I",
            LimitState::ServiceIA => "Service IA",
            LimitState::ServiceIII => "Service III",
            LimitState::StrengthI => "Strength I",
            LimitState::StrengthII => "Strength II",
            LimitState::FatigueI => "Fatigue I",
        }
    }
}

/// Limit state grouping used to key the factor caches.
///
/// Strength and service limit states share factors; fatigue factors differ
/// because only one loaded lane is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitStateCategory {
    StrengthService,
    Fatigue,
}

/// Face of a pier. `Back` looks toward the previous span, `Ahead` toward the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PierFace {
    Back,
    Ahead,
}

/// What kind of request a parameter block is being assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DfLocation {
    /// Negative moment on the back face of a pier
    PierBack,
    /// Negative moment on the ahead face of a pier
    PierAhead,
    /// Positive moment and shear within a span
    Span,
    /// Reaction at a pier
    Reaction,
}

impl DfLocation {
    pub fn for_pier_face(face: PierFace) -> Self {
        match face {
            PierFace::Back => DfLocation::PierBack,
            PierFace::Ahead => DfLocation::PierAhead,
        }
    }

    pub fn is_pier(self) -> bool {
        !matches!(self, DfLocation::Span)
    }
}

/// Side of the cross-section a girder belongs to. The center girder goes left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DfSide {
    Left,
    Right,
}

/// Interior or exterior girder position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GirderLocation {
    Interior,
    Exterior,
}

/// One loaded lane, or two or more loaded lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadedLanes {
    One,
    TwoOrMore,
}

/// Force effect whose distribution is being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForceEffect {
    Moment,
    Shear,
}

/// Closed set of beam families with their own formula sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamFamily {
    /// I-girders and bulb tees (AASHTO cross-section types a, e, k)
    IBeam,
    /// Spread U-beams and box beams (types b, c)
    UBeam,
    /// Adjacent voided or solid slabs (types f, g)
    VoidedSlab,
    /// Spread slab beams
    SpreadSlab,
    /// Adjacent hollow box beams (types f, g)
    BoxBeam,
    /// Double tees and other multi-web beams (types i, j, k)
    MultiWeb,
}

impl BeamFamily {
    pub fn display_name(self) -> &'static str {
        match self {
            BeamFamily::IBeam => "I-Beam",
            BeamFamily::UBeam => "U-Beam",
            BeamFamily::VoidedSlab => "Voided Slab",
            BeamFamily::SpreadSlab => "Spread Slab",
            BeamFamily::BoxBeam => "Box Beam",
            BeamFamily::MultiWeb => "Multi-Web",
        }
    }
}

/// Agency formula set applied on top of the AASHTO equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LldfMethodFamily {
    Lrfd,
    Wsdot,
    Txdot,
}

/// Bridge-wide computation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionFactorMethod {
    /// Closed-form equations
    Calculated,
    /// Lever rule everywhere
    LeverRule,
}

/// AASHTO LRFD Bridge Design Specifications editions. Ordered by publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LrfdEdition {
    FirstEdition1994,
    SecondEdition1998,
    ThirdEdition2004,
    FourthEdition2007,
    FourthEditionWith2009Interims,
    FifthEdition2010,
    SixthEdition2012,
    SixthEditionWith2013Interims,
    SeventhEdition2014,
    SeventhEditionWith2016Interims,
    EighthEdition2017,
    NinthEdition2020,
}

impl Default for LrfdEdition {
    fn default() -> Self {
        LrfdEdition::NinthEdition2020
    }
}

/// What to do when a closed-form equation is outside its range of applicability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeOfApplicabilityAction {
    /// Treat a violation as an error
    Enforce,
    /// Evaluate the equation anyway
    Ignore,
    /// Fall back to the lever rule
    UseLeverRule,
}

/// Transverse connection of adjacent slab beams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransverseConnectivity {
    /// Sufficiently connected to act as a unit (type f)
    ConnectedAsUnit,
    /// Connected only enough to prevent relative vertical displacement (type g)
    PreventRelativeDisplacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckType {
    /// Cast-in-place composite deck
    CompositeCip,
    /// Composite deck on stay-in-place panels
    CompositeSip,
    /// Overlay on adjacent beams
    Overlay,
    /// No deck; beams carry traffic directly
    None,
}

/// Boundary condition of a girder line on one face of a pier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PierConnection {
    Hinged,
    Roller,
    Continuous,
    Integral,
}

/// End of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanEnd {
    Start,
    End,
}

/// Location on a girder line, measured from the start pier centerline in feet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub span: usize,
    pub girder: usize,
    pub distance_ft: f64,
}

impl PointOfInterest {
    pub fn new(span: usize, girder: usize, distance_ft: f64) -> Self {
        PointOfInterest {
            span,
            girder,
            distance_ft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_state_categories() {
        assert_eq!(LimitState::FatigueI.category(), LimitStateCategory::Fatigue);
        for ls in LimitState::ALL.iter().filter(|ls| !ls.is_fatigue()) {
            assert_eq!(ls.category(), LimitStateCategory::StrengthService);
        }
    }

    #[test]
    fn test_edition_ordering() {
        assert!(LrfdEdition::SeventhEdition2014 > LrfdEdition::SixthEditionWith2013Interims);
        assert!(LrfdEdition::FirstEdition1994 < LrfdEdition::NinthEdition2020);
    }

    #[test]
    fn test_pier_face_location() {
        assert_eq!(DfLocation::for_pier_face(PierFace::Back), DfLocation::PierBack);
        assert!(DfLocation::Reaction.is_pier());
        assert!(!DfLocation::Span.is_pier());
    }
}
