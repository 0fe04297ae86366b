//! Slab on I-girders.

use serde::{Deserialize, Serialize};

use crate::equations::{FormulaSet, LldfMethod, TypeAek};
use crate::errors::LldfResult;
use crate::families::{FamilyDetails, FamilyParams, Request};
use crate::providers::BridgeData;
use crate::span_length::effective_span_length;
use crate::types::{LldfMethodFamily, LrfdEdition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IBeamParams {
    /// Effective span length (ft)
    pub span_length: f64,
    /// Structural slab thickness (in)
    pub ts: f64,
    /// Girder-to-deck modular ratio
    pub n: f64,
    /// Girder moment of inertia (in⁴)
    pub i: f64,
    /// Girder area (in²)
    pub a: f64,
    /// Girder centroid to top of girder (in)
    pub yt: f64,
    /// Girder centroid to deck centroid (in)
    pub eg: f64,
    /// Longitudinal stiffness parameter (in⁴)
    pub kg: f64,
    pub has_diaphragms: bool,
}

pub(crate) fn extract<B: BridgeData + ?Sized>(request: Request<'_, B>) -> LldfResult<FamilyDetails> {
    let bridge = request.bridge;
    let criteria = request.criteria;
    let poi = request.poi;
    let girder = request.base.girder;

    let ts = bridge.structural_slab_depth(&poi);
    let n = request.modular_ratio()?;
    let i = bridge.ix(&poi);
    let a = bridge.area(&poi);
    let yt = bridge.yt(&poi);
    let mut eg = yt + ts / 2.0;
    if criteria.include_haunch_in_eccentricity {
        eg += bridge.haunch_depth(&poi);
    }
    let kg = n * (i + a * eg * eg);
    let span_length = effective_span_length(bridge, request.index, request.location, girder);
    let has_diaphragms = bridge.has_intermediate_diaphragms(request.span, girder);

    let rigid_method = has_diaphragms
        && criteria.method_family == LldfMethodFamily::Lrfd
        && (criteria.edition < LrfdEdition::SeventhEdition2014 || criteria.use_rigid_method);

    let (skew_moment, skew_shear) = request.skew_flags();
    let settings = request.settings(skew_moment, skew_shear, rigid_method);

    let formulas = FormulaSet::Aek(TypeAek {
        variant: criteria.method_family,
        l: span_length,
        ts,
        kg,
    });

    Ok(FamilyDetails {
        params: FamilyParams::IBeam(IBeamParams {
            span_length,
            ts,
            n,
            i,
            a,
            yt,
            eg,
            kg,
            has_diaphragms,
        }),
        method: LldfMethod::new(request.base, formulas, settings),
    })
}
