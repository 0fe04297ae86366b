//! Slab on U-beams and spread box beams.

use serde::{Deserialize, Serialize};

use crate::equations::{FormulaSet, LldfMethod, TypeBc};
use crate::errors::LldfResult;
use crate::families::{FamilyDetails, FamilyParams, Request};
use crate::providers::BridgeData;
use crate::span_length::effective_span_length;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxBeamParams {
    /// Effective span length (ft)
    pub span_length: f64,
    /// Beam depth (in)
    pub d: f64,
    /// Girder centerline to exterior web centerline (ft)
    pub cl_to_exterior_web: f64,
    /// Exterior web to curb, left and right (ft)
    pub left_de: f64,
    pub right_de: f64,
}

/// Read the box beam parameters. `min_depth` raises the beam depth used in
/// the equations.
pub(crate) fn box_params<B: BridgeData + ?Sized>(request: &Request<'_, B>, min_depth: Option<f64>) -> BoxBeamParams {
    let bridge = request.bridge;
    let height = bridge.girder_height(&request.poi);
    let (left_de, right_de) = request.web_to_curb();
    BoxBeamParams {
        span_length: effective_span_length(bridge, request.index, request.location, request.base.girder),
        d: min_depth.map_or(height, |min| height.max(min)),
        cl_to_exterior_web: bridge.cl_to_exterior_web(&request.poi),
        left_de,
        right_de,
    }
}

pub(crate) fn method<B: BridgeData + ?Sized>(request: Request<'_, B>, params: &BoxBeamParams) -> LldfMethod {
    let (skew_moment, skew_shear) = request.skew_flags();
    let settings = request.settings(skew_moment, skew_shear, false);
    let formulas = FormulaSet::Bc(TypeBc {
        variant: request.criteria.method_family,
        l: params.span_length,
        d: params.d,
        left_de: params.left_de,
        right_de: params.right_de,
    });
    LldfMethod::new(request.base, formulas, settings)
}

pub(crate) fn extract<B: BridgeData + ?Sized>(request: Request<'_, B>) -> LldfResult<FamilyDetails> {
    let params = box_params(&request, None);
    let method = method(request, &params);
    Ok(FamilyDetails {
        params: FamilyParams::UBeam(params),
        method,
    })
}
