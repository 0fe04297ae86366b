//! # Effective Span Length
//!
//! The span length fed to the distribution factor equations is not always the
//! physical span. Negative moment at a pier continuous on both faces uses the
//! average of the adjacent spans, and so does a pier reaction.

use crate::geometry::resolve_indices;
use crate::providers::BridgeGeometry;
use crate::types::{DfLocation, PierConnection, PierFace};

fn is_continuous(connection: PierConnection) -> bool {
    matches!(connection, PierConnection::Continuous | PierConnection::Integral)
}

/// Span length used in the distribution factor equations (ft).
///
/// When the girder count differs between the spans on either side of a pier,
/// the far-side girder index is clamped to that span's last girder.
pub fn effective_span_length<B: BridgeGeometry + ?Sized>(
    bridge: &B,
    index: usize,
    location: DfLocation,
    girder: usize,
) -> f64 {
    let indices = resolve_indices(bridge.span_count(), index, location);

    let length_of = |span: usize| {
        let last_girder = bridge.girder_count(span).saturating_sub(1);
        bridge.span_length(span, girder.min(last_girder))
    };

    if location == DfLocation::Span {
        return bridge.span_length(index, girder);
    }

    let pier = index;
    let continuous_both_sides = is_continuous(bridge.pier_connection(pier, PierFace::Back))
        && is_continuous(bridge.pier_connection(pier, PierFace::Ahead));

    let (near, far) = match location {
        DfLocation::PierBack => (indices.prev_span.or(indices.next_span), indices.next_span),
        DfLocation::PierAhead => (indices.next_span.or(indices.prev_span), indices.prev_span),
        _ => (indices.prev_span, indices.next_span),
    };

    let l1 = near.map(length_of);
    let l2 = match location {
        DfLocation::Reaction => far.map(length_of),
        _ if continuous_both_sides && far != near => far.map(length_of),
        _ => None,
    };

    match (l1, l2) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BridgeModel;

    fn two_span(connection: PierConnection) -> BridgeModel {
        let mut bridge = BridgeModel::sample_i_girder();
        bridge.spans[0].length_ft = 100.0;
        bridge.spans.push(bridge.spans[0].clone());
        bridge.spans[1].length_ft = 140.0;
        bridge.piers.push(bridge.piers[0].clone());
        bridge.piers[1].back = connection;
        bridge.piers[1].ahead = connection;
        bridge
    }

    #[test]
    fn test_span_request_uses_physical_length() {
        let bridge = two_span(PierConnection::Continuous);
        assert!((effective_span_length(&bridge, 1, DfLocation::Span, 0) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_continuous_pier_averages_adjacent_spans() {
        let bridge = two_span(PierConnection::Continuous);
        let back = effective_span_length(&bridge, 1, DfLocation::PierBack, 2);
        let ahead = effective_span_length(&bridge, 1, DfLocation::PierAhead, 2);
        assert!((back - 120.0).abs() < 1e-9);
        assert!((ahead - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_simple_pier_uses_own_span() {
        let bridge = two_span(PierConnection::Hinged);
        assert!((effective_span_length(&bridge, 1, DfLocation::PierBack, 2) - 100.0).abs() < 1e-9);
        assert!((effective_span_length(&bridge, 1, DfLocation::PierAhead, 2) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_reaction_averages_when_both_spans_exist() {
        let bridge = two_span(PierConnection::Hinged);
        assert!((effective_span_length(&bridge, 1, DfLocation::Reaction, 0) - 120.0).abs() < 1e-9);
        // End abutment has only one adjacent span
        assert!((effective_span_length(&bridge, 0, DfLocation::Reaction, 0) - 100.0).abs() < 1e-9);
        assert!((effective_span_length(&bridge, 2, DfLocation::Reaction, 0) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_far_side_girder_is_clamped() {
        let mut bridge = two_span(PierConnection::Continuous);
        bridge.spans[1].spacings_ft.pop();
        assert_eq!(bridge.girder_count(1), 4);
        // Girder 4 does not exist in span 1; its last girder is used instead
        let length = effective_span_length(&bridge, 1, DfLocation::PierBack, 4);
        assert!((length - 120.0).abs() < 1e-9);
    }
}
