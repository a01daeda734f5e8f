//! Which routes service which segments.

use std::collections::{BTreeSet, HashMap};

use crate::identifiers::*;
use crate::models::types::*;

/// Every route whose path includes `segment_id`
///
/// Returns an empty set if `segment_id` is not a known segment.
pub fn routes_servicing(
    segment_id: &SegmentIdentifier,
    segments: &SegmentMap,
    routes: &RouteMap,
) -> BTreeSet<RouteIdentifier> {
    if !segments.contains_key(segment_id) {
        return BTreeSet::new();
    }

    routes
        .iter()
        .filter(|(_, route)| route.uses_segment(segment_id))
        .map(|(id, _)| id.clone())
        .collect()
}

/// Inverted route map: segment -> servicing routes
///
/// Built in one pass over every route's segment list, so lookups don't rescan
/// the routes.
#[derive(Clone, Debug, Default)]
pub struct SegmentRouteIndex {
    servicing: HashMap<SegmentIdentifier, BTreeSet<RouteIdentifier>>,
    none: BTreeSet<RouteIdentifier>,
}

impl SegmentRouteIndex {
    /// Build the index, rejecting routes that reference unknown segments
    pub fn build(routes: &RouteMap, segments: &SegmentMap) -> Result<Self> {
        let mut servicing: HashMap<SegmentIdentifier, BTreeSet<RouteIdentifier>> = HashMap::new();

        for (route_id, route) in routes {
            for segment_id in &route.segments {
                if !segments.contains_key(segment_id) {
                    return Err(TransitError::UnknownSegment {
                        route: route_id.clone(),
                        segment: segment_id.clone(),
                    });
                }

                servicing
                    .entry(segment_id.clone())
                    .or_default()
                    .insert(route_id.clone());
            }
        }

        Ok(Self {
            servicing,
            none: BTreeSet::new(),
        })
    }

    /// Routes servicing a segment (empty for unserviced or unknown segments)
    pub fn routes_for(&self, segment_id: &SegmentIdentifier) -> &BTreeSet<RouteIdentifier> {
        self.servicing.get(segment_id).unwrap_or(&self.none)
    }
}
