//! Core data types for a single agency's transit data.
//!
//! Everything here is a plain immutable snapshot record. Geometry is kept in
//! its encoded form until the dissolver (or a caller) asks for it.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::geometry::decode_polyline;
use crate::identifiers::*;

// ============================================================================
// Collections
// ============================================================================

/// Routes keyed by id, iterated in id order
pub type RouteMap = BTreeMap<RouteIdentifier, Route>;

/// Segments keyed by id, iterated in id order
pub type SegmentMap = BTreeMap<SegmentIdentifier, Segment>;

pub type StopMap = BTreeMap<StopIdentifier, Stop>;

pub type VehicleMap = BTreeMap<VehicleIdentifier, Vehicle>;

// ============================================================================
// Data Structures
// ============================================================================

/// A WGS84 position as reported by the feed
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `geo` point in (x = longitude, y = latitude) order
    pub fn point(&self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

/// A transit route (e.g., "7R", "Wolflink Shuttle")
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteIdentifier,
    pub short_name: String,
    pub long_name: String,

    /// Segments making up the route's path, in travel order
    pub segments: Vec<SegmentIdentifier>,
    pub stops: Vec<StopIdentifier>,

    /// Whether the route was running when the snapshot was taken
    pub is_active: bool,

    /// Hex RGB without the leading `#`
    pub color: String,
    pub text_color: String,
}

impl Route {
    pub fn uses_segment(&self, segment_id: &SegmentIdentifier) -> bool {
        self.segments.contains(segment_id)
    }
}

/// An atomic piece of route path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentIdentifier,

    /// Polyline-encoded path (precision 5)
    pub polyline: String,
}

impl Segment {
    pub fn new(id: impl Into<SegmentIdentifier>, polyline: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            polyline: polyline.into(),
        }
    }

    /// Decode the segment's path into a line
    ///
    /// Returns `Err` if the stored polyline is malformed.
    pub fn path(&self) -> Result<LineString> {
        decode_polyline(&self.polyline).map_err(|reason| TransitError::PolylineDecode {
            segment: self.id.clone(),
            reason,
        })
    }
}

/// A boarding location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopIdentifier,
    pub code: String,
    pub name: String,
    pub location: Location,

    /// Routes serving this stop
    pub routes: Vec<RouteIdentifier>,
}

/// Predicted arrival of a vehicle at a stop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalEstimate {
    pub route_id: RouteIdentifier,
    pub stop_id: StopIdentifier,
    pub arrival_at: DateTime<FixedOffset>,
}

/// A tracked vehicle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleIdentifier,
    pub route_id: RouteIdentifier,
    pub call_name: String,
    pub location: Location,

    /// Degrees clockwise from north
    pub heading: f64,
    pub arrival_estimates: Vec<ArrivalEstimate>,
    pub tracking_status: String,

    // Not every agency reports occupancy
    pub passenger_load: Option<u32>,
    pub standing_capacity: Option<u32>,
    pub seating_capacity: Option<u32>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Route {route} references unknown segment {segment}")]
    UnknownSegment {
        route: RouteIdentifier,
        segment: SegmentIdentifier,
    },

    #[error("Malformed polyline for segment {segment}: {reason}")]
    PolylineDecode {
        segment: SegmentIdentifier,
        reason: String,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<serde_json::Error> for TransitError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_point_order() {
        let location = Location::new(35.7847, -78.6821);
        let point = location.point();

        assert_eq!(point.x(), -78.6821);
        assert_eq!(point.y(), 35.7847);
    }

    #[test]
    fn test_segment_path_decodes() {
        // Example from the polyline format documentation
        let segment = Segment::new("s1", "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        let path = segment.path().unwrap();

        assert_eq!(path.0.len(), 3);
        approx::assert_relative_eq!(path.0[0].x, -120.2, epsilon = 1e-9);
        approx::assert_relative_eq!(path.0[0].y, 38.5, epsilon = 1e-9);
    }

    #[test]
    fn test_segment_path_reports_segment_on_failure() {
        let segment = Segment::new("broken", "_p~iF!!!");

        match segment.path() {
            Err(TransitError::PolylineDecode { segment, .. }) => {
                assert_eq!(segment.as_str(), "broken");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_route_uses_segment() {
        let route = Route {
            id: RouteIdentifier::new("r1"),
            short_name: "7R".into(),
            long_name: "Wolflink Shuttle".into(),
            segments: vec![SegmentIdentifier::new("a"), SegmentIdentifier::new("b")],
            stops: vec![],
            is_active: true,
            color: "cc0000".into(),
            text_color: "ffffff".into(),
        };

        assert!(route.uses_segment(&SegmentIdentifier::new("b")));
        assert!(!route.uses_segment(&SegmentIdentifier::new("c")));
    }
}
