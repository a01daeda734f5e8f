//! Transit data models and types.

pub mod types;

// Re-exports for convenience
pub use types::{
    ArrivalEstimate, Location, Result, Route, RouteMap, Segment, SegmentMap, Stop, StopMap,
    TransitError, Vehicle, VehicleMap,
};
