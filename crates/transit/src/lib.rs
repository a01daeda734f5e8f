//! # wolfline-transit
//!
//! Live transit data for a single agency, and the consolidation of its route
//! segments into render-ready lines.
//!
//! ## Features
//!
//! - **Segment dissolving**: Adjacent segments serviced by the same routes
//!   are merged into one contiguous line per group
//! - **Polyline geometry**: Feed paths decoded into `geo` lines, (lng, lat)
//! - **Feed decoding**: Typed routes, segments, stops, vehicles and arrival
//!   estimates from the TransLoc API
//! - **Pluggable networking**: Implement your own data fetching, or use the
//!   bundled `reqwest` fetcher and refresh cache (`client` feature)
//!
//! ## Example
//!
//! ```
//! use wolfline_transit::prelude::*;
//!
//! let segments: SegmentMap = [
//!     Segment::new("a", "_p~iF~ps|U_ulLnnqC"),
//!     Segment::new("b", "_flwFn`faV_mqNvxq`@"),
//! ]
//! .into_iter()
//! .map(|segment| (segment.id.clone(), segment))
//! .collect();
//!
//! let route = Route {
//!     id: RouteIdentifier::new("r1"),
//!     short_name: "1".into(),
//!     long_name: "Loop".into(),
//!     segments: vec!["a".into(), "b".into()],
//!     stops: vec![],
//!     is_active: true,
//!     color: "cc0000".into(),
//!     text_color: "ffffff".into(),
//! };
//! let routes: RouteMap = [(route.id.clone(), route)].into_iter().collect();
//!
//! // "a" ends where "b" begins, and both are on r1 only
//! let groups = dissolve(&routes, &segments).unwrap();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].segments.len(), 2);
//! ```

pub mod dissolve;
pub mod feed;
pub mod geometry;
pub mod identifiers;
pub mod models;

// Re-exports for convenience
pub mod prelude {
    pub use crate::dissolve::{dissolve, routes_servicing, SegmentGroup, SegmentRouteIndex};
    pub use crate::feed::{DataFetcher, Endpoint, NetworkSnapshot, TransLocConfig, TransLocFeed};
    pub use crate::identifiers::*;
    pub use crate::models::types::*;

    #[cfg(feature = "client")]
    pub use crate::feed::{CachedFeed, HttpFetcher, RefreshIntervals, TransitStore};
}

pub use prelude::*;
