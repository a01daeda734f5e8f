//! Consolidation of route segments into render-ready groups.
//!
//! Adjacent segments serviced by exactly the same routes are merged into one
//! contiguous line, so the map draws one primitive where it would otherwise
//! draw many.

pub mod dissolver;
pub mod index;

pub use dissolver::{dissolve, SegmentGroup};
pub use index::{routes_servicing, SegmentRouteIndex};
