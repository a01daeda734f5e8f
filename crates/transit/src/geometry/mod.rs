//! Line geometry for route segments.
//!
//! All coordinates are `geo::Coord { x: longitude, y: latitude }`.

pub mod encoding;
pub mod join;

pub use encoding::{decode_polyline, encode_line, POLYLINE_PRECISION};
pub use join::join_lines;
