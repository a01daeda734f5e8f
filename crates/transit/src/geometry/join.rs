//! Endpoint joining of two lines into one contiguous line.

use geo::{Coord, LineString};

/// Key for coordinate-based endpoint matching
/// Uses fixed-point representation to avoid floating point issues
fn coord_key(coord: &Coord<f64>) -> (i64, i64) {
    // 7 decimal places, finer than the feed's 5
    let x = (coord.x * 10_000_000.0).round() as i64;
    let y = (coord.y * 10_000_000.0).round() as i64;
    (x, y)
}

fn endpoints(line: &LineString) -> Option<((i64, i64), (i64, i64))> {
    let first = line.0.first()?;
    let last = line.0.last()?;
    Some((coord_key(first), coord_key(last)))
}

/// Dissolve two lines into a single contiguous line
///
/// Returns `None` when the lines share no endpoint (the combination would be
/// a multi-part geometry) or either line is empty. The shared vertex appears
/// once in the result. When the lines meet at both ends the join is made at
/// `a`'s end, giving a closed line.
pub fn join_lines(a: &LineString, b: &LineString) -> Option<LineString> {
    let (a_start, a_end) = endpoints(a)?;
    let (b_start, b_end) = endpoints(b)?;

    let coords: Vec<Coord<f64>> = if a_end == b_start {
        a.0.iter().chain(b.0.iter().skip(1)).copied().collect()
    } else if a_end == b_end {
        a.0.iter().chain(b.0.iter().rev().skip(1)).copied().collect()
    } else if a_start == b_end {
        b.0.iter().chain(a.0.iter().skip(1)).copied().collect()
    } else if a_start == b_start {
        a.0.iter().rev().chain(b.0.iter().skip(1)).copied().collect()
    } else {
        return None;
    };

    Some(LineString::new(coords))
}
