//! Polyline encoding used by the feed for segment paths.
//!
//! Signed, delta-encoded coordinates at 1e-5 degree precision. Decoding is
//! delegated to the `polyline` crate, which already yields (lng, lat) order.

use geo::LineString;

/// Decimal places carried by feed polylines
pub const POLYLINE_PRECISION: u32 = 5;

/// Decode a feed polyline into a line
///
/// The error is the decoder's description of the first bad character or
/// out-of-range coordinate.
pub fn decode_polyline(encoded: &str) -> Result<LineString, String> {
    ::polyline::decode_polyline(encoded, POLYLINE_PRECISION).map_err(|e| e.to_string())
}

/// Encode a line back into the feed's polyline form
pub fn encode_line(line: &LineString) -> Result<String, String> {
    ::polyline::encode_coordinates(line.0.iter().copied(), POLYLINE_PRECISION)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::line_string;

    #[test]
    fn test_decode_reference_polyline() {
        let line = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();

        let expected = [(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)];
        assert_eq!(line.0.len(), expected.len());
        for (coord, (x, y)) in line.0.iter().zip(expected) {
            assert_relative_eq!(coord.x, x, epsilon = 1e-9);
            assert_relative_eq!(coord.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_decode_empty_polyline() {
        let line = decode_polyline("").unwrap();
        assert!(line.0.is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_characters() {
        let reason = decode_polyline("_p~iF!!!").unwrap_err();
        assert!(!reason.is_empty());
    }

    #[test]
    fn test_encode_rejects_out_of_range_coordinates() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 91.0)];
        assert!(encode_line(&line).is_err());
    }

    #[test]
    fn test_encoded_campus_line_decodes_to_same_points() {
        let line = line_string![
            (x: -78.68210, y: 35.78470),
            (x: -78.67950, y: 35.78610),
        ];
        let encoded = encode_line(&line).unwrap();
        let decoded = decode_polyline(&encoded).unwrap();

        for (a, b) in line.0.iter().zip(decoded.0.iter()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }
}
