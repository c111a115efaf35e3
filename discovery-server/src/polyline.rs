//! Compact polyline codec (precision 1e5).
//!
//! Each coordinate is stored as the delta from the previous one, scaled to
//! an integer, zig-zag encoded, and written 5 bits per character with a
//! continuation bit (0x20) and an offset of 63 so every byte is printable.
//!
//! ```
//! use discovery_server::domain::Coordinate;
//! use discovery_server::polyline;
//!
//! let points = vec![
//!     Coordinate::new(38.5, -120.2).unwrap(),
//!     Coordinate::new(40.7, -120.95).unwrap(),
//!     Coordinate::new(43.252, -126.453).unwrap(),
//! ];
//!
//! let encoded = polyline::encode(&points);
//! assert_eq!(encoded, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
//! assert_eq!(polyline::decode(&encoded).unwrap(), points);
//! ```

use crate::domain::Coordinate;

const PRECISION: f64 = 1e5;
const CHAR_OFFSET: u8 = 63;
const CONTINUATION: i64 = 0x20;
const CHUNK_MASK: i64 = 0x1f;

/// Values wider than this many 5-bit chunks cannot be valid coordinates.
const MAX_CHUNKS: u32 = 7;

/// Error decoding a polyline string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Byte outside the printable range the format uses.
    #[error("invalid character {byte:#04x} at position {position}")]
    InvalidCharacter { position: usize, byte: u8 },

    /// Input ended while a value still had its continuation bit set.
    #[error("truncated value at position {position}")]
    Truncated { position: usize },

    /// A latitude delta was not followed by a longitude delta.
    #[error("latitude without longitude at position {position}")]
    MissingLongitude { position: usize },

    /// A single value used more chunks than any coordinate needs.
    #[error("value too long at position {position}")]
    Overflow { position: usize },

    /// Accumulated coordinate left the valid latitude/longitude range.
    #[error("decoded point ({latitude}, {longitude}) is out of range")]
    OutOfRange { latitude: f64, longitude: f64 },
}

/// Lazy decoder over an encoded polyline.
///
/// Yields one coordinate per (dlat, dlng) pair. After the first error the
/// iterator is exhausted.
#[derive(Debug, Clone)]
pub struct PolylineDecoder<'a> {
    bytes: &'a [u8],
    position: usize,
    lat: i64,
    lng: i64,
    failed: bool,
}

impl<'a> PolylineDecoder<'a> {
    pub fn new(encoded: &'a str) -> Self {
        Self {
            bytes: encoded.as_bytes(),
            position: 0,
            lat: 0,
            lng: 0,
            failed: false,
        }
    }

    /// Read one zig-zag value, or `None` at a clean end of input.
    fn next_value(&mut self) -> Result<Option<i64>, DecodeError> {
        if self.position >= self.bytes.len() {
            return Ok(None);
        }

        let start = self.position;
        let mut result: i64 = 0;
        let mut shift: u32 = 0;

        loop {
            let Some(&byte) = self.bytes.get(self.position) else {
                return Err(DecodeError::Truncated { position: start });
            };
            if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
                return Err(DecodeError::InvalidCharacter {
                    position: self.position,
                    byte,
                });
            }
            if shift / 5 >= MAX_CHUNKS {
                return Err(DecodeError::Overflow { position: start });
            }

            let value = i64::from(byte - CHAR_OFFSET);
            result |= (value & CHUNK_MASK) << shift;
            shift += 5;
            self.position += 1;

            if value & CONTINUATION == 0 {
                break;
            }
        }

        let delta = if result & 1 != 0 {
            !(result >> 1)
        } else {
            result >> 1
        };
        Ok(Some(delta))
    }

    fn next_point(&mut self) -> Result<Option<Coordinate>, DecodeError> {
        let Some(dlat) = self.next_value()? else {
            return Ok(None);
        };
        let position = self.position;
        let dlng = self
            .next_value()?
            .ok_or(DecodeError::MissingLongitude { position })?;

        self.lat += dlat;
        self.lng += dlng;

        let latitude = self.lat as f64 / PRECISION;
        let longitude = self.lng as f64 / PRECISION;
        Coordinate::new(latitude, longitude)
            .map(Some)
            .map_err(|_| DecodeError::OutOfRange {
                latitude,
                longitude,
            })
    }
}

impl Iterator for PolylineDecoder<'_> {
    type Item = Result<Coordinate, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_point() {
            Ok(point) => point.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode a polyline into coordinates.
///
/// An empty string decodes to an empty sequence. Malformed input fails
/// rather than returning a truncated path.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    PolylineDecoder::new(encoded).collect()
}

/// Encode coordinates as a polyline, rounding to 5 decimal places.
pub fn encode(points: &[Coordinate]) -> String {
    let mut out = String::with_capacity(points.len() * 8);
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in points {
        let lat = (point.latitude * PRECISION).round() as i64;
        let lng = (point.longitude * PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut out);
        encode_value(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION {
        let chunk = (CONTINUATION | (value & CHUNK_MASK)) as u8 + CHAR_OFFSET;
        out.push(char::from(chunk));
        value >>= 5;
    }
    out.push(char::from(value as u8 + CHAR_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn empty_string_is_empty_path() {
        assert_eq!(decode("").unwrap(), vec![]);
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decode_reference_polyline() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(
            points,
            vec![
                coord(38.5, -120.2),
                coord(40.7, -120.95),
                coord(43.252, -126.453)
            ]
        );
    }

    #[test]
    fn encode_single_point() {
        // Zero deltas encode as '?' (0 + 63).
        assert_eq!(encode(&[coord(0.0, 0.0)]), "??");
        assert_eq!(decode("??").unwrap(), vec![coord(0.0, 0.0)]);
    }

    #[test]
    fn encode_rounds_to_five_decimals() {
        let encoded = encode(&[coord(37.123456, 127.000004)]);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, vec![coord(37.12346, 127.0)]);
    }

    #[test]
    fn invalid_character_is_rejected() {
        // ' ' (0x20) is below the offset.
        let err = decode("_p~i F").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidCharacter {
                position: 4,
                byte: b' '
            }
        );

        // Bytes above '~' are also out of range.
        assert!(matches!(
            decode("\u{7f}?"),
            Err(DecodeError::InvalidCharacter { position: 0, .. })
        ));
        assert!(matches!(
            decode("é?"),
            Err(DecodeError::InvalidCharacter { position: 0, .. })
        ));
    }

    #[test]
    fn truncated_value_is_rejected() {
        // '_' has the continuation bit set and nothing follows it.
        assert_eq!(
            decode("??_").unwrap_err(),
            DecodeError::Truncated { position: 2 }
        );
    }

    #[test]
    fn odd_number_of_values_is_rejected() {
        // Three complete values: one point plus a dangling latitude.
        assert_eq!(
            decode("????").unwrap(),
            vec![coord(0.0, 0.0), coord(0.0, 0.0)]
        );
        assert_eq!(
            decode("???").unwrap_err(),
            DecodeError::MissingLongitude { position: 3 }
        );
    }

    #[test]
    fn overlong_value_is_rejected() {
        // Eight continuation chunks.
        assert!(matches!(
            decode("~~~~~~~~?"),
            Err(DecodeError::Overflow { position: 0 })
        ));
    }

    #[test]
    fn out_of_range_point_is_rejected() {
        // Latitude of 100 degrees encoded directly.
        let mut encoded = String::new();
        encode_value(10_000_000, &mut encoded);
        encode_value(0, &mut encoded);
        assert!(matches!(
            decode(&encoded),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn lazy_decoder_stops_after_error() {
        let mut decoder = PolylineDecoder::new("?????");
        assert!(matches!(decoder.next(), Some(Ok(_))));
        assert!(matches!(decoder.next(), Some(Ok(_))));
        assert!(matches!(
            decoder.next(),
            Some(Err(DecodeError::MissingLongitude { .. }))
        ));
        assert!(decoder.next().is_none());
    }

    #[test]
    fn decoder_is_restartable() {
        let encoded = "_p~iF~ps|U_ulLnnqC";
        let first: Vec<_> = PolylineDecoder::new(encoded).collect();
        let second: Vec<_> = PolylineDecoder::new(encoded).collect();
        assert_eq!(first, second);
    }
}
