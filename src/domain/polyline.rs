//! Decoder for the directions service's delta-encoded polyline strings.
//!
//! Each coordinate pair is stored as two zig-zag-encoded deltas (latitude then
//! longitude) against a running absolute position, split into 5-bit groups
//! with bit 0x20 as a continuation flag and every byte biased by 63 into
//! printable ASCII. Values are scaled by 1e5, so the encoding is lossy to five
//! decimal digits.

use thiserror::Error;

use super::route::Point;

/// Scale factor between encoded integers and degrees.
const PRECISION: f64 = 1e5;

/// Decode failures. The decoder fails loudly rather than truncating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// Input ended while a 5-bit group still had its continuation flag set,
    /// or between the latitude and longitude halves of a pair.
    #[error("polyline ends mid-coordinate at byte {offset}")]
    UnexpectedEnd { offset: usize },

    /// A byte below the ASCII bias of 63 cannot be part of an encoded value.
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    /// A single value ran past the longest group a coordinate delta can need.
    #[error("unterminated value group starting near offset {offset}")]
    GroupTooLong { offset: usize },
}

/// Decodes an encoded path into `(latitude, longitude)` points, in input order.
///
/// Empty input decodes to an empty sequence.
pub fn decode(encoded: &str) -> Result<Vec<Point>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut offset = 0usize;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while offset < bytes.len() {
        lat += read_delta(bytes, &mut offset)?;
        lng += read_delta(bytes, &mut offset)?;
        points.push(Point::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(points)
}

/// Reads one zig-zag-encoded delta starting at `*offset`, advancing past it.
fn read_delta(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let start = *offset;
    let mut accumulated: u64 = 0;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::UnexpectedEnd { offset: *offset });
        };
        let adjusted = byte
            .checked_sub(63)
            .ok_or(PolylineError::InvalidByte { byte, offset: *offset })?;
        *offset += 1;

        // 12 groups of 5 bits is already far beyond any 1e5-scaled coordinate.
        if shift >= 60 {
            return Err(PolylineError::GroupTooLong { offset: start });
        }
        accumulated |= u64::from(adjusted & 0x1f) << shift;
        shift += 5;

        if adjusted & 0x20 == 0 {
            break;
        }
    }

    // Zig-zag: odd values are bitwise complements of the halved magnitude.
    let halved = (accumulated >> 1) as i64;
    if accumulated & 1 == 1 {
        Ok(-halved - 1)
    } else {
        Ok(halved)
    }
}
