//! Google polyline codec with configurable precision
//!
//! Classic delta + zig-zag + 5-bit chunked varint encoding, scaled by
//! `10^precision`. Pure algorithm, no I/O. Deltas are accumulated as exact
//! scaled integers across the whole decode and divided back into degrees only
//! at emission time, so long polylines do not drift.

use crate::{Coordinates, ParseError, Result};

const MIN_ALLOWED_PRECISION: u32 = 5;
const MAX_ALLOWED_PRECISION: u32 = 7;
const BITS_PER_CHUNK: u32 = 5;
const VALUE_MASK: i64 = (1 << BITS_PER_CHUNK) - 1; // 31
const CONTINUATION_FLAG: i64 = 1 << BITS_PER_CHUNK; // 32
const OFFSET: u32 = 63; // '?'

const MIN_LATITUDE: i64 = -90;
const MAX_LATITUDE: i64 = 90;
const MIN_LONGITUDE: i64 = -180;
const MAX_LONGITUDE: i64 = 180;

/// Decode an encoded polyline into coordinates.
///
/// # Errors
/// - [`ParseError::InvalidPrecision`] when `precision` is outside [5, 7]
/// - [`ParseError::InvalidCharacter`] when the string contains a byte outside
///   the legal chunk alphabet
/// - [`ParseError::TruncatedPolyline`] when a chunk sequence runs past the end
/// - [`ParseError::LatitudeNotInRange`] / [`ParseError::LongitudeNotInRange`]
///   when an accumulated value leaves the valid scaled range; the whole decode
///   is aborted, no partial result is returned
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinates>> {
    check_precision(precision)?;
    check_alphabet(encoded)?;

    let divisor = 10i64.pow(precision);
    let bytes = encoded.as_bytes();
    let mut polyline = Vec::new();
    let mut index = 0;
    let mut latitude: i64 = 0;
    let mut longitude: i64 = 0;

    while index < bytes.len() {
        let (d_latitude, next) = decode_value(bytes, index)?;
        index = next;
        let (d_longitude, next) = decode_value(bytes, index)?;
        index = next;

        latitude += d_latitude;
        if latitude < MIN_LATITUDE * divisor || latitude > MAX_LATITUDE * divisor {
            return Err(ParseError::LatitudeNotInRange(latitude));
        }

        longitude += d_longitude;
        if longitude < MIN_LONGITUDE * divisor || longitude > MAX_LONGITUDE * divisor {
            return Err(ParseError::LongitudeNotInRange(longitude));
        }

        polyline.push(Coordinates::new(
            latitude as f64 / divisor as f64,
            longitude as f64 / divisor as f64,
        )?);
    }

    Ok(polyline)
}

/// Encode coordinates into a polyline string. Mathematical inverse of [`decode`]
/// up to the chosen precision's resolution.
pub fn encode(polyline: &[Coordinates], precision: u32) -> Result<String> {
    check_precision(precision)?;

    let multiplier = 10i64.pow(precision) as f64;
    let mut last_latitude: i64 = 0;
    let mut last_longitude: i64 = 0;
    let mut result = String::new();

    for point in polyline {
        let latitude = (point.latitude() * multiplier).round() as i64;
        let longitude = (point.longitude() * multiplier).round() as i64;

        encode_value(latitude - last_latitude, &mut result);
        encode_value(longitude - last_longitude, &mut result);

        last_latitude = latitude;
        last_longitude = longitude;
    }

    Ok(result)
}

/// Decode one zig-zag varint starting at `index`, returning the value and the
/// index of the next chunk sequence.
fn decode_value(bytes: &[u8], index: usize) -> Result<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift = 0;
    let mut current = index;

    loop {
        let Some(&byte) = bytes.get(current) else {
            return Err(ParseError::TruncatedPolyline);
        };
        current += 1;

        // A value never spans more chunks than fit in an i64; a longer run of
        // continuation chunks is malformed, not just large.
        if shift >= i64::BITS {
            return Err(ParseError::TruncatedPolyline);
        }
        let chunk = byte as i64 - OFFSET as i64;
        result |= (chunk & VALUE_MASK) << shift;
        shift += BITS_PER_CHUNK;

        if chunk < CONTINUATION_FLAG {
            break;
        }
    }

    let decoded = if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((decoded, current))
}

fn encode_value(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 };

    while v >= CONTINUATION_FLAG {
        out.push(((CONTINUATION_FLAG | (v & VALUE_MASK)) as u32 + OFFSET) as u8 as char);
        v >>= BITS_PER_CHUNK;
    }
    out.push((v as u32 + OFFSET) as u8 as char);
}

fn check_precision(precision: u32) -> Result<()> {
    if !(MIN_ALLOWED_PRECISION..=MAX_ALLOWED_PRECISION).contains(&precision) {
        return Err(ParseError::InvalidPrecision(precision));
    }
    Ok(())
}

fn check_alphabet(encoded: &str) -> Result<()> {
    let max_code = OFFSET + (VALUE_MASK | CONTINUATION_FLAG) as u32;
    for character in encoded.chars() {
        let code = character as u32;
        if code < OFFSET || code > max_code {
            return Err(ParseError::InvalidCharacter { character, code });
        }
    }
    Ok(())
}
