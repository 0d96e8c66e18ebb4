use crate::constants::{FINGERPRINT_LENGTH, FINGERPRINT_PRECISION, SEGMENT_WINDOW};
use crate::models::Coordinates;
use std::fmt::Write;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Split a path into overlapping windows and fingerprint each one.
///
/// Windows start every `SEGMENT_WINDOW` points and span one extra point, so
/// neighbours share a boundary coordinate. A trailing remainder that cannot
/// fill a window is dropped; paths of `SEGMENT_WINDOW` points or fewer yield
/// nothing.
pub fn segmentize(coordinates: &[Coordinates]) -> Vec<String> {
    if coordinates.len() < 2 || coordinates.len() <= SEGMENT_WINDOW {
        return Vec::new();
    }

    (0..coordinates.len() - SEGMENT_WINDOW)
        .step_by(SEGMENT_WINDOW)
        .map(|i| fingerprint(&coordinates[i..=i + SEGMENT_WINDOW]))
        .collect()
}

/// Fixed-length hex fingerprint of a coordinate window.
///
/// Coordinates are rounded to ~11 m first, so small jitter in upstream
/// geometry does not change the result. FNV-1a keeps the output stable
/// across builds, which matters because fingerprints are persisted.
pub fn fingerprint(window: &[Coordinates]) -> String {
    let scale = 10_f64.powi(FINGERPRINT_PRECISION as i32);

    let mut canonical = String::with_capacity(window.len() * 20);
    for (i, coord) in window.iter().enumerate() {
        if i > 0 {
            canonical.push(';');
        }
        let rounded = coord.round(FINGERPRINT_PRECISION);
        // Integers, so -0.0 and 0.0 print the same. Writing to a String cannot fail.
        let _ = write!(
            canonical,
            "{},{}",
            (rounded.lat * scale).round() as i64,
            (rounded.lng * scale).round() as i64
        );
    }

    let digest = fnv1a(canonical.as_bytes());
    let mut hex = format!("{:016x}", digest);
    hex.truncate(FINGERPRINT_LENGTH);
    hex
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
