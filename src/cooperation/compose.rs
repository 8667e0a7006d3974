//! Composition
//!
//! Rebuilds one value from the (address, unit) pairs of a range scan.

use crate::bits::BitVector;
use crate::endness::Endness;
use crate::error::{CoopError, Result};
use crate::unit::{LoadResult, UnitHandle};

/// Fuse scans covering `size` contiguous bytes into one value
///
/// Steps:
/// 1. Flatten all scans in order
/// 2. Collapse runs of the same unit (by identity) into one segment
/// 3. Size each segment by the gap to the next one (or the range end)
/// 4. Slice each segment out of its unit, in the unit's own byte order
/// 5. Concatenate, lowest address first; reversed for little-endian
pub fn compose(
    requests: &[LoadResult],
    size: usize,
    endness: Endness,
    byte_width: u32,
) -> Result<BitVector> {
    if size == 0 {
        return Err(CoopError::MalformedInput(
            "Cannot compose a zero-byte range".to_string(),
        ));
    }

    let segments = coalesce(requests);
    let start = match segments.first() {
        Some((addr, _)) => *addr,
        None => {
            return Err(CoopError::MalformedInput(
                "Cannot compose from an empty scan".to_string(),
            ))
        }
    };
    let end = start.checked_add(size as u64).ok_or_else(|| {
        CoopError::MalformedInput(format!(
            "{} bytes at {:#x} overflow the address space",
            size, start
        ))
    })?;

    let mut slices = Vec::with_capacity(segments.len());

    for (i, (addr, unit)) in segments.iter().enumerate() {
        let next = segments.get(i + 1).map(|(a, _)| *a).unwrap_or(end);

        if next <= *addr {
            tracing::error!(
                "Scan out of order: segment at {:#x} followed by {:#x} (unit {})",
                addr,
                next,
                unit.id()
            );
            return Err(CoopError::InternalInvariant(format!(
                "Segment at {:#x} has non-positive length (next segment at {:#x})",
                addr, next
            )));
        }

        if unit.byte_width() != byte_width {
            return Err(CoopError::MalformedInput(format!(
                "Unit {} was written with {}-bit bytes, compose asked for {}",
                unit.id(),
                unit.byte_width(),
                byte_width
            )));
        }

        let len = next - addr;
        if !unit.covers(*addr, len) {
            tracing::error!(
                "Scan maps [{:#x}, {:#x}) to unit {} which covers [{:#x}, {:#x})",
                addr,
                next,
                unit.id(),
                unit.base(),
                unit.end()
            );
            return Err(CoopError::InternalInvariant(format!(
                "Segment [{:#x}, {:#x}) lies outside unit {}",
                addr,
                next,
                unit.id()
            )));
        }

        tracing::trace!("Slicing {} bytes at {:#x} from unit {}", len, addr, unit.id());
        slices.push(unit.bytes_at(*addr, len, endness)?);
    }

    tracing::debug!(
        "Composed {} bytes at {:#x} from {} segment(s), {}",
        size,
        start,
        slices.len(),
        endness
    );

    // A single segment is already the answer
    if slices.len() == 1 {
        if let Some(only) = slices.pop() {
            return Ok(only);
        }
    }

    if endness.is_little() {
        slices.reverse();
    }

    Ok(BitVector::concat(&slices))
}

/// Flatten scans, keeping only the first entry of each run of one unit
fn coalesce(requests: &[LoadResult]) -> Vec<(u64, &UnitHandle)> {
    let mut segments: Vec<(u64, &UnitHandle)> = Vec::new();

    for (addr, unit) in requests.iter().flat_map(|r| r.iter()) {
        match segments.last() {
            Some((_, last)) if last.id() == unit.id() => {}
            _ => segments.push((*addr, unit)),
        }
    }

    segments
}
