//! Decomposition and zero fill
//!
//! A write becomes exactly one storage unit, built up front. Every chunk
//! the page store asks for gets that same handle; slicing is left to
//! composition.

use std::sync::Arc;

use crate::bits::BitVector;
use crate::endness::Endness;
use crate::error::{CoopError, Result};
use crate::unit::{StorageUnit, UnitHandle, WriteSpec};

use super::Decompose;

/// Step sequence for one write
///
/// Holds only the unit built for the write; can be dropped at any step.
#[derive(Debug, Clone)]
pub struct UnitDecomposer {
    unit: UnitHandle,
}

impl UnitDecomposer {
    /// The unit every chunk resolves to
    pub fn unit(&self) -> &UnitHandle {
        &self.unit
    }
}

impl Decompose for UnitDecomposer {
    type Unit = UnitHandle;

    fn next_chunk(&mut self, len: usize) -> UnitHandle {
        tracing::trace!("Chunk of {} bytes -> unit {}", len, self.unit.id());
        Arc::clone(&self.unit)
    }
}

/// Start realizing a write as storage units
///
/// Fails if the value is not exactly `size * byte_width` bits.
pub fn decompose(spec: WriteSpec, byte_width: u32) -> Result<UnitDecomposer> {
    if spec.size == 0 {
        return Err(CoopError::MalformedInput(
            "Cannot decompose a zero-byte write".to_string(),
        ));
    }

    let expected = bit_width(spec.size, byte_width)?;
    if spec.value.width() != expected {
        return Err(CoopError::MalformedInput(format!(
            "Value is {} bits but {} bytes of {} bits need {}",
            spec.value.width(),
            spec.size,
            byte_width,
            expected
        )));
    }

    let unit = StorageUnit::new(
        spec.addr,
        spec.value,
        spec.endness,
        byte_width,
        spec.provenance,
    )?;

    tracing::debug!(
        "Unit {} created for {} bytes at {:#x} ({})",
        unit.id(),
        spec.size,
        spec.addr,
        spec.endness
    );

    Ok(UnitDecomposer {
        unit: Arc::new(unit),
    })
}

/// Start realizing `size` bytes of zero as storage units
pub fn zero_fill(addr: u64, size: usize, byte_width: u32) -> Result<UnitDecomposer> {
    let value = BitVector::zero(bit_width(size, byte_width)?);
    decompose(WriteSpec::new(addr, value, size, Endness::CANONICAL), byte_width)
}

/// Bits in `size` bytes, or an error if that overflows
pub fn bit_width(size: usize, byte_width: u32) -> Result<usize> {
    size.checked_mul(byte_width as usize).ok_or_else(|| {
        CoopError::MalformedInput(format!(
            "{} bytes of {} bits overflow the value width",
            size, byte_width
        ))
    })
}
