//! SlotPage implementation
//!
//! BTreeMap-based page with RwLock for concurrency.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::config::Config;
use crate::cooperation::{Cooperation, Decompose};
use crate::endness::Endness;
use crate::error::{CoopError, Result};
use crate::unit::{LoadResult, WriteSpec};

use super::Slot;

/// A single page of memory built on any `Cooperation`
///
/// ## Concurrency:
/// - `slots`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - All methods use `&self`
pub struct SlotPage<C: Cooperation> {
    /// Representation the page stores and reads through
    coop: C,

    /// Address of offset 0
    base: u64,

    /// Window size in bytes
    size: u64,

    /// Bytes per chunk requested from a decomposer
    chunk_size: usize,

    /// offset → slot, slots never overlap
    slots: RwLock<BTreeMap<u64, Slot<C::Unit>>>,
}

impl<C: Cooperation> SlotPage<C> {
    /// Create an empty page at `base` using `config.page_size` and
    /// `config.chunk_size`
    pub fn new(coop: C, base: u64, config: &Config) -> Result<Self> {
        config.validate()?;

        if base.checked_add(config.page_size).is_none() {
            return Err(CoopError::Config(format!(
                "Page of {:#x} bytes at {:#x} overflows the address space",
                config.page_size, base
            )));
        }

        Ok(Self {
            coop,
            base,
            size: config.page_size,
            chunk_size: config.chunk_size,
            slots: RwLock::new(BTreeMap::new()),
        })
    }

    /// Get first address of the page
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Get page size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get the cooperation in use
    pub fn cooperation(&self) -> &C {
        &self.coop
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write `value` (`size` bytes, `endness` order) at `addr`
    pub fn store(&self, addr: u64, value: C::Value, size: usize, endness: Endness) -> Result<()> {
        self.store_spec(WriteSpec::new(addr, value, size, endness))
    }

    /// Write a fully specified request (e.g. one carrying provenance)
    pub fn store_spec(&self, spec: WriteSpec<C::Value>) -> Result<()> {
        let start = self.offset_of(spec.addr, spec.size)?;
        let len = spec.size as u64;
        let decomposer = self.coop.decompose(spec)?;
        self.fill(start, len, decomposer);
        Ok(())
    }

    /// Materialize `size` bytes of concrete zero at `addr`
    pub fn store_zero(&self, addr: u64, size: usize) -> Result<()> {
        let start = self.offset_of(addr, size)?;
        let decomposer = self.coop.zero_fill(addr, size)?;
        self.fill(start, size as u64, decomposer);
        Ok(())
    }

    /// Replace `[start, start + len)` with chunks pulled from `decomposer`
    fn fill(&self, start: u64, len: u64, mut decomposer: C::Decomposer) {
        let end = start + len;
        let mut slots = self.slots.write();

        // Keep the tail of a slot running past the new write
        let straddling_end = slots
            .range(..end)
            .next_back()
            .filter(|&(&offset, slot)| offset + slot.len > end)
            .map(|(&offset, slot)| Slot {
                unit: slot.unit.clone(),
                len: offset + slot.len - end,
            });
        if let Some(tail) = straddling_end {
            slots.insert(end, tail);
        }

        // Cut short a slot running into the new write
        if let Some((&offset, slot)) = slots.range_mut(..start).next_back() {
            if offset + slot.len > start {
                slot.len = start - offset;
            }
        }

        let overwritten: Vec<u64> = slots.range(start..end).map(|(&offset, _)| offset).collect();
        for offset in overwritten {
            slots.remove(&offset);
        }

        let mut offset = start;
        while offset < end {
            let chunk = (self.chunk_size as u64).min(end - offset);
            let unit = decomposer.next_chunk(chunk as usize);
            slots.insert(offset, Slot { unit, len: chunk });
            offset += chunk;
        }

        tracing::trace!(
            "Filled [{:#x}, {:#x}), page now has {} slots",
            self.base + start,
            self.base + end,
            slots.len()
        );
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Scan the slots backing `[addr, addr + size)`
    ///
    /// The first entry is clamped to `addr`. Fails if any byte in the range
    /// has never been written.
    pub fn load(&self, addr: u64, size: usize) -> Result<LoadResult<C::Unit>> {
        let start = self.offset_of(addr, size)?;
        let end = start + size as u64;
        let slots = self.slots.read();

        // Begin at the slot covering `start`, if one does
        let from = match slots.range(..=start).next_back() {
            Some((&offset, slot)) if offset + slot.len > start => offset,
            _ => start,
        };

        let mut result = LoadResult::new();
        let mut cursor = start;

        for (&offset, slot) in slots.range(from..end) {
            if offset > cursor {
                break;
            }
            result.push(self.base + cursor, slot.unit.clone());
            cursor = offset + slot.len;
            if cursor >= end {
                break;
            }
        }

        if cursor < end {
            return Err(CoopError::MalformedInput(format!(
                "Byte {:#x} has never been written",
                self.base + cursor
            )));
        }

        Ok(result)
    }

    /// Read `size` bytes at `addr` in `endness` order
    pub fn read(&self, addr: u64, size: usize, endness: Endness) -> Result<C::Value> {
        let scan = self.load(addr, size)?;
        self.coop.compose(std::slice::from_ref(&scan), size, endness)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of occupied slots
    pub fn slot_count(&self) -> usize {
        self.slots.read().len()
    }

    /// Number of runs of adjacent slots aliasing one unit
    pub fn segment_count(&self) -> usize {
        let slots = self.slots.read();
        let mut count = 0;
        let mut prev: Option<(u64, &C::Unit)> = None;

        for (&offset, slot) in slots.iter() {
            let continues = matches!(prev, Some((prev_end, prev_unit))
                if prev_end == offset && C::same_unit(prev_unit, &slot.unit));
            if !continues {
                count += 1;
            }
            prev = Some((offset + slot.len, &slot.unit));
        }

        count
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Drop every slot (units go away once nothing else holds them)
    pub fn clear(&self) {
        self.slots.write().clear();
    }

    /// Page offset of `addr`, checking `[addr, addr + size)` fits the page
    fn offset_of(&self, addr: u64, size: usize) -> Result<u64> {
        if size == 0 {
            return Err(CoopError::MalformedInput(
                "Range must cover at least one byte".to_string(),
            ));
        }

        let inside = addr >= self.base
            && (addr - self.base)
                .checked_add(size as u64)
                .map_or(false, |end| end <= self.size);

        if !inside {
            return Err(CoopError::MalformedInput(format!(
                "[{:#x}, +{}) is outside page [{:#x}, {:#x})",
                addr,
                size,
                self.base,
                self.base + self.size
            )));
        }

        Ok(addr - self.base)
    }
}
