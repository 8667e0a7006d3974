//! Scan results and write requests

use crate::bits::BitVector;
use crate::endness::Endness;

use super::{Provenance, UnitHandle};

/// Page-store scan over an address range: ordered (address, unit) pairs
///
/// Addresses strictly increase. Consecutive entries may share a unit when
/// one write spans several slots.
#[derive(Debug, Clone)]
pub struct LoadResult<U = UnitHandle> {
    entries: Vec<(u64, U)>,
}

impl<U> LoadResult<U> {
    /// Create an empty scan
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create an empty scan with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append the unit backing `addr` onward
    pub fn push(&mut self, addr: u64, unit: U) {
        self.entries.push((addr, unit));
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the scan has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Address of the first entry
    pub fn first_addr(&self) -> Option<u64> {
        self.entries.first().map(|(addr, _)| *addr)
    }

    /// Entries in address order
    pub fn entries(&self) -> &[(u64, U)] {
        &self.entries
    }

    /// Iterate over (address, unit) pairs
    pub fn iter(&self) -> std::slice::Iter<'_, (u64, U)> {
        self.entries.iter()
    }
}

impl<U> Default for LoadResult<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> From<Vec<(u64, U)>> for LoadResult<U> {
    fn from(entries: Vec<(u64, U)>) -> Self {
        Self { entries }
    }
}

impl<U> FromIterator<(u64, U)> for LoadResult<U> {
    fn from_iter<I: IntoIterator<Item = (u64, U)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, U> IntoIterator for &'a LoadResult<U> {
    type Item = &'a (u64, U);
    type IntoIter = std::slice::Iter<'a, (u64, U)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A value to be realized as storage units
#[derive(Debug, Clone)]
pub struct WriteSpec<V = BitVector> {
    /// Address of the first byte written
    pub addr: u64,
    /// Value written; must be `size * byte_width` bits
    pub value: V,
    /// Size in bytes
    pub size: usize,
    pub endness: Endness,
    /// Optional tag attached to the resulting unit
    pub provenance: Option<Provenance>,
}

impl<V> WriteSpec<V> {
    /// Untagged write of `size` bytes at `addr`
    pub fn new(addr: u64, value: V, size: usize, endness: Endness) -> Self {
        Self {
            addr,
            value,
            size,
            endness,
            provenance: None,
        }
    }

    /// Tag the write with where it came from
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}
