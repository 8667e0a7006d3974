//! StorageUnit implementation
//!
//! A stored value plus its origin address and byte order.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::bits::BitVector;
use crate::endness::Endness;
use crate::error::{CoopError, Result};

/// Source of unit identities (process-wide, lock-free)
static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

/// Shared reference to a storage unit, held by every slot it covers
pub type UnitHandle = Arc<StorageUnit>;

/// Creation sequence number of a storage unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(u64);

impl UnitId {
    fn next() -> Self {
        UnitId(NEXT_UNIT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw sequence number
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a write came from. Carried along, never compared by composition.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Provenance(Arc<str>);

impl Provenance {
    /// Tag from any string
    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Provenance(tag.into())
    }

    /// Tag text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provenance({:?})", &*self.0)
    }
}

/// One logical write covering a contiguous byte run
pub struct StorageUnit {
    /// Identity; stable for the lifetime of the unit
    id: UnitId,
    /// Address of the first byte
    base: u64,
    /// Full written value, `length * byte_width` bits
    value: BitVector,
    /// Byte order the value was written with
    endness: Endness,
    /// Bits per byte at creation
    byte_width: u32,
    provenance: Option<Provenance>,
}

impl StorageUnit {
    /// Create a unit with a fresh identity
    ///
    /// The value must be a non-empty whole number of `byte_width`-bit bytes.
    pub fn new(
        base: u64,
        value: BitVector,
        endness: Endness,
        byte_width: u32,
        provenance: Option<Provenance>,
    ) -> Result<Self> {
        if byte_width == 0 {
            return Err(CoopError::MalformedInput(
                "byte_width must be non-zero".to_string(),
            ));
        }
        let width = value.width();
        if width == 0 || width % byte_width as usize != 0 {
            return Err(CoopError::MalformedInput(format!(
                "{}-bit value is not a whole, non-empty run of {}-bit bytes",
                width, byte_width
            )));
        }
        let length = (width / byte_width as usize) as u64;
        if base.checked_add(length).is_none() {
            return Err(CoopError::MalformedInput(format!(
                "{} bytes at {:#x} overflow the address space",
                length, base
            )));
        }

        Ok(Self {
            id: UnitId::next(),
            base,
            value,
            endness,
            byte_width,
            provenance,
        })
    }

    /// Get unit identity
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Get first covered address
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Get the written value
    pub fn value(&self) -> &BitVector {
        &self.value
    }

    /// Get byte order of the write
    pub fn endness(&self) -> Endness {
        self.endness
    }

    /// Get bits per byte
    pub fn byte_width(&self) -> u32 {
        self.byte_width
    }

    /// Get provenance tag, if any
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// Number of bytes covered
    pub fn length(&self) -> u64 {
        (self.value.width() / self.byte_width as usize) as u64
    }

    /// One past the last covered address
    pub fn end(&self) -> u64 {
        self.base + self.length()
    }

    /// True if `[addr, addr + len)` lies inside this unit
    pub fn covers(&self, addr: u64, len: u64) -> bool {
        len > 0 && addr >= self.base && addr.saturating_add(len) <= self.end()
    }

    /// The `len` bytes starting at `addr`, read back in `endness` order
    ///
    /// The backing value is sliced according to the order it was written
    /// with; the slice is byte-reversed only if `endness` differs.
    pub fn bytes_at(&self, addr: u64, len: u64, endness: Endness) -> Result<BitVector> {
        if !self.covers(addr, len) {
            return Err(CoopError::MalformedInput(format!(
                "[{:#x}, {:#x}) is outside unit {} [{:#x}, {:#x})",
                addr,
                addr.saturating_add(len),
                self.id,
                self.base,
                self.end()
            )));
        }

        let rev = endness != self.endness;

        // Whole unit: no slicing needed
        if addr == self.base && len == self.length() {
            return if rev {
                self.value.reverse_bytes(self.byte_width)
            } else {
                Ok(self.value.clone())
            };
        }

        let bw = self.byte_width as usize;
        let offset = (addr - self.base) as usize;
        let len = len as usize;
        let total = self.length() as usize;

        // Byte `offset` is the most significant byte for BE, least for LE
        let (hi, lo) = match self.endness {
            Endness::Big => ((total - offset) * bw - 1, (total - offset - len) * bw),
            Endness::Little => ((offset + len) * bw - 1, offset * bw),
        };
        let slice = self.value.extract(hi, lo)?;

        if rev {
            slice.reverse_bytes(self.byte_width)
        } else {
            Ok(slice)
        }
    }
}

impl fmt::Debug for StorageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageUnit")
            .field("id", &self.id)
            .field("base", &format_args!("{:#x}", self.base))
            .field("value", &self.value)
            .field("endness", &self.endness)
            .field("byte_width", &self.byte_width)
            .field("provenance", &self.provenance)
            .finish()
    }
}
