//! Page Module
//!
//! Reference page store collaborator: a single in-memory page.
//!
//! ## Responsibilities
//! - Ordered mapping from byte offset to unit, one slot per written chunk
//! - Drive decomposition/zero fill on writes, composition on reads
//! - Reject ranges outside its window and reads of never-written bytes
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in RwLock, as in a memtable:
//! - Ordered offsets make range scans a single `range()` walk
//! - Many concurrent readers, writes serialized by the lock
//!
//! ## Slot Layout
//! ```text
//!   offset:  0x00      0x02      0x04            0x08
//!            ├─────────┼─────────┼───────────────┤
//!   slots:   │ A len 2 │ A len 2 │ B len 4       │
//!            └─────────┴─────────┴───────────────┘
//!   (chunk_size 2 for A, 4 for B; A's two slots alias one unit)
//! ```

mod slots;

pub use slots::SlotPage;

/// One page slot: a unit and the number of bytes it backs from this offset
#[derive(Debug, Clone)]
pub(crate) struct Slot<U> {
    pub(crate) unit: U,
    pub(crate) len: u64,
}
