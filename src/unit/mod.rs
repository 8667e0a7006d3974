//! Unit Module
//!
//! Storage units and the data exchanged with the page store.
//!
//! ## Responsibilities
//! - One `StorageUnit` per logical write (origin, value, byte order)
//! - Identity by creation sequence number, never by value
//! - Shared ownership: every slot aliasing a write holds the same handle
//! - Scan results (`LoadResult`) and write requests (`WriteSpec`)
//!
//! ## Aliasing
//! ```text
//!   page slots:   0x1000   0x1001   0x1002   0x1003
//!                   │        │        │        │
//!                   └────────┴───┬────┴────────┘
//!                                ▼
//!                  StorageUnit #7 { base: 0x1000, value: 0x12345678, BE }
//! ```

mod load;
mod object;

pub use load::{LoadResult, WriteSpec};
pub use object::{Provenance, StorageUnit, UnitHandle, UnitId};
