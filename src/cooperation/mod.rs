//! Cooperation Module
//!
//! The protocol between a page store and a storage-unit representation.
//!
//! ## Responsibilities
//! - Composition: fuse page-store scans into one value
//! - Decomposition: turn one written value into units, one chunk at a time
//! - Zero fill: the same, for a defined all-zero value
//!
//! ## Control Flow
//! ```text
//!              write                              read
//!                │                                  │
//!                ▼                                  ▼
//!   ┌─────────────────────────┐       ┌─────────────────────────┐
//!   │ decompose / zero_fill   │       │ page store range scan   │
//!   └───────────┬─────────────┘       └───────────┬─────────────┘
//!               │ next_chunk(n) → unit            │ [LoadResult]
//!               ▼                                 ▼
//!   ┌─────────────────────────┐       ┌─────────────────────────┐
//!   │ page store slots        │──────▶│ compose → value         │
//!   └─────────────────────────┘       └─────────────────────────┘
//! ```
//!
//! The core never calls into the page store.

mod compose;
mod decompose;
mod object;

pub use compose::compose;
pub use decompose::{bit_width, decompose, zero_fill, UnitDecomposer};
pub use object::ObjectCooperation;

use crate::endness::Endness;
use crate::error::Result;
use crate::unit::{LoadResult, WriteSpec};

/// One step of a decomposition: hand over a chunk length, get back the unit
/// to store for the next `len` bytes
///
/// The cumulative length requested must not exceed the write's size.
pub trait Decompose {
    type Unit;

    fn next_chunk(&mut self, len: usize) -> Self::Unit;
}

/// A storage-unit representation a page store can be built on
///
/// Implementations are independent of one another; the page store only
/// relies on this interface and the `LoadResult`/`WriteSpec` data model.
pub trait Cooperation {
    /// What a page slot holds
    type Unit: Clone;

    /// What reads return and writes accept
    type Value;

    type Decomposer: Decompose<Unit = Self::Unit>;

    /// Fuse scans covering `size` contiguous bytes into one value
    fn compose(
        &self,
        requests: &[LoadResult<Self::Unit>],
        size: usize,
        endness: Endness,
    ) -> Result<Self::Value>;

    /// Start realizing a write as storage units
    fn decompose(&self, spec: WriteSpec<Self::Value>) -> Result<Self::Decomposer>;

    /// Start realizing `size` bytes of zero as storage units
    fn zero_fill(&self, addr: u64, size: usize) -> Result<Self::Decomposer>;

    /// True if both slots alias the same logical write
    fn same_unit(a: &Self::Unit, b: &Self::Unit) -> bool;
}
