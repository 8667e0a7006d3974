//! # pagecoop
//!
//! Cooperation between a page-based memory store and the values it holds:
//! - Composition of page-store scans into one readable value
//! - Decomposition of written values into shared storage units
//! - Zero fill for bytes that must read back as concrete zero
//! - Arbitrary byte widths and both byte orders
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Page Store (external / SlotPage)             │
//! │        offset → unit slots, range scans, write chunking      │
//! └───────────────┬─────────────────────────────┬───────────────┘
//!                 │ write                       │ read
//!                 ▼                             ▼
//!   ┌──────────────────────────┐   ┌──────────────────────────┐
//!   │  decompose / zero_fill   │   │         compose          │
//!   │  (one unit per write)    │   │ (coalesce, slice, concat)│
//!   └────────────┬─────────────┘   └────────────┬─────────────┘
//!                │                              │
//!                ▼                              ▼
//!         ┌─────────────┐               ┌─────────────┐
//!         │ StorageUnit │──────────────▶│  BitVector  │
//!         │  (shared)   │               │   (value)   │
//!         └─────────────┘               └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod endness;

pub mod bits;
pub mod unit;
pub mod cooperation;
pub mod page;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CoopError, Result};
pub use config::Config;
pub use endness::Endness;
pub use bits::BitVector;
pub use unit::{LoadResult, Provenance, StorageUnit, UnitHandle, UnitId, WriteSpec};
pub use cooperation::{Cooperation, Decompose, ObjectCooperation, UnitDecomposer};
pub use page::SlotPage;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pagecoop
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
