//! Bits Module
//!
//! Arbitrary-width binary values.
//!
//! ## Responsibilities
//! - Hold values of any bit width (not just multiples of 8)
//! - Slice out bit ranges (`extract`) and join them back (`concat`)
//! - Byte-reverse under an arbitrary architecture byte width
//!
//! ## Layout
//! Bits live in a `bitvec::BitVec<u64, Lsb0>`: index 0 is the least
//! significant bit and the vector length is the value width. Equality and
//! hashing compare width and contents.

mod vector;

pub use vector::BitVector;
