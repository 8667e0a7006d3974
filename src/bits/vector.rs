//! BitVector implementation
//!
//! Thin value type over a `BitVec` with extract/concat/reverse.

use std::fmt;

use bitvec::prelude::*;

use crate::error::{CoopError, Result};

/// Backing store: bit `i` of the value is index `i`
type Bits = BitVec<u64, Lsb0>;

/// A fixed-width binary value
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    bits: Bits,
}

impl BitVector {
    /// All-zero value of the given width
    pub fn zero(width: usize) -> Self {
        Self {
            bits: Bits::repeat(false, width),
        }
    }

    /// Value from an integer, truncated to `width` bits
    pub fn from_u128(value: u128, width: usize) -> Self {
        let limbs = [value as u64, (value >> 64) as u64];
        let source = limbs.view_bits::<Lsb0>();
        let used = width.min(source.len());

        let mut bits = Bits::repeat(false, width);
        bits[..used].copy_from_bitslice(&source[..used]);
        Self { bits }
    }

    /// Value from big-endian octets; width is `8 * bytes.len()`
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let bits = bytes.view_bits::<Msb0>().iter().by_vals().rev().collect();
        Self { bits }
    }

    /// Width in bits
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// True if no bit is set
    pub fn is_zero(&self) -> bool {
        self.bits.not_any()
    }

    /// Integer value, if it fits in 128 bits
    pub fn to_u128(&self) -> Option<u128> {
        let mut out = 0u128;
        for i in self.bits.iter_ones() {
            if i >= 128 {
                return None;
            }
            out |= 1 << i;
        }
        Some(out)
    }

    /// Big-endian octets, if the width is a whole number of octets
    pub fn to_be_bytes(&self) -> Option<Vec<u8>> {
        if self.width() % 8 != 0 {
            return None;
        }
        let octets: BitVec<u8, Msb0> = self.bits.iter().by_vals().rev().collect();
        Some(octets.into_vec())
    }

    /// Bits `hi..=lo` (inclusive on both ends, `hi >= lo`)
    pub fn extract(&self, hi: usize, lo: usize) -> Result<Self> {
        if lo > hi || hi >= self.width() {
            return Err(CoopError::MalformedInput(format!(
                "Cannot extract bits [{}:{}] from a {}-bit value",
                hi,
                lo,
                self.width()
            )));
        }

        Ok(Self {
            bits: Bits::from_bitslice(&self.bits[lo..=hi]),
        })
    }

    /// Join values; the first part ends up most significant
    pub fn concat(parts: &[BitVector]) -> Self {
        let width = parts.iter().map(BitVector::width).sum();
        let mut bits = Bits::with_capacity(width);
        for part in parts.iter().rev() {
            bits.extend_from_bitslice(&part.bits);
        }
        Self { bits }
    }

    /// Reverse the order of `byte_width`-bit bytes
    pub fn reverse_bytes(&self, byte_width: u32) -> Result<Self> {
        let byte_width = byte_width as usize;
        if byte_width == 0 || self.width() % byte_width != 0 {
            return Err(CoopError::MalformedInput(format!(
                "{}-bit value is not a whole number of {}-bit bytes",
                self.width(),
                byte_width
            )));
        }

        let mut bits = Bits::with_capacity(self.width());
        for byte in self.bits.chunks(byte_width).rev() {
            bits.extend_from_bitslice(byte);
        }
        Ok(Self { bits })
    }
}

impl fmt::LowerHex for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Nibbles from least significant; the top one may be short
        let nibbles: Vec<u8> = self
            .bits
            .chunks(4)
            .map(|nibble| nibble.iter_ones().fold(0u8, |acc, i| acc | 1 << i))
            .collect();

        let digits: String = nibbles
            .iter()
            .rev()
            .skip_while(|n| **n == 0)
            .map(|n| char::from_digit(*n as u32, 16).unwrap_or('0'))
            .collect();

        let digits = if digits.is_empty() { "0" } else { &digits };
        f.pad_integral(true, "0x", digits)
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector<{}>({:#x})", self.width(), self)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self)
    }
}
