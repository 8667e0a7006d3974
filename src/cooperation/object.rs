//! Storage-unit cooperation
//!
//! Page slots hold shared `StorageUnit` handles; reads slice them.

use std::sync::Arc;

use crate::bits::BitVector;
use crate::config::Config;
use crate::endness::Endness;
use crate::error::Result;
use crate::unit::{LoadResult, UnitHandle, WriteSpec};

use super::{compose, decompose, zero_fill, Cooperation, UnitDecomposer};

/// Cooperation over `StorageUnit` handles and `BitVector` values
#[derive(Debug, Clone, Copy)]
pub struct ObjectCooperation {
    byte_width: u32,
}

impl ObjectCooperation {
    /// Build from a validated config
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            byte_width: config.byte_width,
        })
    }

    pub fn byte_width(&self) -> u32 {
        self.byte_width
    }
}

impl Default for ObjectCooperation {
    fn default() -> Self {
        Self {
            byte_width: Config::default().byte_width,
        }
    }
}

impl Cooperation for ObjectCooperation {
    type Unit = UnitHandle;
    type Value = BitVector;
    type Decomposer = UnitDecomposer;

    fn compose(
        &self,
        requests: &[LoadResult<UnitHandle>],
        size: usize,
        endness: Endness,
    ) -> Result<BitVector> {
        compose(requests, size, endness, self.byte_width)
    }

    fn decompose(&self, spec: WriteSpec<BitVector>) -> Result<UnitDecomposer> {
        decompose(spec, self.byte_width)
    }

    fn zero_fill(&self, addr: u64, size: usize) -> Result<UnitDecomposer> {
        zero_fill(addr, size, self.byte_width)
    }

    fn same_unit(a: &UnitHandle, b: &UnitHandle) -> bool {
        // Identity, never value
        Arc::ptr_eq(a, b) || a.id() == b.id()
    }
}
