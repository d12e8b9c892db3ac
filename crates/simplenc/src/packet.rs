//! Coded packet type.

use serde::{Deserialize, Serialize};

use crate::bits::BitVec;

/// A payload together with the combination of symbols it carries.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodedPacket {
    /// One bit per symbol: which symbols are XORed into `payload`.
    pub coefficients: BitVec,
    /// The combined payload.
    pub payload: BitVec,
}

impl CodedPacket {
    #[must_use]
    pub const fn new(coefficients: BitVec, payload: BitVec) -> Self {
        Self {
            coefficients,
            payload,
        }
    }

    /// Uncoded packet carrying symbol `index` of `num_symbols`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_symbols`.
    #[must_use]
    pub fn systematic(num_symbols: usize, index: usize, payload: BitVec) -> Self {
        Self::new(BitVec::unit(num_symbols, index), payload)
    }

    /// Number of symbols combined.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.count_ones()
    }

    /// `Some(i)` if this packet carries symbol `i` uncoded.
    #[must_use]
    pub fn systematic_index(&self) -> Option<usize> {
        self.coefficients.unit_index()
    }
}
