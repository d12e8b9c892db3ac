//! Matrix operations over GF(2).
//!
//! Everything here is a pure function over [`BitMatrix`] values. The coder
//! keeps its state in reduced form by running [`reduce_step`] once per
//! ingested packet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::BitVec;
use crate::error::MatrixShapeError;

/// A dense row-major matrix over GF(2).
///
/// Every row is exactly `num_cols` bits wide; deserialization rejects
/// ragged input with [`MatrixShapeError`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBitMatrix")]
pub struct BitMatrix {
    num_cols: usize,
    rows: Vec<BitVec>,
}

/// Unchecked wire form of [`BitMatrix`].
#[derive(Deserialize)]
struct RawBitMatrix {
    num_cols: usize,
    rows: Vec<BitVec>,
}

impl TryFrom<RawBitMatrix> for BitMatrix {
    type Error = MatrixShapeError;

    fn try_from(raw: RawBitMatrix) -> Result<Self, Self::Error> {
        if let Some((row, bits)) = raw
            .rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != raw.num_cols)
        {
            return Err(MatrixShapeError {
                row,
                expected: raw.num_cols,
                got: bits.len(),
            });
        }
        Ok(Self {
            num_cols: raw.num_cols,
            rows: raw.rows,
        })
    }
}

impl BitMatrix {
    /// All-zero `num_rows × num_cols` matrix.
    #[must_use]
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_cols,
            rows: vec![BitVec::zeros(num_cols); num_rows],
        }
    }

    /// Matrix from `num_cols`-bit rows.
    ///
    /// # Panics
    ///
    /// Panics if any row is not `num_cols` bits long.
    #[must_use]
    pub fn from_rows(num_cols: usize, rows: Vec<BitVec>) -> Self {
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), num_cols, "row {i} has wrong width");
        }
        Self { num_cols, rows }
    }

    /// Matrix from integer rows, each entry reduced mod 2.
    ///
    /// # Panics
    ///
    /// Panics if the rows are ragged.
    #[must_use]
    pub fn from_bits(rows: &[&[u8]]) -> Self {
        let num_cols = rows.first().map_or(0, |r| r.len());
        let rows = rows.iter().map(|r| BitVec::from_bits(r)).collect();
        Self::from_rows(num_cols, rows)
    }

    /// Entries as `0`/`1` integers.
    #[must_use]
    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.rows.iter().map(BitVec::to_bits).collect()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[must_use]
    pub fn rows(&self) -> &[BitVec] {
        &self.rows
    }

    /// Row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_rows`.
    #[must_use]
    pub fn row(&self, index: usize) -> &BitVec {
        &self.rows[index]
    }

    /// Replace row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_rows` or the row width differs.
    pub fn set_row(&mut self, index: usize, row: BitVec) {
        assert_eq!(row.len(), self.num_cols, "row has wrong width");
        self.rows[index] = row;
    }

    /// Number of rows with at least one set bit.
    #[must_use]
    pub fn nonzero_rows(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_zero()).count()
    }

    /// `[self | other]`.
    ///
    /// # Panics
    ///
    /// Panics if the row counts differ.
    #[must_use]
    pub fn hstack(&self, other: &Self) -> Self {
        assert_eq!(self.num_rows(), other.num_rows(), "hstack row count mismatch");
        let rows = self
            .rows
            .iter()
            .zip(&other.rows)
            .map(|(a, b)| a.concat(b))
            .collect();
        Self {
            num_cols: self.num_cols + other.num_cols,
            rows,
        }
    }

    /// Split into columns `[0, at)` and `[at, num_cols)`.
    ///
    /// # Panics
    ///
    /// Panics if `at > num_cols`.
    #[must_use]
    pub fn split_columns(&self, at: usize) -> (Self, Self) {
        assert!(at <= self.num_cols, "split column {at} past width {}", self.num_cols);
        let left = self.rows.iter().map(|r| r.slice(0..at)).collect();
        let right = self.rows.iter().map(|r| r.slice(at..self.num_cols)).collect();
        (
            Self {
                num_cols: at,
                rows: left,
            },
            Self {
                num_cols: self.num_cols - at,
                rows: right,
            },
        )
    }
}

impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.iter().map(ToString::to_string)).finish()
    }
}

/// `n × n` identity matrix.
#[must_use]
pub fn identity(n: usize) -> BitMatrix {
    BitMatrix {
        num_cols: n,
        rows: (0..n).map(|i| BitVec::unit(n, i)).collect(),
    }
}

/// Result of [`rref`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rref {
    /// Reduced matrix; same rows as the input, reordered and combined.
    pub matrix: BitMatrix,
    /// Rows whose data half is non-zero.
    pub rank: usize,
    /// Per data column `j`: some row's data half is exactly `e_j`.
    pub decoded: Vec<bool>,
}

/// Reduced row echelon form of an augmented matrix `[data | transform]`.
///
/// The data half is the first `num_cols / 2` columns. Every row operation
/// runs across the full width, so the right half records the transformation
/// applied to the left half.
///
/// The forward sweep picks, column by column, the first remaining row with a
/// 1 as pivot, clears that column from the other remaining rows and emits the
/// pivot in order. The backward sweep clears each data pivot column from the
/// rows above it.
///
/// Compatibility: the backward sweep pivots on each row's leading one, and
/// `decoded` is indexed by symbol (pivot column) rather than by row. Callers
/// expecting the diagonal-only, row-indexed rule see different flags while
/// pivots sit off the diagonal, e.g. `[false, false, true]` instead of
/// `[false, true, false]` for rows `[1,1,1]` and `[0,0,1]`.
#[must_use]
pub fn rref(a: BitMatrix) -> Rref {
    let data_cols = a.num_cols / 2;
    let num_cols = a.num_cols;
    let mut pool = a.rows;
    let mut reduced = Vec::with_capacity(pool.len());

    for col in 0..num_cols {
        let Some(p) = pool.iter().position(|r| r.get(col)) else {
            continue;
        };
        let pivot = pool.remove(p);
        for row in pool.iter_mut().filter(|r| r.get(col)) {
            *row ^= &pivot;
        }
        reduced.push(pivot);
    }
    // Rows that never held a 1.
    reduced.append(&mut pool);

    for i in (0..reduced.len()).rev() {
        let Some(col) = reduced[i].leading_one().filter(|&c| c < data_cols) else {
            continue;
        };
        let (above, rest) = reduced.split_at_mut(i);
        let pivot = &rest[0];
        for row in above.iter_mut().filter(|r| r.get(col)) {
            *row ^= pivot;
        }
    }

    let mut rank = 0;
    let mut decoded = vec![false; data_cols];
    for row in &reduced {
        let data = row.slice(0..data_cols);
        if !data.is_zero() {
            rank += 1;
        }
        if let Some(j) = data.unit_index() {
            decoded[j] = true;
        }
    }

    Rref {
        matrix: BitMatrix {
            num_cols,
            rows: reduced,
        },
        rank,
        decoded,
    }
}

/// Matrix product `k · l` over GF(2).
///
/// A row of `k` that is the unit vector at its own index selects the same row
/// of `l` unchanged.
///
/// # Panics
///
/// Panics if `k.num_cols() != l.num_rows()`.
#[must_use]
pub fn dot(k: &BitMatrix, l: &BitMatrix) -> BitMatrix {
    assert_eq!(
        k.num_cols,
        l.num_rows(),
        "dot dimension mismatch: {}x{} by {}x{}",
        k.num_rows(),
        k.num_cols,
        l.num_rows(),
        l.num_cols
    );
    let rows = k
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            if row.unit_index() == Some(i) {
                return l.rows[i].clone();
            }
            let mut acc = BitVec::zeros(l.num_cols);
            for j in row.ones() {
                acc ^= &l.rows[j];
            }
            acc
        })
        .collect();
    BitMatrix {
        num_cols: l.num_cols,
        rows,
    }
}

/// Coder state after one reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReducedState {
    /// Coefficient rows in RREF.
    pub data: BitMatrix,
    /// Payload rows after replaying the reduction.
    pub payloads: BitMatrix,
    pub rank: usize,
    pub decoded: Vec<bool>,
}

/// Reduce `data` (`n × n`) to RREF and apply the same row operations to
/// `payloads` (`n × m`).
///
/// The transformation is tracked by augmenting `data` with a fresh identity,
/// so each call is self-contained and nothing carries over between calls.
///
/// # Panics
///
/// Panics if `data` is not square or `payloads` has a different row count.
#[must_use]
pub fn reduce_step(data: &BitMatrix, payloads: &BitMatrix) -> ReducedState {
    let n = data.num_rows();
    assert_eq!(data.num_cols, n, "coefficient matrix must be square");
    assert_eq!(payloads.num_rows(), n, "payload row count mismatch");

    let Rref {
        matrix,
        rank,
        decoded,
    } = rref(data.hstack(&identity(n)));
    let (data, transform) = matrix.split_columns(n);
    let payloads = dot(&transform, payloads);

    ReducedState {
        data,
        payloads,
        rank,
        decoded,
    }
}
