//! Coder error types.

use thiserror::Error;

/// Errors surfaced by [`BinaryCoder`](crate::BinaryCoder) and its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoderError {
    /// Symbol index outside `[0, num_symbols)`.
    #[error("symbol index {index} out of range: coder has {num_symbols} symbols")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of symbols in the generation.
        num_symbols: usize,
    },

    /// Coefficient or payload vector of the wrong length.
    #[error("invalid {what} length: expected {expected} bits, got {got}")]
    InvalidLength {
        /// Which input was malformed (`"coefficient"` or `"payload"`).
        what: &'static str,
        /// Length fixed at construction.
        expected: usize,
        /// Length supplied.
        got: usize,
    },

    /// Coded packet requested before any independent combination is known.
    #[error("nothing to encode yet: rank is 0")]
    NothingToEncode,

    /// Construction parameters rejected.
    #[error("invalid coder config: {reason}")]
    InvalidConfig {
        /// Why the config was rejected.
        reason: String,
    },
}

/// Result type for coder operations.
pub type CoderResult<T> = Result<T, CoderError>;

/// Failure to parse a `0`/`1` string into a [`BitVec`](crate::BitVec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bit {found:?} at position {position}")]
pub struct ParseBitVecError {
    /// Character offset of the offending character.
    pub position: usize,
    /// The character found there.
    pub found: char,
}

/// Deserialized matrix whose rows disagree with its column count.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("matrix row {row} has {got} bits, expected {expected}")]
pub struct MatrixShapeError {
    /// Index of the first offending row.
    pub row: usize,
    /// Declared column count.
    pub expected: usize,
    /// Width of that row.
    pub got: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coder_error_display() {
        let err = CoderError::IndexOutOfRange {
            index: 7,
            num_symbols: 4,
        };
        assert_eq!(
            err.to_string(),
            "symbol index 7 out of range: coder has 4 symbols"
        );

        let err = CoderError::InvalidLength {
            what: "payload",
            expected: 5,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid payload length: expected 5 bits, got 3"
        );

        let err = CoderError::NothingToEncode;
        assert_eq!(err.to_string(), "nothing to encode yet: rank is 0");

        let err = CoderError::InvalidConfig {
            reason: "num_symbols must be positive".into(),
        };
        assert!(err.to_string().contains("num_symbols must be positive"));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseBitVecError {
            position: 3,
            found: '2',
        };
        assert_eq!(err.to_string(), "invalid bit '2' at position 3");
    }

    #[test]
    fn shape_error_display() {
        let err = MatrixShapeError {
            row: 1,
            expected: 3,
            got: 4,
        };
        assert_eq!(err.to_string(), "matrix row 1 has 4 bits, expected 3");
    }

    #[test]
    fn errors_are_clone_and_eq() {
        let err1 = CoderError::NothingToEncode;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
