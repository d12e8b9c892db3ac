//! Random Linear Network Coding over GF(2).
//!
//! A [`BinaryCoder`] serves as both ends of a coding session (a generation of
//! `num_symbols` symbols, each `packet_bit_length` bits long):
//!
//! - **Encoder**: fed one systematic packet per symbol, then asked for
//!   [`BinaryCoder::new_coded_packet`], which returns a random non-zero XOR of
//!   the symbols it holds.
//! - **Decoder**: fed those coded packets through
//!   [`BinaryCoder::consume_packet`] until [`BinaryCoder::is_fully_decoded`].
//!
//! # Decoding
//!
//! Every ingested packet triggers one reduction of the augmented matrix
//! `[coefficients | I]` to reduced row echelon form. The right half of the
//! result is the transformation that was applied; it is replayed onto the
//! payload rows and then discarded, so each step is self-contained (see
//! [`matrix::reduce_step`]). A symbol is decoded once some coefficient row is
//! the unit vector for it.
//!
//! # Example
//!
//! ```rust
//! use simplenc::{BinaryCoder, BitVec, CodedPacket};
//!
//! let mut encoder = BinaryCoder::with_seed(3, 4, 1).unwrap();
//! let mut decoder = BinaryCoder::with_seed(3, 4, 1).unwrap();
//!
//! for (i, payload) in ["1010", "0111", "1100"].iter().enumerate() {
//!     let payload: BitVec = payload.parse().unwrap();
//!     encoder.consume(&CodedPacket::systematic(3, i, payload)).unwrap();
//! }
//!
//! while !decoder.is_fully_decoded() {
//!     let packet = encoder.new_coded_packet().unwrap();
//!     decoder.consume(&packet).unwrap();
//! }
//!
//! assert_eq!(decoder.decoded_symbol(1).unwrap().unwrap().to_string(), "0111");
//! ```

#![forbid(unsafe_code)]

mod bits;
mod coder;
mod config;
mod error;
mod golden;
pub mod matrix;
mod packet;

pub use bits::BitVec;
pub use coder::BinaryCoder;
pub use config::CoderConfig;
pub use error::{CoderError, CoderResult, MatrixShapeError, ParseBitVecError};
pub use matrix::BitMatrix;
pub use packet::CodedPacket;
