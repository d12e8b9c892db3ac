//! Binary RLNC coder, used both as encoder and decoder.

// Row counts are bounded by num_symbols, which always fits the sampling range.
#![allow(clippy::cast_possible_truncation)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::bits::BitVec;
use crate::config::CoderConfig;
use crate::error::{CoderError, CoderResult};
use crate::matrix::{BitMatrix, ReducedState, reduce_step};
use crate::packet::CodedPacket;

/// Per-session coding state over GF(2).
///
/// An encoder is a coder seeded with one systematic packet per symbol; a
/// decoder is a coder fed the encoder's [`new_coded_packet`] output. Both use
/// [`consume_packet`], which keeps the retained coefficient rows in reduced
/// row echelon form and replays every reduction onto the payload rows.
///
/// [`new_coded_packet`]: BinaryCoder::new_coded_packet
/// [`consume_packet`]: BinaryCoder::consume_packet
#[derive(Clone, Debug)]
pub struct BinaryCoder {
    config: CoderConfig,
    coefficients: BitMatrix,
    payloads: BitMatrix,
    rank: usize,
    decoded: Vec<bool>,
    rng: ChaCha20Rng,
}

impl BinaryCoder {
    /// Create a coder from a validated config.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidConfig` if either dimension is zero.
    pub fn new(config: &CoderConfig) -> CoderResult<Self> {
        config.validate()?;
        let n = config.num_symbols;
        Ok(Self {
            config: config.clone(),
            coefficients: BitMatrix::zeros(n, n),
            payloads: BitMatrix::zeros(n, config.packet_bit_length),
            rank: 0,
            decoded: vec![false; n],
            rng: ChaCha20Rng::seed_from_u64(config.seed),
        })
    }

    /// Shorthand for [`BinaryCoder::new`] with explicit dimensions.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidConfig` if either dimension is zero.
    pub fn with_seed(num_symbols: usize, packet_bit_length: usize, seed: u64) -> CoderResult<Self> {
        Self::new(&CoderConfig::new(num_symbols, packet_bit_length, seed))
    }

    /// Drop all received combinations.
    ///
    /// The random source keeps its position; it belongs to the session, not
    /// to the decoding state.
    pub fn reset(&mut self) {
        let n = self.config.num_symbols;
        self.coefficients = BitMatrix::zeros(n, n);
        self.payloads = BitMatrix::zeros(n, self.config.packet_bit_length);
        self.rank = 0;
        self.decoded = vec![false; n];
    }

    #[must_use]
    pub const fn config(&self) -> &CoderConfig {
        &self.config
    }

    #[must_use]
    pub const fn num_symbols(&self) -> usize {
        self.config.num_symbols
    }

    #[must_use]
    pub const fn packet_bit_length(&self) -> usize {
        self.config.packet_bit_length
    }

    /// Retained coefficient rows, in reduced row echelon form.
    #[must_use]
    pub const fn coefficients(&self) -> &BitMatrix {
        &self.coefficients
    }

    /// Payload rows matching [`coefficients`](Self::coefficients) row by row.
    #[must_use]
    pub const fn payloads(&self) -> &BitMatrix {
        &self.payloads
    }

    /// Number of linearly independent combinations retained.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Whether symbol `index` has been recovered.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::IndexOutOfRange` if `index >= num_symbols`.
    pub fn is_symbol_decoded(&self, index: usize) -> CoderResult<bool> {
        self.check_index(index)?;
        Ok(self.decoded[index])
    }

    /// Payload of symbol `index`, or `None` while it is still undecoded.
    ///
    /// The payload comes from the row whose coefficients are `e_index`,
    /// which need not be row `index` before the coder is fully decoded.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::IndexOutOfRange` if `index >= num_symbols`.
    pub fn decoded_symbol(&self, index: usize) -> CoderResult<Option<&BitVec>> {
        if !self.is_symbol_decoded(index)? {
            return Ok(None);
        }
        Ok(self
            .coefficients
            .rows()
            .iter()
            .position(|row| row.unit_index() == Some(index))
            .map(|row| self.payloads.row(row)))
    }

    /// Number of recovered symbols.
    #[must_use]
    pub fn num_decoded(&self) -> usize {
        self.decoded.iter().filter(|&&d| d).count()
    }

    /// Decoded flag per symbol.
    #[must_use]
    pub fn decoded_flags(&self) -> &[bool] {
        &self.decoded
    }

    #[must_use]
    pub fn is_fully_decoded(&self) -> bool {
        self.num_decoded() == self.config.num_symbols
    }

    /// Per symbol: whether it appears in any retained combination.
    #[must_use]
    pub fn seen_symbols(&self) -> Vec<bool> {
        (0..self.config.num_symbols)
            .map(|j| self.coefficients.rows().iter().any(|row| row.get(j)))
            .collect()
    }

    /// Ingest one coded packet.
    ///
    /// Returns `true` if the packet increased the rank. A linearly dependent
    /// packet reduces to a zero row and leaves the state unchanged in effect.
    /// Once every symbol is decoded, packets are discarded.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidLength` if either vector has the wrong
    /// number of bits. Lengths are checked before anything else.
    pub fn consume_packet(&mut self, coefficients: &BitVec, packet: &BitVec) -> CoderResult<bool> {
        check_len("coefficient", self.config.num_symbols, coefficients.len())?;
        check_len("payload", self.config.packet_bit_length, packet.len())?;

        if self.is_fully_decoded() {
            trace!("fully decoded, packet discarded");
            return Ok(false);
        }

        // Not fully decoded implies rank < num_symbols, and row `rank` is the
        // first zero row.
        let slot = self.rank;
        let mut data = self.coefficients.clone();
        let mut payloads = self.payloads.clone();
        data.set_row(slot, coefficients.clone());
        payloads.set_row(slot, packet.clone());

        let ReducedState {
            data,
            payloads,
            rank,
            decoded,
        } = reduce_step(&data, &payloads);

        let accepted = rank > self.rank;
        self.coefficients = data;
        self.payloads = payloads;
        self.rank = rank;
        self.decoded = decoded;

        debug!(
            rank,
            accepted,
            num_decoded = self.num_decoded(),
            "packet consumed"
        );
        Ok(accepted)
    }

    /// Ingest a [`CodedPacket`].
    ///
    /// # Errors
    ///
    /// See [`consume_packet`](Self::consume_packet).
    pub fn consume(&mut self, packet: &CodedPacket) -> CoderResult<bool> {
        self.consume_packet(&packet.coefficients, &packet.payload)
    }

    /// Uncoded packet for symbol `index`, if it is decoded.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::IndexOutOfRange` if `index >= num_symbols`.
    pub fn sys_coded_packet(&self, index: usize) -> CoderResult<Option<CodedPacket>> {
        Ok(self.decoded_symbol(index)?.map(|payload| {
            CodedPacket::systematic(self.config.num_symbols, index, payload.clone())
        }))
    }

    /// Draw a random non-zero combination of the retained rows.
    ///
    /// Picks `k` uniformly from `[0, rank]`, then `k` rows with replacement,
    /// and XORs them together; redraws while the coefficients come out zero.
    /// The result is valid for any receiver but not guaranteed to raise its
    /// rank.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::NothingToEncode` if the rank is 0.
    pub fn new_coded_packet(&mut self) -> CoderResult<CodedPacket> {
        if self.rank == 0 {
            return Err(CoderError::NothingToEncode);
        }
        // Sample in u64 so streams match across pointer widths.
        let rank = self.rank as u64;
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let k = self.rng.gen_range(0..=rank);
            let mut coefficients = BitVec::zeros(self.config.num_symbols);
            let mut payload = BitVec::zeros(self.config.packet_bit_length);
            for _ in 0..k {
                let row = self.rng.gen_range(0..rank) as usize;
                coefficients ^= self.coefficients.row(row);
                payload ^= self.payloads.row(row);
            }
            if !coefficients.is_zero() {
                trace!(attempts, degree = coefficients.count_ones(), "coded packet generated");
                return Ok(CodedPacket::new(coefficients, payload));
            }
        }
    }

    fn check_index(&self, index: usize) -> CoderResult<()> {
        if index >= self.config.num_symbols {
            return Err(CoderError::IndexOutOfRange {
                index,
                num_symbols: self.config.num_symbols,
            });
        }
        Ok(())
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> CoderResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(CoderError::InvalidLength {
            what,
            expected,
            got,
        })
    }
}
