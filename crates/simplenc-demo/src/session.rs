//! One encoder → decoder session.

use std::fmt;
use std::time::Instant;

use anyhow::{Context, bail, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use simplenc::{BinaryCoder, BitMatrix, BitVec, CodedPacket, CoderConfig};
use tracing::{info, instrument};

/// Knobs for [`run`] that are not coder parameters.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub max_packets: usize,
    pub include_payloads: bool,
    pub progress: bool,
}

/// Outcome of a completed session.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub num_symbols: usize,
    pub packet_bit_length: usize,
    pub seed: u64,
    pub packets_needed: usize,
    pub redundant_packets: usize,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoder_payloads: Option<BitMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoder_payloads: Option<BitMatrix>,
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# Ran scenario with {} symbols and packets of {} bits (seed {}).",
            self.num_symbols, self.packet_bit_length, self.seed
        )?;
        writeln!(
            f,
            "## Decoded all symbols after {} packets ({} redundant).",
            self.packets_needed, self.redundant_packets
        )?;
        writeln!(f, "## Whole process took {:.2} ms.", self.elapsed_ms)?;
        if let (Some(enc), Some(dec)) = (&self.encoder_payloads, &self.decoder_payloads) {
            writeln!(f, "## Encoder packets:\n{enc}")?;
            writeln!(f, "## Decoder packets:\n{dec}")?;
        }
        Ok(())
    }
}

/// Encoder holding one random payload per symbol on unit coefficient rows.
fn seeded_encoder(config: &CoderConfig) -> anyhow::Result<BinaryCoder> {
    let mut source = ChaCha20Rng::seed_from_u64(config.seed);
    let mut encoder = BinaryCoder::new(config).context("invalid encoder parameters")?;
    for i in 0..config.num_symbols {
        let payload: BitVec = (0..config.packet_bit_length)
            .map(|_| source.gen_bool(0.5))
            .collect();
        encoder.consume(&CodedPacket::systematic(config.num_symbols, i, payload))?;
    }
    Ok(encoder)
}

/// Stream coded packets from a fresh encoder into a fresh decoder.
///
/// # Errors
///
/// Fails on invalid parameters, if the decoder is not done after
/// `max_packets`, or if the recovered payloads differ from the encoder's.
#[instrument(skip_all, fields(symbols = config.num_symbols, bits = config.packet_bit_length, seed = config.seed))]
pub fn run(config: &CoderConfig, options: &SessionOptions) -> anyhow::Result<SessionReport> {
    let mut encoder = seeded_encoder(config)?;
    let mut decoder = BinaryCoder::new(config).context("invalid decoder parameters")?;
    info!("setup complete");

    let start = Instant::now();
    let mut sent = 0;
    let mut redundant = 0;
    while !decoder.is_fully_decoded() {
        if sent >= options.max_packets {
            bail!(
                "decoder reached rank {} of {} after {sent} packets",
                decoder.rank(),
                config.num_symbols
            );
        }
        let packet = encoder.new_coded_packet()?;
        if !decoder.consume(&packet)? {
            redundant += 1;
        }
        sent += 1;
        if options.progress {
            info!(
                decoded = decoder.num_decoded(),
                rank = decoder.rank(),
                packets = sent,
                "progress"
            );
        }
    }
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    ensure!(
        decoder.payloads() == encoder.payloads(),
        "decoded payloads differ from the encoder's"
    );
    info!(packets = sent, elapsed_ms, "finished");

    Ok(SessionReport {
        num_symbols: config.num_symbols,
        packet_bit_length: config.packet_bit_length,
        seed: config.seed,
        packets_needed: sent,
        redundant_packets: redundant,
        elapsed_ms,
        encoder_payloads: options.include_payloads.then(|| encoder.payloads().clone()),
        decoder_payloads: options.include_payloads.then(|| decoder.payloads().clone()),
    })
}
