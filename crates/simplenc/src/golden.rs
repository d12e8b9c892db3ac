//! Reference scenarios for encoder/decoder sessions.
//!
//! These pin down end-to-end behavior: the small hand-checked generations and
//! full encoder → decoder runs with fixed seeds.

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    use crate::{BinaryCoder, BitVec, CodedPacket, CoderConfig};

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn bits(b: &[u8]) -> BitVec {
        BitVec::from_bits(b)
    }

    /// Encoder holding `num_symbols` random payloads on unit coefficient rows.
    fn seeded_encoder(config: &CoderConfig) -> (BinaryCoder, Vec<BitVec>) {
        let mut source = ChaCha20Rng::seed_from_u64(config.seed);
        let mut encoder = BinaryCoder::new(config).unwrap();
        let payloads: Vec<BitVec> = (0..config.num_symbols)
            .map(|_| {
                (0..config.packet_bit_length)
                    .map(|_| source.gen_bool(0.5))
                    .collect()
            })
            .collect();
        for (i, payload) in payloads.iter().enumerate() {
            let packet = CodedPacket::systematic(config.num_symbols, i, payload.clone());
            assert!(encoder.consume(&packet).unwrap());
        }
        assert!(encoder.is_fully_decoded());
        (encoder, payloads)
    }

    /// Stream coded packets into a fresh decoder; returns packets needed.
    fn run_session(config: &CoderConfig, limit: usize) -> (BinaryCoder, BinaryCoder, usize) {
        let (mut encoder, _) = seeded_encoder(config);
        let mut decoder = BinaryCoder::new(config).unwrap();
        let mut sent = 0;
        while !decoder.is_fully_decoded() {
            assert!(sent < limit, "decoder still at rank {} after {sent} packets", decoder.rank());
            let packet = encoder.new_coded_packet().unwrap();
            decoder.consume(&packet).unwrap();
            sent += 1;
        }
        (encoder, decoder, sent)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Three symbols, three-bit payloads
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn golden_unit_packets() {
        let mut c = BinaryCoder::with_seed(3, 3, 1).unwrap();
        c.consume_packet(&bits(&[1, 0, 0]), &bits(&[1, 1, 1])).unwrap();
        c.consume_packet(&bits(&[0, 1, 0]), &bits(&[1, 1, 0])).unwrap();
        c.consume_packet(&bits(&[0, 0, 1]), &bits(&[1, 0, 1])).unwrap();

        assert_eq!(c.rank(), 3);
        assert_eq!(c.num_decoded(), 3);
        assert_eq!(c.decoded_symbol(0).unwrap(), Some(&bits(&[1, 1, 1])));
    }

    #[test]
    fn golden_two_combinations() {
        let mut c = BinaryCoder::with_seed(3, 3, 1).unwrap();
        c.consume_packet(&bits(&[1, 1, 1]), &bits(&[1, 1, 1])).unwrap();
        c.consume_packet(&bits(&[0, 1, 1]), &bits(&[1, 1, 0])).unwrap();

        assert_eq!(c.rank(), 2);
        assert_eq!(c.decoded_flags(), &[true, false, false]);
        assert_eq!(c.decoded_symbol(0).unwrap(), Some(&bits(&[0, 0, 1])));
    }

    #[test]
    fn golden_duplicates_collapse() {
        let mut c = BinaryCoder::with_seed(3, 3, 1).unwrap();
        let first = (bits(&[1, 1, 1]), bits(&[1, 1, 1]));
        let second = (bits(&[0, 0, 1]), bits(&[1, 1, 0]));

        c.consume_packet(&first.0, &first.1).unwrap();
        c.consume_packet(&second.0, &second.1).unwrap();
        let flags = c.decoded_flags().to_vec();

        c.consume_packet(&first.0, &first.1).unwrap();
        c.consume_packet(&second.0, &second.1).unwrap();

        assert_eq!(c.rank(), 2);
        assert_eq!(c.decoded_flags(), flags.as_slice());
        // Symbol 2 is isolated by row 1; flags follow the symbol.
        assert_eq!(c.decoded_flags(), &[false, false, true]);
        assert_eq!(c.decoded_symbol(2).unwrap(), Some(&bits(&[1, 1, 0])));
        assert_eq!(c.decoded_symbol(1).unwrap(), None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Full sessions
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn golden_four_symbols_five_bits() {
        let config = CoderConfig::default();
        let (encoder, decoder, sent) = run_session(&config, 1_000);

        assert!(sent >= config.num_symbols);
        assert_eq!(decoder.payloads(), encoder.payloads());
        assert_eq!(decoder.coefficients(), encoder.coefficients());
    }

    #[test]
    fn golden_session_recovers_source_payloads() {
        let config = CoderConfig::new(16, 100, 2024);
        let (_, payloads) = seeded_encoder(&config);
        let (_, decoder, sent) = run_session(&config, 10_000);

        assert!(sent >= 16);
        for (i, expected) in payloads.iter().enumerate() {
            assert_eq!(decoder.decoded_symbol(i).unwrap(), Some(expected));
        }
    }

    #[test]
    fn golden_session_is_reproducible() {
        for seed in [1, 7, 42] {
            let config = CoderConfig::new(8, 12, seed);
            let (_, _, first) = run_session(&config, 5_000);
            let (_, _, second) = run_session(&config, 5_000);
            assert_eq!(first, second, "seed {seed} gave different packet counts");
        }
    }

    #[test]
    fn golden_single_symbol() {
        let config = CoderConfig::new(1, 1, 3);
        let (encoder, decoder, sent) = run_session(&config, 100);
        assert_eq!(sent, 1);
        assert_eq!(decoder.payloads(), encoder.payloads());
    }

    #[test]
    fn golden_decoder_relays_systematic_packets() {
        let config = CoderConfig::new(5, 9, 11);
        let (encoder, decoder, _) = run_session(&config, 5_000);

        let mut relay = BinaryCoder::new(&config).unwrap();
        for i in 0..config.num_symbols {
            let packet = decoder.sys_coded_packet(i).unwrap().unwrap();
            assert_eq!(packet.systematic_index(), Some(i));
            relay.consume(&packet).unwrap();
        }
        assert!(relay.is_fully_decoded());
        assert_eq!(relay.payloads(), encoder.payloads());
    }
}
