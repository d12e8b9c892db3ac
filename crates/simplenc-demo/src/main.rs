//! Encoder/decoder demonstration for `simplenc`.
//!
//! Seeds an encoder with random payloads, streams coded packets into a
//! decoder until it has recovered every symbol, and reports how many packets
//! that took. Logs go to stderr so stdout stays clean for JSON output.

#![forbid(unsafe_code)]

mod session;

use clap::{Parser, ValueEnum};
use simplenc::CoderConfig;

/// Run one RLNC session over GF(2).
#[derive(Parser)]
#[command(name = "simplenc-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of symbols in the generation.
    #[arg(long, default_value = "4")]
    symbols: usize,

    /// Payload length in bits.
    #[arg(long, default_value = "5")]
    bits: usize,

    /// Seed for both coders and the source payloads.
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Give up after this many coded packets.
    #[arg(long, default_value = "100000")]
    max_packets: usize,

    /// Output format: json (machine-readable) or human (pretty-printed).
    #[arg(long, default_value = "human")]
    format: OutputFormat,

    /// Include encoder and decoder payload matrices in the report.
    #[arg(long)]
    print_packets: bool,

    /// Log decoding progress after every packet.
    #[arg(long)]
    progress: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Human,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = CoderConfig::new(cli.symbols, cli.bits, cli.seed);
    let options = session::SessionOptions {
        max_packets: cli.max_packets,
        include_payloads: cli.print_packets,
        progress: cli.progress,
    };

    let report = session::run(&config, &options)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => print!("{report}"),
    }
    Ok(())
}
