//! Generates random command streams for the `dynhash` interpreter.
use std::io::{BufWriter, Write};

use clap::Parser;
use dynhash_cli::generator;
use rand::{rngs::SmallRng, SeedableRng};

/// Prints random insert and lookup commands, followed by `p`, `s` and `q`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of insert commands to generate.
    ninserts: usize,
    /// Number of lookup commands to generate.
    nlookups: usize,
    /// Seed for reproducible output, taken from the system's entropy source if missing.
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    dynhash_logger::setup();

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    log::debug!(
        "generating {} inserts and {} lookups",
        args.ninserts,
        args.nlookups
    );

    let mut out = BufWriter::new(std::io::stdout().lock());
    generator::generate(args.ninserts, args.nlookups, &mut rng, &mut out)?;
    out.flush()?;

    Ok(())
}
