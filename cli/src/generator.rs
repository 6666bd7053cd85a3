//! Random command streams for the interpreter.
use std::io::{self, Write};

use rand::{seq::SliceRandom, Rng};

/// Writes `ninserts` insert commands followed by `nlookups` lookup commands, then `p`, `s` and `q`.
///
/// Keys are drawn uniformly from `0..=100 * ninserts`. Each lookup uses, with equal probability,
/// one of the inserted keys or a fresh key from the same range, so roughly half of the lookups
/// succeed.
pub fn generate(
    ninserts: usize,
    nlookups: usize,
    rng: &mut impl Rng,
    mut out: impl Write,
) -> io::Result<()> {
    let max = 100 * ninserts as u64;
    let inserts: Vec<u64> = (0..ninserts).map(|_| rng.gen_range(0..=max)).collect();
    for key in &inserts {
        writeln!(out, "i {key}")?;
    }

    for _ in 0..nlookups {
        let existing = if rng.gen_bool(0.5) {
            inserts.choose(rng).copied()
        } else {
            None
        };
        let key = existing.unwrap_or_else(|| rng.gen_range(0..=max));
        writeln!(out, "l {key}")?;
    }

    writeln!(out, "p")?;
    writeln!(out, "s")?;
    writeln!(out, "q")?;
    out.flush()
}
