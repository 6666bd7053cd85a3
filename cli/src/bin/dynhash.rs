//! Interactive hash table interpreter.
use clap::Parser;
use dynhash_cli::interpreter;
use dynhash_tables::{Table, TableKind, MAX_TABLE_SIZE};

fn parse_size(text: &str) -> Result<usize, String> {
    let size: usize = text.parse().map_err(|err| format!("{err}"))?;
    if size == 0 || size >= MAX_TABLE_SIZE {
        return Err(format!("size must be between 1 and {}", MAX_TABLE_SIZE - 1));
    }
    Ok(size)
}

/// Reads table commands from stdin and applies them to a fresh hash table.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Table type: linear, xtndbl1, 1 or cuckoo, 3 or xuckoo.
    #[clap(short = 't', long = "type")]
    kind: TableKind,
    /// Initial number of slots (per array for cuckoo tables).
    #[clap(short = 's', long, default_value = "4", value_parser = parse_size)]
    size: usize,
}

fn main() -> color_eyre::Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    dynhash_logger::setup();

    log::info!("{} table with initial size {}", args.kind, args.size);
    let mut table = Table::new(args.kind, args.size);

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    interpreter::run(&mut table, stdin, stdout)?;

    Ok(())
}
