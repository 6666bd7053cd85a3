//! Line based command interpreter driving a single table.
//!
//! Each line holds a one letter operation, optionally followed by a key:
//!
//! ```text
//! i 42    insert 42
//! l 42    look up 42
//! p       print the table
//! s       print statistics
//! h       list the operations
//! q       quit
//! ```
use std::{
    fmt,
    io::{self, BufRead, Write},
};

use dynhash_tables::{CapacityError, HashPair, Table};

#[cfg(test)]
#[path = "tests/test_interpreter.rs"]
mod test_interpreter;

/// A parsed input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `i <key>`
    Insert(u64),
    /// `l <key>`
    Lookup(u64),
    /// `p`
    Print,
    /// `s`
    Stats,
    /// `h`
    Help,
    /// `q`
    Quit,
    /// An insert or lookup given without a numeric key.
    MissingKey(char),
    /// Any other operation letter.
    Unknown(char),
}

impl Command {
    /// Parses a line, returning `None` for a blank line.
    ///
    /// Only the first character selects the operation. The key is read from the leading digits
    /// following it, so `i 12abc` inserts `12`. A leading minus sign wraps the key around, `-1`
    /// denotes `u64::MAX`, and keys too large for a `u64` saturate at `u64::MAX`.
    pub fn parse(line: &str) -> Option<Command> {
        let mut chars = line.chars();
        let operation = chars.next()?;
        let command = match operation {
            'i' | 'l' => match parse_key(chars.as_str()) {
                Some(key) if operation == 'i' => Command::Insert(key),
                Some(key) => Command::Lookup(key),
                None => Command::MissingKey(operation),
            },
            'p' => Command::Print,
            's' => Command::Stats,
            'h' => Command::Help,
            'q' => Command::Quit,
            _ => Command::Unknown(operation),
        };
        Some(command)
    }
}

fn parse_key(text: &str) -> Option<u64> {
    let text = text.trim_start();
    let (negative, text) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = text[..digits].parse::<u64>().unwrap_or(u64::MAX);
    Some(if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    })
}

/// Writes the list of available operations.
pub fn write_help(mut out: impl Write) -> io::Result<()> {
    writeln!(out, "available operations:")?;
    writeln!(out, " i number: insert 'number' into table")?;
    writeln!(out, " l number: lookup is 'number' in table")?;
    writeln!(out, " p: print table")?;
    writeln!(out, " s: print stats")?;
    writeln!(out, " h: show this list")?;
    writeln!(out, " q: quit")
}

/// Error ending an interpreter session early.
#[derive(Debug)]
pub enum InterpreterError {
    /// Reading commands or writing responses failed.
    Io(io::Error),
    /// The table could not make room for an inserted key.
    Capacity(CapacityError),
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpreterError::Io(err) => write!(f, "i/o error: {err}"),
            InterpreterError::Capacity(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for InterpreterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InterpreterError::Io(err) => Some(err),
            InterpreterError::Capacity(err) => Some(err),
        }
    }
}

impl From<io::Error> for InterpreterError {
    fn from(err: io::Error) -> Self {
        InterpreterError::Io(err)
    }
}

impl From<CapacityError> for InterpreterError {
    fn from(err: CapacityError) -> Self {
        InterpreterError::Capacity(err)
    }
}

/// Reads commands from `input` until `q` or the end of input, writing responses to `out`.
///
/// Returns the number of commands executed, not counting blank lines.
pub fn run<H: HashPair>(
    table: &mut Table<H>,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<usize, InterpreterError> {
    writeln!(out, "enter a command (h for help):")?;
    let mut executed = 0;
    for line in input.lines() {
        let line = line?;
        let Some(command) = Command::parse(&line) else {
            continue;
        };
        executed += 1;
        log::trace!("{command:?}");
        match command {
            Command::Insert(key) => {
                if table.try_insert(key)? {
                    writeln!(out, "{key} inserted")?;
                } else {
                    writeln!(out, "{key} already in table")?;
                }
            }
            Command::Lookup(key) => {
                if table.lookup(key) {
                    writeln!(out, "{key} found")?;
                } else {
                    writeln!(out, "{key} not found")?;
                }
            }
            Command::Print => write!(out, "{table}")?,
            Command::Stats => write!(out, "{}", table.stats())?,
            Command::Help => write_help(&mut out)?,
            Command::Quit => break,
            Command::MissingKey(operation) => writeln!(out, "syntax: {operation} number")?,
            Command::Unknown(operation) => {
                writeln!(out, "unknown operation '{operation}'")?;
                write_help(&mut out)?;
            }
        }
    }
    writeln!(out, "exiting")?;
    out.flush()?;
    log::debug!("{executed} commands, {} keys stored", table.len());
    Ok(executed)
}
