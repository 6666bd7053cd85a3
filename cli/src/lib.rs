//! Command line front ends for the dynhash tables.
//!
//! [`interpreter`] runs a line based command language against a [`Table`](dynhash_tables::Table)
//! and [`generator`] produces random command streams for it.
#![warn(missing_docs)]

pub mod generator;
pub mod interpreter;
