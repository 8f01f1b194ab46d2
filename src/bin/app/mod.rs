//! This module encapsulates all the wrapper code to bundle the clade search and the sequence
//! partitioning into a complete binary.

mod config;
mod io;
mod logic;
mod result;

pub use self::config::Config;
pub use self::io::{read_references, read_sequences, read_tree, write_clades, write_summary};
pub use self::logic::{sort_by_clade, Summary};
pub use self::result::{Error, Result};
