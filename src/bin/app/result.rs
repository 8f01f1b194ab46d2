//! This module provides result and error types for the main binary `sort_by_clade`.

use clade_sort::{clades, newick};
use std::io;
use std::path::PathBuf;
use std::result;
use thiserror::Error;

/// A result type for functions in the sort_by_clade app
pub type Result<T> = result::Result<T, Error>;

/// A wrapper to catch I/O, parse, and clade search errors
#[derive(Debug, Error)]
pub enum Error {

    /// Error from the Newick parser
    #[error("Parse error in {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: newick::Error,
    },

    /// Error from the reference list or the clade search
    #[error("Clade error: {0}")]
    CladeError(#[from] clades::Error),

    /// I/O error
    #[error("I/O error on {}: {source}", .path.display())]
    IOError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {

    /// Wrap an I/O error on the given path
    pub fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Error::IOError { path, source }
    }

    /// The process exit code reporting this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CladeError(clades::Error::Configuration { .. }) => 2,
            Error::CladeError(clades::Error::Lookup(_)) => 2,
            Error::IOError { .. } => 3,
            Error::ParseError { .. } => 4,
            Error::CladeError(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    /// Test that each kind of error maps to its own exit code
    #[test]
    fn exit_codes() {
        let config = Error::from(clades::Error::Configuration { found: 2, required: 3 });
        assert_eq!(config.exit_code(), 2);
        assert_eq!(Error::from(clades::Error::Lookup("a".to_string())).exit_code(), 2);
        assert_eq!(Error::from(clades::Error::Invariant("a".to_string())).exit_code(), 1);

        let io_error = Error::io("seqs.faa")(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert_eq!(io_error.exit_code(), 3);
        assert_eq!(io_error.to_string(), "I/O error on seqs.faa: missing");

        let parse_error = newick::parse_tree("(a,b").unwrap_err();
        let parse_error = Error::ParseError { path: PathBuf::from("t.nwk"), source: parse_error };
        assert_eq!(parse_error.exit_code(), 4);
        assert!(parse_error.to_string().starts_with("Parse error in t.nwk: "));
    }
}
