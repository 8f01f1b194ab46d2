//! This module contains all the command line parsing code and provides a `Config` struct that
//! encapsulates all the parsed configuration options.

use clade_sort::partition::DEFAULT_EXTENSION;
use clap::{App, Arg, ArgMatches};
use std::ffi::OsString;
use std::path::PathBuf;

/// A structure to hold all the configuration parameters
#[derive(Debug)]
pub struct Config {
    /// The Newick file holding the tree
    pub tree: PathBuf,

    /// The file listing the reference sequences
    pub references: PathBuf,

    /// The FASTA file holding all sequences in the tree
    pub sequences: PathBuf,

    /// The output directory; replaced if it exists
    pub output: PathBuf,

    /// The extension of the output files
    pub extension: String,

    /// The log filter used unless overridden from the environment
    pub log_level: &'static str,
}

impl Config {
    /// Create a new config object from the command line arguments
    pub fn new() -> Self {
        Self::from_matches(&app().get_matches())
    }

    /// Create a new config object from the given arguments, the first of which is the program
    /// name
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        app().get_matches_from_safe(args).map(|args| Self::from_matches(&args))
    }

    /// Extract the configuration from parsed arguments
    fn from_matches(args: &ArgMatches) -> Self {
        let log_level = if args.is_present("quiet") {
            "error"
        } else {
            match args.occurrences_of("verbose") {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        };

        Self {
            tree: path(args, "tree"),
            references: path(args, "references"),
            sequences: path(args, "sequences"),
            output: path(args, "output"),
            extension: args.value_of("extension").unwrap_or(DEFAULT_EXTENSION).to_string(),
            log_level,
        }
    }
}

/// Define the acceptable arguments
fn app() -> App<'static, 'static> {
    let args = [
        Arg::with_name("tree")
            .required(true)
            .index(1)
            .value_name("tree")
            .help("tree file")
            .long_help(
"tree file; contains the tree topology as a single Newick string. Labels containing \
punctuation can be enclosed in single quotes."),
        Arg::with_name("references")
            .required(true)
            .index(2)
            .value_name("references")
            .help("reference sequence list")
            .long_help(
"reference sequence list; one reference sequence name per line, at least three. \
Only the text before the first comma on a line is used."),
        Arg::with_name("sequences")
            .required(true)
            .index(3)
            .value_name("sequences")
            .help("FASTA file with all sequences in the tree"),
        Arg::with_name("output")
            .required(true)
            .index(4)
            .value_name("output")
            .help("output directory")
            .long_help(
"output directory; receives one FASTA file per reference sequence. \
If the directory exists, it is deleted with everything in it."),
        Arg::with_name("extension")
            .short("e")
            .long("extension")
            .required(false)
            .takes_value(true)
            .value_name("ext")
            .default_value(DEFAULT_EXTENSION)
            .validator(validate_extension)
            .help("extension of the output files"),
        Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .multiple(true)
            .help("log more details; repeat for even more"),
        Arg::with_name("quiet")
            .short("q")
            .long("quiet")
            .conflicts_with("verbose")
            .help("only log errors"),
    ];

    App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about("Sort sequences into the clades of a tree marked by reference sequences")
        .long_about(
"Sort sequences into the clades of a tree marked by reference sequences. For every reference \
sequence, the clade is the largest subtree that contains it and none of the other references.")
        .args(&args)
}

/// The path given for a required argument
fn path(args: &ArgMatches, name: &str) -> PathBuf {
    args.value_of_os(name).map(PathBuf::from).unwrap_or_default()
}

/// Check that the output file extension is usable in a file name
fn validate_extension(arg: String) -> Result<(), String> {
    if arg.is_empty() || arg.contains(|c: char| c == '/' || c == '\\') {
        Err(String::from(
            "Extension must be non-empty and must not contain path separators",
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    /// Test the defaults with only the positional arguments given
    #[test]
    fn positional_arguments() {
        let cfg = Config::from_args(vec!["sort_by_clade", "t.nwk", "refs.txt", "seqs.faa", "out"])
            .unwrap();
        assert_eq!(cfg.tree, PathBuf::from("t.nwk"));
        assert_eq!(cfg.references, PathBuf::from("refs.txt"));
        assert_eq!(cfg.sequences, PathBuf::from("seqs.faa"));
        assert_eq!(cfg.output, PathBuf::from("out"));
        assert_eq!(cfg.extension, "faa");
        assert_eq!(cfg.log_level, "info");
    }

    /// Test the options
    #[test]
    fn options() {
        let cfg = Config::from_args(vec!["sort_by_clade", "-vv", "-e", "fna", "t", "r", "s", "o"])
            .unwrap();
        assert_eq!(cfg.extension, "fna");
        assert_eq!(cfg.log_level, "trace");

        let cfg = Config::from_args(vec!["sort_by_clade", "--quiet", "t", "r", "s", "o"]).unwrap();
        assert_eq!(cfg.log_level, "error");
    }

    /// Test that missing arguments and bad extensions are rejected
    #[test]
    fn invalid_arguments() {
        assert!(Config::from_args(vec!["sort_by_clade", "t", "r", "s"]).is_err());
        assert!(Config::from_args(vec!["sort_by_clade", "-e", "a/b", "t", "r", "s", "o"]).is_err());
        assert!(Config::from_args(vec!["sort_by_clade", "-q", "-v", "t", "r", "s", "o"]).is_err());
    }
}
