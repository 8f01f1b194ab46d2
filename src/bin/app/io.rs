//! This module implements the I/O routines of `sort_by_clade`: reading the tree, the reference
//! list, and the sequences, writing the clade files, and printing the final summary.

use crate::app;
use crate::app::Error;
use bio::io::fasta;
use clade_sort::clades::CladeSize;
use clade_sort::newick;
use clade_sort::partition::{self, Partition};
use clade_sort::references::{parse_references, ReferenceList};
use clade_sort::tree::Tree;
use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Read the tree from a Newick file
pub fn read_tree(path: &Path) -> app::Result<Tree> {
    let newick = fs::read_to_string(path).map_err(Error::io(path))?;
    newick::parse_tree(&newick).map_err(|source| Error::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the list of reference sequences.  The names are logged before they are validated.
pub fn read_references(path: &Path) -> app::Result<ReferenceList> {
    let text = fs::read_to_string(path).map_err(Error::io(path))?;
    let names = parse_references(&text);
    info!("Reference sequences: {}", names.join(", "));
    Ok(ReferenceList::new(names)?)
}

/// Read all sequences from a FASTA file
pub fn read_sequences(path: &Path) -> app::Result<Vec<fasta::Record>> {
    let file = fs::File::open(path).map_err(Error::io(path))?;
    partition::read_records(BufReader::new(file)).map_err(Error::io(path))
}

/// Write the clade files, replacing the output directory
pub fn write_clades(
    dir: &Path,
    partitions: &[Partition],
    extension: &str,
) -> app::Result<Vec<PathBuf>> {
    partition::write_partitions(dir, partitions, extension).map_err(Error::io(dir))
}

/// Print the reference list and the clade sizes, largest first, to stdout
pub fn write_summary(summary: &app::Summary) -> app::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    format_summary(&mut out, &summary.references, &summary.clade_sizes)
        .map_err(Error::io("<stdout>"))
}

/// Format the summary into the given writer
fn format_summary<W: Write>(
    out: &mut W,
    references: &[String],
    clade_sizes: &[CladeSize],
) -> io::Result<()> {
    writeln!(out, "Reference sequences:")?;
    for reference in references {
        writeln!(out, "{}", reference)?;
    }
    writeln!(out)?;
    writeln!(out, "Number of sequences in each clade:")?;
    for size in clade_sizes {
        writeln!(out, "{}\t{}", size.reference, size.size)?;
    }
    Ok(())
}
