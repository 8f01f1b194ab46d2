//! This module splits a FASTA collection by clade and writes one FASTA file per reference.
//!
//! A record goes to every clade whose leaf set contains the record's identifier.  Records keep
//! their input order and are written unchanged.  Records that belong to no clade, including ones
//! whose identifier is not a leaf of the tree at all, are dropped.
//!
//! The output directory is replaced as a whole: all files are first written to a staging
//! directory next to it, and only once every file is complete is the old directory removed and
//! the staging directory moved into its place.

use crate::clades::CladeMap;
use bio::io::fasta;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The extension of the output files unless configured otherwise
pub const DEFAULT_EXTENSION: &str = "faa";

/// Appended to the sanitized reference name to form the output file stem
const CLADE_SUFFIX: &str = "__clade";

/// Read all records of a FASTA input
pub fn read_records<R: io::Read>(reader: R) -> io::Result<Vec<fasta::Record>> {
    fasta::Reader::new(reader).records().collect()
}

/// The records selected for one reference
#[derive(Debug)]
pub struct Partition<'a> {

    /// The reference defining the clade
    reference: String,

    /// The records in the clade, in input order
    records: Vec<&'a fasta::Record>,
}

impl<'a> Partition<'a> {

    /// The reference defining this partition
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The records in this partition, in input order
    pub fn records(&self) -> &[&'a fasta::Record] {
        &self.records
    }

    /// The number of records in this partition
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Is this partition empty?
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Select the records of every clade, one partition per reference in reference list order
pub fn partition<'a>(records: &'a [fasta::Record], clades: &CladeMap) -> Vec<Partition<'a>> {
    clades
        .iter()
        .map(|clade| Partition {
            reference: clade.reference().to_string(),
            records: records.iter().filter(|record| clade.contains(record.id())).collect(),
        })
        .collect()
}

/// The name of the output file for a reference: spaces and path separators in the reference
/// name are replaced with underscores
pub fn output_file_name(reference: &str, extension: &str) -> String {
    let stem = reference.replace(|c: char| c == ' ' || c == '/' || c == '\\', "_");
    format!("{}{}.{}", stem, CLADE_SUFFIX, extension)
}

/// Write one FASTA file per partition into `dir`, replacing `dir` and everything in it.  Returns
/// the paths of the written files.
pub fn write_partitions(
    dir: &Path,
    partitions: &[Partition],
    extension: &str,
) -> io::Result<Vec<PathBuf>> {
    let parent = match dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = tempfile::Builder::new().prefix(".clade_sort").tempdir_in(parent)?;
    debug!("Staging output in {}", staging.path().display());

    let mut names = HashSet::new();
    let mut paths = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let name = output_file_name(partition.reference(), extension);
        if !names.insert(name.clone()) {
            warn!("Clade of {} overwrites an earlier clade in {}", partition.reference(), name);
        }

        let mut writer = fasta::Writer::to_file(staging.path().join(&name))?;
        for record in partition.records() {
            writer.write_record(record)?;
        }
        writer.flush()?;
        info!("Wrote {} sequences to {}", partition.len(), name);
        paths.push(dir.join(name));
    }

    if dir.exists() {
        debug!("Removing existing output directory {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    // After the rename the staging path no longer exists, so dropping `staging` removes nothing.
    fs::rename(staging.path(), dir)?;
    Ok(paths)
}
