//! This module implements the application logic of `sort_by_clade`, that is, the code that pulls
//! together the clade search and the partitioning of the sequences.

use crate::app;
use clade_sort::clades::{self, CladeSize};
use clade_sort::partition;
use std::path::PathBuf;
use tracing::info;

/// What a run reports once all clade files are written
#[derive(Debug)]
pub struct Summary {
    /// The reference sequences, in list order
    pub references: Vec<String>,

    /// The clade sizes, largest first
    pub clade_sizes: Vec<CladeSize>,

    /// The files written, in reference list order
    pub files: Vec<PathBuf>,
}

/// Find the clade of every reference and write the sequences of each clade to its own file
pub fn sort_by_clade(cfg: &app::Config) -> app::Result<Summary> {
    let tree = app::read_tree(&cfg.tree)?;
    info!("Read tree with {} leaves from {}", tree.leaf_count(tree.root()), cfg.tree.display());

    let references = app::read_references(&cfg.references)?;

    let clades = clades::extract_clades(&tree, &references)?;

    let records = app::read_sequences(&cfg.sequences)?;
    info!("Read {} sequences from {}", records.len(), cfg.sequences.display());

    let partitions = partition::partition(&records, &clades);
    let files = app::write_clades(&cfg.output, &partitions, &cfg.extension)?;
    info!("Wrote {} clade files to {}", files.len(), cfg.output.display());

    Ok(Summary {
        references: references.to_vec(),
        clade_sizes: clades.sizes(),
        files,
    })
}
