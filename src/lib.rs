//! This crate sorts sequences into the clades of a phylogenetic tree that are marked by a list of
//! reference sequences.  For every reference, the clade is the largest subtree that contains the
//! reference and none of the other references; the sequences of each clade are written to a FASTA
//! file of their own.

pub mod clades;
pub mod newick;
pub mod partition;
pub mod references;
pub mod tree;
