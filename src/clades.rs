//! This module implements the clade search: for every reference sequence, find the largest
//! subtree that contains this reference and none of the others.
//!
//! Whether a group of leaves forms a subtree depends on where the tree is rooted, so the search
//! works on a copy of the tree that is rerooted twice before the clades are read off:
//!
//! 1. Before the clade of the first reference is computed, the tree is rerooted on the first
//!    other reference in list order.  This keeps the first clade from being split by the root the
//!    tree happened to be written with.
//! 2. Before the clade of the second reference is computed, the tree is rerooted on the first
//!    reference.  All remaining clades are computed with this rooting.
//!
//! Which rooting is in effect is tracked explicitly by `Stage`.
//!
//! For each reference, every node of the tree is visited in level order.  The clade is the node
//! with the most leaves among those whose subtree contains the reference and no other reference;
//! ties go to the node visited first.

use crate::newick::format_subtree;
use crate::references::ReferenceList;
use crate::tree::{self, Node, Tree};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use tracing::{debug, info};

/// The label given to the root of a claimed clade in the diagnostic output
pub const CLAIMED_LABEL: &str = "X";

/// The errors that can occur while searching for clades
#[derive(Debug, Error, Eq, PartialEq)]
pub enum Error {

    /// Not enough distinct references were supplied
    #[error("only {found} distinct reference sequences given, at least {required} are required")]
    Configuration { found: usize, required: usize },

    /// A reference does not name a leaf of the tree
    #[error("reference sequence `{0}' was not found among the leaves of the tree")]
    Lookup(String),

    /// The search found no subtree for a reference
    #[error("no subtree contains reference sequence `{0}' without another reference")]
    Invariant(String),

    /// The tree could not be rerooted
    #[error("failed to reroot the tree: {0}")]
    Reroot(#[from] tree::Error),
}

/// The result type of the clade search
pub type Result<T> = std::result::Result<T, Error>;

/// The rooting of the working tree
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {

    /// Rooted as parsed
    Parsed,

    /// Rooted on the first reference that differs from the first one in the list
    RootedOnOther,

    /// Rooted on the first reference in the list
    RootedOnFirst,
}

/// The clade found for one reference sequence
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clade {

    /// The reference sequence defining the clade
    reference: String,

    /// The names of the leaves in the clade
    leaves: BTreeSet<String>,
}

impl Clade {

    /// The reference sequence defining this clade
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The leaf names in this clade
    pub fn leaves(&self) -> &BTreeSet<String> {
        &self.leaves
    }

    /// Does this clade contain the given leaf?
    pub fn contains(&self, name: &str) -> bool {
        self.leaves.contains(name)
    }

    /// The number of leaves in this clade
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Is this clade empty?
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

/// The size of one clade, as reported after the search
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CladeSize {
    pub reference: String,
    pub size: usize,
}

/// The clades of all references, in reference list order
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CladeMap {
    clades: Vec<Clade>,
}

impl CladeMap {

    /// The clade of the given reference
    pub fn get(&self, reference: &str) -> Option<&Clade> {
        self.clades.iter().find(|clade| clade.reference == reference)
    }

    /// Iterator over the clades in reference list order
    pub fn iter(&self) -> impl Iterator<Item = &Clade> {
        self.clades.iter()
    }

    /// The number of clades
    pub fn len(&self) -> usize {
        self.clades.len()
    }

    /// Is the map empty?
    pub fn is_empty(&self) -> bool {
        self.clades.is_empty()
    }

    /// The clade sizes, largest first.  Clades of equal size stay in reference list order.
    pub fn sizes(&self) -> Vec<CladeSize> {
        let mut sizes = self
            .clades
            .iter()
            .map(|clade| CladeSize {
                reference: clade.reference.clone(),
                size: clade.len(),
            })
            .collect::<Vec<_>>();
        sizes.sort_by(|a, b| b.size.cmp(&a.size));
        sizes
    }
}

/// Compute the clade of every reference in `references`.  The given tree is not modified.
pub fn extract_clades(tree: &Tree, references: &ReferenceList) -> Result<CladeMap> {
    CladeExtractor::new(tree, references)?.run()
}

/// The state of the clade search
pub struct CladeExtractor<'r> {

    /// The working copy of the tree, rerooted as the search progresses
    tree: Tree,

    /// The references whose clades are computed
    references: &'r ReferenceList,

    /// The current rooting of `tree`
    stage: Stage,
}

impl<'r> CladeExtractor<'r> {

    /// Set up a search on a copy of `tree`.  Fails if a reference is not a leaf of the tree.
    pub fn new(tree: &Tree, references: &'r ReferenceList) -> Result<Self> {
        let leaf_names = tree.leaf_names(tree.root()).collect::<HashSet<_>>();
        if let Some(missing) = references.iter().find(|name| !leaf_names.contains(name.as_str())) {
            return Err(Error::Lookup(missing.clone()));
        }

        Ok(CladeExtractor {
            tree: tree.clone(),
            references,
            stage: Stage::Parsed,
        })
    }

    /// The current rooting of the working tree
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The working tree
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Run the search for all references
    pub fn run(mut self) -> Result<CladeMap> {
        let references = self.references;
        let mut clades = Vec::with_capacity(references.len());
        for reference in references.iter() {
            self.advance()?;
            let clade = self.search(reference)?;
            info!("Clade defined by sequence {} has {} sequences", reference, clade.len());
            clades.push(clade);
        }
        Ok(CladeMap { clades })
    }

    /// Move the working tree to the rooting needed for the next reference
    fn advance(&mut self) -> Result<()> {
        let references = self.references;
        let first = references.first();
        match self.stage {

            Stage::Parsed => {
                let other = references
                    .others(first)
                    .next()
                    .ok_or_else(|| Error::Invariant(first.to_string()))?;
                let outgroup = self
                    .tree
                    .find_leaf(other)
                    .ok_or_else(|| Error::Lookup(other.to_string()))?;
                self.tree.reroot(outgroup)?;
                debug!("Rooted the tree on {}", other);
                self.stage = Stage::RootedOnOther;
            },

            Stage::RootedOnOther => {
                // The last node in level order that contains the first reference is its leaf
                let anchor = self
                    .tree
                    .traverse()
                    .into_iter()
                    .filter(|&node| self.tree.subtree_contains(node, first))
                    .last()
                    .ok_or_else(|| Error::Lookup(first.to_string()))?;
                self.tree.reroot(anchor)?;
                debug!("Rooted the tree on {}", first);
                self.stage = Stage::RootedOnFirst;
            },

            Stage::RootedOnFirst => (),
        }
        Ok(())
    }

    /// Find the largest subtree of the working tree that contains `reference` and no other
    /// reference
    fn search(&self, reference: &str) -> Result<Clade> {
        let mut tree = self.tree.clone();

        let mut best: Option<(Node, usize)> = None;
        for node in tree.traverse() {
            if !self.is_pure(&tree, node, reference) {
                continue;
            }
            let size = tree.leaf_count(node);
            if best.map_or(true, |(_, best_size)| size > best_size) {
                best = Some((node, size));
            }
        }
        let (clade_root, _) = best.ok_or_else(|| Error::Invariant(reference.to_string()))?;

        tree.rename(clade_root, CLAIMED_LABEL);
        debug!("Clade defined by sequence {}: {}", reference, format_subtree(&tree, clade_root));

        Ok(Clade {
            reference: reference.to_string(),
            leaves: tree.leaf_names(clade_root).map(String::from).collect(),
        })
    }

    /// Does the subtree rooted at `node` contain `reference` and no other reference?
    fn is_pure(&self, tree: &Tree, node: Node, reference: &str) -> bool {
        tree.subtree_contains(node, reference)
            && !self
                .references
                .others(reference)
                .any(|other| tree.subtree_contains(node, other))
    }
}
