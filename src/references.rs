//! This module reads the list of reference sequence names that mark the clades of interest.
//!
//! The list has one name per line.  Only the text before the first comma of a line is used, so
//! the list may carry further comma-separated columns.  That field is trimmed at both ends, so
//! `seqA ,x` names `seqA`.  Lines are otherwise taken literally: a blank line yields an empty
//! name, which will not match any leaf.

use crate::clades::Error;
use std::collections::HashSet;
use std::ops::Deref;
use tracing::warn;

/// The smallest number of distinct references the clade search works with
pub const MIN_REFERENCES: usize = 3;

/// Extract the reference names from the text of a reference list, one per line, in order
pub fn parse_references(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split(',').next().unwrap_or("").trim().to_string())
        .collect()
}

/// An ordered list of at least `MIN_REFERENCES` distinct reference names
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceList {
    names: Vec<String>,
}

impl ReferenceList {

    /// Build a reference list.  Repeated names are dropped after their first occurrence; fails if
    /// fewer than `MIN_REFERENCES` distinct names remain.
    pub fn new<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut unique = vec![];
        for name in names {
            let name = name.into();
            if seen.insert(name.clone()) {
                unique.push(name);
            } else {
                warn!("Reference sequence {} is listed more than once", name);
            }
        }

        if unique.len() < MIN_REFERENCES {
            return Err(Error::Configuration {
                found: unique.len(),
                required: MIN_REFERENCES,
            });
        }
        Ok(ReferenceList { names: unique })
    }

    /// Parse and validate the text of a reference list
    pub fn parse(text: &str) -> Result<Self, Error> {
        Self::new(parse_references(text))
    }

    /// The first reference, which fixes the rooting for all later searches
    pub fn first(&self) -> &str {
        &self.names[0]
    }

    /// All references other than `name`, in list order
    pub fn others<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.names.iter().map(String::as_str).filter(move |&other| other != name)
    }
}

impl Deref for ReferenceList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.names
    }
}
