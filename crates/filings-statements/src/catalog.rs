//! Candidate tag catalog and segment code aliases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::SegmentSelector;

/// Segment code that selects consolidated facts.
pub const TOTAL_CODE: &str = "Total";

/// Maps a base concept to the ordered list of tags filers use for it.
///
/// Concepts without an entry resolve to themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagCatalog {
    entries: BTreeMap<String, Vec<String>>,
}

impl TagCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the candidates of a base concept.
    #[must_use]
    pub fn with_candidates<I, S>(mut self, concept: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            concept.into(),
            candidates.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Candidate tags for a base concept, in preference order.
    #[must_use]
    pub fn candidates<'a>(&'a self, concept: &'a str) -> Vec<&'a str> {
        match self.entries.get(concept) {
            Some(list) if !list.is_empty() => list.iter().map(String::as_str).collect(),
            _ => vec![concept],
        }
    }

    /// Number of concepts with explicit candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no concept has explicit candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps short segment codes (e.g. `MET`) to member names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentAliases {
    aliases: BTreeMap<String, String>,
}

impl SegmentAliases {
    /// Creates an empty alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, code: impl Into<String>, member: impl Into<String>) -> Self {
        self.aliases.insert(code.into(), member.into());
        self
    }

    /// Resolves a code. [`TOTAL_CODE`] selects consolidated facts; unknown
    /// codes are taken as member names.
    #[must_use]
    pub fn resolve(&self, code: &str) -> SegmentSelector {
        if code == TOTAL_CODE {
            return SegmentSelector::Consolidated;
        }
        SegmentSelector::Member(
            self.aliases
                .get(code)
                .cloned()
                .unwrap_or_else(|| code.to_string()),
        )
    }
}
