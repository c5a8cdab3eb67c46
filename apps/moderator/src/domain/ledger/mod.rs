//! Processing ledger: which comment ids have already been judged.
//!
//! The ledger only grows. An id, once marked, stays marked across runs so the
//! driver never evaluates or removes the same comment twice.

pub mod store;

pub use store::LedgerStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<String, bool>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, comment_id: &str) -> bool {
        self.entries.get(comment_id).copied().unwrap_or(false)
    }

    /// Marks `comment_id` as processed. Returns `false` when it already was.
    pub fn mark_processed(&mut self, comment_id: &str) -> bool {
        if self.is_processed(comment_id) {
            return false;
        }
        self.entries.insert(comment_id.to_string(), true);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, processed)| (id.as_str(), *processed))
    }
}

impl FromIterator<(String, bool)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
