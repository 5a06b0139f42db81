//! Entity definitions for the semantic network.

mod triple;

pub use triple::*;

use serde::{Deserialize, Serialize};

/// Identifier allocated by the [`crate::Universe`] each time a triple is
/// (re-)asserted. Identifiers are monotonic within one universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TripleId(pub u64);

impl std::fmt::Display for TripleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
