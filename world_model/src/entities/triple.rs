//! Triple definitions - the facts of the semantic network.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TripleId;

/// The identity of a fact: at most one triple per key exists in a universe.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TripleKey {
    pub subject: String,
    pub relation: String,
    pub object: Option<String>,
}

impl TripleKey {
    pub fn new(subject: &str, relation: &str, object: Option<&str>) -> Self {
        Self {
            subject: subject.to_string(),
            relation: relation.to_string(),
            object: object.map(str::to_string),
        }
    }
}

/// A subject-relation-[object] fact, stamped with when it was last asserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub id: TripleId,
    pub subject: String,
    pub relation: String,
    /// None when the relation is an attribute of the subject.
    pub object: Option<String>,
    /// Clock reading (HHMM) at assertion time.
    pub asserted_at: u32,
    /// Elapsed simulated minutes at assertion time.
    pub asserted_elapsed: u32,
}

impl Triple {
    pub fn key(&self) -> TripleKey {
        TripleKey::new(&self.subject, &self.relation, self.object.as_deref())
    }

    /// Minutes this triple has held as of `now_elapsed`.
    pub fn age(&self, now_elapsed: u32) -> u32 {
        now_elapsed.saturating_sub(self.asserted_elapsed)
    }

    /// Whether this triple was part of the universe's initial conditions.
    pub fn is_initial(&self) -> bool {
        self.asserted_elapsed == 0
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Some(object) => write!(f, "{} {} {}", self.subject, self.relation, object),
            None => write!(f, "{} {}", self.subject, self.relation),
        }
    }
}
