//! Atomic conditions: relational sentences and clock comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use world_model::{Relation, TimeOp, Universe};

use super::{Binding, Term};
use crate::error::Result;

/// `subject relation [object]`, true when a matching triple exists
/// (or, for a negated relation, when none does).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub subject: Term,
    pub relation: Relation,
    pub object: Option<Term>,
}

impl Sentence {
    pub fn new(subject: Term, relation: Relation, object: Option<Term>) -> Self {
        Self {
            subject,
            relation,
            object,
        }
    }

    /// Ground the sentence under `binding` and test it against the network.
    pub fn evaluate(&self, universe: &Universe, binding: &Binding) -> Result<bool> {
        let subject = binding.resolve(&self.subject)?;
        let object = self
            .object
            .as_ref()
            .map(|object| binding.resolve(object))
            .transpose()?;

        let holds = universe.matches(subject, &self.relation, object);
        trace!(sentence = %self, subject, ?object, holds, "evaluated sentence");
        Ok(holds)
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        std::iter::once(&self.subject).chain(self.object.as_ref())
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Some(object) => write!(f, "({} {} {})", self.subject, self.relation, object),
            None => write!(f, "({} {})", self.subject, self.relation),
        }
    }
}

/// `T <op> HHMM`, compared against the current clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSentence {
    pub op: TimeOp,
    pub value: u32,
}

impl TimeSentence {
    pub fn evaluate(&self, universe: &Universe) -> bool {
        self.op.compare(universe.time(), self.value)
    }
}

impl fmt::Display for TimeSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[T {} {:04}]", self.op.symbol(), self.value)
    }
}
