//! Narrative report of a finished simulation.

use world_model::{Triple, Universe};

use crate::compiler::Lexicon;
use crate::error::{EngineError, Result};

/// Renders history frames as prose using each entry's first phrase.
#[derive(Debug, Clone, Copy)]
pub struct Monitor<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Monitor<'a> {
    /// Create a monitor phrasing facts through `lexicon`.
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// A clock header per history frame, followed by one sentence per
    /// triple asserted in that frame, in assertion order.
    pub fn render(&self, universe: &Universe) -> Result<String> {
        let mut report = String::new();
        for frame in universe.history_frames() {
            report.push_str(&format!("\n\n\t{:04}\n\n", frame.time));
            for triple in frame.asserted {
                report.push_str(&self.sentence(triple)?);
            }
        }
        Ok(report)
    }

    /// `SUBJECT RELATION [OBJECT].` followed by two spaces.
    pub fn sentence(&self, triple: &Triple) -> Result<String> {
        let relation = self.lexicon.first_phrase(&triple.relation).ok_or_else(|| {
            EngineError::MissingLexicalExpression {
                kind: "relation",
                name: triple.relation.clone(),
                action: triple.to_string(),
            }
        })?;
        let subject = self.noun(&triple.subject);

        Ok(match &triple.object {
            Some(object) => format!("{} {} {}.  ", subject, relation, self.noun(object)),
            None => format!("{} {}.  ", subject, relation),
        })
    }

    fn noun<'n>(&'n self, noun: &'n str) -> &'n str {
        self.lexicon.first_phrase(noun).unwrap_or(noun)
    }
}
