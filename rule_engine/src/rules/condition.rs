//! Boolean combinations of sentences.

use serde::{Deserialize, Serialize};
use std::fmt;
use world_model::Universe;

use super::{Binding, Sentence, TimeSentence};
use crate::error::Result;

/// Infix operators of the sentence language. `&` binds tighter than `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn symbol(&self) -> char {
        match self {
            Connective::And => '&',
            Connective::Or => '/',
        }
    }
}

/// The condition tree of a subrule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Sentence(Sentence),
    Time(TimeSentence),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    /// Build a tree from an infix sequence `first op operand op operand ...`.
    ///
    /// Runs joined by `&` become conjunctions; those are joined by `/`.
    pub fn from_infix(first: Condition, rest: Vec<(Connective, Condition)>) -> Condition {
        let mut alternatives = Vec::new();
        let mut conjunction = vec![first];

        for (connective, operand) in rest {
            if connective == Connective::Or {
                alternatives.push(Self::all(std::mem::take(&mut conjunction)));
            }
            conjunction.push(operand);
        }
        alternatives.push(Self::all(conjunction));

        Self::any(alternatives)
    }

    fn all(mut operands: Vec<Condition>) -> Condition {
        match operands.len() {
            1 => operands.remove(0),
            _ => Condition::All(operands),
        }
    }

    fn any(mut operands: Vec<Condition>) -> Condition {
        match operands.len() {
            1 => operands.remove(0),
            _ => Condition::Any(operands),
        }
    }

    /// Evaluate left to right, stopping as soon as the result is known.
    pub fn evaluate(&self, universe: &Universe, binding: &Binding) -> Result<bool> {
        match self {
            Condition::Sentence(sentence) => sentence.evaluate(universe, binding),
            Condition::Time(time) => Ok(time.evaluate(universe)),
            Condition::All(operands) => {
                for operand in operands {
                    if !operand.evaluate(universe, binding)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Any(operands) => {
                for operand in operands {
                    if operand.evaluate(universe, binding)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Relational sentences in the tree, left to right.
    pub fn sentences(&self) -> Vec<&Sentence> {
        let mut found = Vec::new();
        self.collect_sentences(&mut found);
        found
    }

    fn collect_sentences<'a>(&'a self, found: &mut Vec<&'a Sentence>) {
        match self {
            Condition::Sentence(sentence) => found.push(sentence),
            Condition::Time(_) => {}
            Condition::All(operands) | Condition::Any(operands) => {
                for operand in operands {
                    operand.collect_sentences(found);
                }
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (operands, connective) = match self {
            Condition::Sentence(sentence) => return write!(f, "{}", sentence),
            Condition::Time(time) => return write!(f, "{}", time),
            Condition::All(operands) => (operands, Connective::And),
            Condition::Any(operands) => (operands, Connective::Or),
        };
        write!(f, "{{")?;
        for (index, operand) in operands.iter().enumerate() {
            if index > 0 {
                write!(f, " {} ", connective.symbol())?;
            }
            write!(f, "{}", operand)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Term;
    use world_model::{Relation, TimeOp};

    fn fact(subject: &str, relation: &str) -> Condition {
        Condition::Sentence(Sentence::new(
            Term::Literal(subject.to_string()),
            Relation::new(relation),
            None,
        ))
    }

    fn after(value: u32) -> Condition {
        Condition::Time(TimeSentence {
            op: TimeOp::Greater,
            value,
        })
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        // a / b & c  ==  a / (b & c)
        let condition = Condition::from_infix(
            fact("GEORGE", "ASLEEP"),
            vec![
                (Connective::Or, fact("MARTHA", "ASLEEP")),
                (Connective::And, fact("DOG", "ASLEEP")),
            ],
        );

        match &condition {
            Condition::Any(alternatives) => {
                assert_eq!(alternatives.len(), 2);
                assert!(matches!(alternatives[0], Condition::Sentence(_)));
                assert!(matches!(&alternatives[1], Condition::All(c) if c.len() == 2));
            }
            other => panic!("expected a disjunction, got {}", other),
        }

        let mut universe = Universe::new(1700).unwrap();
        universe.assert_fact("MARTHA", "ASLEEP", None);
        assert!(!condition.evaluate(&universe, &Binding::new()).unwrap());
        universe.assert_fact("DOG", "ASLEEP", None);
        assert!(condition.evaluate(&universe, &Binding::new()).unwrap());
    }

    #[test]
    fn test_single_operand_is_not_wrapped() {
        let condition = Condition::from_infix(after(1800), Vec::new());
        assert!(matches!(condition, Condition::Time(_)));
    }

    #[test]
    fn test_sentences_skip_time_checks() {
        let condition = Condition::from_infix(
            after(1800),
            vec![
                (Connective::And, fact("GEORGE", "ASLEEP")),
                (Connective::Or, fact("MARTHA", "AWAKE")),
            ],
        );
        let names: Vec<_> = condition
            .sentences()
            .iter()
            .map(|s| s.relation.name.as_str())
            .collect();
        assert_eq!(names, ["ASLEEP", "AWAKE"]);
        assert_eq!(
            condition.to_string(),
            "{{[T > 1800] & (GEORGE ASLEEP)} / (MARTHA AWAKE)}"
        );
    }
}
