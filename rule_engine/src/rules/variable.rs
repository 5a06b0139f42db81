//! Variables and the terms that reference them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binding slot of a variable, allocated by the parse scope that declared it.
///
/// Header variables take the first slots of a rule; each subrule's local
/// variables take the slots after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariableId(pub usize);

/// A variable ranging over the members of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    /// None for anonymous variables such as `#.ROOMS`.
    pub name: Option<String>,
    pub class_name: String,
    /// Upper bound on firings per test pass. Only header variables use it.
    pub y_restriction: Option<u32>,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name.as_deref().unwrap_or("#"), self.class_name)?;
        if let Some(limit) = self.y_restriction {
            write!(f, ":{}", limit)?;
        }
        Ok(())
    }
}

/// Subject or object of an action or sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    /// A noun, its own single binding candidate.
    Literal(String),
}

impl Term {
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(variable) => Some(variable),
            Term::Literal(_) => None,
        }
    }

    /// Whether two terms occupy the same binding slot.
    pub fn same_slot(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Variable(a), Term::Variable(b)) => a.id == b.id,
            (Term::Literal(a), Term::Literal(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(variable) => match &variable.name {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "#.{}", variable.class_name),
            },
            Term::Literal(noun) => write!(f, "{}", noun),
        }
    }
}
