//! Subrules: probability increments guarded by a condition.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use world_model::Universe;

use super::{Binding, Condition, Product, Variable};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subrule {
    pub true_increment: f64,
    pub false_increment: f64,
    pub condition: Condition,
    /// Variables first declared inside this subrule's sentences.
    pub locals: Vec<Variable>,
    pub raw: String,
}

impl Subrule {
    pub fn increment(&self, held: bool) -> f64 {
        if held {
            self.true_increment
        } else {
            self.false_increment
        }
    }

    /// Whether the condition holds for the header binding.
    ///
    /// Local variables are existential: the subrule holds if any assignment of
    /// their class members satisfies the condition.
    pub fn holds(&self, universe: &Universe, header: &Binding) -> Result<bool> {
        let free: Vec<&Variable> = self.locals.iter().filter(|v| !header.is_bound(v.id)).collect();

        let mut candidates = Vec::with_capacity(free.len());
        for variable in &free {
            candidates.push(universe.members(&variable.class_name)?);
        }

        for values in Product::new(candidates) {
            let mut binding = header.clone();
            for (variable, value) in free.iter().zip(values) {
                binding.bind(variable.id, value);
            }
            if self.condition.evaluate(universe, &binding)? {
                trace!(subrule = %self.raw, %binding, "subrule held");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl fmt::Display for Subrule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
