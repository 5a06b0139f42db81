//! Variable scopes used while compiling one rule.

use std::collections::HashMap;

use crate::error::CompileError;
use crate::rules::{Variable, VariableId};

/// Variables visible while parsing a rule head or a subrule body.
///
/// Slots are allocated in declaration order. A subrule parses in a
/// [`child`](Scope::child) of the head scope, so its locals are numbered
/// after the header variables and vanish with the child.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: Vec<Variable>,
    by_name: HashMap<String, VariableId>,
    inherited: usize,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope for a subrule body, seeing every variable declared so far.
    pub fn child(&self) -> Self {
        Self {
            variables: self.variables.clone(),
            by_name: self.by_name.clone(),
            inherited: self.variables.len(),
        }
    }

    /// Declare a variable, or return the existing one if the name is already
    /// declared with the same class. Repeated y-restrictions keep the smallest.
    pub fn declare(
        &mut self,
        name: Option<&str>,
        class_name: &str,
        y_restriction: Option<u32>,
    ) -> Result<Variable, CompileError> {
        if let Some(id) = name.and_then(|name| self.by_name.get(name).copied()) {
            let existing = &mut self.variables[id.0];
            if existing.class_name != class_name {
                return Err(CompileError::ConflictingDeclaration {
                    name: name.unwrap_or_default().to_string(),
                    declared: existing.class_name.clone(),
                    requested: class_name.to_string(),
                });
            }
            existing.y_restriction = match (existing.y_restriction, y_restriction) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
            return Ok(existing.clone());
        }

        let variable = Variable {
            id: VariableId(self.variables.len()),
            name: name.map(str::to_string),
            class_name: class_name.to_string(),
            y_restriction,
        };
        if let Some(name) = name {
            self.by_name.insert(name.to_string(), variable.id);
        }
        self.variables.push(variable.clone());
        Ok(variable)
    }

    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.by_name.get(name).map(|id| &self.variables[id.0])
    }

    /// Look up a variable that must already be declared.
    pub fn resolve(&self, name: &str) -> Result<Variable, CompileError> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| CompileError::UndeclaredVariable(name.to_string()))
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Variables declared in this scope rather than inherited from its parent.
    pub fn into_locals(mut self) -> Vec<Variable> {
        self.variables.split_off(self.inherited)
    }
}
