//! Variable bindings and candidate enumeration.

use crate::error::{EngineError, Result};

use super::{Term, VariableId};

/// Values bound to variable slots, indexed by [`VariableId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    slots: Vec<Option<String>>,
}

impl Binding {
    /// Create a binding with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to the slot `id`, growing the slot table as needed.
    pub fn bind(&mut self, id: VariableId, value: impl Into<String>) {
        if id.0 >= self.slots.len() {
            self.slots.resize(id.0 + 1, None);
        }
        self.slots[id.0] = Some(value.into());
    }

    /// Get the value bound to `id`, if any.
    pub fn get(&self, id: VariableId) -> Option<&str> {
        self.slots.get(id.0).and_then(|slot| slot.as_deref())
    }

    /// Check whether `id` has a value.
    pub fn is_bound(&self, id: VariableId) -> bool {
        self.get(id).is_some()
    }

    /// Ground a term: literals stand for themselves, variables for their value.
    pub fn resolve<'a>(&'a self, term: &'a Term) -> Result<&'a str> {
        match term {
            Term::Literal(noun) => Ok(noun),
            Term::Variable(variable) => self
                .get(variable.id)
                .ok_or_else(|| EngineError::Unbound(variable.to_string())),
        }
    }
}

impl std::fmt::Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<_> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, value)| value.as_ref().map(|v| format!("{}={}", slot, v)))
            .collect();
        write!(f, "[{}]", values.join(", "))
    }
}

/// Lazy Cartesian product over candidate lists.
///
/// Combinations come out in odometer order: the last list varies fastest.
/// With no lists there is exactly one (empty) combination; with any empty
/// list there are none.
pub struct Product<'a> {
    lists: Vec<&'a [String]>,
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Product<'a> {
    /// Create a product over `lists`.
    pub fn new(lists: Vec<&'a [String]>) -> Self {
        let done = lists.iter().any(|list| list.is_empty());
        Self {
            indices: vec![0; lists.len()],
            lists,
            done,
        }
    }
}

impl<'a> Iterator for Product<'a> {
    type Item = Vec<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let combination = self
            .indices
            .iter()
            .zip(&self.lists)
            .map(|(&index, list)| list[index].as_str())
            .collect();

        let mut position = self.lists.len();
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.lists[position].len() {
                break;
            }
            self.indices[position] = 0;
        }

        Some(combination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Variable;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_product_order() {
        let people = strings(&["GEORGE", "MARTHA"]);
        let rooms = strings(&["HALL", "STUDY", "CELLAR"]);
        let combinations: Vec<_> = Product::new(vec![&people, &rooms]).collect();

        assert_eq!(combinations.len(), 6);
        assert_eq!(combinations[0], ["GEORGE", "HALL"]);
        assert_eq!(combinations[1], ["GEORGE", "STUDY"]);
        assert_eq!(combinations[3], ["MARTHA", "HALL"]);
        assert_eq!(combinations[5], ["MARTHA", "CELLAR"]);
    }

    #[test]
    fn test_product_edge_cases() {
        assert_eq!(Product::new(vec![]).count(), 1);

        let people = strings(&["GEORGE"]);
        let nobody: Vec<String> = Vec::new();
        assert_eq!(Product::new(vec![&people, &nobody]).count(), 0);
    }

    #[test]
    fn test_resolve() {
        let x = Variable {
            id: VariableId(1),
            name: Some("X".to_string()),
            class_name: "PEOPLE".to_string(),
            y_restriction: None,
        };
        let mut binding = Binding::new();
        assert!(matches!(
            binding.resolve(&Term::Variable(x.clone())),
            Err(EngineError::Unbound(_))
        ));

        binding.bind(VariableId(1), "GEORGE");
        assert_eq!(binding.resolve(&Term::Variable(x)).unwrap(), "GEORGE");
        assert_eq!(binding.resolve(&Term::Literal("DOG".to_string())).unwrap(), "DOG");
        assert!(!binding.is_bound(VariableId(0)));
        assert_eq!(binding.to_string(), "[1=GEORGE]");
    }
}
