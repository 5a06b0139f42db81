//! Loader for the initial-conditions description of a universe.
//!
//! Two kinds of tab-separated lines are recognized:
//!
//! ```text
//! CLASS.PEOPLE	GEORGE, MARTHA
//! CLASS.ANIMATE	CLASS.PEOPLE, DOG
//! GEORGE	LIKES MARTHA, HUNGRY
//! ```
//!
//! Class members may name an earlier class, whose members are unioned in.
//! Lines starting with `%` are comments.

use std::path::Path;
use tracing::debug;

use super::Universe;
use crate::error::{Result, WorldError};

const CLASS_PREFIX: &str = "CLASS.";

impl Universe {
    /// Build a universe from an initial-conditions description.
    pub fn from_initial_conditions(start_time: u32, text: &str) -> Result<Self> {
        let mut universe = Universe::new(start_time)?;
        universe.load_initial_conditions(text)?;
        Ok(universe)
    }

    /// Read and load an initial-conditions file.
    pub fn load_initial_conditions_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.load_initial_conditions(&text)
    }

    /// Seed classes and facts from an initial-conditions description.
    pub fn load_initial_conditions(&mut self, text: &str) -> Result<()> {
        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            if raw.trim().is_empty() || raw.trim_start().starts_with('%') {
                continue;
            }

            let line = raw.to_uppercase();
            let (head, body) = line
                .split_once('\t')
                .ok_or_else(|| WorldError::malformed(line_number, raw, "expected a tab after the subject"))?;
            let head = head.trim();

            if let Some(class_name) = head.strip_prefix(CLASS_PREFIX) {
                self.load_class(line_number, class_name.trim(), body)?;
            } else {
                self.load_facts(line_number, head, body)?;
            }
        }
        Ok(())
    }

    fn load_class(&mut self, line_number: usize, class_name: &str, body: &str) -> Result<()> {
        if class_name.is_empty() {
            return Err(WorldError::malformed(line_number, body, "class name is empty"));
        }

        let mut members = Vec::new();
        for member in body.split(',').map(str::trim).filter(|m| !m.is_empty()) {
            match member.strip_prefix(CLASS_PREFIX) {
                Some(referenced) => members.extend(self.members(referenced.trim())?.iter().cloned()),
                None => members.push(member.to_string()),
            }
        }

        debug!(class = class_name, members = members.len(), "defined class");
        self.define_class(class_name, members);
        Ok(())
    }

    fn load_facts(&mut self, line_number: usize, subject: &str, body: &str) -> Result<()> {
        if subject.is_empty() {
            return Err(WorldError::malformed(line_number, body, "subject is empty"));
        }

        for clause in body.split(',') {
            let mut tokens = clause.split_whitespace();
            let relation = tokens
                .next()
                .ok_or_else(|| WorldError::malformed(line_number, body, "relation is empty"))?;
            let object = tokens.next();
            if tokens.next().is_some() {
                return Err(WorldError::malformed(
                    line_number,
                    clause.trim(),
                    "expected RELATION [OBJECT]",
                ));
            }
            self.assert_fact(subject, relation, object);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::Relation;

    const CONDITIONS: &str = "\
% The cast
CLASS.PEOPLE\tGEORGE, MARTHA
CLASS.ANIMALS\t\tDOG
CLASS.ANIMATE\tCLASS.PEOPLE, CLASS.ANIMALS, ghost

george\tLIKES MARTHA, HUNGRY
MARTHA\tOWNS DOG
";

    #[test]
    fn test_load_classes_with_union() {
        let universe = Universe::from_initial_conditions(1700, CONDITIONS).unwrap();
        assert_eq!(universe.members("PEOPLE").unwrap(), ["GEORGE", "MARTHA"]);
        assert_eq!(universe.members("ANIMALS").unwrap(), ["DOG"]);
        assert_eq!(
            universe.members("ANIMATE").unwrap(),
            ["GEORGE", "MARTHA", "DOG", "GHOST"]
        );
    }

    #[test]
    fn test_load_facts() {
        let universe = Universe::from_initial_conditions(1700, CONDITIONS).unwrap();
        assert_eq!(universe.fact_count(), 3);
        assert!(universe.matches("GEORGE", &Relation::new("LIKES"), Some("MARTHA")));
        assert!(universe.matches("GEORGE", &Relation::new("HUNGRY"), None));
        assert!(universe.matches("MARTHA", &Relation::new("OWNS"), Some("DOG")));

        let fact = universe.get("MARTHA", "OWNS", Some("DOG")).unwrap();
        assert!(fact.is_initial());
        assert_eq!(fact.asserted_at, 1700);
    }

    #[test]
    fn test_duplicate_initial_fact_is_unique() {
        let universe =
            Universe::from_initial_conditions(1700, "GEORGE\tLIKES MARTHA, LIKES MARTHA\n").unwrap();
        assert_eq!(universe.fact_count(), 1);
    }

    #[test]
    fn test_reference_to_undefined_class() {
        let result = Universe::from_initial_conditions(1700, "CLASS.ALL\tCLASS.NOBODY\n");
        assert!(matches!(result, Err(WorldError::UnknownClass(c)) if c == "NOBODY"));
    }

    #[test]
    fn test_missing_tab() {
        let result = Universe::from_initial_conditions(1700, "GEORGE LIKES MARTHA\n");
        assert!(matches!(result, Err(WorldError::MalformedCondition { line: 1, .. })));
    }

    #[test]
    fn test_empty_relation() {
        let result = Universe::from_initial_conditions(1700, "GEORGE\tLIKES MARTHA,,HUNGRY\n");
        assert!(matches!(result, Err(WorldError::MalformedCondition { .. })));
    }
}
