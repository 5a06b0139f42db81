//! Compiler for the rule language.
//!
//! A rules file is a sequence of `$RULE` definitions:
//!
//! ```text
//! $RULE X.PEOPLE LIKES Y.PEOPLE:1, Y ADMIRES X;
//!       0.4, 0: (X LIKES #W.PEOPLE) & (#W LIKES Y);
//!       -10, 0: (X HATES Y) / [T > 2200]
//! ```
//!
//! The head is a comma-separated action list that declares the header
//! variables. Each `;`-separated subrule is `TRUE,FALSE: SENTENCES`.

mod lexicon;
mod normalize;
mod scope;
mod sentences;
mod terms;

pub use lexicon::*;
pub use normalize::{content_lines, normalize, split_rules, COMMENT_MARKER, RULE_SEPARATOR};
pub use scope::*;
pub use sentences::parse_sentence_list;
pub use terms::*;

use std::path::Path;
use tracing::debug;

use crate::error::CompileError;
use crate::rules::{Action, Rule, Subrule};

/// Compile every rule in a rules file's text, in declaration order.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, CompileError> {
    let normalized = normalize(text);
    let rules = split_rules(&normalized)
        .map(parse_rule)
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = rules.len(), "compiled rules");
    Ok(rules)
}

/// Read and compile a rules file.
pub fn parse_rules_file(path: impl AsRef<Path>) -> Result<Vec<Rule>, CompileError> {
    parse_rules(&std::fs::read_to_string(path)?)
}

/// Compile one normalized rule definition (without its `$RULE` keyword).
pub fn parse_rule(definition: &str) -> Result<Rule, CompileError> {
    let mut parts = definition.split(';').map(str::trim);
    let action_list = parts.next().unwrap_or_default();

    let mut scope = Scope::new();
    let actions = parse_actions(action_list, &mut scope)?;
    if actions.is_empty() {
        return Err(CompileError::action(definition, "rule has no actions"));
    }

    let subrules = parts
        .filter(|part| !part.is_empty())
        .map(|part| parse_subrule(part, &scope))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule {
        actions,
        subrules,
        variables: scope.variables().to_vec(),
        raw: definition.to_string(),
    })
}

fn parse_actions(action_list: &str, scope: &mut Scope) -> Result<Vec<Action>, CompileError> {
    let mut actions = Vec::new();
    for definition in action_list.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        let tokens: Vec<&str> = definition.split_whitespace().collect();
        let (subject, relation, object) = match tokens.as_slice() {
            [subject, relation] => (*subject, *relation, None),
            [subject, relation, object] => (*subject, *relation, Some(*object)),
            _ => return Err(CompileError::action(definition, "expected 'subject relation [object]'")),
        };

        let mut subject = parse_term(subject, scope)?;
        let parsed = parse_relation(relation)?;
        let mut object = object.map(|object| parse_term(object, scope)).transpose()?;

        if parsed.relation.duration.is_some() {
            return Err(CompileError::action(
                definition,
                "duration modifiers only apply to sentences",
            ));
        }
        if parsed.left_directed {
            let target = object
                .take()
                .ok_or_else(|| CompileError::action(definition, "a left-directed relation needs an object"))?;
            object = Some(std::mem::replace(&mut subject, target));
        }

        actions.push(Action {
            subject,
            relation: parsed.relation,
            object,
            raw: definition.to_string(),
        });
    }
    Ok(actions)
}

/// Parse `TRUE,FALSE: SENTENCES` in a child of the rule's head scope.
pub fn parse_subrule(definition: &str, head: &Scope) -> Result<Subrule, CompileError> {
    let (increments, sentences) = definition
        .split_once(':')
        .ok_or_else(|| CompileError::subrule(definition, "missing ':' after the increments"))?;
    let (true_increment, false_increment) = increments
        .split_once(',')
        .ok_or_else(|| CompileError::subrule(definition, "expected 'TRUE,FALSE' increments"))?;

    let mut scope = head.child();
    let condition = parse_sentence_list(sentences, &mut scope)?;

    Ok(Subrule {
        true_increment: parse_increment(definition, true_increment)?,
        false_increment: parse_increment(definition, false_increment)?,
        condition,
        locals: scope.into_locals(),
        raw: definition.to_string(),
    })
}

fn parse_increment(definition: &str, increment: &str) -> Result<f64, CompileError> {
    let increment = increment.trim();
    match increment.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CompileError::subrule(
            definition,
            format!("'{}' is not a number", increment),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Condition, Term, VariableId};

    #[test]
    fn test_parse_round_trip_rule() {
        let rules = parse_rules("$RULE X.PEOPLE LIKES Y.PEOPLE; 10,0: (X LIKES Y)").unwrap();
        assert_eq!(rules.len(), 1);

        let rule = &rules[0];
        assert_eq!(rule.actions.len(), 1);
        assert_eq!(rule.variables.len(), 2);
        assert_eq!(rule.subrules.len(), 1);
        assert_eq!(rule.subrules[0].true_increment, 10.0);
        assert_eq!(rule.subrules[0].false_increment, 0.0);
        assert!(rule.subrules[0].locals.is_empty());
        assert_eq!(rule.summary(), "X LIKES Y");
    }

    #[test]
    fn test_parse_multiple_rules_and_comments() {
        let text = "% people\n$rule x.people likes y.people:2;\n  0.5, -0.25 : (x likes y) & [t < 2000]\n\n$RULE GEORGE ASLEEP; 1,0: [T > 2300]\n";
        let rules = parse_rules(text).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].y_restriction(), Some(2));
        assert_eq!(rules[0].subrules[0].false_increment, -0.25);
        assert!(matches!(rules[0].subrules[0].condition, Condition::All(_)));
        assert_eq!(rules[1].actions[0].subject, Term::Literal("GEORGE".to_string()));
        assert_eq!(rules[1].actions[0].object, None);
    }

    #[test]
    fn test_y_restriction_on_a_later_action_applies() {
        let rules = parse_rules("$RULE X.PEOPLE LIKES Y.PEOPLE, Y.PEOPLE:1 ADMIRES X").unwrap();
        assert_eq!(rules[0].y_restriction(), Some(1));

        let rule = parse_rule("Y.PEOPLE:3 ADMIRES X.PEOPLE, X LIKES Y.PEOPLE:2").unwrap();
        assert_eq!(rule.y_restriction(), Some(2));
    }

    #[test]
    fn test_left_directed_action_swaps() {
        let rule = parse_rule("X.PEOPLE <-FEARS DOG").unwrap();
        let action = &rule.actions[0];
        assert_eq!(action.subject, Term::Literal("DOG".to_string()));
        assert!(matches!(&action.object, Some(Term::Variable(x)) if x.class_name == "PEOPLE"));
    }

    #[test]
    fn test_subrule_locals_do_not_leak() {
        let rule = parse_rule(
            "X.PEOPLE LIKES Y.PEOPLE; 0.5,0: (X LIKES #W.PEOPLE); 0.5,0: (#W.ROOMS HAS Y)",
        )
        .unwrap();
        assert_eq!(rule.variables.len(), 2);
        assert_eq!(rule.subrules[0].locals[0].id, VariableId(2));
        // Redeclared in a sibling with another class: no conflict.
        assert_eq!(rule.subrules[1].locals[0].class_name, "ROOMS");

        assert!(matches!(
            parse_rule("X.PEOPLE LIKES Y.PEOPLE; 0.5,0: (X LIKES #W.PEOPLE); 0.5,0: (#W HAS Y)"),
            Err(CompileError::UndeclaredVariable(_))
        ));
    }

    #[test]
    fn test_grammar_errors() {
        assert!(matches!(parse_rule("X.PEOPLE"), Err(CompileError::MalformedAction { .. })));
        assert!(matches!(parse_rule("A B C D"), Err(CompileError::MalformedAction { .. })));
        assert!(matches!(parse_rule("X LIKES Y"), Err(CompileError::UndeclaredVariable(_))));
        assert!(matches!(
            parse_rule("X.PEOPLE ASLEEP; 1 0: (X ASLEEP)"),
            Err(CompileError::MalformedSubrule { .. })
        ));
        assert!(matches!(
            parse_rule("X.PEOPLE ASLEEP; 1,0 (X ASLEEP)"),
            Err(CompileError::MalformedSubrule { .. })
        ));
        assert!(matches!(
            parse_rule("X.PEOPLE ASLEEP; LIKELY,0: (X ASLEEP)"),
            Err(CompileError::MalformedSubrule { .. })
        ));
        assert!(matches!(parse_rule("X.PEOPLE ASLEEP>30"), Err(CompileError::MalformedAction { .. })));
        assert!(matches!(
            parse_rule("X.PEOPLE ASLEEP; 1,0: (X ASLEEP>)"),
            Err(CompileError::MissingDurationValue { .. })
        ));
        assert!(matches!(
            parse_rule("X.PEOPLE LIKES Y.PEOPLE, X LIKES Y.ROOMS"),
            Err(CompileError::ConflictingDeclaration { .. })
        ));
    }
}
