//! Subject/object terms and relation tokens.

use world_model::{DurationOp, Relation};

use super::Scope;
use crate::error::CompileError;
use crate::rules::Term;

/// A relation token after its prefixes have been stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelation {
    pub relation: Relation,
    /// `<-` marker: subject and object trade places once both are resolved.
    pub left_directed: bool,
}

/// Resolve a subject or object token against `scope`, declaring it if the
/// token carries a class.
pub fn parse_term(token: &str, scope: &mut Scope) -> Result<Term, CompileError> {
    if token == "X" || token == "Y" {
        return scope.resolve(token).map(Term::Variable);
    }

    if let Some(class_name) = token.strip_prefix("X.") {
        let class_name = class_name_of(token, class_name)?;
        if class_name.contains(':') {
            return Err(CompileError::variable(token, "only Y may carry a y-restriction"));
        }
        return scope.declare(Some("X"), class_name, None).map(Term::Variable);
    }

    if let Some(rest) = token.strip_prefix("Y.") {
        let (class_name, y_restriction) = match rest.split_once(':') {
            Some((class_name, limit)) => (class_name, Some(parse_y_restriction(token, limit)?)),
            None => (rest, None),
        };
        let class_name = class_name_of(token, class_name)?;
        return scope.declare(Some("Y"), class_name, y_restriction).map(Term::Variable);
    }

    if let Some(rest) = token.strip_prefix('#') {
        return match rest.split_once('.') {
            Some((name, class_name)) => {
                let class_name = class_name_of(token, class_name)?;
                let name = (!name.is_empty()).then_some(name);
                scope.declare(name, class_name, None).map(Term::Variable)
            }
            None if rest.is_empty() => Err(CompileError::variable(token, "anonymous variable needs a class")),
            None => scope.resolve(rest).map(Term::Variable),
        };
    }

    Ok(Term::Literal(token.to_string()))
}

fn class_name_of<'a>(token: &str, class_name: &'a str) -> Result<&'a str, CompileError> {
    if class_name.is_empty() {
        return Err(CompileError::variable(token, "missing class name"));
    }
    Ok(class_name)
}

fn parse_y_restriction(token: &str, limit: &str) -> Result<u32, CompileError> {
    match limit.parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(CompileError::variable(token, "y-restriction must be a positive integer")),
    }
}

/// Parse `[!=][<-]NAME[OP VALUE]`.
pub fn parse_relation(token: &str) -> Result<ParsedRelation, CompileError> {
    let mut rest = token;

    let negate = match rest.strip_prefix("!=") {
        Some(stripped) => {
            rest = stripped;
            true
        }
        None => false,
    };
    let left_directed = match rest.strip_prefix("<-") {
        Some(stripped) => {
            rest = stripped;
            true
        }
        None => false,
    };

    let mut name = rest;
    let mut duration = None;
    for op in DurationOp::SCAN_ORDER {
        if let Some((before, value)) = rest.split_once(op.symbol()) {
            if value.is_empty() {
                return Err(CompileError::MissingDurationValue {
                    token: token.to_string(),
                });
            }
            let minutes = value
                .parse::<u32>()
                .map_err(|_| CompileError::relation(token, format!("'{}' is not a duration in minutes", value)))?;
            name = before;
            duration = Some((op, minutes));
            break;
        }
    }

    if name.is_empty() {
        return Err(CompileError::relation(token, "missing relation name"));
    }

    let mut relation = Relation::new(name);
    relation.negate = negate;
    if let Some((op, minutes)) = duration {
        relation = relation.with_duration(op, minutes);
    }
    Ok(ParsedRelation {
        relation,
        left_directed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use world_model::DurationModifier;

    #[test]
    fn test_header_variables() {
        let mut scope = Scope::new();
        assert!(matches!(parse_term("X", &mut scope), Err(CompileError::UndeclaredVariable(_))));

        let x = parse_term("X.PEOPLE", &mut scope).unwrap();
        assert_eq!(parse_term("X", &mut scope).unwrap(), x);

        let y = parse_term("Y.ROOMS:3", &mut scope).unwrap();
        let y = y.as_variable().unwrap();
        assert_eq!(y.class_name, "ROOMS");
        assert_eq!(y.y_restriction, Some(3));

        assert!(parse_term("X.PEOPLE:2", &mut scope).is_err());
        assert!(parse_term("Y.ROOMS:0", &mut Scope::new()).is_err());
        assert!(parse_term("Y.", &mut Scope::new()).is_err());
    }

    #[test]
    fn test_local_variables() {
        let mut scope = Scope::new();
        assert!(matches!(parse_term("#W", &mut scope), Err(CompileError::UndeclaredVariable(_))));

        let w = parse_term("#W.PEOPLE", &mut scope).unwrap();
        assert_eq!(parse_term("#W", &mut scope).unwrap(), w);

        let anonymous = parse_term("#.ROOMS", &mut scope).unwrap();
        let anonymous = anonymous.as_variable().unwrap();
        assert_eq!(anonymous.name, None);
        assert_eq!(anonymous.class_name, "ROOMS");

        assert!(parse_term("#", &mut scope).is_err());
        assert!(parse_term("#.", &mut scope).is_err());
    }

    #[test]
    fn test_literals() {
        let mut scope = Scope::new();
        assert_eq!(parse_term("GEORGE", &mut scope).unwrap(), Term::Literal("GEORGE".to_string()));
        assert_eq!(parse_term("XAVIER", &mut scope).unwrap(), Term::Literal("XAVIER".to_string()));
        assert!(scope.variables().is_empty());
    }

    #[test]
    fn test_relation_prefixes() {
        let plain = parse_relation("LIKES").unwrap();
        assert_eq!(plain.relation, Relation::new("LIKES"));
        assert!(!plain.left_directed);

        let parsed = parse_relation("!=<-FEARS").unwrap();
        assert!(parsed.relation.negate);
        assert!(parsed.left_directed);
        assert_eq!(parsed.relation.name, "FEARS");
    }

    #[test]
    fn test_relation_durations() {
        let cases = [
            ("LIKES=30", DurationOp::Equal),
            ("LIKES!=30", DurationOp::NotEqual),
            ("LIKES<30", DurationOp::Less),
            ("LIKES>30", DurationOp::Greater),
        ];
        for (token, op) in cases {
            let parsed = parse_relation(token).unwrap();
            assert_eq!(parsed.relation.name, "LIKES", "{}", token);
            assert_eq!(parsed.relation.duration, Some(DurationModifier { op, minutes: 30 }));
        }

        let negated = parse_relation("!=LIKES>60").unwrap();
        assert!(negated.relation.negate);
        assert_eq!(negated.relation.duration.map(|d| d.op), Some(DurationOp::Greater));
    }

    #[test]
    fn test_malformed_relations() {
        assert!(matches!(parse_relation("LIKES>"), Err(CompileError::MissingDurationValue { .. })));
        assert!(matches!(parse_relation("LIKES>SOON"), Err(CompileError::MalformedRelation { .. })));
        assert!(matches!(parse_relation("!="), Err(CompileError::MalformedRelation { .. })));
        assert!(matches!(parse_relation(">30"), Err(CompileError::MalformedRelation { .. })));
    }
}
