//! Sentence lists: `(...)` relational groups, `[...]` time groups and the
//! `&` / `/` operators between them.

use world_model::TimeOp;

use super::terms::{parse_relation, parse_term};
use super::Scope;
use crate::error::CompileError;
use crate::rules::{Condition, Connective, Sentence, TimeSentence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Time,
    Relational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Group(Group, &'a str),
    Operator(Connective),
    Bare(&'a str),
}

fn connective(c: char) -> Option<Connective> {
    match c {
        '&' => Some(Connective::And),
        '/' => Some(Connective::Or),
        _ => None,
    }
}

fn delimiters(open: char) -> Option<(Group, char)> {
    match open {
        '[' => Some((Group::Time, ']')),
        '(' => Some((Group::Relational, ')')),
        '"' => Some((Group::Relational, '"')),
        _ => None,
    }
}

fn scan(text: &str) -> Result<Vec<Token<'_>>, CompileError> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();

    while let Some(first) = rest.chars().next() {
        if let Some(op) = connective(first) {
            tokens.push(Token::Operator(op));
            rest = &rest[1..];
        } else if let Some((group, close)) = delimiters(first) {
            let body = &rest[1..];
            let end = body
                .find(close)
                .ok_or_else(|| CompileError::sentence(text, format!("unterminated '{}' group", first)))?;
            tokens.push(Token::Group(group, body[..end].trim()));
            rest = &body[end + 1..];
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || "&/[(\"".contains(c))
                .unwrap_or(rest.len());
            tokens.push(Token::Bare(&rest[..end]));
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }
    Ok(tokens)
}

/// Threads operands and operators into a [`Condition`].
struct InfixBuilder<'a> {
    source: &'a str,
    first: Option<Condition>,
    rest: Vec<(Connective, Condition)>,
    pending: Option<Connective>,
}

impl<'a> InfixBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            first: None,
            rest: Vec::new(),
            pending: None,
        }
    }

    fn operand(&mut self, condition: Condition) -> Result<(), CompileError> {
        if self.first.is_none() {
            self.first = Some(condition);
            return Ok(());
        }
        let op = self
            .pending
            .take()
            .ok_or_else(|| CompileError::sentence(self.source, "missing '&' or '/' between sentences"))?;
        self.rest.push((op, condition));
        Ok(())
    }

    fn operator(&mut self, op: Connective) -> Result<(), CompileError> {
        if self.first.is_none() || self.pending.is_some() {
            return Err(CompileError::sentence(
                self.source,
                format!("'{}' has no left operand", op.symbol()),
            ));
        }
        self.pending = Some(op);
        Ok(())
    }

    fn finish(self) -> Result<Condition, CompileError> {
        if let Some(op) = self.pending {
            return Err(CompileError::sentence(
                self.source,
                format!("'{}' has no right operand", op.symbol()),
            ));
        }
        let first = self
            .first
            .ok_or_else(|| CompileError::sentence(self.source, "empty sentence"))?;
        Ok(Condition::from_infix(first, self.rest))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Operator(Connective),
}

/// Split on `&` and `/`, keeping the operators and dropping empty text.
fn split_operators(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, c) in text.char_indices() {
        if let Some(op) = connective(c) {
            let piece = text[start..index].trim();
            if !piece.is_empty() {
                pieces.push(Piece::Text(piece));
            }
            pieces.push(Piece::Operator(op));
            start = index + c.len_utf8();
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        pieces.push(Piece::Text(tail));
    }
    pieces
}

/// Parse a subrule's sentence list into a condition tree, declaring any
/// local variables in `scope`.
pub fn parse_sentence_list(text: &str, scope: &mut Scope) -> Result<Condition, CompileError> {
    let mut builder = InfixBuilder::new(text);
    for token in scan(text)? {
        match token {
            Token::Operator(op) => builder.operator(op)?,
            Token::Group(Group::Time, body) => builder.operand(parse_time_group(body)?)?,
            Token::Group(Group::Relational, body) => builder.operand(parse_relational_group(body, scope)?)?,
            Token::Bare(bare) => {
                return Err(CompileError::sentence(
                    text,
                    format!("'{}' is outside any sentence group", bare),
                ))
            }
        }
    }
    builder.finish()
}

fn parse_time_group(body: &str) -> Result<Condition, CompileError> {
    let mut builder = InfixBuilder::new(body);
    for piece in split_operators(body) {
        match piece {
            Piece::Operator(op) => builder.operator(op)?,
            Piece::Text(operand) => builder.operand(Condition::Time(parse_time_sentence(operand)?))?,
        }
    }
    builder.finish()
}

fn parse_time_sentence(operand: &str) -> Result<TimeSentence, CompileError> {
    let tokens: Vec<&str> = operand.split_whitespace().collect();
    let [clock, symbol, value] = tokens.as_slice() else {
        return Err(CompileError::sentence(operand, "expected 'T <op> <time>'"));
    };
    if *clock != "T" {
        return Err(CompileError::sentence(operand, "time sentences compare against T"));
    }
    let op = TimeOp::from_symbol(symbol)
        .ok_or_else(|| CompileError::sentence(operand, format!("unknown time operator '{}'", symbol)))?;
    let value = value
        .parse::<u32>()
        .map_err(|_| CompileError::sentence(operand, format!("'{}' is not a clock time", value)))?;
    Ok(TimeSentence { op, value })
}

fn parse_relational_group(body: &str, scope: &mut Scope) -> Result<Condition, CompileError> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    let (subject, relations, object) = match tokens.as_slice() {
        [] | [_] => return Err(CompileError::sentence(body, "expected 'subject relation [object]'")),
        [subject, relation] => (*subject, relation.to_string(), None),
        [subject, relations @ .., object] => (*subject, relations.join(" "), Some(*object)),
    };

    let subject = parse_term(subject, scope)?;
    let object = object.map(|object| parse_term(object, scope)).transpose()?;

    let mut builder = InfixBuilder::new(body);
    for piece in split_operators(&relations) {
        match piece {
            Piece::Operator(op) => builder.operator(op)?,
            Piece::Text(token) => {
                if token.contains(char::is_whitespace) {
                    return Err(CompileError::sentence(body, "missing '&' or '/' between relations"));
                }
                let parsed = parse_relation(token)?;
                let sentence = if parsed.left_directed {
                    let object = object.clone().ok_or_else(|| {
                        CompileError::sentence(body, "a left-directed relation needs an object")
                    })?;
                    Sentence::new(object, parsed.relation, Some(subject.clone()))
                } else {
                    Sentence::new(subject.clone(), parsed.relation, object.clone())
                };
                builder.operand(Condition::Sentence(sentence))?;
            }
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Term;
    use world_model::Relation;

    fn head() -> Scope {
        let mut scope = Scope::new();
        parse_term("X.PEOPLE", &mut scope).unwrap();
        parse_term("Y.PEOPLE", &mut scope).unwrap();
        scope
    }

    #[test]
    fn test_scan_tokens() {
        let tokens = scan("(X LIKES Y)&[T < 1800]/ \"X FEARS Y\"").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Group(Group::Relational, "X LIKES Y"),
                Token::Operator(Connective::And),
                Token::Group(Group::Time, "T < 1800"),
                Token::Operator(Connective::Or),
                Token::Group(Group::Relational, "X FEARS Y"),
            ]
        );
        assert!(scan("(X LIKES Y").is_err());
    }

    #[test]
    fn test_relational_sentence() {
        let mut scope = head();
        let condition = parse_sentence_list("(X LIKES Y)", &mut scope).unwrap();
        let Condition::Sentence(sentence) = condition else {
            panic!("expected a single sentence");
        };
        assert_eq!(sentence.relation, Relation::new("LIKES"));
        assert_eq!(sentence.subject.to_string(), "X");
        assert_eq!(sentence.object.map(|o| o.to_string()), Some("Y".to_string()));
    }

    #[test]
    fn test_multiple_relations_expand_per_relation() {
        let mut scope = head();
        let condition = parse_sentence_list("(X LIKES/<-FEARS&!=HATES Y)", &mut scope).unwrap();
        let Condition::Any(alternatives) = &condition else {
            panic!("expected a disjunction, got {}", condition);
        };
        assert_eq!(alternatives.len(), 2);

        let sentences = condition.sentences();
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0].subject.to_string(), "X");
        // The left-directed relation is swapped on its own.
        assert_eq!(sentences[1].subject.to_string(), "Y");
        assert_eq!(sentences[1].relation.name, "FEARS");
        assert_eq!(sentences[2].subject.to_string(), "X");
        assert!(sentences[2].relation.negate);
    }

    #[test]
    fn test_time_group() {
        let condition = parse_sentence_list("[T > 1800 & T < 2100]", &mut head()).unwrap();
        assert_eq!(condition.to_string(), "{[T > 1800] & [T < 2100]}");
        assert!(parse_sentence_list("[T >= 1800]", &mut head()).is_err());
        assert!(parse_sentence_list("[NOW > 1800]", &mut head()).is_err());
    }

    #[test]
    fn test_locals_declared_in_sentences() {
        let mut scope = head().child();
        let condition = parse_sentence_list("(X LIKES #W.PEOPLE) & (#W !=LIKES X)", &mut scope).unwrap();
        let sentences = condition.sentences();
        assert_eq!(sentences[0].object, Some(sentences[1].subject.clone()));
        assert!(matches!(&sentences[1].subject, Term::Variable(w) if w.name.as_deref() == Some("W")));
        assert_eq!(scope.into_locals().len(), 1);
    }

    #[test]
    fn test_malformed_sentence_lists() {
        assert!(parse_sentence_list("", &mut head()).is_err());
        assert!(parse_sentence_list("(X LIKES Y) (Y LIKES X)", &mut head()).is_err());
        assert!(parse_sentence_list("(X LIKES Y) &", &mut head()).is_err());
        assert!(parse_sentence_list("& (X LIKES Y)", &mut head()).is_err());
        assert!(parse_sentence_list("(X LIKES Y) & BOGUS", &mut head()).is_err());
        assert!(parse_sentence_list("(X <-ASLEEP)", &mut head()).is_err());
        assert!(parse_sentence_list("(X)", &mut head()).is_err());
        assert!(parse_sentence_list("(Z.PEOPLE LIKES #Q)", &mut head()).is_err());
    }
}
