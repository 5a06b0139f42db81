//! Error types for compiling and running rules.

use thiserror::Error;
use world_model::WorldError;

/// Grammar errors raised while compiling rule or lexicon text.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("malformed action definition '{definition}': {reason}")]
    MalformedAction { definition: String, reason: String },

    #[error("malformed subrule '{definition}': {reason}")]
    MalformedSubrule { definition: String, reason: String },

    #[error("malformed sentence '{sentence}': {reason}")]
    MalformedSentence { sentence: String, reason: String },

    #[error("malformed relation '{token}': {reason}")]
    MalformedRelation { token: String, reason: String },

    #[error("relation '{token}' has a duration operator but no duration value")]
    MissingDurationValue { token: String },

    #[error("variable '{0}' referenced before it was declared with a class")]
    UndeclaredVariable(String),

    #[error("variable '{name}' already declared with class {declared}, cannot redeclare as {requested}")]
    ConflictingDeclaration {
        name: String,
        declared: String,
        requested: String,
    },

    #[error("malformed variable '{token}': {reason}")]
    MalformedVariable { token: String, reason: String },

    #[error("malformed lexical-expression definition: {0}")]
    MalformedLexicon(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn action(definition: &str, reason: impl Into<String>) -> Self {
        Self::MalformedAction {
            definition: definition.to_string(),
            reason: reason.into(),
        }
    }

    pub fn subrule(definition: &str, reason: impl Into<String>) -> Self {
        Self::MalformedSubrule {
            definition: definition.to_string(),
            reason: reason.into(),
        }
    }

    pub fn sentence(sentence: &str, reason: impl Into<String>) -> Self {
        Self::MalformedSentence {
            sentence: sentence.to_string(),
            reason: reason.into(),
        }
    }

    pub fn relation(token: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRelation {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub fn variable(token: &str, reason: impl Into<String>) -> Self {
        Self::MalformedVariable {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while validating or running a simulation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("no lexical expression for {kind} {name} referenced in action {action}")]
    MissingLexicalExpression {
        kind: &'static str,
        name: String,
        action: String,
    },

    #[error("variable {0} has no value in the current binding")]
    Unbound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
