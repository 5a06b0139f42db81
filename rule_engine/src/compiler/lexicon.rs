//! Lexical expressions: surface phrasings for nouns and relations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::normalize::content_lines;
use crate::error::CompileError;

/// `NAME: phrase, phrase, ...`, one entry per line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    entries: HashMap<String, Vec<String>>,
}

impl Lexicon {
    /// Parse lexicon text. A line without exactly one `:` is an error.
    pub fn parse(text: &str) -> Result<Self, CompileError> {
        let mut entries = HashMap::new();
        for (number, line) in content_lines(text) {
            let (name, phrases) = line
                .split_once(':')
                .filter(|(_, phrases)| !phrases.contains(':'))
                .ok_or_else(|| CompileError::MalformedLexicon(format!("line {}: {}", number, line)))?;
            let phrases = phrases
                .split(',')
                .map(str::trim)
                .filter(|phrase| !phrase.is_empty())
                .map(str::to_string)
                .collect();
            entries.insert(name.trim().to_string(), phrases);
        }
        Ok(Self { entries })
    }

    /// Read and parse a lexicon file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Whether `name` has an entry, even an empty one.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All phrasings for `name`.
    pub fn phrases(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// The phrasing the report uses.
    pub fn first_phrase(&self, name: &str) -> Option<&str> {
        self.phrases(name)?.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
