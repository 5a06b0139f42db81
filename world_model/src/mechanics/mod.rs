//! Relation mechanics: negation, duration modifiers and clock comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied to the number of minutes a fact has held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationOp {
    Equal,
    NotEqual,
    Less,
    Greater,
}

impl DurationOp {
    /// Operators in the order a relation token is scanned for them.
    /// `!=` must come before `=` so that it is not split in half.
    pub const SCAN_ORDER: [DurationOp; 4] = [
        DurationOp::NotEqual,
        DurationOp::Equal,
        DurationOp::Less,
        DurationOp::Greater,
    ];

    /// The surface symbol used in rule text.
    pub fn symbol(&self) -> &'static str {
        match self {
            DurationOp::Equal => "=",
            DurationOp::NotEqual => "!=",
            DurationOp::Less => "<",
            DurationOp::Greater => ">",
        }
    }

    /// Check `age <op> minutes`.
    pub fn holds(&self, age: u32, minutes: u32) -> bool {
        match self {
            DurationOp::Equal => age == minutes,
            DurationOp::NotEqual => age != minutes,
            DurationOp::Less => age < minutes,
            DurationOp::Greater => age > minutes,
        }
    }
}

/// A sentence-side constraint on how long a matching fact must have held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationModifier {
    pub op: DurationOp,
    /// Elapsed simulated minutes.
    pub minutes: u32,
}

/// Comparison of the simulated clock against a literal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOp {
    Equal,
    NotEqual,
    Less,
    Greater,
}

impl TimeOp {
    /// Parse one of `==`, `!=`, `<`, `>`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(TimeOp::Equal),
            "!=" => Some(TimeOp::NotEqual),
            "<" => Some(TimeOp::Less),
            ">" => Some(TimeOp::Greater),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TimeOp::Equal => "==",
            TimeOp::NotEqual => "!=",
            TimeOp::Less => "<",
            TimeOp::Greater => ">",
        }
    }

    /// Check `clock <op> value`.
    pub fn compare(&self, clock: u32, value: u32) -> bool {
        match self {
            TimeOp::Equal => clock == value,
            TimeOp::NotEqual => clock != value,
            TimeOp::Less => clock < value,
            TimeOp::Greater => clock > value,
        }
    }
}

/// A named relation between nodes of the semantic network.
///
/// As an action effect, `negate` means deletion. As a sentence condition it
/// means non-existence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub negate: bool,
    pub duration: Option<DurationModifier>,
}

impl Relation {
    /// Create a plain, non-negated relation.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negate: false,
            duration: None,
        }
    }

    /// Mark the relation as a deletion/non-existence relation.
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Attach a duration modifier.
    pub fn with_duration(mut self, op: DurationOp, minutes: u32) -> Self {
        self.duration = Some(DurationModifier { op, minutes });
        self
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            write!(f, "!=")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(duration) = &self.duration {
            write!(f, "{}{}", duration.op.symbol(), duration.minutes)?;
        }
        Ok(())
    }
}
