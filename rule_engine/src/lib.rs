//! # Rule Engine
//!
//! Compiles a small rule language and runs it stochastically against a
//! [`world_model::Universe`].
//!
//! ## Core Components
//!
//! - **compiler**: Normalizes rule text and parses it into [`Rule`]s; parses the lexicon
//! - **rules**: Binding enumeration, condition trees and the graded trigger
//! - **simulation**: The tick loop, configuration and the narrative report
//!
//! ## Tick Semantics
//!
//! Every rule in a tick sees the same universe. Effects queued while testing
//! rules are applied together at the start of the next tick.

pub mod compiler;
pub mod error;
pub mod rules;
pub mod simulation;

pub use compiler::{parse_rules, parse_rules_file, Lexicon};
pub use error::{CompileError, EngineError, Result};
pub use rules::*;
pub use simulation::*;
