//! # World Model
//!
//! The fact store of the simulation: a semantic network of
//! subject-relation-object triples with a class table, a simulated clock,
//! a queue of pending effects and a per-tick history.
//!
//! This crate has no knowledge of the rule language. Rules read it through
//! [`Universe::matches`] and write to it through [`Universe::queue`].

pub mod entities;
pub mod error;
pub mod mechanics;
pub mod world_state;

pub use entities::*;
pub use error::{Result, WorldError};
pub use mechanics::*;
pub use world_state::*;
