//! Compiled rules and their evaluation against a [`world_model::Universe`].

mod binding;
mod condition;
mod rule;
mod sentence;
mod subrule;
mod variable;

pub use binding::*;
pub use condition::*;
pub use rule::*;
pub use sentence::*;
pub use subrule::*;
pub use variable::*;
