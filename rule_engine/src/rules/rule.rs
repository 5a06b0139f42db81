//! Rules: actions fired with a probability accumulated from subrules.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};
use world_model::{Effect, Relation, Universe};

use super::{Binding, Product, Subrule, Term, Variable};
use crate::error::Result;

pub const DEFAULT_SHORT_CIRCUIT_THRESHOLD: f64 = 10.0;

/// Knobs for [`Rule::test`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSettings {
    /// An increment whose magnitude reaches this decides the rule outright.
    pub short_circuit_threshold: f64,
    /// When false, bindings that give two slots the same value are skipped.
    pub allow_duplicate_bindings: bool,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            short_circuit_threshold: DEFAULT_SHORT_CIRCUIT_THRESHOLD,
            allow_duplicate_bindings: true,
        }
    }
}

/// A change to the network, applied once per binding that fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub subject: Term,
    pub relation: Relation,
    pub object: Option<Term>,
    pub raw: String,
}

impl Action {
    pub fn execute(&self, binding: &Binding) -> Result<Effect> {
        let subject = binding.resolve(&self.subject)?;
        let object = self
            .object
            .as_ref()
            .map(|object| binding.resolve(object).map(str::to_string))
            .transpose()?;
        Ok(Effect::new(subject, self.relation.clone(), object))
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        std::iter::once(&self.subject).chain(self.object.as_ref())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Some(object) => write!(f, "{} {} {}", self.subject, self.relation, object),
            None => write!(f, "{} {}", self.subject, self.relation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub actions: Vec<Action>,
    pub subrules: Vec<Subrule>,
    /// Variables declared in the action list.
    pub variables: Vec<Variable>,
    pub raw: String,
}

impl Rule {
    /// Smallest y-restriction among the header variables, if any.
    pub fn y_restriction(&self) -> Option<u32> {
        self.variables.iter().filter_map(|v| v.y_restriction).min()
    }

    /// Distinct action terms in first-seen order. Each is one axis of the
    /// binding enumeration.
    fn slots(&self) -> Vec<&Term> {
        let mut slots: Vec<&Term> = Vec::new();
        for term in self.actions.iter().flat_map(Action::terms) {
            if !slots.iter().any(|seen| seen.same_slot(term)) {
                slots.push(term);
            }
        }
        slots
    }

    /// Summary of the action list, used in logs.
    pub fn summary(&self) -> String {
        self.actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Test every binding of the header variables, queueing the effects of
    /// each one that fires. Returns the number of firings.
    pub fn test<R: Rng + ?Sized>(
        &self,
        universe: &mut Universe,
        settings: &EvaluationSettings,
        rng: &mut R,
    ) -> Result<usize> {
        let fired = self.fired_bindings(universe, settings, rng)?;
        for binding in &fired {
            self.fire(universe, binding)?;
        }
        if !fired.is_empty() {
            debug!(rule = %self.summary(), firings = fired.len(), "rule fired");
        }
        Ok(fired.len())
    }

    fn fired_bindings<R: Rng + ?Sized>(
        &self,
        universe: &Universe,
        settings: &EvaluationSettings,
        rng: &mut R,
    ) -> Result<Vec<Binding>> {
        let slots = self.slots();
        let mut candidates: Vec<&[String]> = Vec::with_capacity(slots.len());
        for slot in &slots {
            match slot {
                Term::Variable(variable) => candidates.push(universe.members(&variable.class_name)?),
                Term::Literal(noun) => candidates.push(std::slice::from_ref(noun)),
            }
        }

        let limit = self.y_restriction().map(|n| n as usize);
        let mut fired = Vec::new();

        for values in Product::new(candidates) {
            if !settings.allow_duplicate_bindings && has_duplicates(&values) {
                continue;
            }

            let mut binding = Binding::new();
            for (slot, value) in slots.iter().zip(&values) {
                if let Term::Variable(variable) = slot {
                    binding.bind(variable.id, *value);
                }
            }

            if self.triggered(universe, &binding, settings, rng)? {
                fired.push(binding);
                if limit.is_some_and(|limit| fired.len() >= limit) {
                    break;
                }
            }
        }
        Ok(fired)
    }

    /// Accumulate subrule increments for one binding and draw against the total.
    ///
    /// An increment at or beyond the short-circuit threshold decides the
    /// outcome by its sign without consuming a draw.
    pub fn triggered<R: Rng + ?Sized>(
        &self,
        universe: &Universe,
        binding: &Binding,
        settings: &EvaluationSettings,
        rng: &mut R,
    ) -> Result<bool> {
        let mut probability = 0.0;
        for subrule in &self.subrules {
            let increment = subrule.increment(subrule.holds(universe, binding)?);
            if increment.abs() >= settings.short_circuit_threshold {
                trace!(%binding, increment, "short circuit");
                return Ok(increment > 0.0);
            }
            probability += increment;
        }

        let draw: f64 = rng.gen();
        trace!(%binding, probability, draw, "drew against probability");
        Ok(draw < probability)
    }

    /// Queue this rule's effects for one binding.
    pub fn fire(&self, universe: &mut Universe, binding: &Binding) -> Result<()> {
        let effects = self
            .actions
            .iter()
            .map(|action| action.execute(binding))
            .collect::<Result<Vec<_>>>()?;
        universe.queue(effects);
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn has_duplicates(values: &[&str]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().any(|value| !seen.insert(*value))
}
