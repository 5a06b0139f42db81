//! The tick loop driving rules against a universe.

mod config;
mod report;

pub use config::*;
pub use report::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use world_model::{Universe, UpdateSummary};

use crate::compiler::{self, Lexicon};
use crate::error::{EngineError, Result};
use crate::rules::{EvaluationSettings, Rule, Term};

/// What one call to [`Simulation::simulate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Clock time after the advance.
    pub time: u32,
    /// Effects of the previous tick applied at this boundary.
    pub update: UpdateSummary,
    /// Bindings fired by this tick's rule tests, queued for the next one.
    pub firings: usize,
}

/// Rules, the universe they run against, and the random source deciding
/// each trigger.
pub struct Simulation<R = StdRng> {
    rules: Vec<Rule>,
    universe: Universe,
    lexicon: Lexicon,
    settings: EvaluationSettings,
    timestep: u32,
    rng: R,
}

impl Simulation<StdRng> {
    /// Compile and load everything a config names, seeding the random source.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rules = compiler::parse_rules_file(&config.rules)?;
        let mut universe = Universe::new(config.start_time)?;
        universe.load_initial_conditions_file(&config.initial_conditions)?;
        let lexicon = Lexicon::from_file(&config.lexicon)?;

        let seed = config.resolve_seed();
        info!(
            rules = rules.len(),
            facts = universe.fact_count(),
            seed,
            "loaded simulation"
        );
        Simulation::new(rules, universe, lexicon, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Assemble a simulation and check its rules against the lexicon and classes.
    pub fn new(
        rules: Vec<Rule>,
        universe: Universe,
        lexicon: Lexicon,
        config: &SimulationConfig,
        rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let simulation = Self {
            rules,
            universe,
            lexicon,
            settings: config.settings(),
            timestep: config.timestep,
            rng,
        };
        simulation.validate()?;
        Ok(simulation)
    }

    /// Check that every action can be rendered and every variable's class exists.
    pub fn validate(&self) -> Result<()> {
        validate_lexicon(&self.rules, &self.lexicon)?;
        validate_classes(&self.rules, &self.universe)
    }

    /// One tick: snapshot, advance the clock, apply last tick's effects, then
    /// test every rule in declaration order.
    pub fn simulate(&mut self) -> Result<TickReport> {
        let update = self.advance();

        let mut firings = 0;
        for rule in &self.rules {
            firings += rule.test(&mut self.universe, &self.settings, &mut self.rng)?;
        }
        debug!(time = self.universe.time(), firings, "tested rules");

        Ok(TickReport {
            time: self.universe.time(),
            update,
            firings,
        })
    }

    /// Run `frames` ticks, then flush the last tick's effects.
    pub fn run(&mut self, frames: u32) -> Result<Vec<TickReport>> {
        let mut reports = Vec::with_capacity(frames as usize);
        for _ in 0..frames {
            reports.push(self.simulate()?);
        }
        self.terminate();
        Ok(reports)
    }

    /// Apply whatever the final tick queued, without testing rules again.
    pub fn terminate(&mut self) -> UpdateSummary {
        let update = self.advance();
        info!(time = self.universe.time(), facts = self.universe.fact_count(), "simulation finished");
        update
    }

    fn advance(&mut self) -> UpdateSummary {
        self.universe.snapshot();
        self.universe.advance_clock(self.timestep);
        let update = self.universe.apply_pending();
        info!(
            time = %self.universe.clock(),
            asserted = update.asserted,
            retracted = update.retracted,
            "tick"
        );
        update
    }

    /// Get the universe being simulated.
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Get compiled rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get the lexicon used for validation and reporting.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Get evaluation settings derived from the config.
    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }
}

/// Every literal noun and relation an action can emit needs a lexical
/// expression.
pub fn validate_lexicon(rules: &[Rule], lexicon: &Lexicon) -> Result<()> {
    for action in rules.iter().flat_map(|rule| &rule.actions) {
        let missing = |kind: &'static str, name: &str| EngineError::MissingLexicalExpression {
            kind,
            name: name.to_string(),
            action: action.raw.clone(),
        };

        if let Term::Literal(noun) = &action.subject {
            if !lexicon.contains(noun) {
                return Err(missing("noun", noun.as_str()));
            }
        }
        if !lexicon.contains(&action.relation.name) {
            return Err(missing("relation", action.relation.name.as_str()));
        }
        if let Some(Term::Literal(noun)) = &action.object {
            if !lexicon.contains(noun) {
                return Err(missing("noun", noun.as_str()));
            }
        }
    }
    Ok(())
}

/// Every class a variable ranges over must be defined by the initial conditions.
pub fn validate_classes(rules: &[Rule], universe: &Universe) -> Result<()> {
    for rule in rules {
        let locals = rule.subrules.iter().flat_map(|subrule| &subrule.locals);
        for variable in rule.variables.iter().chain(locals) {
            universe.members(&variable.class_name)?;
        }
    }
    Ok(())
}
