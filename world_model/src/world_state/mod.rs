//! World state management - the universe of facts that rules are tested against.

mod clock;
mod initial_conditions;

pub use clock::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::info;

use crate::entities::{Triple, TripleId, TripleKey};
use crate::error::{Result, WorldError};
use crate::mechanics::Relation;

/// A mutation produced by a firing rule, applied at the next tick boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub subject: String,
    pub relation: Relation,
    pub object: Option<String>,
}

impl Effect {
    /// Create an effect on `subject`.
    pub fn new(subject: impl Into<String>, relation: Relation, object: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            relation,
            object,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Some(object) => write!(f, "{} {} {}", self.subject, self.relation, object),
            None => write!(f, "{} {}", self.subject, self.relation),
        }
    }
}

/// Counts of what one [`Universe::apply_pending`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Triples inserted, including re-assertions of an existing fact.
    pub asserted: usize,
    /// Triples removed by a negated effect.
    pub retracted: usize,
}

/// Triples that first appeared (or were re-asserted) in one history snapshot.
#[derive(Debug, Clone)]
pub struct HistoryFrame<'a> {
    pub time: u32,
    pub asserted: Vec<&'a Triple>,
}

/// A stochastically modifiable semantic network.
///
/// The universe owns the triple set, the class table, the clock, the queue of
/// pending effects and the per-tick history. Triples are never changed in
/// place: an update removes the keyed triple and optionally inserts a fresh one.
#[derive(Debug, Clone)]
pub struct Universe {
    /// Keyed by triple identity; the key is what enforces one triple per
    /// (subject, relation, object).
    network: BTreeMap<TripleKey, Triple>,

    /// Class name -> ordered members.
    classes: HashMap<String, Vec<String>>,

    /// Effects queued during the current tick.
    queue: Vec<Effect>,

    clock: Clock,

    next_triple_id: u64,

    /// Clock time -> network snapshot taken before the clock left that time.
    history: BTreeMap<u32, Vec<Triple>>,
}

impl Universe {
    /// Create an empty universe whose clock starts at `start_time` (HHMM).
    pub fn new(start_time: u32) -> Result<Self> {
        Ok(Self {
            network: BTreeMap::new(),
            classes: HashMap::new(),
            queue: Vec::new(),
            clock: Clock::new(start_time)?,
            next_triple_id: 0,
            history: BTreeMap::new(),
        })
    }

    // ── Classes ──────────────────────────────────────────────

    /// Define a class, or extend it if it already exists.
    pub fn define_class(&mut self, name: impl Into<String>, members: impl IntoIterator<Item = String>) {
        self.classes.entry(name.into()).or_default().extend(members);
    }

    /// Members of a class, in definition order.
    pub fn members(&self, class_name: &str) -> Result<&[String]> {
        self.classes
            .get(class_name)
            .map(|members| members.as_slice())
            .ok_or_else(|| WorldError::UnknownClass(class_name.to_string()))
    }

    // ── Facts ────────────────────────────────────────────────

    /// Insert a fact stamped with the current time, replacing any triple with
    /// the same key.
    pub fn assert_fact(&mut self, subject: &str, relation: &str, object: Option<&str>) -> TripleId {
        let key = TripleKey::new(subject, relation, object);
        self.network.remove(&key);

        let id = TripleId(self.next_triple_id);
        self.next_triple_id += 1;

        let triple = Triple {
            id,
            subject: key.subject.clone(),
            relation: key.relation.clone(),
            object: key.object.clone(),
            asserted_at: self.clock.time(),
            asserted_elapsed: self.clock.elapsed_minutes(),
        };
        let replaced = self.network.insert(key, triple);
        debug_assert!(replaced.is_none());
        id
    }

    /// Remove the fact with the given key, if present.
    pub fn retract_fact(&mut self, subject: &str, relation: &str, object: Option<&str>) -> Option<Triple> {
        self.network.remove(&TripleKey::new(subject, relation, object))
    }

    /// Get the unique triple with the given key.
    pub fn get(&self, subject: &str, relation: &str, object: Option<&str>) -> Option<&Triple> {
        self.network.get(&TripleKey::new(subject, relation, object))
    }

    /// Test a sentence against the network.
    ///
    /// A triple qualifies when it exists and, if the relation carries a duration
    /// modifier, its age satisfies it. The result is flipped for negated
    /// relations.
    pub fn matches(&self, subject: &str, relation: &Relation, object: Option<&str>) -> bool {
        let qualifying = match self.get(subject, &relation.name, object) {
            Some(triple) => match &relation.duration {
                Some(duration) => duration
                    .op
                    .holds(triple.age(self.clock.elapsed_minutes()), duration.minutes),
                None => true,
            },
            None => false,
        };
        qualifying != relation.negate
    }

    /// All facts, in key order.
    pub fn network(&self) -> impl Iterator<Item = &Triple> {
        self.network.values()
    }

    /// All facts, in assertion order.
    pub fn facts_by_id(&self) -> Vec<&Triple> {
        let mut facts: Vec<_> = self.network.values().collect();
        facts.sort_by_key(|triple| triple.id);
        facts
    }

    /// Number of facts in the network.
    pub fn fact_count(&self) -> usize {
        self.network.len()
    }

    // ── Pending effects ──────────────────────────────────────

    /// Queue effects for the next tick boundary.
    pub fn queue(&mut self, effects: impl IntoIterator<Item = Effect>) {
        self.queue.extend(effects);
    }

    /// Effects waiting for the next tick boundary.
    pub fn pending(&self) -> &[Effect] {
        &self.queue
    }

    /// Apply every queued effect in order, then clear the queue.
    ///
    /// Each effect first removes the identically keyed triple. A non-negated
    /// effect then inserts a fresh one, which restarts its duration.
    pub fn apply_pending(&mut self) -> UpdateSummary {
        let mut summary = UpdateSummary::default();
        let queue = std::mem::take(&mut self.queue);

        for effect in queue {
            let object = effect.object.as_deref();
            let removed = self.retract_fact(&effect.subject, &effect.relation.name, object);

            if effect.relation.negate {
                if let Some(triple) = removed {
                    info!(time = self.clock.time(), "retracted: {}", triple);
                    summary.retracted += 1;
                }
                continue;
            }

            let id = self.assert_fact(&effect.subject, &effect.relation.name, object);
            info!(time = self.clock.time(), id = id.0, "asserted: {}", effect);
            summary.asserted += 1;
        }

        summary
    }

    // ── Time & history ───────────────────────────────────────

    /// Get the simulation clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Current HHMM time.
    pub fn time(&self) -> u32 {
        self.clock.time()
    }

    /// Minutes since the simulation started.
    pub fn elapsed_minutes(&self) -> u32 {
        self.clock.elapsed_minutes()
    }

    /// Advance the clock by `minutes`.
    pub fn advance_clock(&mut self, minutes: u32) {
        self.clock.advance(minutes);
    }

    /// Record the current network under the current clock time.
    pub fn snapshot(&mut self) {
        let facts = self.facts_by_id().into_iter().cloned().collect();
        self.history.insert(self.clock.time(), facts);
    }

    /// Snapshots keyed by the clock time they were taken at.
    pub fn history(&self) -> &BTreeMap<u32, Vec<Triple>> {
        &self.history
    }

    /// Diff consecutive snapshots by triple identity.
    ///
    /// The first frame lists every triple; later frames list triples whose id
    /// did not appear in the previous snapshot.
    pub fn history_frames(&self) -> Vec<HistoryFrame<'_>> {
        let mut frames = Vec::with_capacity(self.history.len());
        let mut previous: Option<HashSet<TripleId>> = None;

        for (time, snapshot) in &self.history {
            let asserted = snapshot
                .iter()
                .filter(|triple| previous.as_ref().map_or(true, |ids| !ids.contains(&triple.id)))
                .collect();
            frames.push(HistoryFrame {
                time: *time,
                asserted,
            });
            previous = Some(snapshot.iter().map(|triple| triple.id).collect());
        }

        frames
    }
}
