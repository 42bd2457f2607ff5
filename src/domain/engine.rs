//! Constraint propagation engine.
//!
//! Given a snapshot in which one field has just been edited, repeatedly
//! applies every [`RuleGroup`] in order until a full round changes nothing
//! by more than the change tolerance, or the round cap is reached.
//!
//! # Semantics
//!
//! - The edited field is never written during its own pass.
//! - A rule whose inputs are not all known is skipped; unknown stays unknown.
//! - A rule with a near-zero denominator is skipped for that round.
//! - Hitting the round cap is not an error: the last working snapshot is
//!   returned and [`Propagation::converged`] is `false`.
//! - Derived values are never removed; clearing a field leaves the values
//!   previously derived from it in place.

use crate::domain::field::FieldId;
use crate::domain::rule::{RULES, RuleGroup};
use crate::domain::snapshot::{EditEvent, FieldSnapshot, differs};
use std::collections::HashMap;

/// Upper bound on relaxation rounds per propagation.
pub const MAX_ROUNDS: usize = 40;

/// A derived value only counts as a change when it moves by more than this.
pub const CHANGE_TOLERANCE: f64 = 1e-9;

/// Outcome of one propagation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    pub snapshot: FieldSnapshot,
    /// Rounds evaluated, including the final quiet round when converged.
    pub rounds: usize,
    /// `false` when the round cap was reached while values were still moving.
    pub converged: bool,
}

impl Propagation {
    pub fn hit_round_cap(&self) -> bool {
        !self.converged
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintEngine {
    max_rounds: usize,
    tolerance: f64,
    rules: &'static [RuleGroup],
}

impl Default for ConstraintEngine {
    fn default() -> Self {
        Self::new(MAX_ROUNDS, CHANGE_TOLERANCE)
    }
}

impl ConstraintEngine {
    pub fn new(max_rounds: usize, tolerance: f64) -> Self {
        Self {
            max_rounds,
            tolerance,
            rules: RULES,
        }
    }

    /// Replace the rule list. Used to exercise the loop with other rule sets.
    pub fn with_rules(mut self, rules: &'static [RuleGroup]) -> Self {
        self.rules = rules;
        self
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Derive every field reachable from `snapshot`, treating `edited` as
    /// authoritative. `snapshot` must already hold the edited value.
    pub fn propagate(&self, snapshot: &FieldSnapshot, edited: FieldId) -> Propagation {
        let mut working = *snapshot;

        for round in 1..=self.max_rounds {
            if !self.relax(&mut working, edited) {
                tracing::debug!(%edited, rounds = round, "propagation converged");
                return Propagation {
                    snapshot: working,
                    rounds: round,
                    converged: true,
                };
            }
        }

        tracing::warn!(
            %edited,
            max_rounds = self.max_rounds,
            "propagation stopped at round cap without converging"
        );
        Propagation {
            snapshot: working,
            rounds: self.max_rounds,
            converged: false,
        }
    }

    /// Apply `event` to `previous` and propagate from the edited field.
    pub fn apply_edit(&self, previous: &FieldSnapshot, event: EditEvent) -> Propagation {
        self.propagate(&event.apply(previous), event.field)
    }

    /// One round over the rule list. Returns whether any field moved.
    fn relax(&self, working: &mut FieldSnapshot, edited: FieldId) -> bool {
        let mut changed = false;
        for group in self.rules {
            let Some(value) = group.candidate(working, edited) else {
                continue;
            };
            if differs(working.get(group.target), Some(value), self.tolerance) {
                tracing::trace!(target_field = %group.target, value, "derived");
                working.set(group.target, Some(value));
                changed = true;
            }
        }
        changed
    }
}

/// Propagate with the default engine and return only the snapshot.
pub fn propagate(snapshot: &FieldSnapshot, edited: FieldId) -> FieldSnapshot {
    ConstraintEngine::default().propagate(snapshot, edited).snapshot
}

/// Map-based entry point: one entry per field in the result, unknown as `None`.
pub fn derive_all(
    current: &HashMap<FieldId, Option<f64>>,
    edited: FieldId,
) -> HashMap<FieldId, Option<f64>> {
    propagate(&FieldSnapshot::from_map(current), edited).to_map()
}
