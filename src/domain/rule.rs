//! Derivation rules.
//!
//! The relations between fields are held as data: an ordered list of
//! [`RuleGroup`]s, one per derived target. A group lists one or more
//! [`Formula`] alternatives in priority order. In any round at most one
//! alternative of a group is selected: the first whose inputs are all known
//! and which is not blocked by the field being edited.
//!
//! | Target | Alternatives (priority order) |
//! |---|---|
//! | `slPercent` | `(entry - sl) / entry * 100` |
//! | `slPrice` | `entry * (1 - slPercent / 100)` |
//! | `targetPercent` | `(target - entry) / entry * 100` |
//! | `targetPrice` | `entry * (1 + targetPercent / 100)` |
//! | `quantity` | `position / entry`, then `risk / abs(entry - sl)` |
//! | `positionAmount` | `quantity * entry` |
//! | `riskAmount` | `abs(entry - sl) * quantity` |
//! | `riskReward` | `(target - entry) / abs(entry - sl)` |
//! | `profitAmount` | `(target - entry) * quantity` |

use crate::domain::field::FieldId;
use crate::domain::snapshot::FieldSnapshot;
use std::fmt;
use FieldId::*;

/// Denominators at or below this magnitude make a formula inapplicable.
pub const SINGULAR_EPSILON: f64 = 1e-9;

pub struct Formula {
    pub name: &'static str,
    /// Source fields, in the order `eval` receives them.
    pub inputs: &'static [FieldId],
    /// Editing any of these fields disables this alternative for the pass.
    pub blocked_by: &'static [FieldId],
    /// Returns `None` when the denominator is near zero.
    pub eval: fn(&[f64]) -> Option<f64>,
}

impl Formula {
    pub fn is_blocked_by(&self, edited: FieldId) -> bool {
        self.blocked_by.contains(&edited)
    }

    /// Input values in declaration order, or `None` if any input is unknown.
    pub fn inputs_from(&self, snapshot: &FieldSnapshot) -> Option<Vec<f64>> {
        self.inputs.iter().map(|&f| snapshot.get(f)).collect()
    }

    pub fn evaluate(&self, snapshot: &FieldSnapshot) -> Option<f64> {
        let inputs = self.inputs_from(snapshot)?;
        (self.eval)(&inputs)
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("blocked_by", &self.blocked_by)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct RuleGroup {
    pub target: FieldId,
    pub alternatives: &'static [Formula],
}

impl RuleGroup {
    /// The alternative that applies this round, with its input values.
    ///
    /// Selection depends only on which inputs are known and on the edited
    /// field. A selected alternative with a singular denominator still
    /// shadows the lower-priority ones.
    pub fn select(
        &self,
        snapshot: &FieldSnapshot,
        edited: FieldId,
    ) -> Option<(&'static Formula, Vec<f64>)> {
        if self.target == edited {
            return None;
        }
        self.alternatives
            .iter()
            .filter(|formula| !formula.is_blocked_by(edited))
            .find_map(|formula| formula.inputs_from(snapshot).map(|inputs| (formula, inputs)))
    }

    /// Candidate value for the target, if one can be computed this round.
    pub fn candidate(&self, snapshot: &FieldSnapshot, edited: FieldId) -> Option<f64> {
        let (formula, inputs) = self.select(snapshot, edited)?;
        (formula.eval)(&inputs).filter(|v| v.is_finite())
    }

    /// Whether every alternative that can be evaluated agrees with the
    /// target's current value within `tolerance`. Alternatives with an
    /// unknown input, an unknown target or a singular denominator are not
    /// checked.
    pub fn is_consistent(&self, snapshot: &FieldSnapshot, tolerance: f64) -> bool {
        let Some(actual) = snapshot.get(self.target) else {
            return true;
        };
        self.alternatives
            .iter()
            .filter_map(|formula| formula.evaluate(snapshot))
            .all(|expected| (expected - actual).abs() <= tolerance)
    }
}

fn non_singular(denominator: f64) -> Option<f64> {
    (denominator.abs() > SINGULAR_EPSILON).then_some(denominator)
}

fn sl_percent_from_price(v: &[f64]) -> Option<f64> {
    let &[entry, sl] = v else { return None };
    if entry <= SINGULAR_EPSILON {
        return None;
    }
    Some((entry - sl) / entry * 100.0)
}

fn sl_price_from_percent(v: &[f64]) -> Option<f64> {
    let &[entry, pct] = v else { return None };
    Some(entry * (1.0 - pct / 100.0))
}

fn target_percent_from_price(v: &[f64]) -> Option<f64> {
    let &[entry, target] = v else { return None };
    if entry <= SINGULAR_EPSILON {
        return None;
    }
    Some((target - entry) / entry * 100.0)
}

fn target_price_from_percent(v: &[f64]) -> Option<f64> {
    let &[entry, pct] = v else { return None };
    Some(entry * (1.0 + pct / 100.0))
}

fn quantity_from_position(v: &[f64]) -> Option<f64> {
    let &[position, entry] = v else { return None };
    non_singular(entry).map(|entry| position / entry)
}

fn quantity_from_risk(v: &[f64]) -> Option<f64> {
    let &[risk, sl, entry] = v else { return None };
    non_singular((entry - sl).abs()).map(|per_unit| risk / per_unit)
}

fn position_from_quantity(v: &[f64]) -> Option<f64> {
    let &[quantity, entry] = v else { return None };
    Some(quantity * entry)
}

fn risk_from_quantity(v: &[f64]) -> Option<f64> {
    let &[quantity, entry, sl] = v else { return None };
    Some((entry - sl).abs() * quantity)
}

fn risk_reward(v: &[f64]) -> Option<f64> {
    let &[entry, sl, target] = v else { return None };
    non_singular((entry - sl).abs()).map(|risk| (target - entry) / risk)
}

fn profit_from_quantity(v: &[f64]) -> Option<f64> {
    let &[quantity, entry, target] = v else { return None };
    Some((target - entry) * quantity)
}

/// The rule list, in evaluation order. Later groups may consume values
/// produced by earlier groups in the same round.
pub static RULES: &[RuleGroup] = &[
    RuleGroup {
        target: SlPercent,
        alternatives: &[Formula {
            name: "sl_percent_from_price",
            inputs: &[EntryPrice, SlPrice],
            blocked_by: &[],
            eval: sl_percent_from_price,
        }],
    },
    RuleGroup {
        target: SlPrice,
        alternatives: &[Formula {
            name: "sl_price_from_percent",
            inputs: &[EntryPrice, SlPercent],
            blocked_by: &[],
            eval: sl_price_from_percent,
        }],
    },
    RuleGroup {
        target: TargetPercent,
        alternatives: &[Formula {
            name: "target_percent_from_price",
            inputs: &[EntryPrice, TargetPrice],
            blocked_by: &[],
            eval: target_percent_from_price,
        }],
    },
    RuleGroup {
        target: TargetPrice,
        alternatives: &[Formula {
            name: "target_price_from_percent",
            inputs: &[EntryPrice, TargetPercent],
            blocked_by: &[],
            eval: target_price_from_percent,
        }],
    },
    RuleGroup {
        target: Quantity,
        alternatives: &[
            Formula {
                name: "quantity_from_position",
                inputs: &[PositionAmount, EntryPrice],
                blocked_by: &[RiskAmount],
                eval: quantity_from_position,
            },
            Formula {
                name: "quantity_from_risk",
                inputs: &[RiskAmount, SlPrice, EntryPrice],
                blocked_by: &[],
                eval: quantity_from_risk,
            },
        ],
    },
    RuleGroup {
        target: PositionAmount,
        alternatives: &[Formula {
            name: "position_from_quantity",
            inputs: &[Quantity, EntryPrice],
            blocked_by: &[],
            eval: position_from_quantity,
        }],
    },
    RuleGroup {
        target: RiskAmount,
        alternatives: &[Formula {
            name: "risk_from_quantity",
            inputs: &[Quantity, EntryPrice, SlPrice],
            blocked_by: &[],
            eval: risk_from_quantity,
        }],
    },
    RuleGroup {
        target: RiskReward,
        alternatives: &[Formula {
            name: "risk_reward",
            inputs: &[EntryPrice, SlPrice, TargetPrice],
            blocked_by: &[],
            eval: risk_reward,
        }],
    },
    RuleGroup {
        target: ProfitAmount,
        alternatives: &[Formula {
            name: "profit_from_quantity",
            inputs: &[Quantity, EntryPrice, TargetPrice],
            blocked_by: &[],
            eval: profit_from_quantity,
        }],
    },
];

/// The group deriving `target`.
pub fn group_for(target: FieldId) -> Option<&'static RuleGroup> {
    RULES.iter().find(|g| g.target == target)
}

/// Targets whose known value disagrees with one of their formulas.
pub fn inconsistent_targets(snapshot: &FieldSnapshot, tolerance: f64) -> Vec<FieldId> {
    RULES
        .iter()
        .filter(|g| !g.is_consistent(snapshot, tolerance))
        .map(|g| g.target)
        .collect()
}
