//! Field snapshots and edit events.
//!
//! A `FieldSnapshot` is the complete state of the form: one optional value
//! per [`FieldId`]. `None` means unknown, which is distinct from zero.
//! Snapshots are plain values; an edit produces a new snapshot and leaves
//! the previous one intact so the two can be compared field by field.

use crate::domain::field::FieldId;
use std::collections::HashMap;
use std::ops::Index;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldSnapshot {
    values: [Option<f64>; FieldId::COUNT],
}

impl FieldSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldId) -> Option<f64> {
        self.values[field.index()]
    }

    pub fn is_known(&self, field: FieldId) -> bool {
        self.values[field.index()].is_some()
    }

    /// Returns a copy with `field` replaced.
    pub fn with(mut self, field: FieldId, value: Option<f64>) -> Self {
        self.values[field.index()] = value;
        self
    }

    pub(crate) fn set(&mut self, field: FieldId, value: Option<f64>) {
        self.values[field.index()] = value;
    }

    pub fn known_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, Option<f64>)> + '_ {
        FieldId::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Fields whose value differs from `other` by more than `tolerance`,
    /// counting a known/unknown mismatch as a difference.
    pub fn changed_fields(&self, other: &FieldSnapshot, tolerance: f64) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|&f| differs(self.get(f), other.get(f), tolerance))
            .collect()
    }

    pub fn from_map(map: &HashMap<FieldId, Option<f64>>) -> Self {
        let mut snapshot = Self::empty();
        for (&field, &value) in map {
            snapshot.set(field, value);
        }
        snapshot
    }

    /// One entry per field, unknown fields mapped to `None`.
    pub fn to_map(&self) -> HashMap<FieldId, Option<f64>> {
        self.iter().collect()
    }
}

impl Index<FieldId> for FieldSnapshot {
    type Output = Option<f64>;

    fn index(&self, field: FieldId) -> &Self::Output {
        &self.values[field.index()]
    }
}

impl FromIterator<(FieldId, f64)> for FieldSnapshot {
    fn from_iter<I: IntoIterator<Item = (FieldId, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::empty();
        for (field, value) in iter {
            snapshot.set(field, Some(value));
        }
        snapshot
    }
}

pub(crate) fn differs(a: Option<f64>, b: Option<f64>, tolerance: f64) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => (x - y).abs() > tolerance,
        (None, None) => false,
        _ => true,
    }
}

/// A single user edit: one field set to a value, or cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditEvent {
    pub field: FieldId,
    pub value: Option<f64>,
}

impl EditEvent {
    pub fn set(field: FieldId, value: f64) -> Self {
        Self {
            field,
            value: Some(value),
        }
    }

    pub fn clear(field: FieldId) -> Self {
        Self { field, value: None }
    }

    /// The snapshot `previous` with this edit applied. No derivation happens here.
    pub fn apply(&self, previous: &FieldSnapshot) -> FieldSnapshot {
        previous.with(self.field, self.value)
    }
}
