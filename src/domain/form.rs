//! Calculator form session.
//!
//! `CalculatorForm` owns the mutable "current snapshot" of a session. Each
//! call to [`CalculatorForm::set_input`] validates one keystroke-level edit,
//! hands the resulting snapshot to the engine and replaces the current
//! state with the engine's output. Display text is re-rendered from the
//! full-precision snapshot, except for the edited field which keeps exactly
//! what was typed.

use crate::domain::engine::{ConstraintEngine, Propagation};
use crate::domain::error::CalcError;
use crate::domain::field::FieldId;
use crate::domain::format::FormatOptions;
use crate::domain::snapshot::{EditEvent, FieldSnapshot};
use crate::domain::validation::{parse_input, sanitize, validate};

pub const DEFAULT_MISSING_THRESHOLD: usize = 3;

#[derive(Debug, Clone)]
pub struct CalculatorForm {
    engine: ConstraintEngine,
    format: FormatOptions,
    missing_threshold: usize,
    snapshot: FieldSnapshot,
    display: [String; FieldId::COUNT],
    errors: [Option<String>; FieldId::COUNT],
    last_propagation: Option<Propagation>,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self::new(
            ConstraintEngine::default(),
            FormatOptions::default(),
            DEFAULT_MISSING_THRESHOLD,
        )
    }
}

impl CalculatorForm {
    pub fn new(engine: ConstraintEngine, format: FormatOptions, missing_threshold: usize) -> Self {
        Self {
            engine,
            format,
            missing_threshold,
            snapshot: FieldSnapshot::empty(),
            display: Default::default(),
            errors: Default::default(),
            last_propagation: None,
        }
    }

    /// Apply one edit typed into `field`.
    ///
    /// On a validation failure the error is recorded against the field and
    /// returned; snapshot and display text are left as they were.
    pub fn set_input(&mut self, field: FieldId, raw: &str) -> Result<(), CalcError> {
        let text = sanitize(raw);
        let value = match validate(field, parse_input(&text)) {
            Ok(v) => v,
            Err(e) => {
                self.errors[field.index()] = Some(e.to_string());
                return Err(e);
            }
        };
        self.errors[field.index()] = None;

        let event = EditEvent { field, value };
        let propagation = self.engine.apply_edit(&self.snapshot, event);
        tracing::debug!(
            %field,
            rounds = propagation.rounds,
            converged = propagation.converged,
            "form edit applied"
        );

        self.snapshot = propagation.snapshot;
        for f in FieldId::ALL {
            self.display[f.index()] = if f == field {
                text.clone()
            } else {
                self.format.format(self.snapshot.get(f))
            };
        }
        self.last_propagation = Some(propagation);
        Ok(())
    }

    /// Empty every field and forget all errors.
    pub fn reset(&mut self) {
        self.snapshot = FieldSnapshot::empty();
        self.display = Default::default();
        self.errors = Default::default();
        self.last_propagation = None;
    }

    pub fn snapshot(&self) -> &FieldSnapshot {
        &self.snapshot
    }

    pub fn display(&self, field: FieldId) -> &str {
        &self.display[field.index()]
    }

    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors[field.index()].as_deref()
    }

    pub fn last_propagation(&self) -> Option<&Propagation> {
        self.last_propagation.as_ref()
    }

    /// Number of fields showing non-empty text.
    pub fn provided_count(&self) -> usize {
        self.display.iter().filter(|t| !t.is_empty()).count()
    }

    /// Empty fields worth flagging once more than `missing_threshold` fields
    /// are filled in.
    pub fn missing_fields(&self) -> Vec<FieldId> {
        if self.provided_count() <= self.missing_threshold {
            return Vec::new();
        }
        FieldId::ALL
            .into_iter()
            .filter(|f| self.display[f.index()].is_empty())
            .collect()
    }
}
