#![allow(dead_code)]

use std::io::Write;
use tradecalc::domain::error::CalcError;
use tradecalc::domain::field::FieldId;
use tradecalc::domain::snapshot::FieldSnapshot;
use tradecalc::ports::edit_source::{EditSource, ScriptedEdit};

/// A fully consistent long position, used as ground truth.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub entry: f64,
    pub sl_percent: f64,
    pub target_percent: f64,
    pub quantity: f64,
}

impl Position {
    pub fn sl_price(&self) -> f64 {
        self.entry * (1.0 - self.sl_percent / 100.0)
    }

    pub fn target_price(&self) -> f64 {
        self.entry * (1.0 + self.target_percent / 100.0)
    }

    pub fn value(&self, field: FieldId) -> f64 {
        let risk_per_unit = (self.entry - self.sl_price()).abs();
        let gain_per_unit = self.target_price() - self.entry;
        match field {
            FieldId::EntryPrice => self.entry,
            FieldId::SlPrice => self.sl_price(),
            FieldId::SlPercent => self.sl_percent,
            FieldId::RiskAmount => risk_per_unit * self.quantity,
            FieldId::PositionAmount => self.quantity * self.entry,
            FieldId::Quantity => self.quantity,
            FieldId::TargetPercent => self.target_percent,
            FieldId::TargetPrice => self.target_price(),
            FieldId::RiskReward => gain_per_unit / risk_per_unit,
            FieldId::ProfitAmount => gain_per_unit * self.quantity,
        }
    }
}

pub fn snapshot(values: &[(FieldId, f64)]) -> FieldSnapshot {
    values.iter().copied().collect()
}

pub fn known(s: &FieldSnapshot, field: FieldId) -> f64 {
    s.get(field)
        .unwrap_or_else(|| panic!("expected {field} to be known in {s:?}"))
}

pub struct MockEditSource {
    pub edits: Vec<ScriptedEdit>,
}

impl MockEditSource {
    pub fn new() -> Self {
        Self { edits: Vec::new() }
    }

    pub fn with_edit(mut self, field: FieldId, raw: &str) -> Self {
        self.edits.push(ScriptedEdit {
            field,
            raw: raw.to_string(),
        });
        self
    }
}

impl EditSource for MockEditSource {
    fn load_edits(&self) -> Result<Vec<ScriptedEdit>, CalcError> {
        Ok(self.edits.clone())
    }
}

pub fn write_temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
