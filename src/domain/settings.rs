//! Runtime settings assembled from configuration.

use crate::domain::engine::{CHANGE_TOLERANCE, ConstraintEngine, MAX_ROUNDS};
use crate::domain::form::{CalculatorForm, DEFAULT_MISSING_THRESHOLD};
use crate::domain::format::FormatOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub max_rounds: usize,
    pub tolerance: f64,
    pub format: FormatOptions,
    pub missing_threshold: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            tolerance: CHANGE_TOLERANCE,
            format: FormatOptions::default(),
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
        }
    }
}

impl Settings {
    pub fn engine(&self) -> ConstraintEngine {
        ConstraintEngine::new(self.max_rounds, self.tolerance)
    }

    pub fn form(&self) -> CalculatorForm {
        CalculatorForm::new(self.engine(), self.format, self.missing_threshold)
    }
}
