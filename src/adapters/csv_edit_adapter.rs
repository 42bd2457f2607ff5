//! CSV edit script adapter.
//!
//! Expects a header row with `field` and `value` columns. An empty value
//! clears the field.

use crate::domain::error::CalcError;
use crate::domain::field::FieldId;
use crate::ports::edit_source::{EditSource, ScriptedEdit};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct EditRecord {
    field: String,
    #[serde(default)]
    value: String,
}

pub struct CsvEditAdapter {
    path: PathBuf,
}

impl CsvEditAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn script_error(&self, reason: String) -> CalcError {
        CalcError::EditScript {
            file: self.path.display().to_string(),
            reason,
        }
    }

    /// Parse script content. `line` numbers in errors count the header as 1.
    pub fn parse(&self, content: &str) -> Result<Vec<ScriptedEdit>, CalcError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut edits = Vec::new();
        for (i, result) in rdr.deserialize::<EditRecord>().enumerate() {
            let line = i + 2;
            let record =
                result.map_err(|e| self.script_error(format!("line {line}: {e}")))?;
            let field = record
                .field
                .parse::<FieldId>()
                .map_err(|e| self.script_error(format!("line {line}: {e}")))?;
            edits.push(ScriptedEdit {
                field,
                raw: record.value,
            });
        }
        Ok(edits)
    }
}

impl EditSource for CsvEditAdapter {
    fn load_edits(&self) -> Result<Vec<ScriptedEdit>, CalcError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            self.script_error(format!("failed to read: {e}"))
        })?;
        self.parse(&content)
    }
}
