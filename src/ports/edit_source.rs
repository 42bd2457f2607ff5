//! Edit script port trait.

use crate::domain::error::CalcError;
use crate::domain::field::FieldId;

/// One scripted keystroke-level edit: the raw text typed into a field.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedEdit {
    pub field: FieldId,
    pub raw: String,
}

/// Source of an ordered sequence of edits to replay through a form.
pub trait EditSource {
    fn load_edits(&self) -> Result<Vec<ScriptedEdit>, CalcError>;
}
