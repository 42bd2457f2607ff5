//! Domain error types.
//!
//! The propagation engine itself has no error channel; these errors come
//! from input validation, configuration and the command line.

use crate::domain::field::FieldId;

/// Top-level error type for tradecalc.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: FieldId, reason: String },

    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("edit script {file}: {reason}")]
    EditScript { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CalcError> for std::process::ExitCode {
    fn from(err: &CalcError) -> Self {
        let code: u8 = match err {
            CalcError::Io(_) => 1,
            CalcError::ConfigParse { .. } | CalcError::ConfigInvalid { .. } => 2,
            CalcError::InvalidInput { .. } | CalcError::UnknownField { .. } => 3,
            CalcError::EditScript { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
