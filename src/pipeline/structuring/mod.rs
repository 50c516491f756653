pub mod types;
pub mod sanitize;
pub mod prompt;
pub mod parser;
pub mod units;
pub mod completion;
pub mod gemini;
pub mod orchestrator;

pub use types::*;
pub use sanitize::*;
pub use prompt::*;
pub use parser::*;
pub use units::*;
pub use completion::*;
pub use gemini::*;
pub use orchestrator::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Transcript not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Transcript is empty after cleanup")]
    EmptyTranscript,

    #[error("Model output is not a valid JSON object: {reason}")]
    ExtractionParse { reason: String, raw: String },

    #[error("Model call failed: {0}")]
    ModelCall(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// Raw model output attached to a parse failure, for diagnostics.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            ExtractionError::ExtractionParse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
