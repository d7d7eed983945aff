//! Drawing run errors

use thiserror::Error;

use vd_core::{GeometryError, LayoutError};

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::host::HostError;

/// Errors surfaced by the pipeline and batch driver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("No valid parts selected")]
    SelectionEmpty,

    #[error("Geometry inconsistent: {0}")]
    GeometryInconsistent(#[from] GeometryError),

    #[error("Sheet template not found: {0}")]
    TemplateMissing(String),

    #[error("Invalid sheet template '{name}': {source}")]
    InvalidTemplate {
        name: String,
        #[source]
        source: LayoutError,
    },

    #[error("Export failed: {0}")]
    ExportFailed(#[from] ExportError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for drawing runs
pub type DraftResult<T> = Result<T, DraftError>;

impl DraftError {
    /// The run was cancelled rather than failed
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DraftError::SelectionEmpty)
    }

    /// The whole batch must stop
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            DraftError::SelectionEmpty
                | DraftError::TemplateMissing(_)
                | DraftError::InvalidTemplate { .. }
                | DraftError::Config(_)
        )
    }
}
