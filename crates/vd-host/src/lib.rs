//! Drawing Host Integration and Batch Runs
//!
//! This crate provides:
//! - The drawing host interface and a scoped commit/discard guard
//! - An in-memory host with a rollback journal
//! - Part classification by product code
//! - Sheet export to SVG and PPM
//! - The per-part view pipeline and the batch driver
//! - RON run configuration

pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod memory;
pub mod pipeline;
pub mod scope;

// Re-exports for convenience
pub use batch::{BatchDriver, BatchReport, PartReport, PartStatus};
pub use classify::{AttributeClassifier, PartClassifier};
pub use config::{ConfigError, DraftConfig, RasterConfig, RunMode};
pub use error::{DraftError, DraftResult};
pub use export::{
    DirectoryExporter, ExportError, ExportOptions, ExportedFiles, SheetExporter, sanitize_filename,
};
pub use host::{
    DrawingHost, HostError, HostResult, PartRecord, PlacedView, ScopeId, Sheet, SheetTemplate,
};
pub use memory::{HostDocument, MemoryHost, ScopeStats};
pub use pipeline::{PartViewPipeline, PipelineOutcome, PipelineStage, part_views, sheet_name};
pub use scope::WorkScope;
