//! Contracts with the external render and upload services.
//!
//! The engine never renders. It builds well-formed export jobs, polls their status and
//! turns finished uploads into timeline assets.

/// Export job submission and status polling.
pub mod job;
/// Uploaded media to timeline asset.
pub mod upload;

pub use job::{
    ExportOutcome, ExportRequest, ExportService, ExportStatus, ExportStatusResponse,
    ExportTracker, ScriptedExportService, SpeedTier,
};
pub use upload::UploadedMedia;
