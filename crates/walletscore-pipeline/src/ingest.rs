//! JSON export ingestion.

use std::path::Path;

use tracing::info;
use walletscore_core::normalize::{normalize_json, Normalized};

use crate::error::PipelineError;

/// Read and normalize an export file.
pub fn load_events(path: &Path) -> Result<Normalized, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let normalized = normalize_json(&text)?;
    info!(
        path = %path.display(),
        events = normalized.events.len(),
        "ingest: export loaded"
    );
    Ok(normalized)
}
