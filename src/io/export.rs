//! Export a computation (request + result) to a JSON file.
//!
//! The export is meant to be easy to archive or feed to downstream scripts.

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::domain::{WaccRequest, WaccResult};
use crate::error::AppError;

/// On-disk export layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    /// RFC 3339 local timestamp of the export.
    pub generated: String,
    pub request: WaccRequest,
    pub result: WaccResult,
}

/// Write a result JSON file.
pub fn write_result_json(path: &Path, request: &WaccRequest, result: &WaccResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let export = ResultFile {
        tool: "wacc".to_string(),
        generated: Local::now().to_rfc3339(),
        request: request.clone(),
        result: *result,
    };

    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
