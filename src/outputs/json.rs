//! JSON report output.
//!
//! Reports are organized by date with edition names:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```

use crate::models::Digest;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Digest`] to `{json_output_dir}/{date}/{time_of_day}.json`.
///
/// The dated directory is created if needed and an existing report for the
/// same edition is overwritten.
///
/// # Arguments
///
/// * `digest` - The finished run to serialize
/// * `json_output_dir` - Root directory for JSON reports
///
/// # Returns
///
/// The path of the file written.
///
/// # Errors
///
/// Returns an error if serialization, directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_digest(digest: &Digest, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(&digest.local_date);
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = full_json_dir.join(format!("{}.json", digest.time_of_day));
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename.display(), articles = digest.articles.len(), "Wrote JSON report");

    Ok(output_json_filename)
}
