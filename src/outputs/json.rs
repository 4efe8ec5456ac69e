//! JSON digest output.
//!
//! The digest is the hand-off to downstream tooling (copy generation,
//! publishing), so it carries every candidate list and both duplicate
//! reports, not only what ends up in the newsletter.
//!
//! # Output Structure
//!
//! Files are organized by date with edition names:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── europe.json
//!     └── us.json
//! ```
//!
//! Re-running an edition on the same day replaces its file.

use crate::models::Digest;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`Digest`] to `{json_output_dir}/{date}/{edition}.json`.
///
/// Creates the date directory when missing and returns the written path.
///
/// # Errors
///
/// Returns an error if serialization, directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, edition = %digest.edition))]
pub async fn write_digest(digest: &Digest, json_output_dir: &str) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(digest)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(&digest.local_date);
    info!(dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_path = full_json_dir.join(format!("{}.json", digest.edition));
    fs::write(&output_path, json).await?;
    info!(path = %output_path.display(), news = digest.news.len(), "Wrote JSON digest");

    Ok(output_path)
}
