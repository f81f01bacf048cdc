pub(crate) mod geolocation;
pub(crate) mod inspect;
pub(crate) mod package;
pub(crate) mod request;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes an encoded record, replacing any existing file.
fn write_record(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Record written");
    Ok(())
}
