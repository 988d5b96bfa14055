//! Reads snapshot files produced by the extraction collaborators.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::DpmError;
use crate::types::Snapshot;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            other => Err(DpmError::snapshot(format!(
                "Unsupported snapshot extension '{}' for {}",
                other,
                path.display()
            ))),
        }
    }
}

pub fn parse_snapshot(contents: &str, format: SnapshotFormat) -> Result<Snapshot> {
    let snapshot = match format {
        SnapshotFormat::Json => serde_json::from_str(contents)?,
        SnapshotFormat::Yaml => serde_yaml::from_str(contents)?,
    };
    Ok(snapshot)
}

/// Loads and parses a snapshot file.
pub async fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let format = SnapshotFormat::from_path(path)?;
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            DpmError::snapshot(format!("Snapshot file not found: {}", path.display()))
        } else {
            DpmError::Io(e)
        }
    })?;
    let snapshot = parse_snapshot(&contents, format)?;
    debug!(
        path = %path.display(),
        colors = snapshot.colors.len(),
        typography = snapshot.typography.len(),
        spacing = snapshot.spacing.len(),
        components = snapshot.components.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}
