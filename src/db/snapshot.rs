//! JSON codec for the single snapshot file.
//!
//! The file holds one object with two top-level fields, `todo_lists` and
//! `users`; every list embeds its `todo_items`.

use crate::db::models::Snapshot;
use std::{fs, io, path::Path};
use tracing::info;

/// Read the snapshot at `path`. A missing file yields an empty snapshot.
pub fn load(path: &Path) -> io::Result<Snapshot> {
    let contents = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "snapshot file not found; starting empty");
            return Ok(Snapshot::default());
        }
        Err(e) => return Err(e),
    };
    let snapshot: Snapshot = serde_json::from_slice(&contents)?;
    Ok(snapshot)
}

/// Overwrite `path` with the full snapshot, creating parent directories.
pub fn save(path: &Path, snapshot: &Snapshot) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let encoded = serde_json::to_vec_pretty(snapshot)?;
    fs::write(path, encoded)
}
