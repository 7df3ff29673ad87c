//! # triplex-storage: atomic durable snapshots
//!
//! Each replica's entire state is small enough to serialize whole on every
//! mutation. `store` writes the new snapshot to a sibling temp file and
//! renames it over the real path, so a crash mid-write never leaves a
//! torn file behind; `load` reads whatever snapshot is currently there, or
//! the type's default if none exists yet (a replica's first boot).

mod error;

pub use error::StorageError;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads the snapshot at `path`, or `T::default()` if the file does not
/// exist yet.
pub fn load<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StorageError> {
    match fs::read(path) {
        Ok(bytes) => postcard::from_bytes(&bytes).map_err(|source| StorageError::Decode { path: path.to_path_buf(), source }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no snapshot on disk yet, starting from default state");
            Ok(T::default())
        }
        Err(source) => Err(StorageError::Io { path: path.to_path_buf(), source }),
    }
}

/// Serializes `value` and atomically replaces the file at `path` with it.
///
/// Writes to `path` with a `.tmp-<pid>` suffix first, `fsync`s it, then
/// renames over the destination. `rename` is atomic on the same filesystem,
/// so a reader never observes a partially written snapshot.
pub fn store<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = postcard::to_allocvec(value).map_err(|source| StorageError::Encode { path: path.to_path_buf(), source })?;

    let tmp_path = path.with_extension(format!("tmp-{}", std::process::id()));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io { path: parent.to_path_buf(), source })?;
    }

    let mut file = File::create(&tmp_path).map_err(|source| StorageError::Io { path: tmp_path.clone(), source })?;
    file.write_all(&bytes).map_err(|source| StorageError::Io { path: tmp_path.clone(), source })?;
    file.sync_all().map_err(|source| StorageError::Io { path: tmp_path.clone(), source })?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|source| StorageError::Io { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote durable snapshot");
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
