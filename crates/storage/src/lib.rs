//! Storage layer: flat JSON files.
//!
//! Request sets, their per-file attempt state, and credential files. Every
//! file is read whole and written whole; there is a single writer per file.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod models;

use models::{AttemptState, RequestSet, RequestSetFile, REQUEST_SET_MARKER};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("malformed JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0} is not a request set file")]
    NotRequestSet(PathBuf),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty JSON with sorted keys and four-space indentation.
pub fn to_pretty_string<T: Serialize>(value: &T) -> serde_json::Result<String> {
    // Going through Value sorts object keys.
    let value = serde_json::to_value(value)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = to_pretty_string(value).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, body).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads `path` and returns its request set if the file carries the marker.
///
/// `Ok(None)` means well-formed JSON that is not a request set (state files,
/// unrelated JSON). Unreadable files and malformed request sets are errors.
pub fn detect_request_set(path: &Path) -> Result<Option<RequestSet>> {
    let value: serde_json::Value = read_json(path)?;
    if value.get(REQUEST_SET_MARKER).is_none() {
        return Ok(None);
    }
    let file: RequestSetFile =
        serde_json::from_value(value).map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(file.request_set))
}

pub fn read_request_set(path: &Path) -> Result<RequestSet> {
    detect_request_set(path)?.ok_or_else(|| StorageError::NotRequestSet(path.to_path_buf()))
}

pub fn request_set_file_name(photo_id: &str) -> String {
    format!("{REQUEST_SET_MARKER}_photo_{photo_id}.json")
}

/// Writes one file per photo in the set, each holding the full set.
pub fn write_request_set(dir: &Path, file: &RequestSetFile) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for photo_id in file.request_set.keys() {
        let path = dir.join(request_set_file_name(photo_id));
        write_json(&path, file)?;
        debug!("wrote request set {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// `dir/name.json` -> `dir/name.state.json`.
pub fn state_path_for(request_path: &Path) -> PathBuf {
    let stem = request_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    request_path.with_file_name(format!("{stem}.state.json"))
}

/// Loads attempt state, starting empty when the file does not exist yet.
pub fn load_state(path: &Path) -> Result<AttemptState> {
    if !path.is_file() {
        debug!("no state at {}, starting fresh", path.display());
        return Ok(AttemptState::default());
    }
    read_json(path)
}

pub fn persist_state(path: &Path, state: &AttemptState) -> Result<()> {
    write_json(path, state)
}
