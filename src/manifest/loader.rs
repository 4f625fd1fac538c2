//! Reading manifest files and decoding YAML or JSON document streams.

use super::Manifest;
use crate::error::LoadError;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve the input path into the list of files to convert.
///
/// A file yields itself. A directory yields every regular file beneath it,
/// in file-name order per directory, descending into subdirectories only
/// when `recursive` is set.
pub fn collect_manifest_files(path: &Path, recursive: bool) -> Result<Vec<PathBuf>, LoadError> {
    let metadata = fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut walker = WalkDir::new(path).follow_links(true).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| LoadError::Io {
            path: err.path().map_or_else(|| path.to_path_buf(), Path::to_path_buf),
            source: err.into(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    log::debug!("found {} manifest file(s) under {}", files.len(), path.display());
    Ok(files)
}

/// Read one file and decode every object in it.
pub fn load_manifests_from_file(path: &Path) -> Result<Vec<Manifest>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_manifests(&content, path)
}

/// Decode a stream of zero or more objects.
///
/// Content whose first significant character is `{` is treated as
/// concatenated JSON values; anything else as a YAML multi-document stream.
/// Empty documents are skipped and YAML `<<` merge keys are expanded. `path`
/// is only used for error context.
pub fn decode_manifests(content: &str, path: &Path) -> Result<Vec<Manifest>, LoadError> {
    if content.trim_start().starts_with('{') {
        decode_json_stream(content, path)
    } else {
        decode_yaml_stream(content, path)
    }
}

fn decode_yaml_stream(content: &str, path: &Path) -> Result<Vec<Manifest>, LoadError> {
    let mut manifests = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let mut value = Value::deserialize(document).map_err(|e| decode_error(path, index, e))?;
        value
            .apply_merge()
            .map_err(|e| decode_error(path, index, e))?;
        if let Some(manifest) = into_manifest(value, path, index)? {
            manifests.push(manifest);
        }
    }

    Ok(manifests)
}

fn decode_json_stream(content: &str, path: &Path) -> Result<Vec<Manifest>, LoadError> {
    let mut manifests = Vec::new();

    let stream = serde_json::Deserializer::from_str(content).into_iter::<serde_json::Value>();
    for (index, json) in stream.enumerate() {
        let json = json.map_err(|e| decode_error(path, index, e))?;
        let value = serde_yaml::to_value(json).map_err(|e| decode_error(path, index, e))?;
        if let Some(manifest) = into_manifest(value, path, index)? {
            manifests.push(manifest);
        }
    }

    Ok(manifests)
}

fn into_manifest(value: Value, path: &Path, index: usize) -> Result<Option<Manifest>, LoadError> {
    if value.is_null() {
        return Ok(None);
    }
    Manifest::from_value(value)
        .map(Some)
        .map_err(|e| decode_error(path, index, e))
}

fn decode_error(path: &Path, index: usize, err: impl std::fmt::Display) -> LoadError {
    LoadError::Decode {
        path: path.to_path_buf(),
        index,
        message: err.to_string(),
    }
}
