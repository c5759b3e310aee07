//! Locating the locale variants of a source resource file.
//!
//! Given `res/values/strings.xml`, the variants are the files named
//! `strings.xml` inside sibling directories such as `res/values-fr` or
//! `res/values-zh-rCN`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    config::{DEFAULT_LOCALE_DIR_PATTERN, SyncConfig},
    error::{Error, Result},
};

lazy_static! {
    static ref LOCALE_DIR_REGEX: Regex = Regex::new(DEFAULT_LOCALE_DIR_PATTERN).unwrap();
}

/// Returns true if `name` looks like a locale-qualified resource directory.
pub fn is_locale_dir_name(name: &str) -> bool {
    LOCALE_DIR_REGEX.is_match(name)
}

/// Finds the writable locale variants of `source` using the default pattern.
pub fn discover_targets<P: AsRef<Path>>(source: P) -> Result<Vec<PathBuf>> {
    discover_targets_matching(source.as_ref(), &LOCALE_DIR_REGEX)
}

/// Finds the writable locale variants of `source` using `config.locale_dir_pattern`.
pub fn discover_targets_with<P: AsRef<Path>>(source: P, config: &SyncConfig) -> Result<Vec<PathBuf>> {
    if config.locale_dir_pattern == DEFAULT_LOCALE_DIR_PATTERN {
        return discover_targets(source);
    }
    let pattern = Regex::new(&config.locale_dir_pattern)?;
    discover_targets_matching(source.as_ref(), &pattern)
}

fn discover_targets_matching(source: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let Some(file_name) = source.file_name() else {
        return Ok(Vec::new());
    };
    let Some(res_dir) = source.parent().and_then(Path::parent) else {
        return Ok(Vec::new());
    };
    let res_dir = if res_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        res_dir
    };
    if !res_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut targets = Vec::new();
    for dent in fs::read_dir(res_dir).map_err(|e| Error::io(res_dir, e))? {
        let dent = dent.map_err(|e| Error::io(res_dir, e))?;
        let dir_name = dent.file_name();
        let Some(dir_name) = dir_name.to_str() else {
            continue;
        };
        if !pattern.is_match(dir_name) || !dent.path().is_dir() {
            continue;
        }

        let candidate = dent.path().join(file_name);
        let writable = fs::metadata(&candidate)
            .map(|m| m.is_file() && !m.permissions().readonly())
            .unwrap_or(false);
        if writable {
            targets.push(candidate);
        } else {
            tracing::debug!(path = %candidate.display(), "skipping missing or read-only locale file");
        }
    }

    targets.sort();
    Ok(targets)
}
