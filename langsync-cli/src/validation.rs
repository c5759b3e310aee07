use std::path::Path;

use langsync::{Eligibility, Error, SyncConfig, ensure_resource_file, validate_file_lossy};

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate that `path` is a `<resources>` file the line merge can handle.
pub fn validate_source_file(path: &str) -> Result<(), String> {
    validate_file_path(path)?;

    match ensure_resource_file(path) {
        Ok(()) => {}
        Err(e @ Error::NotAResourceFile(_)) => return Err(e.to_string()),
        Err(e) => return Err(format!("Cannot parse {}: {}", path, e)),
    }

    match validate_file_lossy(path) {
        Eligibility::Valid => Ok(()),
        reason => Err(format!("Cannot sync {}: {}", path, reason)),
    }
}

/// Load a sync configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&str>) -> Result<SyncConfig, String> {
    match path {
        Some(path) => {
            validate_file_path(path)?;
            SyncConfig::load(path).map_err(|e| e.to_string())
        }
        None => Ok(SyncConfig::default()),
    }
}
