//! # File I/O Module
//!
//! Persistence of [`Preferences`]:
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **Version validation**: refuse files from an incompatible schema
//! - **Missing file**: treated as "never saved", yields defaults
//!
//! ## Example
//!
//! ```rust,no_run
//! use fabric_core::file_io::{default_preferences_path, load_or_default, save_preferences};
//! use fabric_core::preferences::Theme;
//!
//! let path = default_preferences_path()?;
//! let mut prefs = load_or_default(&path)?;
//! prefs.set_theme(Theme::Dark);
//! save_preferences(&prefs, &path)?;
//! # Ok::<(), fabric_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::preferences::{Preferences, SCHEMA_VERSION};

/// Directory name under the platform config dir
pub const APP_DIR: &str = "fabricalc";

/// Preference file name
pub const PREFERENCES_FILE: &str = "preferences.json";

/// `<config_dir>/fabricalc/preferences.json`
pub fn default_preferences_path() -> CalcResult<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        CalcError::file_error("locate config dir", "<config_dir>", "No configuration directory on this platform")
    })?;
    Ok(preferences_path_in(&base))
}

/// Preference file path inside a config directory
pub fn preferences_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(APP_DIR).join(PREFERENCES_FILE)
}

/// Save preferences with atomic write semantics.
///
/// 1. Serialize to pretty JSON
/// 2. Write to `<path>.tmp` and fsync
/// 3. Rename over `path`
///
/// Parent directories are created as needed.
pub fn save_preferences(prefs: &Preferences, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(prefs)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| CalcError::file_error("create directory", parent.display().to_string(), e.to_string()))?;
    }

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), theme = %prefs.theme, "saved preferences");
    Ok(())
}

/// Load preferences from a file.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error, including a missing file
pub fn load_preferences(path: &Path) -> CalcResult<Preferences> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let prefs: Preferences = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&prefs.version)?;
    Ok(prefs)
}

/// Load preferences, or defaults when the file does not exist yet
pub fn load_or_default(path: &Path) -> CalcResult<Preferences> {
    if !path.exists() {
        debug!(path = %path.display(), "no preferences file, using defaults");
        return Ok(Preferences::default());
    }
    load_preferences(path)
}

/// Validate that a file version is compatible with the current schema.
///
/// Major must match; while on 0.x a newer minor is rejected too.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };
    let (Some(file), Some(current)) = (parse(file_version), parse(SCHEMA_VERSION)) else {
        return Err(mismatch());
    };

    match (file.as_slice(), current.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::Theme;
    use std::env::temp_dir;

    fn temp_config_dir(name: &str) -> PathBuf {
        temp_dir().join(format!("fabricalc_test_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_path_layout() {
        let path = preferences_path_in(Path::new("/home/qc/.config"));
        assert_eq!(path, Path::new("/home/qc/.config/fabricalc/preferences.json"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = temp_config_dir("roundtrip");
        let path = preferences_path_in(&dir);

        let mut prefs = Preferences::default();
        prefs.set_theme(Theme::Dark);
        save_preferences(&prefs, &path).unwrap();

        let loaded = load_preferences(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.modified, prefs.modified);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let dir = temp_config_dir("atomic");
        let path = preferences_path_in(&dir);

        save_preferences(&Preferences::default(), &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = preferences_path_in(&temp_config_dir("missing"));
        assert!(load_preferences(&path).is_err());
        assert_eq!(load_or_default(&path).unwrap().theme, Theme::Light);
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = temp_config_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(PREFERENCES_FILE);
        fs::write(&path, "{ not json").unwrap();

        let err = load_or_default(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("").is_err());
        assert!(validate_version("zero.one").is_err());
    }

    #[test]
    fn test_newer_file_is_rejected_on_load() {
        let dir = temp_config_dir("newer");
        let path = preferences_path_in(&dir);
        let prefs = Preferences {
            version: "0.9.0".to_string(),
            ..Preferences::default()
        };
        save_preferences(&prefs, &path).unwrap();

        let err = load_preferences(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_dir_all(&dir);
    }
}
