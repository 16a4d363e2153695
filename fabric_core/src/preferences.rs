//! # User Preferences
//!
//! The single piece of persisted state: the display theme. Calculations never
//! read it.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "theme": "dark",
//!   "modified": "2026-03-01T09:30:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Current schema version for preference files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" | "l" => Ok(Theme::Light),
            "dark" | "d" => Ok(Theme::Dark),
            _ => Err(CalcError::invalid_input("theme", s, "Expected light or dark")),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Schema version (for migration compatibility)
    pub version: String,
    #[serde(default)]
    pub theme: Theme,
    /// When the preferences were last changed
    pub modified: DateTime<Utc>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            version: SCHEMA_VERSION.to_string(),
            theme: Theme::default(),
            modified: Utc::now(),
        }
    }
}

impl Preferences {
    /// Set the theme and touch the modified timestamp
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.modified = Utc::now();
    }

    /// Flip the theme, returning the new one
    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.version, SCHEMA_VERSION);
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[test]
    fn test_toggle_updates_timestamp() {
        let mut prefs = Preferences::default();
        let before = prefs.modified;
        assert_eq!(prefs.toggle_theme(), Theme::Dark);
        assert!(prefs.modified >= before);
        assert_eq!(prefs.toggle_theme(), Theme::Light);
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!(Theme::from_str_flexible(" DARK ").unwrap(), Theme::Dark);
        assert_eq!(Theme::from_str_flexible("l").unwrap(), Theme::Light);
        assert!(Theme::from_str_flexible("solarized").is_err());
    }

    #[test]
    fn test_serialization() {
        let mut prefs = Preferences::default();
        prefs.set_theme(Theme::Dark);
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains(r#""theme":"dark""#));
        let back: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
