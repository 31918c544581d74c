// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database configuration, loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];
const SYNCHRONOUS_MODES: &[&str] = &["OFF", "NORMAL", "FULL", "EXTRA"];

/// How a [`PostDb`](crate::PostDb) opens its database file.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DbConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,

    /// Create the database if it does not exist yet
    pub create: bool,

    /// SQLite journal mode
    pub journal_mode: String,

    /// SQLite synchronous setting
    pub synchronous: String,

    /// How long to wait for a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("posts.sqlite"),
            create: true,
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

impl DbConfig {
    /// Load and validate a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        let config: DbConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject pragma values SQLite would silently ignore.
    pub fn validate(&self) -> Result<()> {
        if !JOURNAL_MODES.contains(&self.journal_mode.to_ascii_uppercase().as_str()) {
            return Err(Error::config(format!(
                "unknown journal_mode '{}'",
                self.journal_mode
            )));
        }
        if !SYNCHRONOUS_MODES.contains(&self.synchronous.to_ascii_uppercase().as_str()) {
            return Err(Error::config(format!(
                "unknown synchronous setting '{}'",
                self.synchronous
            )));
        }
        Ok(())
    }

    /// Pragma statements applied when a connection is opened.
    pub(crate) fn pragma_sql(&self) -> String {
        format!(
            "PRAGMA journal_mode = {};\n\
             PRAGMA synchronous = {};\n\
             PRAGMA foreign_keys = ON;\n\
             PRAGMA temp_store = MEMORY;",
            self.journal_mode.to_ascii_uppercase(),
            self.synchronous.to_ascii_uppercase(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "path = \"/var/lib/archive/posts.sqlite\"").unwrap();
        writeln!(file, "synchronous = \"full\"").unwrap();

        let config = DbConfig::from_file(file.path()).unwrap();
        assert_eq!(config.path, PathBuf::from("/var/lib/archive/posts.sqlite"));
        assert_eq!(config.synchronous, "full");
        assert_eq!(config.journal_mode, "WAL");
        assert!(config.create);
        assert_eq!(config.busy_timeout_ms, 5000);
        assert!(config.pragma_sql().contains("PRAGMA synchronous = FULL;"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DbConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "busy_timeout_ms = \"soon\"").unwrap();
        let err = DbConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[rstest]
    #[case("wal", "normal", true)]
    #[case("MEMORY", "OFF", true)]
    #[case("journal", "NORMAL", false)]
    #[case("WAL", "sometimes", false)]
    fn test_validate(#[case] journal_mode: &str, #[case] synchronous: &str, #[case] ok: bool) {
        let config = DbConfig {
            journal_mode: journal_mode.into(),
            synchronous: synchronous.into(),
            ..Default::default()
        };
        assert_eq!(config.validate().is_ok(), ok);
    }
}
