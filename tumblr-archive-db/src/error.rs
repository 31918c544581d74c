// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types for post database operations.

use std::path::PathBuf;

use thiserror::Error;
use tumblr_archive_core::{PostId, PostType};

/// Result type for post database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during post database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// SQLite error with context about the statement or post involved
    #[error("{context}: {source}")]
    Query {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: i32, found: i32 },

    /// The post type has no working mapper yet.
    #[error("{post_type} posts are not supported yet (post {id})")]
    Unimplemented { post_type: PostType, id: PostId },

    /// The type table holds a name outside the known post types.
    ///
    /// This is a broken invariant, not a recoverable condition.
    #[error("Post {id} has impossible type '{type_name}'")]
    UnknownPostType { id: PostId, type_name: String },

    /// A base row exists without the row of its variant table.
    #[error("Post {id} is missing its {post_type} data")]
    MissingVariantRow { id: PostId, post_type: PostType },

    /// A post lists the same tag twice.
    #[error("Post {id} has duplicate tag '{tag}'")]
    DuplicateTag { id: PostId, tag: String },

    /// The transaction failed and so did the rollback.
    ///
    /// `source` is the original failure; [`Error::primary`] unwraps to it.
    #[error("{source} (rollback also failed: {rollback})")]
    RollbackFailed {
        #[source]
        source: Box<Error>,
        rollback: rusqlite::Error,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to read a file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The failure that caused the operation to abort, looking through a
    /// failed rollback.
    pub fn primary(&self) -> &Error {
        match self {
            Error::RollbackFailed { source, .. } => source.primary(),
            other => other,
        }
    }

    /// Whether the operation hit a post type without a working mapper.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self.primary(), Error::Unimplemented { .. })
    }
}

/// Helper trait for adding context to SQLite errors
pub(crate) trait DbContext<T> {
    fn db_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> DbContext<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| Error::Query {
            context: f(),
            source,
        })
    }
}
