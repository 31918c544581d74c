// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, params};
use tracing::debug;
use tumblr_archive_core::PostType;

use crate::config::DbConfig;
use crate::error::{DbContext, Error, Result};
use crate::schema::{
    FOREIGN_KEYS_SQL, POST_TYPE_INSERT_SQL, SCHEMA_SQL, SCHEMA_VERSION, VARIANT_SCHEMA_SQL,
};

/// Database open mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read-write access to an existing database
    ReadWrite,
    /// Create new database if it doesn't exist
    Create,
}

/// SQLite database of archived posts.
///
/// A `PostDb` owns a single connection. Operations that touch the database
/// take `&mut self`, so sharing one instance across threads requires external
/// synchronisation.
pub struct PostDb {
    pub(crate) conn: Connection,
}

impl PostDb {
    /// Open or create a database at a custom path.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let config = DbConfig {
            path: path.as_ref().to_owned(),
            create: mode == OpenMode::Create,
            ..Default::default()
        };
        Self::open_with_config(&config)
    }

    /// Open the database described by `config`.
    pub fn open_with_config(config: &DbConfig) -> Result<Self> {
        config.validate()?;
        let path = config.path.as_path();
        let flags = if config.create {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        } else {
            if !path.exists() {
                return Err(Error::DatabaseNotFound(path.to_owned()));
            }
            OpenFlags::SQLITE_OPEN_READ_WRITE
        };

        let conn = Connection::open_with_flags(path, flags).map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;
        Self::configure(&conn, config)?;
        let db = Self::initialize(conn)?;

        debug!("Opened database at {}", path.display());
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    ///
    /// The database is initialized with the full schema.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn, &DbConfig::default())?;
        let db = Self::initialize(conn)?;
        debug!("Created in-memory database");
        Ok(db)
    }

    /// Take over a connection opened by the caller.
    ///
    /// Journal mode, synchronous setting and busy timeout are left as the
    /// caller set them. Only `foreign_keys` is switched on, since deletes
    /// rely on it. The schema is created if it is missing.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        Self::initialize(conn)
    }

    fn configure(conn: &Connection, config: &DbConfig) -> Result<()> {
        conn.execute_batch(&config.pragma_sql())
            .db_context(|| "Failed to set database pragmas".to_string())?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .db_context(|| format!("Failed to set busy timeout of {}ms", config.busy_timeout_ms))?;
        Ok(())
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(FOREIGN_KEYS_SQL)
            .db_context(|| "Failed to enable foreign keys".to_string())?;

        let mut db = Self { conn };
        db.create_schema()?;
        Ok(db)
    }

    /// Create all tables and indexes and seed the post types.
    ///
    /// Idempotent. Runs in one transaction, so a failure leaves no partial
    /// schema behind.
    pub fn create_schema(&mut self) -> Result<()> {
        let found = self.schema_version()?;
        if found != 0 && found != SCHEMA_VERSION {
            return Err(Error::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }

        self.write_transaction("create_schema", |tx| {
            tx.execute_batch(SCHEMA_SQL)
                .db_context(|| "Failed to create base tables".to_string())?;
            tx.execute_batch(VARIANT_SCHEMA_SQL)
                .db_context(|| "Failed to create post type tables".to_string())?;

            let mut stmt = tx.prepare(POST_TYPE_INSERT_SQL)?;
            for post_type in PostType::ALL {
                stmt.execute(params![post_type.as_str()])
                    .db_context(|| format!("Failed to register post type {post_type}"))?;
            }

            tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
            Ok(())
        })?;

        debug!("Created database schema");
        Ok(())
    }

    /// Get raw connection (for advanced usage).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Check if the database has the expected schema tables.
    pub fn has_schema(&self) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('posts', 'postTypes', 'tags', 'postTags')",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 4)
    }

    /// Schema version stamped in the database header (0 for a fresh file).
    pub fn schema_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Release cached prepared statements and close the connection.
    pub fn close(self) -> Result<()> {
        self.conn.flush_prepared_statement_cache();
        self.conn.close().map_err(|(_, e)| Error::from(e))?;
        debug!("Closed database");
        Ok(())
    }
}
