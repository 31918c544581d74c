// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Transaction runner shared by every public operation.

use rusqlite::{Transaction, TransactionBehavior};
use tracing::{debug, error, warn};

use crate::connection::PostDb;
use crate::error::{DbContext, Error, Result};

impl PostDb {
    /// Run `work` in a transaction that takes the write lock up front.
    pub(crate) fn write_transaction<T, F>(&mut self, operation: &'static str, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.run_transaction(operation, TransactionBehavior::Immediate, work)
    }

    /// Run `work` in a deferred transaction, for reads.
    pub(crate) fn read_transaction<T, F>(&mut self, operation: &'static str, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.run_transaction(operation, TransactionBehavior::Deferred, work)
    }

    /// Commit if `work` succeeds, roll back if it fails.
    ///
    /// The error returned is always the one raised by `work`. When the
    /// rollback fails as well, that failure is attached to it through
    /// [`Error::RollbackFailed`].
    fn run_transaction<T, F>(
        &mut self,
        operation: &'static str,
        behavior: TransactionBehavior,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(behavior)
            .db_context(|| format!("Failed to begin transaction for {operation}"))?;

        match work(&tx) {
            Ok(value) => {
                tx.commit()
                    .db_context(|| format!("Failed to commit {operation}"))?;
                debug!(operation, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                warn!(operation, error = %err, "rolling back transaction");
                match tx.rollback() {
                    Ok(()) => Err(err),
                    Err(rollback) => {
                        error!(operation, error = %rollback, "rollback failed");
                        Err(Error::RollbackFailed {
                            source: Box::new(err),
                            rollback,
                        })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::params;

    use super::*;

    fn count_posts(db: &PostDb) -> i64 {
        db.connection()
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
            .unwrap()
    }

    fn insert_base_row(tx: &Transaction<'_>, id: i64) -> Result<()> {
        tx.execute(
            "INSERT INTO posts (id, blogName, postUrl, postedTimestamp, retrievedTimestamp, postTypeId) \
             SELECT ?1, 'b', 'u', 0, 0, id FROM postTypes WHERE type = 'TEXT'",
            params![id],
        )?;
        Ok(())
    }

    #[test_log::test]
    fn test_commit_on_success() {
        let mut db = PostDb::open_memory().unwrap();
        let value = db
            .write_transaction("test", |tx| {
                insert_base_row(tx, 1)?;
                Ok(42)
            })
            .unwrap();
        assert_eq!(value, 42);
        assert_eq!(count_posts(&db), 1);
    }

    #[test_log::test]
    fn test_rollback_keeps_original_error() {
        let mut db = PostDb::open_memory().unwrap();
        let err = db
            .write_transaction("test", |tx| -> Result<()> {
                insert_base_row(tx, 1)?;
                Err(Error::config("boom"))
            })
            .unwrap_err();

        assert!(matches!(err, Error::Config(ref m) if m == "boom"));
        assert_eq!(count_posts(&db), 0);
    }

    #[test_log::test]
    fn test_failed_rollback_keeps_original_error() {
        let mut db = PostDb::open_memory().unwrap();
        let err = db
            .write_transaction("test", |tx| -> Result<()> {
                insert_base_row(tx, 1)?;
                // Ends the transaction early, so the runner's rollback fails.
                tx.execute_batch("ROLLBACK;")?;
                Err(Error::config("primary"))
            })
            .unwrap_err();

        assert!(matches!(err, Error::RollbackFailed { .. }), "{err}");
        assert!(matches!(err.primary(), Error::Config(m) if m == "primary"));
        assert!(!err.is_unimplemented());
        assert_eq!(count_posts(&db), 0);
    }

    #[test_log::test]
    fn test_rollback_on_constraint_violation() {
        let mut db = PostDb::open_memory().unwrap();
        db.write_transaction("seed", |tx| insert_base_row(tx, 1))
            .unwrap();

        let err = db
            .write_transaction("test", |tx| {
                insert_base_row(tx, 2)?;
                insert_base_row(tx, 1)
            })
            .unwrap_err();

        assert!(matches!(err, Error::Sqlite(_)));
        assert_eq!(count_posts(&db), 1);
    }
}
