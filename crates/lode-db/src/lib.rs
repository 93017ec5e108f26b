//! # lode-db
//!
//! libSQL persistence for Lodestar monitoring state.
//!
//! Holds the append-only snapshot history of monitored domains, alert rules,
//! and the alerts they raise. [`service::LodeService`] implements the
//! `lode-core` store traits consumed by the diff engine and the
//! scan-completion pipeline.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod store;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Database handle for Lodestar monitoring state.
pub struct LodeDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LodeDb {
    /// Open a local database at `path`, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let lode_db = Self { db, conn };
        lode_db.run_migrations().await?;
        Ok(lode_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL, e.g. `"alr-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    async fn test_db() -> LodeDb {
        LodeDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        for table in ["snapshots", "alert_rules", "alerts"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in lode_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
            assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
            assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn snapshots_reject_updates() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO snapshots (scan_id, domain_id, completed_at, overall_score, payload)
                 VALUES ('scn-1', 'dom-1', '2026-06-01T00:00:00.000000Z', 70.0, '{}')",
                (),
            )
            .await
            .unwrap();
        let result = db
            .conn()
            .execute("UPDATE snapshots SET overall_score = 10.0 WHERE scan_id = 'scn-1'", ())
            .await;
        assert!(result.is_err(), "snapshots must be append-only");
    }

    #[tokio::test]
    async fn snapshots_reject_deletes() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO snapshots (scan_id, domain_id, completed_at, overall_score, payload)
                 VALUES ('scn-1', 'dom-1', '2026-06-01T00:00:00.000000Z', 70.0, '{}')",
                (),
            )
            .await
            .unwrap();
        let result = db
            .conn()
            .execute("DELETE FROM snapshots WHERE scan_id = 'scn-1'", ())
            .await;
        assert!(result.is_err(), "snapshots must never be deleted");

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM snapshots", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn alerts_require_existing_rule() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO alerts (id, rule_id, domain_id, scan_id, severity, message, triggered_at, updated_at)
                 VALUES ('alr-1', 'rul-missing', 'dom-1', 'scn-1', 'high', 'x', 't', 't')",
                (),
            )
            .await;
        assert!(result.is_err(), "foreign key on rule_id should be enforced");
    }
}
