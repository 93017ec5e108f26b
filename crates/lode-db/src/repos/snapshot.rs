//! Snapshot repository: append-only history of scan snapshots.
//!
//! Each snapshot is stored as its JSON document plus the columns needed to
//! order and filter it. Documents are checked against the `snapshot` schema
//! both when written and when read back.

use lode_core::entities::Snapshot;
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, parse_json};
use crate::service::LodeService;

const SNAPSHOT_SCHEMA: &str = "snapshot";

impl LodeService {
    fn row_to_snapshot(&self, row: &libsql::Row) -> Result<Snapshot, DatabaseError> {
        let payload = parse_json(&row.get::<String>(0)?)?;
        self.schema().validate(SNAPSHOT_SCHEMA, &payload)?;
        serde_json::from_value(payload).map_err(|e| DatabaseError::Other(e.into()))
    }

    async fn query_snapshots(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<Snapshot>, DatabaseError> {
        let mut rows = self.db().conn().query(sql, params).await?;
        let mut snapshots = Vec::new();
        while let Some(row) = rows.next().await? {
            snapshots.push(self.row_to_snapshot(&row)?);
        }
        Ok(snapshots)
    }

    /// Append a completed scan's snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::DuplicateScan` if the scan already has a
    /// snapshot, or `DatabaseError::Schema` if the document is malformed.
    pub async fn append_snapshot(&self, snapshot: &Snapshot) -> Result<(), DatabaseError> {
        let payload = serde_json::to_value(snapshot).map_err(|e| DatabaseError::Other(e.into()))?;
        self.schema().validate(SNAPSHOT_SCHEMA, &payload)?;

        let mut existing = self
            .db()
            .conn()
            .query(
                "SELECT 1 FROM snapshots WHERE scan_id = ?1",
                [snapshot.scan_id.as_str()],
            )
            .await?;
        if existing.next().await?.is_some() {
            return Err(DatabaseError::DuplicateScan(snapshot.scan_id.clone()));
        }

        self.db()
            .conn()
            .execute(
                "INSERT INTO snapshots (scan_id, domain_id, completed_at, overall_score, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    snapshot.scan_id.as_str(),
                    snapshot.domain_id.as_str(),
                    format_datetime(snapshot.completed_at),
                    snapshot.overall_score,
                    payload.to_string()
                ],
            )
            .await?;

        debug!(
            domain = %snapshot.domain_id,
            scan = %snapshot.scan_id,
            "snapshot appended"
        );
        Ok(())
    }

    /// Snapshot written for `scan_id`.
    pub async fn find_snapshot(&self, scan_id: &str) -> Result<Option<Snapshot>, DatabaseError> {
        let mut snapshots = self
            .query_snapshots("SELECT payload FROM snapshots WHERE scan_id = ?1", [scan_id])
            .await?;
        Ok(snapshots.pop())
    }

    /// Most recently completed snapshot for `domain_id`.
    pub async fn latest_snapshot(&self, domain_id: &str) -> Result<Option<Snapshot>, DatabaseError> {
        let mut snapshots = self
            .query_snapshots(
                "SELECT payload FROM snapshots WHERE domain_id = ?1
                 ORDER BY completed_at DESC, seq DESC LIMIT 1",
                [domain_id],
            )
            .await?;
        Ok(snapshots.pop())
    }

    /// Snapshot immediately before `current_scan_id` in completion order.
    ///
    /// Snapshots that share a completion time are ordered by insertion.
    pub async fn previous_snapshot(
        &self,
        domain_id: &str,
        current_scan_id: &str,
    ) -> Result<Option<Snapshot>, DatabaseError> {
        let mut snapshots = self
            .query_snapshots(
                "SELECT s.payload FROM snapshots s
                 JOIN snapshots c ON c.scan_id = ?2 AND c.domain_id = s.domain_id
                 WHERE s.domain_id = ?1
                   AND (s.completed_at < c.completed_at
                        OR (s.completed_at = c.completed_at AND s.seq < c.seq))
                 ORDER BY s.completed_at DESC, s.seq DESC LIMIT 1",
                [domain_id, current_scan_id],
            )
            .await?;
        Ok(snapshots.pop())
    }

    /// Snapshots for `domain_id`, newest first.
    pub async fn list_snapshots(
        &self,
        domain_id: &str,
        limit: u32,
    ) -> Result<Vec<Snapshot>, DatabaseError> {
        self.query_snapshots(
            "SELECT payload FROM snapshots WHERE domain_id = ?1
             ORDER BY completed_at DESC, seq DESC LIMIT ?2",
            libsql::params![domain_id, i64::from(limit)],
        )
        .await
    }
}
