//! Service layer over the database and the schema registry.
//!
//! `LodeService` wraps `LodeDb` (raw database access) and `SchemaRegistry`
//! (validation of persisted JSON documents). Repo methods are implemented
//! as `impl LodeService` blocks in [`crate::repos`].

use lode_schema::SchemaRegistry;

use crate::LodeDb;
use crate::error::DatabaseError;

pub struct LodeService {
    db: LodeDb,
    schema: SchemaRegistry,
}

impl LodeService {
    /// Open a local database, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = LodeDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    #[must_use]
    pub fn from_db(db: LodeDb) -> Self {
        Self {
            db,
            schema: SchemaRegistry::new(),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &LodeDb {
        &self.db
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }
}
