//! Central schema registry for Lodestar records.

use std::collections::HashMap;

use schemars::schema_for;

use crate::error::SchemaError;

/// Named JSON Schemas for every record Lodestar reads or emits.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, schema_for!($ty).to_value());
    };
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        use lode_core::entities as e;

        let mut schemas = HashMap::new();

        // --- Entity graph ---
        register!(schemas, "entity", e::Entity);
        register!(schemas, "entity_seed", e::EntitySeed);
        register!(schemas, "triple", e::Triple);
        register!(schemas, "connected_entity", e::ConnectedEntity);
        register!(schemas, "entity_schema_record", e::EntitySchemaRecord);

        // --- Page index ---
        register!(schemas, "page_record", e::PageRecord);
        register!(schemas, "page_reference", e::PageReference);

        // --- Monitoring ---
        register!(schemas, "snapshot", e::Snapshot);
        register!(schemas, "scan_diff", e::ScanDiff);
        register!(schemas, "alert_rule", e::AlertRule);
        register!(schemas, "alert", e::Alert);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` if validation produces errors.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
