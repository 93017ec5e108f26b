//! # lode-config
//!
//! Layered configuration loading for Lodestar using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LODESTAR_*` prefix, `__` as separator)
//! 2. Project-level `.lodestar/config.toml`
//! 3. User-level `~/.config/lodestar/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LODESTAR_GRAPH__DECAY_FACTOR` -> `graph.decay_factor`,
//! `LODESTAR_DB__PATH` -> `db.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lode_config::LodestarConfig;
//!
//! let config = LodestarConfig::load_with_dotenv().expect("config");
//! println!("decay factor: {}", config.graph.decay_factor);
//! ```

mod db;
mod error;
mod general;
mod graph;
mod monitor;

pub use db::DbConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use graph::{DEFAULT_TRUSTED_DOMAINS, GraphConfig};
pub use monitor::MonitorConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".lodestar/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LodestarConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LodestarConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with an explicit project config directory in place
    /// of `.lodestar/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_from_dir(config_dir: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment_with_project(&config_dir.join("config.toml")))
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with_project(Path::new(PROJECT_CONFIG_PATH))
    }

    fn figment_with_project(project_path: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        if project_path.exists() {
            figment = figment.merge(Toml::file(project_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("LODESTAR_").split("__"))
    }

    fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.graph.validate()?;
        self.monitor.validate()?;
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lodestar").join("config.toml"))
    }
}
