use anyhow::Context;
use lode_config::LodestarConfig;
use lode_db::service::LodeService;
use lode_graph::{EntityRegistry, TrustedDomains, load_configured_registry};

/// Shared resources loaded once per invocation.
pub struct AppContext {
    pub config: LodestarConfig,
    pub registry: EntityRegistry,
    pub trusted: TrustedDomains,
}

impl AppContext {
    pub fn init(config: LodestarConfig) -> anyhow::Result<Self> {
        let registry = load_configured_registry(&config.graph)?;
        let trusted = TrustedDomains::from_config(&config.graph);
        tracing::debug!(
            version = registry.version(),
            entities = registry.len(),
            "entity registry loaded"
        );
        Ok(Self {
            config,
            registry,
            trusted,
        })
    }

    /// Open the snapshot database named by `db.path`, creating its directory.
    pub async fn open_service(&self) -> anyhow::Result<LodeService> {
        let db = &self.config.db;
        let parent = std::path::Path::new(&db.path)
            .parent()
            .filter(|p| !db.is_in_memory() && !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        LodeService::new_local(&db.path)
            .await
            .with_context(|| format!("failed to open snapshot database at {}", db.path))
    }
}
