use serde::Deserialize;
use std::collections::HashSet;
use std::net::IpAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub access: AccessConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

fn default_query_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Peers allowed to talk to the server; anyone else gets a 400 before
    /// any handler runs.
    pub allowed_peers: Vec<String>,
}

impl AccessConfig {
    /// Allow-list parsed to addresses; checked once at startup.
    pub fn allowed_ips(&self) -> anyhow::Result<HashSet<IpAddr>> {
        self.allowed_peers
            .iter()
            .map(|p| {
                p.parse::<IpAddr>()
                    .map_err(|e| anyhow::anyhow!("access.allowed_peers entry {:?}: {}", p, e))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// Root directory served for any path the API does not handle.
    pub root: String,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.database.query_timeout_ms > 0,
            "database.query_timeout_ms must be > 0, got {}",
            self.database.query_timeout_ms
        );
        anyhow::ensure!(
            !self.static_files.root.is_empty(),
            "static_files.root must be non-empty"
        );
        self.access.allowed_ips()?;
        Ok(())
    }
}
