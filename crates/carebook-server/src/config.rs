use carebook_auth::AuthConfig;
use carebook_db_postgres::PostgresConfig;
use carebook_media::MediaConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn addr(&self) -> SocketAddr {
        let ip: std::net::IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(ip, self.server.port)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.body_limit_bytes == 0 {
            return Err("server.body_limit_bytes must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        self.auth.validate()?;
        if self.storage.backend == StorageBackend::Postgres && self.storage.active_url().is_none() {
            return Err(format!(
                "storage.{}_url is required when storage.backend = \"postgres\" and storage.active = \"{}\"",
                self.storage.active.as_str(),
                self.storage.active.as_str()
            ));
        }
        if self.storage.pool_size == 0 {
            return Err("storage.pool_size must be > 0".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed to call the API with credentials
    /// (the public site and the admin dashboard).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    4000
}
fn default_body_limit() -> usize {
    5 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

/// Which of the two configured databases to connect to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveDatabase {
    #[default]
    Local,
    Cloud,
}

impl ActiveDatabase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub active: ActiveDatabase,
    #[serde(default)]
    pub local_url: Option<String>,
    #[serde(default)]
    pub cloud_url: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_pool_size() -> u32 {
    10
}
fn default_connect_timeout_ms() -> u64 {
    5000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            active: ActiveDatabase::default(),
            local_url: None,
            cloud_url: None,
            pool_size: default_pool_size(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl StorageConfig {
    /// Connection URL of the active database, if set and non-empty.
    pub fn active_url(&self) -> Option<&str> {
        let url = match self.active {
            ActiveDatabase::Local => self.local_url.as_deref(),
            ActiveDatabase::Cloud => self.cloud_url.as_deref(),
        };
        url.filter(|u| !u.trim().is_empty())
    }

    pub fn postgres_config(&self) -> Option<PostgresConfig> {
        self.active_url().map(|url| {
            PostgresConfig::new(url)
                .with_pool_size(self.pool_size)
                .with_connect_timeout_ms(self.connect_timeout_ms)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File, FileFormat};
    use std::path::Path;

    /// Default configuration file, relative to the working directory.
    pub const DEFAULT_CONFIG_PATH: &str = "carebook.toml";

    /// Loads the configuration: optional TOML file, then `CAREBOOK__SECTION__KEY`
    /// environment overrides, then validation.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut builder = Config::builder();
        if path.exists() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        // Environment variable overrides, e.g., CAREBOOK__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("CAREBOOK")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
