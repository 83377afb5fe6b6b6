use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATA_FILE: &str = "data/database.json";
/// Session records may embed encoded video, so the limit is generous.
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            worker_threads: Some(4),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// What to do when the data file exists but cannot be parsed.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CorruptStatePolicy {
    /// Move the unreadable file aside and start from the seeded store.
    #[default]
    Recover,
    /// Refuse to start.
    Fail,
}

impl CorruptStatePolicy {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recover" => Ok(Self::Recover),
            "fail" => Ok(Self::Fail),
            other => Err(anyhow!("storage.on_corrupt must be `recover` or `fail`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub path: String,
    #[serde(default)]
    pub on_corrupt: CorruptStatePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_data_file(), on_corrupt: CorruptStatePolicy::default() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_max_body_bytes() -> usize { DEFAULT_MAX_BODY_BYTES }
fn default_data_file() -> String { DEFAULT_DATA_FILE.into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

/// `Ok(None)` only when the file does not exist; unreadable or invalid files are errors.
pub fn load_optional(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content)
            .map(Some)
            .map_err(|e| anyhow!("invalid config file {path}: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow!("cannot read config file {path}: {e}")),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file if present, environment otherwise; always normalized.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    /// Env fallback applies only when `path` does not exist.
    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_optional(path)? {
            Some(cfg) => cfg,
            None => Self::from_env()?,
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build from `SERVER_HOST`, `PORT`/`SERVER_PORT`, `DATABASE_FILE`,
    /// `STORAGE_ON_CORRUPT`, `MAX_BODY_BYTES` and `TOKIO_WORKER_THREADS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Some(host) = get("SERVER_HOST") {
            cfg.server.host = host;
        }
        // PORT is what hosting platforms inject, so it beats SERVER_PORT.
        if let Some(port) = get("PORT").or_else(|| get("SERVER_PORT")) {
            cfg.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid port `{port}`"))?;
        }
        if let Some(threads) = get("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = threads.trim().parse().ok();
        }
        if let Some(limit) = get("MAX_BODY_BYTES") {
            cfg.server.max_body_bytes = limit
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid MAX_BODY_BYTES `{limit}`"))?;
        }
        if let Some(path) = get("DATABASE_FILE") {
            cfg.storage.path = path;
        }
        if let Some(policy) = get("STORAGE_ON_CORRUPT") {
            cfg.storage.on_corrupt = CorruptStatePolicy::parse(&policy)?;
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("server.max_body_bytes must be positive"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is empty; set it in config.toml or DATABASE_FILE"));
        }
        Ok(())
    }
}
