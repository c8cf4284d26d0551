use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use url::Url;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), static_dir: default_static_dir() }
    }
}

fn default_static_dir() -> String {
    "static".into()
}

/// Where team and service data comes from.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// In-process fixture data.
    #[default]
    Fixture,
    /// Forward every call to the external backend API.
    Proxy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Artificial latency applied by the fixture backend before a delete completes.
    #[serde(default)]
    pub delete_delay_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            mode: BackendMode::Fixture,
            api_base_url: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            delete_delay_ms: 0,
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Insert every catalog entry on each run; reruns duplicate rows.
    #[default]
    Append,
    /// Insert missing slugs and refresh existing ones.
    UpsertBySlug,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub mode: SeedMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; when set it wins over the discrete fields below.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub root_username: String,
    #[serde(default)]
    pub root_password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_admin_database")]
    pub admin_database: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: default_db_host(),
            port: default_db_port(),
            root_username: String::new(),
            root_password: String::new(),
            name: String::new(),
            admin_database: default_admin_database(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_db_host() -> String {
    "localhost".into()
}
fn default_db_port() -> u16 {
    5432
}
fn default_admin_database() -> String {
    "postgres".into()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    5
}
fn default_acquire_timeout() -> u64 {
    30
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if e.downcast_ref::<std::io::Error>().is_some() => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.backend.normalize_from_env()?;
        self.backend.validate()?;
        self.seed.normalize_from_env()?;
        self.database.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    pub fn normalize_from_env(&mut self) {
        if let Some(host) = env_var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = env_var("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = env_var("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        if self.static_dir.trim().is_empty() {
            self.static_dir = default_static_dir();
        }
        Ok(())
    }
}

impl BackendConfig {
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Some(mode) = env_var("BACKEND_MODE") {
            self.mode = match mode.to_ascii_lowercase().as_str() {
                "fixture" => BackendMode::Fixture,
                "proxy" => BackendMode::Proxy,
                other => return Err(anyhow!("BACKEND_MODE must be `fixture` or `proxy`, got `{other}`")),
            };
        }
        if let Some(url) = env_var("API_BASE_URL") {
            self.api_base_url = url;
        }
        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.mode == BackendMode::Proxy {
            if self.api_base_url.is_empty() {
                return Err(anyhow!("backend.api_base_url is empty; set it in config.toml or API_BASE_URL"));
            }
            let url = Url::parse(&self.api_base_url)
                .map_err(|e| anyhow!("backend.api_base_url `{}` is not a valid URL: {e}", self.api_base_url))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(anyhow!("backend.api_base_url must start with http:// or https://"));
            }
            if url.host_str().is_none() {
                return Err(anyhow!("backend.api_base_url has no host"));
            }
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(anyhow!("backend timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl SeedConfig {
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Some(mode) = env_var("SEED_MODE") {
            self.mode = match mode.to_ascii_lowercase().as_str() {
                "append" => SeedMode::Append,
                "upsert_by_slug" | "upsert" => SeedMode::UpsertBySlug,
                other => return Err(anyhow!("SEED_MODE must be `append` or `upsert_by_slug`, got `{other}`")),
            };
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill empty fields from the environment (`DATABASE_URL`, `DB_*`).
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Some(url) = env_var("DATABASE_URL") {
                self.url = url;
            }
        }
        if let Some(host) = env_var("DB_HOST") {
            self.host = host;
        }
        if let Some(port) = env_var("DB_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if self.root_username.is_empty() {
            if let Some(u) = env_var("DB_ROOT_USERNAME") { self.root_username = u; }
        }
        if self.root_password.is_empty() {
            if let Some(p) = env_var("DB_ROOT_PASSWORD") { self.root_password = p; }
        }
        if self.name.is_empty() {
            if let Some(n) = env_var("DB_NAME") { self.name = n; }
        }
    }

    /// True when the connection target comes from the discrete host/credential fields.
    pub fn uses_discrete_fields(&self) -> bool {
        self.url.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.uses_discrete_fields() {
            if self.root_username.trim().is_empty() {
                return Err(anyhow!("database.root_username is empty; set it in config.toml or DB_ROOT_USERNAME"));
            }
            if self.name.trim().is_empty() {
                return Err(anyhow!("database.name is empty; set it in config.toml or DB_NAME"));
            }
        } else {
            let lower = self.url.to_lowercase();
            if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
                return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
            }
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }

    /// URL for the administrative database used to bootstrap the target database.
    pub fn admin_url(&self) -> Result<String> {
        self.postgres_url(&self.admin_database)
    }

    /// URL for the target database.
    pub fn target_url(&self) -> Result<String> {
        if self.uses_discrete_fields() {
            self.postgres_url(&self.name)
        } else {
            Ok(self.url.clone())
        }
    }

    /// Credentials and database name are percent-encoded by `Url`.
    fn postgres_url(&self, database: &str) -> Result<String> {
        let mut url = Url::parse("postgres://localhost")?;
        url.set_host(Some(&self.host)).map_err(|e| anyhow!("database.host `{}` is invalid: {e}", self.host))?;
        url.set_port(Some(self.port)).map_err(|_| anyhow!("database.port cannot be set"))?;
        url.set_username(&self.root_username).map_err(|_| anyhow!("database.root_username cannot be set"))?;
        if !self.root_password.is_empty() {
            url.set_password(Some(&self.root_password)).map_err(|_| anyhow!("database.root_password cannot be set"))?;
        }
        url.path_segments_mut().map_err(|_| anyhow!("postgres URL has no path"))?.push(database);
        Ok(url.into())
    }
}
