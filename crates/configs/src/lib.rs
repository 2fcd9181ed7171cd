use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub admin: Option<AdminBootstrap>,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Cookie-backed login sessions.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_session_idle")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_session_idle(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_cookie_name() -> String { "VENUESESSION".into() }
fn default_session_idle() -> u64 { 1800 }
fn default_max_sessions() -> u64 { 10_000 }

/// Where uploaded avatars and venue pictures are written.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    #[serde(default = "default_upload_max_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { dir: default_upload_dir(), max_bytes: default_upload_max_bytes() }
    }
}

fn default_upload_dir() -> String { "data/upload".into() }
fn default_upload_max_bytes() -> usize { 5 * 1024 * 1024 }

/// Optional administrator account created at startup when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBootstrap {
    pub user_id: String,
    #[serde(default = "default_admin_name")]
    pub user_name: String,
    pub password: String,
}

fn default_admin_name() -> String { "administrator".into() }

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
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

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but a missing config file falls back
    /// to defaults filled from the environment.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::from_env(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overlaid with `SERVER_HOST`, `SERVER_PORT`, `ADMIN_USER_ID`/`ADMIN_PASSWORD`.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let (Ok(user_id), Ok(password)) = (std::env::var("ADMIN_USER_ID"), std::env::var("ADMIN_PASSWORD")) {
            cfg.admin = Some(AdminBootstrap { user_id, user_name: default_admin_name(), password });
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.session.validate()?;
        self.upload.validate()?;
        if let Some(admin) = &self.admin {
            admin.validate()?;
        }
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url 为空；请在 config.toml 或环境变量 DATABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || self.is_sqlite()) {
            return Err(anyhow!("database.url 必须以 postgresql://、postgres:// 或 sqlite: 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if self.cookie_name.trim().is_empty() || self.cookie_name.contains(['=', ';', ' ']) {
            return Err(anyhow!("session.cookie_name 不是合法的 cookie 名称"));
        }
        if self.idle_timeout_secs == 0 {
            return Err(anyhow!("session.idle_timeout_secs 必须 >= 1"));
        }
        if self.max_sessions == 0 {
            return Err(anyhow!("session.max_sessions 必须 >= 1"));
        }
        Ok(())
    }
}

impl UploadConfig {
    fn validate(&self) -> Result<()> {
        if self.dir.trim().is_empty() {
            return Err(anyhow!("upload.dir 为空"));
        }
        if self.max_bytes == 0 {
            return Err(anyhow!("upload.max_bytes 必须 >= 1"));
        }
        Ok(())
    }
}

impl AdminBootstrap {
    fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() || self.password.is_empty() {
            return Err(anyhow!("admin.user_id 与 admin.password 不能为空"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "sqlite::memory:"
            min_connections = 1
            max_connections = 1

            [session]
            cookie_name = "SID"
            idle_timeout_secs = 60

            [upload]
            dir = "/tmp/uploads"

            [admin]
            user_id = "root"
            password = "changeme"

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert!(cfg.database.is_sqlite());
        assert_eq!(cfg.session.cookie_name, "SID");
        assert_eq!(cfg.session.max_sessions, 10_000);
        assert_eq!(cfg.upload.dir, "/tmp/uploads");
        assert_eq!(cfg.admin.as_ref().unwrap().user_name, "administrator");
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let mut cfg = parse("[database]\nurl = \"postgres://u:p@localhost/db\"\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.session.cookie_name, "VENUESESSION");
        assert!(cfg.admin.is_none());
        assert_eq!(cfg.log.format, LogFormat::Compact);
    }

    #[test]
    fn rejects_unknown_database_scheme() {
        let db = DatabaseConfig { url: "mysql://localhost/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_bad_cookie_name() {
        let s = SessionConfig { cookie_name: "a b".into(), ..SessionConfig::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let db = DatabaseConfig {
            url: "sqlite::memory:".into(),
            min_connections: 4,
            max_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }
}
