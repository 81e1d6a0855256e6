use anyhow::Result;
use serde::Deserialize;
use anyhow::{anyhow, Context};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub security: SecurityConfig,
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

/// Password hashing cost. Defaults follow the Argon2id baseline
/// (19 MiB, 2 passes, 1 lane), which costs tens of milliseconds per hash.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_argon2_memory_kib() -> u32 { 19 * 1024 }
fn default_argon2_iterations() -> u32 { 2 }
fn default_argon2_parallelism() -> u32 { 1 }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`); fall back to environment-only
    /// configuration when the file is missing.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&config_path())
    }

    /// Same as [`AppConfig::load_and_validate`] for an explicit path. Only a
    /// missing file falls back to the environment; unreadable or malformed
    /// files are errors.
    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).with_context(|| format!("parsing {path}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_env(),
            Err(e) => return Err(e).with_context(|| format!("reading {path}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        // PORT 兼容旧部署方式
        if let Some(port) = env_parse::<u16>("SERVER_PORT").or_else(|| env_parse::<u16>("PORT")) {
            cfg.server.port = port;
        }
        if let Some(w) = env_parse::<usize>("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = Some(w);
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.security.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
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

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
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
}

impl SecurityConfig {
    /// Bounds mirror what the Argon2 implementation accepts.
    pub fn validate(&self) -> Result<()> {
        if self.argon2_iterations == 0 {
            return Err(anyhow!("security.argon2_iterations must be >= 1"));
        }
        if self.argon2_parallelism == 0 || self.argon2_parallelism > 0x00ff_ffff {
            return Err(anyhow!("security.argon2_parallelism must be within 1..=16777215"));
        }
        if self.argon2_memory_kib < 8 * self.argon2_parallelism {
            return Err(anyhow!("security.argon2_memory_kib must be >= 8 * argon2_parallelism"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // 环境变量是进程级共享状态，相关用例串行执行
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &["SERVER_HOST", "SERVER_PORT", "PORT", "TOKIO_WORKER_THREADS", "DATABASE_URL", "CONFIG_PATH"];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn temp_config(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("employee-registry-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn parse_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 3000

            [database]
            url = "postgres://u:p@localhost:5432/employees"
            max_connections = 5
            min_connections = 1

            [security]
            argon2_memory_kib = 4096
            argon2_iterations = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.worker_threads, None);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.acquire_timeout_secs, 30);
        assert_eq!(cfg.security.argon2_memory_kib, 4096);
        assert_eq!(cfg.security.argon2_parallelism, 1);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.database.min_connections, 2);
        assert_eq!(cfg.security.argon2_iterations, 2);
    }

    #[test]
    fn normalize_fills_worker_threads_and_host() {
        let mut cfg = parse(
            r#"
            [server]
            host = " "
            port = 8080
            worker_threads = 0

            [database]
            url = "postgresql://localhost/db"
            "#,
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn database_validation_rejects_bad_values() {
        let mut db = DatabaseConfig { url: "mysql://localhost/db".into(), ..Default::default() };
        assert!(db.validate().is_err());

        db.url = "postgres://localhost/db".into();
        assert!(db.validate().is_ok());

        db.min_connections = 0;
        assert!(db.validate().is_err());

        db.min_connections = 5;
        db.max_connections = 2;
        assert!(db.validate().is_err());
    }

    #[test]
    fn security_validation_rejects_zero_cost() {
        let sec = SecurityConfig { argon2_iterations: 0, ..Default::default() };
        assert!(sec.validate().is_err());
        let sec = SecurityConfig { argon2_memory_kib: 4, ..Default::default() };
        assert!(sec.validate().is_err());
        assert!(SecurityConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("SERVER_PORT", "9191");
        std::env::set_var("DATABASE_URL", "postgres://env-user@localhost:5432/from_env");
        let missing = std::env::temp_dir().join("employee-registry-does-not-exist.toml");

        let cfg = AppConfig::load_and_validate_from(&missing.to_string_lossy()).unwrap();
        assert_eq!(cfg.server.port, 9191);
        assert_eq!(cfg.database.url, "postgres://env-user@localhost:5432/from_env");

        std::env::remove_var("SERVER_PORT");
        std::env::set_var("PORT", "9292");
        std::env::set_var("TOKIO_WORKER_THREADS", "2");
        let cfg = AppConfig::load_and_validate_from(&missing.to_string_lossy()).unwrap();
        assert_eq!(cfg.server.port, 9292);
        assert_eq!(cfg.server.worker_threads, Some(2));
        clear_env();
    }

    #[test]
    fn malformed_file_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/db");
        let path = temp_config("malformed", "[server]\nport = \"not-a-number\"\n");

        let err = AppConfig::load_and_validate_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"), "{err:#}");

        std::env::set_var("CONFIG_PATH", &path);
        assert!(AppConfig::load_and_validate().is_err());

        let _ = std::fs::remove_file(&path);
        clear_env();
    }

    #[test]
    fn existing_file_wins_over_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var("SERVER_PORT", "9191");
        let path = temp_config(
            "valid",
            "[server]\nhost = \"0.0.0.0\"\nport = 3000\n\n[database]\nurl = \"postgres://file@localhost/db\"\n",
        );

        let cfg = AppConfig::load_and_validate_from(&path).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.database.url, "postgres://file@localhost/db");

        let _ = std::fs::remove_file(&path);
        clear_env();
    }
}
