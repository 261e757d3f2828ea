use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

pub const DEFAULT_USERS_FILE: &str = "Data/users.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { users_file: default_users_file() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 7071 }
fn default_users_file() -> PathBuf { PathBuf::from(DEFAULT_USERS_FILE) }
fn default_log_format() -> String { "compact".into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
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
        Self::load_and_validate_from(&config_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = load_from_file(path)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file when present, otherwise built from `SERVER_HOST`,
    /// `SERVER_PORT`, `USERS_FILE`, `LOG_FORMAT` and `TOKIO_WORKER_THREADS`.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(&config_path())
    }

    /// Only a missing file falls back to the environment. A file that is
    /// present but unreadable, malformed or invalid is an error.
    pub fn load_or_env_from(path: &str) -> Result<Self> {
        match Self::load_and_validate_from(path) {
            Ok(cfg) => Ok(cfg),
            Err(e) if is_missing_file(&e) => {
                let mut cfg = Self::from_env();
                cfg.normalize_and_validate()?;
                Ok(cfg)
            }
            Err(e) => Err(e.context(format!("config file {path}"))),
        }
    }

    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(file) = std::env::var("USERS_FILE") {
            cfg.storage.users_file = PathBuf::from(file);
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.logging.normalize();
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.users_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.users_file must not be empty"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        let f = self.format.trim().to_ascii_lowercase();
        self.format = if f == "json" { f } else { default_log_format() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gets_defaults() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 7071);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.users_file, PathBuf::from("Data/users.json"));
        assert_eq!(cfg.logging.format, "compact");
        Ok(())
    }

    #[test]
    fn reads_all_sections() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            worker_threads = 0

            [storage]
            users_file = "/var/lib/users/users.json"

            [logging]
            format = "JSON"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.users_file, PathBuf::from("/var/lib/users/users.json"));
        assert_eq!(cfg.logging.format, "json");
        Ok(())
    }

    #[test]
    fn rejects_port_zero_and_empty_path() {
        let mut cfg = parse("[server]\nport = 0\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[storage]\nusers_file = \"\"\n").expect("parse");
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn temp_config(body: &str) -> Result<PathBuf> {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, body)?;
        Ok(path)
    }

    #[test]
    fn missing_file_falls_back_to_env() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_missing_{}.toml", uuid::Uuid::new_v4()));
        let cfg = AppConfig::load_or_env_from(path.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?)?;
        assert!(cfg.server.port > 0);
        assert!(!cfg.storage.users_file.as_os_str().is_empty());
        Ok(())
    }

    #[test]
    fn invalid_file_is_an_error_not_a_fallback() -> Result<()> {
        let invalid = temp_config("[server]\nport = 0\n\n[storage]\nusers_file = \"/srv/custom.json\"\n")?;
        let broken = temp_config("[server\nport = ")?;

        for path in [&invalid, &broken] {
            let res = AppConfig::load_or_env_from(path.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?);
            assert!(res.is_err(), "{} should not load", path.display());
        }

        let _ = std::fs::remove_file(&invalid);
        let _ = std::fs::remove_file(&broken);
        Ok(())
    }

    #[test]
    fn present_file_wins_over_env() -> Result<()> {
        let path = temp_config("[server]\nport = 9100\n\n[storage]\nusers_file = \"/srv/custom.json\"\n")?;
        let cfg = AppConfig::load_or_env_from(path.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?)?;
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.storage.users_file, PathBuf::from("/srv/custom.json"));
        let _ = std::fs::remove_file(&path);
        Ok(())
    }

    #[test]
    fn loads_from_file() -> Result<()> {
        let path = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nport = 8123\n")?;
        let cfg = load_from_file(path.to_str().ok_or_else(|| anyhow!("non-utf8 path"))?)?;
        assert_eq!(cfg.server.port, 8123);
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
