// File: src/config.rs
use crate::error::ServiceError;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Clone)]
pub struct AppConfig {
    pub agi_listen_addr: SocketAddr,
    pub redis_url: String,
    pub agentd_url: String,
    pub agentd_token: Option<String>,
    pub agentd_timeout: Duration,
    pub env: String,
    pub rust_log: String,
    pub service_version: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("agi_listen_addr", &self.agi_listen_addr)
            .field("redis_url", &"***REDACTED***")
            .field("agentd_url", &self.agentd_url)
            .field("agentd_token", &self.agentd_token.as_ref().map(|_| "***REDACTED***"))
            .field("agentd_timeout", &self.agentd_timeout)
            .field("env", &self.env)
            .field("rust_log", &self.rust_log)
            .field("service_version", &self.service_version)
            .finish()
    }
}

impl AppConfig {
    pub fn load_from_env() -> Result<Self, ServiceError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Değerleri verilen kaynaktan okur. Testler ortam değişkenlerine
    /// dokunmadan bu fonksiyonu kullanır.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("AGID_LISTEN_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port_str = lookup("AGID_LISTEN_PORT").unwrap_or_else(|| "4573".to_string());
        let port = port_str.parse::<u16>().map_err(|e| ServiceError::InvalidConfig {
            key: "AGID_LISTEN_PORT",
            reason: e.to_string(),
        })?;
        let agi_listen_addr = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| ServiceError::InvalidConfig {
                key: "AGID_LISTEN_HOST",
                reason: e.to_string(),
            })?;

        let redis_use_ssl = lookup("REDIS_USE_SSL")
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);
        let redis_url_from_env = lookup("REDIS_URL").ok_or(env::VarError::NotPresent)?;
        let redis_url = if redis_use_ssl && redis_url_from_env.starts_with("redis://") {
            redis_url_from_env.replacen("redis://", "rediss://", 1)
        } else {
            redis_url_from_env
        };

        let timeout_str = lookup("AGENTD_TIMEOUT_SECS").unwrap_or_else(|| "5".to_string());
        let agentd_timeout = timeout_str
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ServiceError::InvalidConfig {
                key: "AGENTD_TIMEOUT_SECS",
                reason: e.to_string(),
            })?;

        Ok(AppConfig {
            agi_listen_addr,
            redis_url,
            agentd_url: lookup("AGENTD_URL")
                .unwrap_or_else(|| "http://localhost:9493".to_string())
                .trim_end_matches('/')
                .to_string(),
            agentd_token: lookup("AGENTD_TOKEN").filter(|t| !t.is_empty()),
            agentd_timeout,
            env: lookup("ENV").unwrap_or_else(|| "production".to_string()),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            service_version: lookup("SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        })
    }
}
