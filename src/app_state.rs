// File: src/app_state.rs
use crate::agentd::AgentClientCell;
use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::handlers::{builtin_handlers, Dispatcher, HandlerRegistry};
use crate::redis::{self, RedisDirectory};
use std::sync::Arc;
use tracing::info;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Handler tablosunu ve depolama bağlantısını kurar. Aynı isimde iki
    /// handler varsa servis istek kabul etmeden başarısız olur.
    pub async fn new_critical(config: Arc<AppConfig>) -> Result<Self, ServiceError> {
        // Agent istemcisi burada oluşturulmaz; ilk kullanımda bir kez kurulur.
        let agents = Arc::new(AgentClientCell::from_config(&config));
        let registry = Arc::new(HandlerRegistry::build(builtin_handlers(agents))?);
        info!(count = registry.len(), functions = ?registry.names(), "✅ Handler kayıt tablosu kuruldu.");

        info!("Kritik Redis bağımlılığı başlatılıyor...");
        let redis_manager = redis::connect_with_retry(&config.redis_url).await?;
        info!("✅ Kritik Redis bağımlılığı başarıyla kuruldu.");

        Ok(AppState {
            config,
            dispatcher: Dispatcher::new(registry, Arc::new(RedisDirectory::new(redis_manager))),
        })
    }
}
