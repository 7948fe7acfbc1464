// File: src/app.rs
use crate::{
    agi::server::handle_agi_connection,
    app_state::AppState,
    config::AppConfig,
};
use anyhow::Result;
use std::{env, panic, process, sync::Arc};
use tokio::{net::TcpListener, select, signal};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Uygulamanın ana yapısı. Konfigürasyon da `AppState` içinden okunur.
pub struct App {
    state: Arc<AppState>,
}

impl App {
    /// Uygulamayı başlatır: config'i yükler, loglamayı ayarlar ve App state'ini oluşturur.
    pub async fn bootstrap() -> Result<Self> {
        setup_panic_hook();
        let config = initialize_config_and_logging()?;

        info!(
            service_name = "dialplan-agid",
            version = %config.service_version,
            commit = %env::var("GIT_COMMIT").unwrap_or_else(|_| "unknown".to_string()),
            profile = %config.env,
            config = ?config,
            "🚀 Servis başlatılıyor..."
        );

        let state = initialize_app_state(config).await;
        info!("✅ Tüm bağımlılıklar başarıyla kuruldu. Servis tam işlevsel.");

        Ok(Self { state })
    }

    /// Yapılandırmadaki adrese FastAGI dinleyicisini bağlar.
    async fn bind_listener(&self) -> Result<TcpListener> {
        let listener = TcpListener::bind(self.state.config.agi_listen_addr).await?;
        info!(address = %listener.local_addr()?, "✅ FastAGI dinleyici başlatıldı.");
        Ok(listener)
    }

    /// FastAGI dinleyicisini başlatır ve kapatma sinyaline kadar çalışır.
    pub async fn run(self) -> Result<()> {
        let listener = self.bind_listener().await?;

        let agi_listener_task = spawn_agi_listener(self.state.clone(), listener);

        select! {
            res = agi_listener_task => {
                match res {
                    Ok(Err(e)) => error!(error = ?e, "FastAGI dinleyici görevi hatayla sonlandı."),
                    Err(e) => error!(error = ?e, "FastAGI dinleyici görevi çöktü."),
                    Ok(Ok(())) => {}
                }
            },
            _ = signal::ctrl_c() => { warn!("Kapatma sinyali (Ctrl+C) alındı. Servis kapatılıyor..."); }
        }

        info!("✅ Servis başarıyla kapatıldı.");
        Ok(())
    }
}

// --- Yardımcı Fonksiyonlar ---

fn setup_panic_hook() {
    let default_panic_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        error!(%panic_info, "Kritik bir panik oluştu!");
        default_panic_hook(panic_info);
    }));
}

fn initialize_config_and_logging() -> Result<Arc<AppConfig>> {
    let config = match AppConfig::load_from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("### BAŞLANGIÇ HATASI: Yapılandırma yüklenemedi: {}", e);
            process::exit(1);
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.rust_log))?;
    let subscriber = Registry::default().with(env_filter);
    if config.env == "development" {
        subscriber.with(fmt::layer().with_target(true).with_line_number(true)).init();
    } else {
        subscriber.with(fmt::layer().json().with_current_span(true).with_span_list(true)).init();
    }
    Ok(config)
}

async fn initialize_app_state(config: Arc<AppConfig>) -> Arc<AppState> {
    info!("Tüm kritik bağımlılıklar başlatılıyor...");
    match AppState::new_critical(config).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!(error = %e, "Kritik bağımlılıklar başlatılamadı. Servis sonlandırılacak.");
            process::exit(1);
        }
    }
}

fn spawn_agi_listener(app_state: Arc<AppState>, listener: TcpListener) -> tokio::task::JoinHandle<Result<(), std::io::Error>> {
    tokio::spawn(async move {
        loop {
            let (stream, addr) = listener.accept().await?;
            if let Err(e) = stream.set_nodelay(true) {
                warn!(error = %e, remote_addr = %addr, "TCP_NODELAY ayarlanamadı.");
            }
            tokio::spawn(handle_agi_connection(stream, addr, app_state.clone()));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agentd::cell::fake::{cell_with, FakeAgentControl};
    use crate::directory::memory::MemoryDirectory;
    use crate::handlers::{builtin_handlers, Dispatcher, HandlerRegistry};

    #[tokio::test]
    async fn listener_is_bound_from_state_config() {
        let config = AppConfig::from_lookup(|key| match key {
            "REDIS_URL" => Some("redis://localhost:6379".to_string()),
            "AGID_LISTEN_HOST" => Some("127.0.0.1".to_string()),
            "AGID_LISTEN_PORT" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        let handlers = builtin_handlers(Arc::new(cell_with(Arc::new(FakeAgentControl::default()))));
        let registry = Arc::new(HandlerRegistry::build(handlers).unwrap());
        let dispatcher = Dispatcher::new(registry, Arc::new(MemoryDirectory::default()));
        let app = App {
            state: Arc::new(AppState { config: Arc::new(config), dispatcher }),
        };

        let listener = app.bind_listener().await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
