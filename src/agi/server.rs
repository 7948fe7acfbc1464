// File: src/agi/server.rs
use super::connection::AgiConnection;
use crate::app_state::AppState;
use crate::error::ServiceError;
use rand::distributions::{Alphanumeric, DistString};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, instrument, warn, Span};

/// Tek bir FastAGI bağlantısını baştan sona işler: ortam bloğunu okur,
/// isteği dispatcher'a verir ve hataları kanala raporlar. Hatalar süreci
/// hiçbir zaman durdurmaz.
#[instrument(skip_all, fields(remote_addr = %addr, trace_id, function, channel, uniqueid))]
pub async fn handle_agi_connection<S>(stream: S, addr: SocketAddr, state: Arc<AppState>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let trace_id = format!("trace-{}", Alphanumeric.sample_string(&mut rand::thread_rng(), 12));
    Span::current().record("trace_id", &trace_id as &str);

    let mut conn = AgiConnection::new(stream);
    let request = match conn.read_request().await {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "FastAGI isteği okunamadı, bağlantı kapatılıyor.");
            return;
        }
    };

    Span::current().record("function", &request.function_name as &str);
    Span::current().record("channel", request.channel());
    Span::current().record("uniqueid", request.uniqueid());
    debug!(args = ?request.args, "FastAGI isteği alındı.");

    let result = state
        .dispatcher
        .handle(&request.function_name, &request.args, &mut conn)
        .await;

    match result {
        Ok(()) => {}
        Err(ServiceError::ChannelHungUp) => {
            info!("Çağrı, handler tamamlanmadan kapandı.");
        }
        Err(e) => {
            match &e {
                ServiceError::UnknownFunction(_) => {
                    error!(error = %e, "Kayıtlı olmayan bir fonksiyon çağrıldı, dağıtım yapılandırması kontrol edilmeli.")
                }
                _ => error!(error = %e, "Handler hatayla sonlandı."),
            }
            if !conn.is_hung_up() {
                if let Err(report_err) = conn.verbose(&format!("agid: {}", e)).await {
                    debug!(error = %report_err, "Hata kanala raporlanamadı.");
                }
            }
        }
    }
}
