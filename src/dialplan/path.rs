// File: src/dialplan/path.rs
use super::session::Session;
use super::variables::DialplanVar;
use crate::error::ServiceError;
use tracing::{debug, info};

/// Çağrı bacağına hizmet eden ilk yönlendirme yolunu kaydeder. `XIVO_PATH`
/// zaten doluysa hiçbir şey yazılmaz; ilk yazan kazanır.
pub async fn set_path(session: &mut Session<'_>, path_type: &str, path_id: &str) -> Result<(), ServiceError> {
    if let Some(current) = session.get(DialplanVar::PathType).await? {
        debug!(current = %current, requested = path_type, "Yol zaten belirlenmiş, değiştirilmiyor.");
        return Ok(());
    }
    session.set(DialplanVar::PathType, path_type).await?;
    session.set(DialplanVar::PathId, path_id).await?;
    info!(path_type, path_id, "Çağrı yolu kaydedildi.");
    Ok(())
}
