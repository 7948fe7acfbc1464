// File: src/handlers/user.rs
use super::{required_arg, Handler};
use crate::dialplan::interfaces::resolve;
use crate::dialplan::{DialplanVar, Session};
use crate::directory::Directory;
use crate::error::{ResolveError, ServiceError};
use async_trait::async_trait;
use tracing::{instrument, warn};

/// Kullanıcının aranacak arayüzlerini `XIVO_INTERFACE` değişkenine yazar.
/// Bilinmeyen kullanıcı ile aranabilir cihazı olmayan kullanıcı
/// `XIVO_INTERFACE_STATUS` üzerinden ayrıştırılır.
pub struct UserGetInterfaces;

#[async_trait]
impl Handler for UserGetInterfaces {
    fn name(&self) -> &'static str {
        "user_get_interfaces"
    }

    #[instrument(name = "user_get_interfaces", skip_all)]
    async fn handle(
        &self,
        session: &mut Session<'_>,
        _cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError> {
        let identifier = required_arg(args, 0, "user_get_interfaces", "identifier")?;

        let (interfaces, status) = match resolve(session, identifier).await {
            Ok(interfaces) if interfaces.is_empty() => (String::new(), "empty"),
            Ok(interfaces) => (interfaces.join("&"), "ok"),
            Err(ServiceError::Resolve(ResolveError::UnknownUser(_))) => {
                warn!(identifier, "Bilinmeyen kullanıcı.");
                (String::new(), "unknown")
            }
            Err(e) => return Err(e),
        };

        session.set(DialplanVar::Interfaces, &interfaces).await?;
        session.set(DialplanVar::InterfaceStatus, status).await
    }
}
