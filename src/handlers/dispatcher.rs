// File: src/handlers/dispatcher.rs
use super::registry::HandlerRegistry;
use crate::agi::channel::CallChannel;
use crate::dialplan::Session;
use crate::directory::{DirectoryPool, LazyCursor};
use crate::error::ServiceError;
use std::sync::Arc;
use tracing::{info, instrument};

/// Gelen isteği kayıtlı handler'a yönlendirir. Her istek kendi oturumunu
/// ve kendi depolama imlecini alır.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    directory: Arc<dyn DirectoryPool>,
}

impl Dispatcher {
    pub fn new(registry: Arc<HandlerRegistry>, directory: Arc<dyn DirectoryPool>) -> Self {
        Self { registry, directory }
    }

    #[instrument(skip(self, args, channel), fields(arg_count = args.len()))]
    pub async fn handle(
        &self,
        function_name: &str,
        args: &[String],
        channel: &mut dyn CallChannel,
    ) -> Result<(), ServiceError> {
        let handler = self
            .registry
            .get(function_name)
            .ok_or_else(|| ServiceError::UnknownFunction(function_name.to_string()))?;

        let mut cursor = LazyCursor::new(self.directory.as_ref());
        let mut session = Session::new(channel);
        handler.handle(&mut session, &mut cursor, args).await?;
        info!("Handler başarıyla tamamlandı.");
        Ok(())
    }
}
