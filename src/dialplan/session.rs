// File: src/dialplan/session.rs
use super::variables::DialplanVar;
use crate::agi::channel::CallChannel;
use crate::error::ServiceError;
use tracing::debug;

/// Tek bir handler çağrısı süresince bir çağrı bacağına bağlı bağlam.
/// Dispatcher tarafından oluşturulur, handler'a referansla verilir.
pub struct Session<'a> {
    channel: &'a mut dyn CallChannel,
}

impl<'a> Session<'a> {
    pub fn new(channel: &'a mut dyn CallChannel) -> Self {
        Self { channel }
    }

    pub async fn get(&mut self, var: DialplanVar<'_>) -> Result<Option<String>, ServiceError> {
        let name = var.name();
        let value = self.channel.get_variable(&name).await?;
        debug!(variable = %name, found = value.is_some(), "Dialplan değişkeni okundu.");
        Ok(value.filter(|v| !v.is_empty()))
    }

    pub async fn set(&mut self, var: DialplanVar<'_>, value: &str) -> Result<(), ServiceError> {
        let name = var.name();
        debug!(variable = %name, value, "Dialplan değişkeni yazılıyor.");
        self.channel.set_variable(&name, value).await
    }

    pub async fn say_number(&mut self, digits: &str) -> Result<(), ServiceError> {
        self.channel.say_number(digits).await
    }
}
