// File: src/agi/channel.rs
use crate::error::ServiceError;
use async_trait::async_trait;

/// Bir çağrı bacağı üzerinde handler'ların kullanabildiği kontrol kanalı
/// işlemleri. Üretimde FastAGI bağlantısı, testlerde bellek içi kanal
/// tarafından uygulanır.
#[async_trait]
pub trait CallChannel: Send {
    /// Değişken yoksa ya da boşsa `None` döner.
    async fn get_variable(&mut self, name: &str) -> Result<Option<String>, ServiceError>;

    async fn set_variable(&mut self, name: &str, value: &str) -> Result<(), ServiceError>;

    async fn say_number(&mut self, digits: &str) -> Result<(), ServiceError>;
}
