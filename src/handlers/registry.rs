// File: src/handlers/registry.rs
use super::Handler;
use crate::error::ServiceError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Fonksiyon adından handler'a eşleme. Başlangıçta bir kez kurulur,
/// sonrasında değişmez ve kilitsiz paylaşılır.
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Aynı isim iki kez kaydedilirse `DuplicateHandlerName` ile başarısız olur.
    pub fn build<I>(handlers: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        let mut map: HashMap<&'static str, Arc<dyn Handler>> = HashMap::new();
        for handler in handlers {
            let name = handler.name();
            if map.insert(name, handler).is_some() {
                return Err(ServiceError::DuplicateHandlerName(name.to_string()));
            }
            debug!(function = name, "Handler kaydedildi.");
        }
        Ok(Self { handlers: map })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}
