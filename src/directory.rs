// File: src/directory.rs
use crate::error::ServiceError;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSettings {
    pub id: String,
    pub name: String,
    /// Saniye cinsinden; `None` veya `0` ise dialplan'e yazılmaz.
    pub wrapup_time: Option<u32>,
    pub timeout: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRecord {
    pub id: String,
    pub number: String,
}

/// İstek başına açılan depolama imleci. Eşzamanlı istekler arasında
/// paylaşılmaz.
#[async_trait]
pub trait Directory: Send {
    async fn queue(&mut self, name: &str) -> Result<Option<QueueSettings>, ServiceError>;

    async fn agent_by_number(&mut self, number: &str) -> Result<Option<AgentRecord>, ServiceError>;
}

/// Her istek için yeni bir `Directory` imleci üretir.
#[async_trait]
pub trait DirectoryPool: Send + Sync {
    async fn cursor(&self) -> Result<Box<dyn Directory>, ServiceError>;
}

/// İmleci ilk sorguda açar. Depoya hiç dokunmayan handler'lar depolama
/// kesintisinden etkilenmez.
pub struct LazyCursor<'a> {
    pool: &'a dyn DirectoryPool,
    cursor: Option<Box<dyn Directory>>,
}

impl<'a> LazyCursor<'a> {
    pub fn new(pool: &'a dyn DirectoryPool) -> Self {
        Self { pool, cursor: None }
    }

    async fn cursor(&mut self) -> Result<&mut (dyn Directory + 'static), ServiceError> {
        if self.cursor.is_none() {
            self.cursor = Some(self.pool.cursor().await?);
        }
        match self.cursor.as_deref_mut() {
            Some(cursor) => Ok(cursor),
            None => Err(ServiceError::Generic("depolama imleci açılamadı".to_string())),
        }
    }
}

#[async_trait]
impl Directory for LazyCursor<'_> {
    async fn queue(&mut self, name: &str) -> Result<Option<QueueSettings>, ServiceError> {
        self.cursor().await?.queue(name).await
    }

    async fn agent_by_number(&mut self, number: &str) -> Result<Option<AgentRecord>, ServiceError> {
        self.cursor().await?.agent_by_number(number).await
    }
}
