// File: src/redis.rs

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::directory::{AgentRecord, Directory, DirectoryPool, QueueSettings};
use crate::error::ServiceError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const MAX_CONNECT_RETRIES: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Kopan bağlantıyı kendisi yeniden kuran bir `ConnectionManager` döner.
pub async fn connect_with_retry(url: &str) -> Result<ConnectionManager, ServiceError> {
    let client = redis::Client::open(url)?;
    for attempt in 1..=MAX_CONNECT_RETRIES {
        match ConnectionManager::new(client.clone()).await {
            Ok(manager) => {
                info!("Redis bağlantısı başarıyla kuruldu.");
                return Ok(manager);
            }
            Err(e) if attempt == MAX_CONNECT_RETRIES => return Err(e.into()),
            Err(e) => {
                warn!(
                    error = %e,
                    attempt,
                    max_attempts = MAX_CONNECT_RETRIES,
                    "Redis'e bağlanılamadı. {} saniye sonra tekrar denenecek...",
                    CONNECT_RETRY_DELAY.as_secs()
                );
                sleep(CONNECT_RETRY_DELAY).await;
            }
        }
    }
    Err(ServiceError::Generic("Redis'e bağlanılamadı".to_string()))
}

fn queue_key(name: &str) -> String {
    format!("queue:{}", name)
}

fn agent_key(number: &str) -> String {
    format!("agent:number:{}", number)
}

fn parse_optional_u32(fields: &HashMap<String, String>, field: &str) -> Option<u32> {
    fields.get(field).and_then(|v| v.trim().parse::<u32>().ok())
}

fn queue_from_fields(name: &str, fields: HashMap<String, String>) -> Option<QueueSettings> {
    if fields.is_empty() {
        return None;
    }
    Some(QueueSettings {
        id: fields.get("id").cloned().unwrap_or_default(),
        name: fields.get("name").cloned().unwrap_or_else(|| name.to_string()),
        wrapup_time: parse_optional_u32(&fields, "wrapuptime"),
        timeout: parse_optional_u32(&fields, "timeout"),
    })
}

fn agent_from_fields(number: &str, fields: HashMap<String, String>) -> Option<AgentRecord> {
    let id = fields.get("id").filter(|id| !id.is_empty())?.clone();
    Some(AgentRecord {
        id,
        number: fields.get("number").cloned().unwrap_or_else(|| number.to_string()),
    })
}

/// Redis üzerindeki kuyruk/agent kayıtlarına erişim. Tüm imleçler tek bir
/// `ConnectionManager` üzerinden çoğullanır; istek başına TCP bağlantısı açılmaz.
#[derive(Clone)]
pub struct RedisDirectory {
    manager: ConnectionManager,
}

impl RedisDirectory {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl DirectoryPool for RedisDirectory {
    async fn cursor(&self) -> Result<Box<dyn Directory>, ServiceError> {
        Ok(Box::new(RedisCursor { conn: self.manager.clone() }))
    }
}

pub struct RedisCursor {
    conn: ConnectionManager,
}

#[async_trait]
impl Directory for RedisCursor {
    async fn queue(&mut self, name: &str) -> Result<Option<QueueSettings>, ServiceError> {
        let fields: HashMap<String, String> = self.conn.hgetall(queue_key(name)).await?;
        Ok(queue_from_fields(name, fields))
    }

    async fn agent_by_number(&mut self, number: &str) -> Result<Option<AgentRecord>, ServiceError> {
        let fields: HashMap<String, String> = self.conn.hgetall(agent_key(number)).await?;
        Ok(agent_from_fields(number, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn queue_hash_is_mapped() {
        let queue = queue_from_fields(
            "support",
            fields(&[("id", "7"), ("wrapuptime", "30"), ("timeout", "")]),
        )
        .unwrap();
        assert_eq!(queue.id, "7");
        assert_eq!(queue.name, "support");
        assert_eq!(queue.wrapup_time, Some(30));
        assert_eq!(queue.timeout, None);
    }

    #[test]
    fn missing_queue_hash_is_none() {
        assert_eq!(queue_from_fields("nope", HashMap::new()), None);
    }

    #[test]
    fn agent_without_id_is_ignored() {
        assert_eq!(agent_from_fields("1001", fields(&[("number", "1001")])), None);
        assert_eq!(
            agent_from_fields("1001", fields(&[("id", "3")])),
            Some(AgentRecord { id: "3".to_string(), number: "1001".to_string() })
        );
    }

    #[test]
    fn keys_follow_convention() {
        assert_eq!(queue_key("sales"), "queue:sales");
        assert_eq!(agent_key("1001"), "agent:number:1001");
    }
}
