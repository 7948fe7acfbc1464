// File: src/agentd/cell.rs
use super::{AgentControl, AgentStatus, HttpAgentClient};
use crate::config::AppConfig;
use crate::error::AgentClientError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

type AgentClientFactory =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn AgentControl>, AgentClientError>> + Send + Sync>;

/// Süreç boyunca tek bir agent servisi istemcisi tutar. İstemci ilk
/// kullanımda oluşturulur; eşzamanlı ilk kullanımda bile yalnızca bir kez.
/// Başarısız bir oluşturma denemesi saklanmaz, sonraki çağrı yeniden dener.
pub struct AgentClientCell {
    client: OnceCell<Arc<dyn AgentControl>>,
    factory: AgentClientFactory,
}

impl AgentClientCell {
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn AgentControl>, AgentClientError>> + Send + 'static,
    {
        Self {
            client: OnceCell::new(),
            factory: Box::new(move || factory().boxed()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let base_url = config.agentd_url.clone();
        let token = config.agentd_token.clone();
        let timeout = config.agentd_timeout;
        Self::new(move || {
            let base_url = base_url.clone();
            let token = token.clone();
            async move {
                let client = HttpAgentClient::new(&base_url, token, timeout)?;
                info!(url = %base_url, "Agent servisi istemcisi oluşturuldu.");
                Ok::<Arc<dyn AgentControl>, AgentClientError>(Arc::new(client))
            }
        })
    }

    async fn client(&self) -> Result<&Arc<dyn AgentControl>, AgentClientError> {
        self.client.get_or_try_init(|| (self.factory)()).await
    }

    pub async fn login(&self, agent_id: &str, interface: &str) -> Result<(), AgentClientError> {
        self.client().await?.login(agent_id, interface).await
    }

    pub async fn logoff(&self, agent_id: &str) -> Result<(), AgentClientError> {
        self.client().await?.logoff(agent_id).await
    }

    pub async fn status(&self, agent_id: &str) -> Result<AgentStatus, AgentClientError> {
        self.client().await?.status(agent_id).await
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Önceden belirlenmiş yanıtlar dönen sahte agent servisi.
    #[derive(Default)]
    pub struct FakeAgentControl {
        pub logged: Mutex<HashMap<String, bool>>,
        pub calls: Mutex<Vec<String>>,
        pub unreachable: bool,
    }

    impl FakeAgentControl {
        pub fn with_logged(agent_id: &str) -> Self {
            let fake = Self::default();
            fake.logged.lock().unwrap().insert(agent_id.to_string(), true);
            fake
        }

        pub fn unreachable() -> Self {
            Self { unreachable: true, ..Default::default() }
        }

        fn record(&self, call: String) -> Result<(), AgentClientError> {
            self.calls.lock().unwrap().push(call);
            if self.unreachable {
                return Err(AgentClientError::Unexpected { status: 503, body: "down".to_string() });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AgentControl for FakeAgentControl {
        async fn login(&self, agent_id: &str, interface: &str) -> Result<(), AgentClientError> {
            self.record(format!("login {} {}", agent_id, interface))?;
            let mut logged = self.logged.lock().unwrap();
            if logged.get(agent_id).copied().unwrap_or(false) {
                return Err(AgentClientError::AlreadyLogged);
            }
            logged.insert(agent_id.to_string(), true);
            Ok(())
        }

        async fn logoff(&self, agent_id: &str) -> Result<(), AgentClientError> {
            self.record(format!("logoff {}", agent_id))?;
            self.logged.lock().unwrap().insert(agent_id.to_string(), false);
            Ok(())
        }

        async fn status(&self, agent_id: &str) -> Result<AgentStatus, AgentClientError> {
            self.record(format!("status {}", agent_id))?;
            let logged = self.logged.lock().unwrap().get(agent_id).copied().unwrap_or(false);
            Ok(AgentStatus { logged, ..Default::default() })
        }
    }

    pub fn cell_with(fake: Arc<FakeAgentControl>) -> AgentClientCell {
        AgentClientCell::new(move || {
            let fake = fake.clone();
            async move { Ok::<_, AgentClientError>(fake as Arc<dyn AgentControl>) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{cell_with, FakeAgentControl};
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn client_is_created_once_under_concurrent_first_use() {
        let created = Arc::new(AtomicUsize::new(0));
        let fake = Arc::new(FakeAgentControl::default());
        let cell = {
            let created = created.clone();
            AgentClientCell::new(move || {
                let created = created.clone();
                let fake = fake.clone();
                async move {
                    created.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok::<_, AgentClientError>(fake as Arc<dyn AgentControl>)
                }
            })
        };
        let cell = Arc::new(cell);

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let cell = cell.clone();
                tokio::spawn(async move { cell.status(&i.to_string()).await })
            })
            .collect();
        for task in futures::future::join_all(tasks).await {
            task.unwrap().unwrap();
        }

        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_creation_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let cell = {
            let attempts = attempts.clone();
            AgentClientCell::new(move || {
                let attempts = attempts.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        return Err(AgentClientError::Init("ilk deneme".to_string()));
                    }
                    Ok::<_, AgentClientError>(Arc::new(FakeAgentControl::default()) as Arc<dyn AgentControl>)
                }
            })
        };

        assert!(matches!(cell.status("1").await, Err(AgentClientError::Init(_))));
        assert!(!cell.status("1").await.unwrap().logged);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn calls_are_delegated() {
        let fake = Arc::new(FakeAgentControl::default());
        let cell = cell_with(fake.clone());

        cell.login("7", "PJSIP/abc").await.unwrap();
        assert!(matches!(cell.login("7", "PJSIP/abc").await, Err(AgentClientError::AlreadyLogged)));
        assert!(cell.status("7").await.unwrap().logged);
        cell.logoff("7").await.unwrap();
        assert!(!cell.status("7").await.unwrap().logged);
    }
}
