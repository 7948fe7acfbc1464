// File: src/agentd/client.rs
use super::{AgentControl, AgentStatus};
use crate::error::AgentClientError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
}

fn error_code(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_default()
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Agent durum servisinin REST API'si için istemci.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAgentClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, AgentClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AgentClientError::Init(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn agent_url(&self, agent_id: &str, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("{}/1.0/agents/by-id/{}/{}", self.base_url, agent_id, action),
            None => format!("{}/1.0/agents/by-id/{}", self.base_url, agent_id),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("X-Auth-Token", token),
            None => request,
        }
    }

    async fn unexpected(agent_id: &str, response: Response) -> AgentClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return AgentClientError::NoSuchAgent(agent_id.to_string());
        }
        AgentClientError::Unexpected {
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl AgentControl for HttpAgentClient {
    #[instrument(skip(self))]
    async fn login(&self, agent_id: &str, interface: &str) -> Result<(), AgentClientError> {
        let request = self
            .http
            .post(self.agent_url(agent_id, Some("login")))
            .json(&json!({ "interface": interface }));
        let response = self.authorized(request).send().await?;

        if response.status().is_success() {
            info!("Agent oturumu açıldı.");
            return Ok(());
        }
        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            if error_code(&body) == "already_logged" {
                return Err(AgentClientError::AlreadyLogged);
            }
            return Err(AgentClientError::Unexpected {
                status: StatusCode::CONFLICT.as_u16(),
                body,
            });
        }
        Err(Self::unexpected(agent_id, response).await)
    }

    #[instrument(skip(self))]
    async fn logoff(&self, agent_id: &str) -> Result<(), AgentClientError> {
        let request = self.http.post(self.agent_url(agent_id, Some("logoff")));
        let response = self.authorized(request).send().await?;

        if response.status().is_success() {
            info!("Agent oturumu kapatıldı.");
            return Ok(());
        }
        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            if error_code(&body) == "not_logged" {
                debug!("Agent zaten oturum açmamış, logoff yok sayılıyor.");
                return Ok(());
            }
            return Err(AgentClientError::Unexpected {
                status: StatusCode::CONFLICT.as_u16(),
                body,
            });
        }
        Err(Self::unexpected(agent_id, response).await)
    }

    #[instrument(skip(self))]
    async fn status(&self, agent_id: &str) -> Result<AgentStatus, AgentClientError> {
        let request = self.http.get(self.agent_url(agent_id, None));
        let response = self.authorized(request).send().await?;

        if !response.status().is_success() {
            return Err(Self::unexpected(agent_id, response).await);
        }
        Ok(response.json::<AgentStatus>().await?)
    }
}
