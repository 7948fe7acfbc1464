// File: src/agentd/mod.rs

pub mod cell;
pub mod client;

pub use cell::AgentClientCell;
pub use client::HttpAgentClient;

use crate::error::AgentClientError;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AgentStatus {
    pub logged: bool,
    #[serde(default)]
    pub number: Option<String>,
}

/// Agent durum servisine karşı yapılabilen işlemler.
#[async_trait]
pub trait AgentControl: Send + Sync {
    async fn login(&self, agent_id: &str, interface: &str) -> Result<(), AgentClientError>;

    async fn logoff(&self, agent_id: &str) -> Result<(), AgentClientError>;

    async fn status(&self, agent_id: &str) -> Result<AgentStatus, AgentClientError>;
}
