// File: src/handlers/agent.rs
use super::{required_arg, Handler};
use crate::agentd::AgentClientCell;
use crate::dialplan::{DialplanVar, Session};
use crate::directory::{AgentRecord, Directory};
use crate::error::{AgentClientError, ServiceError};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

async fn lookup_agent(cursor: &mut dyn Directory, number: &str) -> Result<Option<AgentRecord>, ServiceError> {
    let agent = cursor.agent_by_number(number).await?;
    if agent.is_none() {
        warn!(agent_number = number, "Agent bulunamadı.");
    }
    Ok(agent)
}

pub struct AgentLogin {
    agents: Arc<AgentClientCell>,
}

impl AgentLogin {
    pub fn new(agents: Arc<AgentClientCell>) -> Self {
        Self { agents }
    }
}

#[async_trait]
impl Handler for AgentLogin {
    fn name(&self) -> &'static str {
        "agent_login"
    }

    #[instrument(name = "agent_login", skip_all)]
    async fn handle(
        &self,
        session: &mut Session<'_>,
        cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError> {
        let number = required_arg(args, 0, "agent_login", "agent_number")?;
        let interface = required_arg(args, 1, "agent_login", "interface")?;

        let Some(agent) = lookup_agent(cursor, number).await? else {
            return session.set(DialplanVar::AgentStatus, "error").await;
        };
        session.set(DialplanVar::AgentId, &agent.id).await?;

        let status = match self.agents.login(&agent.id, interface).await {
            Ok(()) => "logged",
            Err(AgentClientError::AlreadyLogged) => {
                info!(agent_id = %agent.id, "Agent zaten oturum açmış.");
                "already_logged"
            }
            Err(e) => {
                error!(agent_id = %agent.id, error = %e, "Agent oturumu açılamadı.");
                "error"
            }
        };
        session.set(DialplanVar::AgentStatus, status).await
    }
}

pub struct AgentLogoff {
    agents: Arc<AgentClientCell>,
}

impl AgentLogoff {
    pub fn new(agents: Arc<AgentClientCell>) -> Self {
        Self { agents }
    }
}

#[async_trait]
impl Handler for AgentLogoff {
    fn name(&self) -> &'static str {
        "agent_logoff"
    }

    #[instrument(name = "agent_logoff", skip_all)]
    async fn handle(
        &self,
        _session: &mut Session<'_>,
        cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError> {
        let number = required_arg(args, 0, "agent_logoff", "agent_number")?;
        let agent = lookup_agent(cursor, number)
            .await?
            .ok_or_else(|| ServiceError::NotFound { kind: "agent", key: number.to_string() })?;
        self.agents.logoff(&agent.id).await?;
        Ok(())
    }
}

pub struct AgentGetStatus {
    agents: Arc<AgentClientCell>,
}

impl AgentGetStatus {
    pub fn new(agents: Arc<AgentClientCell>) -> Self {
        Self { agents }
    }
}

#[async_trait]
impl Handler for AgentGetStatus {
    fn name(&self) -> &'static str {
        "agent_get_status"
    }

    #[instrument(name = "agent_get_status", skip_all)]
    async fn handle(
        &self,
        session: &mut Session<'_>,
        cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError> {
        let number = required_arg(args, 0, "agent_get_status", "agent_number")?;
        let Some(agent) = lookup_agent(cursor, number).await? else {
            return session.set(DialplanVar::AgentLoginStatus, "error").await;
        };

        let status = match self.agents.status(&agent.id).await {
            Ok(status) => {
                debug!(agent_id = %agent.id, logged = status.logged, number = ?status.number, "Agent durumu alındı.");
                if status.logged { "logged_in" } else { "logged_out" }
            }
            Err(e) => {
                error!(agent_id = %agent.id, error = %e, "Agent durumu alınamadı.");
                "error"
            }
        };
        session.set(DialplanVar::AgentId, &agent.id).await?;
        session.set(DialplanVar::AgentLoginStatus, status).await
    }
}

/// Agent numarasını arayana sesli olarak okur.
pub struct AgentSayNumber;

#[async_trait]
impl Handler for AgentSayNumber {
    fn name(&self) -> &'static str {
        "agent_say_number"
    }

    async fn handle(
        &self,
        session: &mut Session<'_>,
        cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError> {
        let number = required_arg(args, 0, "agent_say_number", "agent_number")?;
        let agent = lookup_agent(cursor, number)
            .await?
            .ok_or_else(|| ServiceError::NotFound { kind: "agent", key: number.to_string() })?;
        session.say_number(&agent.number).await
    }
}
