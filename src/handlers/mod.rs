// File: src/handlers/mod.rs

pub mod agent;
pub mod dispatcher;
pub mod outgoing;
pub mod queue;
pub mod registry;
pub mod user;

pub use dispatcher::Dispatcher;
pub use registry::HandlerRegistry;

use crate::agentd::AgentClientCell;
use crate::dialplan::Session;
use crate::directory::Directory;
use crate::error::ServiceError;
use async_trait::async_trait;
use std::sync::Arc;

/// Dialplan'den isimle çağrılabilen bir fonksiyon. Sonuçlar yalnızca
/// oturum üzerindeki değişkenler aracılığıyla iletilir.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Dialplan'in çağırdığı dış isim.
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        session: &mut Session<'_>,
        cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError>;
}

/// Sunulan bütün handler'ların kayıt tablosu. Yeni bir handler ancak buraya
/// eklenerek dışarı açılır.
pub fn builtin_handlers(agents: Arc<AgentClientCell>) -> Vec<Arc<dyn Handler>> {
    vec![
        Arc::new(agent::AgentLogin::new(agents.clone())),
        Arc::new(agent::AgentLogoff::new(agents.clone())),
        Arc::new(agent::AgentGetStatus::new(agents)),
        Arc::new(agent::AgentSayNumber),
        Arc::new(queue::IncomingQueueSetFeatures),
        Arc::new(outgoing::OutgoingSetPath),
        Arc::new(user::UserGetInterfaces),
    ]
}

pub(crate) fn required_arg<'a>(
    args: &'a [String],
    index: usize,
    function: &'static str,
    argument: &'static str,
) -> Result<&'a str, ServiceError> {
    args.get(index)
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .ok_or(ServiceError::MissingArgument { function, argument })
}
