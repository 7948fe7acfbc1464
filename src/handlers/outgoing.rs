// File: src/handlers/outgoing.rs
use super::{required_arg, Handler};
use crate::dialplan::path::set_path;
use crate::dialplan::Session;
use crate::directory::Directory;
use crate::error::ServiceError;
use async_trait::async_trait;

pub struct OutgoingSetPath;

#[async_trait]
impl Handler for OutgoingSetPath {
    fn name(&self) -> &'static str {
        "outgoing_set_path"
    }

    async fn handle(
        &self,
        session: &mut Session<'_>,
        _cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError> {
        let outcall_id = required_arg(args, 0, "outgoing_set_path", "outcall_id")?;
        set_path(session, "outcall", outcall_id).await
    }
}
