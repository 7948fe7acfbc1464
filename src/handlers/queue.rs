// File: src/handlers/queue.rs
use super::{required_arg, Handler};
use crate::dialplan::path::set_path;
use crate::dialplan::{DialplanVar, Session};
use crate::directory::Directory;
use crate::error::ServiceError;
use async_trait::async_trait;
use tracing::{info, instrument, Span};

/// Kuyruğa giren çağrı için kuyruk ayarlarını dialplan'e aktarır.
pub struct IncomingQueueSetFeatures;

#[async_trait]
impl Handler for IncomingQueueSetFeatures {
    fn name(&self) -> &'static str {
        "incoming_queue_set_features"
    }

    #[instrument(name = "incoming_queue_set_features", skip_all, fields(queue))]
    async fn handle(
        &self,
        session: &mut Session<'_>,
        cursor: &mut dyn Directory,
        args: &[String],
    ) -> Result<(), ServiceError> {
        let queue_name = required_arg(args, 0, "incoming_queue_set_features", "queue_name")?;
        Span::current().record("queue", queue_name);

        let queue = cursor
            .queue(queue_name)
            .await?
            .ok_or_else(|| ServiceError::NotFound { kind: "queue", key: queue_name.to_string() })?;

        set_path(session, "queue", &queue.id).await?;
        session.set(DialplanVar::QueueName, &queue.name).await?;

        if let Some(timeout) = queue.timeout.filter(|t| *t > 0) {
            session.set(DialplanVar::QueueTimeout, &timeout.to_string()).await?;
        }
        // 0 ya da tanımsız wrap-up dialplan'deki varsayılanı bozmamalı.
        if let Some(wrapup) = queue.wrapup_time.filter(|w| *w > 0) {
            session.set(DialplanVar::QueueWrapup, &wrapup.to_string()).await?;
        }

        info!(queue_id = %queue.id, "Kuyruk özellikleri uygulandı.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agi::memory::MemoryChannel;
    use crate::directory::memory::MemoryDirectory;
    use crate::directory::QueueSettings;

    fn queue(wrapup_time: Option<u32>) -> QueueSettings {
        QueueSettings {
            id: "7".to_string(),
            name: "support".to_string(),
            wrapup_time,
            timeout: None,
        }
    }

    async fn run(directory: MemoryDirectory, channel: &mut MemoryChannel, name: &str) -> Result<(), ServiceError> {
        let mut cursor = directory;
        let mut session = Session::new(channel);
        IncomingQueueSetFeatures
            .handle(&mut session, &mut cursor, &[name.to_string()])
            .await
    }

    #[tokio::test]
    async fn wrapup_is_written_when_set() {
        let mut channel = MemoryChannel::default();
        run(MemoryDirectory::default().with_queue(queue(Some(30))), &mut channel, "support")
            .await
            .unwrap();
        assert_eq!(channel.value("XIVO_QUEUEWRAPUP"), Some("30"));
    }

    #[tokio::test]
    async fn missing_or_zero_wrapup_is_not_written() {
        for wrapup in [None, Some(0)] {
            let mut channel = MemoryChannel::default();
            run(MemoryDirectory::default().with_queue(queue(wrapup)), &mut channel, "support")
                .await
                .unwrap();
            assert_eq!(channel.value("XIVO_QUEUEWRAPUP"), None);
            assert!(channel.writes.iter().all(|(name, _)| name != "XIVO_QUEUEWRAPUP"));
        }
    }

    #[tokio::test]
    async fn queue_path_and_name_are_recorded() {
        let mut channel = MemoryChannel::default();
        let mut settings = queue(None);
        settings.timeout = Some(20);
        run(MemoryDirectory::default().with_queue(settings), &mut channel, "support")
            .await
            .unwrap();
        assert_eq!(channel.value("XIVO_PATH"), Some("queue"));
        assert_eq!(channel.value("XIVO_PATH_ID"), Some("7"));
        assert_eq!(channel.value("XIVO_QUEUENAME"), Some("support"));
        assert_eq!(channel.value("XIVO_QUEUETIMEOUT"), Some("20"));
    }

    #[tokio::test]
    async fn earlier_path_is_kept() {
        let mut channel = MemoryChannel::with_variables(&[("XIVO_PATH", "user"), ("XIVO_PATH_ID", "1")]);
        run(MemoryDirectory::default().with_queue(queue(None)), &mut channel, "support")
            .await
            .unwrap();
        assert_eq!(channel.value("XIVO_PATH"), Some("user"));
        assert_eq!(channel.value("XIVO_PATH_ID"), Some("1"));
    }

    #[tokio::test]
    async fn unknown_queue_is_an_error() {
        let mut channel = MemoryChannel::default();
        let err = run(MemoryDirectory::default(), &mut channel, "nope").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "queue", .. }));
        assert!(channel.writes.is_empty());
    }
}
