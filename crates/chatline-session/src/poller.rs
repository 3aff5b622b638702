//! Periodic re-fetch of the open conversation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use chatline_client::{ChatApi, ClientError};
use chatline_core::{Conversation, ConversationId};

/// Default period between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// One poll tick: fetch the conversation, or do nothing for an unset id.
pub async fn poll_once(
    api: &dyn ChatApi,
    id: &ConversationId,
) -> Result<Option<Conversation>, ClientError> {
    if id.is_empty() {
        return Ok(None);
    }
    api.get_conversation(id).await.map(Some)
}

/// Owns the background poll task bound to one conversation id.
///
/// Dropping the handle cancels the task.
pub struct PollHandle {
    api: Arc<dyn ChatApi>,
    period: Duration,
    updates: mpsc::Sender<Conversation>,
    id: ConversationId,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Start polling `id` every `period`, sending snapshots on `updates`.
    ///
    /// The first tick fires one period after start.
    pub fn spawn(
        api: Arc<dyn ChatApi>,
        id: ConversationId,
        period: Duration,
        updates: mpsc::Sender<Conversation>,
    ) -> Self {
        let token = CancellationToken::new();
        let task = tokio::spawn(run_poll_loop(
            api.clone(),
            id.clone(),
            period,
            updates.clone(),
            token.clone(),
        ));
        Self {
            api,
            period,
            updates,
            id,
            token,
            task,
        }
    }

    /// Conversation id the current task polls.
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Tear down the current task and start a fresh one bound to `id`.
    pub fn rebind(&mut self, id: ConversationId) {
        if id == self.id && !self.task.is_finished() {
            return;
        }
        self.token.cancel();
        debug!(from = %self.id, to = %id, "Rebinding poller");

        let token = CancellationToken::new();
        self.task = tokio::spawn(run_poll_loop(
            self.api.clone(),
            id.clone(),
            self.period,
            self.updates.clone(),
            token.clone(),
        ));
        self.token = token;
        self.id = id;
    }

    /// Stop polling.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_poll_loop(
    api: Arc<dyn ChatApi>,
    id: ConversationId,
    period: Duration,
    updates: mpsc::Sender<Conversation>,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = poll_once(api.as_ref(), &id) => result,
        };

        match result {
            Ok(Some(conversation)) => {
                debug!(conversation_id = %id, count = conversation.len(), "Poll tick");
                if updates.send(conversation).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(conversation_id = %id, error = %e, "Poll tick failed");
            }
        }
    }

    debug!(conversation_id = %id, "Poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seeded_conversation, Call, FakeApi};

    #[tokio::test]
    async fn test_poll_once_with_unset_id_is_noop() {
        let api = FakeApi::new();
        let result = poll_once(&api, &ConversationId::new("")).await.unwrap();
        assert!(result.is_none());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_poll_once_returns_requested_conversation() {
        let api = FakeApi::new();
        api.insert(seeded_conversation("c1"));
        let conversation = poll_once(&api, &ConversationId::new("c1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conversation.id.as_str(), "c1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let api = Arc::new(FakeApi::new());
        api.insert(seeded_conversation("c1"));
        let (tx, mut rx) = mpsc::channel(8);

        let start = Instant::now();
        let _handle = PollHandle::spawn(api.clone(), ConversationId::new("c1"), DEFAULT_POLL_INTERVAL, tx);

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.id.as_str(), "c1");
        assert!(start.elapsed() >= DEFAULT_POLL_INTERVAL);
        assert_eq!(api.gets(), 1);

        rx.recv().await.unwrap();
        assert!(start.elapsed() >= DEFAULT_POLL_INTERVAL * 2);
        assert_eq!(api.gets(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let api = Arc::new(FakeApi::new());
        api.insert(seeded_conversation("c1"));
        let (tx, mut rx) = mpsc::channel(8);

        let handle = PollHandle::spawn(api.clone(), ConversationId::new("c1"), DEFAULT_POLL_INTERVAL, tx);
        rx.recv().await.unwrap();

        handle.cancel();
        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 4).await;
        assert_eq!(api.gets(), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticks() {
        let api = Arc::new(FakeApi::new());
        api.insert(seeded_conversation("c1"));
        let (tx, _rx) = mpsc::channel(8);

        let handle = PollHandle::spawn(api.clone(), ConversationId::new("c1"), DEFAULT_POLL_INTERVAL, tx);
        drop(handle);
        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 3).await;
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rebind_polls_new_identity_only() {
        let api = Arc::new(FakeApi::new());
        api.insert(seeded_conversation("old"));
        api.insert(seeded_conversation("new"));
        let (tx, mut rx) = mpsc::channel(8);

        let mut handle = PollHandle::spawn(api.clone(), ConversationId::new("old"), DEFAULT_POLL_INTERVAL, tx);
        assert_eq!(rx.recv().await.unwrap().id.as_str(), "old");

        handle.rebind(ConversationId::new("new"));
        assert_eq!(handle.id().as_str(), "new");
        assert_eq!(rx.recv().await.unwrap().id.as_str(), "new");
        assert_eq!(rx.recv().await.unwrap().id.as_str(), "new");

        let old_polls = api
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Get(id) if id.as_str() == "old"))
            .count();
        assert_eq!(old_polls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_polling() {
        let api = Arc::new(FakeApi::new());
        let (tx, mut rx) = mpsc::channel(8);

        // Unknown id: every tick fails until the conversation appears.
        let _handle = PollHandle::spawn(api.clone(), ConversationId::new("late"), DEFAULT_POLL_INTERVAL, tx);
        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 2 + Duration::from_millis(1)).await;
        assert_eq!(api.gets(), 2);

        api.insert(seeded_conversation("late"));
        assert_eq!(rx.recv().await.unwrap().id.as_str(), "late");
    }
}
