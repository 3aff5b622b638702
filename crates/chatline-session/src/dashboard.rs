//! Agent dashboard listing.

use tracing::debug;

use chatline_client::{ChatApi, ClientError};
use chatline_core::{sort_by_recent, ConversationSummary};

/// Fetch every conversation, most recently updated first.
pub async fn fetch_dashboard(api: &dyn ChatApi) -> Result<Vec<ConversationSummary>, ClientError> {
    let all = api.list_conversations().await?;
    debug!(count = all.len(), "Fetched conversations");

    Ok(sort_by_recent(all.into_values())
        .iter()
        .map(ConversationSummary::from_conversation)
        .collect())
}
