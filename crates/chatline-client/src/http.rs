//! HTTP client for REST endpoints.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use chatline_core::{Conversation, ConversationId, Message};

use crate::api::{AgentReply, ChatApi};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::routes::Routes;

/// HTTP client for the chat backend.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    routes: Routes,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self {
            inner,
            routes: Routes::new(&config.base_url, &config.api_prefix),
        })
    }

    /// Route table this client talks to.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Check if the backend is up.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = self.routes.root();
        debug!(url = %url, "Checking health");

        let response = self.inner.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    /// Get JSON from a URL.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, ClientError> {
        debug!(url = %url, "GET request");

        let response = self.inner.get(url).send().await?;
        decode(check(response, what).await?).await
    }

    /// Post JSON to a URL and decode the JSON response.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&B>,
        what: &str,
    ) -> Result<T, ClientError> {
        debug!(url = %url, "POST request");

        let mut request = self.inner.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        decode(check(response, what).await?).await
    }
}

#[async_trait]
impl ChatApi for HttpClient {
    async fn create_conversation(&self) -> Result<Conversation, ClientError> {
        self.post_json::<(), _>(&self.routes.conversations(), None, "conversation")
            .await
    }

    async fn get_conversation(&self, id: &ConversationId) -> Result<Conversation, ClientError> {
        self.get_json(&self.routes.conversation(id), &format!("conversation {}", id))
            .await
    }

    async fn list_conversations(&self) -> Result<HashMap<String, Conversation>, ClientError> {
        self.get_json(&self.routes.conversations(), "conversations")
            .await
    }

    async fn replace_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, ClientError> {
        self.post_json(
            &self.routes.chat_user(),
            Some(conversation),
            &format!("conversation {}", conversation.id),
        )
        .await
    }

    async fn append_message(
        &self,
        id: &ConversationId,
        message: &Message,
    ) -> Result<AgentReply, ClientError> {
        self.post_json(
            &self.routes.chat_agent(id),
            Some(message),
            &format!("conversation {}", id),
        )
        .await
    }
}

/// Turn non-success statuses into typed errors.
async fn check(response: Response, what: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(what.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Rejected {
        status: status.as_u16(),
        detail: error_detail(&body),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Serialization(e.to_string()))
}

/// Extract the `detail` string of a backend error body, falling back to the
/// raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
