//! Remote conversational query provider.
//!
//! Starts a conversation with the question, then polls the resulting message
//! a bounded number of times until the service reports a generated query.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ProviderError, ProviderResult, SqlProvider};
use crate::bounds::DateBounds;
use crate::config::{ConversationSettings, TableIdent};

// ============================================================================
// Wire types
// ============================================================================

/// Body of the start-conversation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRequest {
    pub content: String,
    pub hints: ConversationHints,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationHints {
    pub catalog: String,
    pub schemas: Vec<String>,
    pub data_bounds: DataBoundsHint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataBoundsHint {
    pub min_date: String,
    pub max_date: String,
}

/// Ids returned by the start call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartedConversation {
    pub conversation_id: String,
    pub message_id: String,
}

impl StartedConversation {
    /// Read the ids out of a start response; both must be non-empty.
    pub fn from_response(body: &Value) -> ProviderResult<Self> {
        let id = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        match (id("conversation_id"), id("message_id")) {
            (Some(conversation_id), Some(message_id)) => Ok(Self {
                conversation_id,
                message_id,
            }),
            _ => Err(ProviderError::MissingIds),
        }
    }
}

/// The generated SQL in a poll response, once the message is complete.
///
/// Returns `Ok(None)` while the message is still in progress.
fn completed_sql(body: &Value) -> ProviderResult<Option<String>> {
    let completed = body
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status.contains("COMPLETED"));
    if !completed {
        return Ok(None);
    }

    body.pointer("/attachments/0/query/query")
        .and_then(Value::as_str)
        .map(|sql| Some(sql.trim().to_string()))
        .ok_or_else(|| {
            ProviderError::Malformed("completed message has no query attachment".to_string())
        })
}

// ============================================================================
// API seam
// ============================================================================

/// Transport for the conversational service.
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// Start a conversation; returns the raw response body.
    async fn start(&self, request: &StartRequest) -> ProviderResult<Value>;

    /// Fetch the current state of the conversation's message.
    async fn poll(&self, conversation: &StartedConversation) -> ProviderResult<Value>;
}

/// [`ConversationApi`] over HTTPS with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpConversationApi {
    client: reqwest::Client,
    host: String,
    token: String,
    space_id: String,
}

impl HttpConversationApi {
    /// `host` must end with `/`.
    pub fn new(
        host: String,
        token: String,
        space_id: String,
        timeout: Duration,
    ) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            host,
            token,
            space_id,
        })
    }

    pub fn from_settings(settings: &ConversationSettings) -> ProviderResult<Self> {
        let misconfigured = |e: crate::config::SettingsError| ProviderError::Misconfigured(e.to_string());
        let host = settings.resolved_host().map_err(misconfigured)?;
        let token = settings.resolved_token().map_err(misconfigured)?;
        let space_id = settings.resolved_space_id().map_err(misconfigured)?;
        if space_id.is_empty() {
            return Err(ProviderError::Misconfigured(
                "provider.conversation.space_id is empty".to_string(),
            ));
        }
        Self::new(host, token, space_id, settings.request_timeout())
    }

    fn space_url(&self) -> String {
        format!("{}api/2.0/genie/spaces/{}", self.host, self.space_id)
    }
}

#[async_trait]
impl ConversationApi for HttpConversationApi {
    async fn start(&self, request: &StartRequest) -> ProviderResult<Value> {
        let response = self
            .client
            .post(format!("{}/start-conversation", self.space_url()))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::StartFailed {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    async fn poll(&self, conversation: &StartedConversation) -> ProviderResult<Value> {
        let response = self
            .client
            .get(format!(
                "{}/conversations/{}/messages/{}",
                self.space_url(),
                conversation.conversation_id,
                conversation.message_id
            ))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::PollFailed {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Provider backed by a remote conversational service.
pub struct ConversationProvider<A: ConversationApi> {
    api: A,
    max_polls: u32,
    poll_interval: Duration,
    hint_catalog: String,
    hint_schemas: Vec<String>,
}

impl<A: ConversationApi> ConversationProvider<A> {
    pub fn new(api: A) -> Self {
        Self::from_settings(api, &ConversationSettings::default())
    }

    pub fn from_settings(api: A, settings: &ConversationSettings) -> Self {
        Self {
            api,
            max_polls: settings.max_polls,
            poll_interval: settings.poll_interval(),
            hint_catalog: settings.hint_catalog.clone(),
            hint_schemas: settings.hint_schemas.clone(),
        }
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn start_request(&self, text: &str, bounds: &DateBounds) -> StartRequest {
        StartRequest {
            content: text.to_string(),
            hints: ConversationHints {
                catalog: self.hint_catalog.clone(),
                schemas: self.hint_schemas.clone(),
                data_bounds: DataBoundsHint {
                    min_date: bounds.min().to_string(),
                    max_date: bounds.max().to_string(),
                },
            },
        }
    }
}

#[async_trait]
impl<A: ConversationApi> SqlProvider for ConversationProvider<A> {
    fn name(&self) -> &'static str {
        "conversation"
    }

    async fn translate(
        &self,
        text: &str,
        table: &TableIdent,
        bounds: &DateBounds,
    ) -> ProviderResult<String> {
        let started = self.api.start(&self.start_request(text, bounds)).await?;
        let conversation = StartedConversation::from_response(&started)?;
        tracing::debug!(
            %table,
            conversation_id = %conversation.conversation_id,
            message_id = %conversation.message_id,
            "conversation started"
        );

        for attempt in 1..=self.max_polls {
            let body = self.api.poll(&conversation).await?;
            if let Some(sql) = completed_sql(&body)? {
                tracing::debug!(attempt, "conversation returned SQL");
                return Ok(sql);
            }
            if attempt < self.max_polls {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(ProviderError::TimedOut {
            attempts: self.max_polls,
        })
    }
}
