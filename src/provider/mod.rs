//! SQL providers.
//!
//! A provider turns a question into a candidate SQL statement. Whatever it
//! returns still goes through the safety gate before execution.
//!
//! - [`RulesProvider`] - the local rule-based translator
//! - [`ConversationProvider`] - a remote conversational query service,
//!   reached through a [`ConversationApi`] (HTTP in production)

mod conversation;
mod rules;

pub use conversation::{
    ConversationApi, ConversationHints, ConversationProvider, DataBoundsHint,
    HttpConversationApi, StartRequest, StartedConversation,
};
pub use rules::RulesProvider;

use std::sync::Arc;

use async_trait::async_trait;

use crate::bounds::DateBounds;
use crate::config::{ProviderKind, ProviderSettings, TableIdent};
use crate::translation::TranslationError;

/// Error type for provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Conversation start failed: {status} {body}")]
    StartFailed { status: u16, body: String },

    #[error("Conversation start returned no conversation/message ids")]
    MissingIds,

    #[error("Conversation poll failed: {status} {body}")]
    PollFailed { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("No SQL returned after {attempts} polls")]
    TimedOut { attempts: u32 },

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("Provider misconfigured: {0}")]
    Misconfigured(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Something that turns a question into SQL.
#[async_trait]
pub trait SqlProvider: Send + Sync {
    /// Short name for logs and answers.
    fn name(&self) -> &'static str;

    /// Produce a candidate statement for `text`.
    async fn translate(
        &self,
        text: &str,
        table: &TableIdent,
        bounds: &DateBounds,
    ) -> ProviderResult<String>;
}

/// Build the provider selected in settings.
pub fn build_provider(settings: &ProviderSettings) -> ProviderResult<Arc<dyn SqlProvider>> {
    tracing::info!(provider = %settings.kind, "selected SQL provider");
    match settings.kind {
        ProviderKind::Rules => Ok(Arc::new(RulesProvider)),
        ProviderKind::Conversation => {
            let api = HttpConversationApi::from_settings(&settings.conversation)?;
            Ok(Arc::new(ConversationProvider::from_settings(
                api,
                &settings.conversation,
            )))
        }
    }
}
