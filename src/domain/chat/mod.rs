//! Chat domain - inbound messages and the transport seam
//!
//! The concrete chat platform is a collaborator: something that delivers
//! inbound text messages and accepts outbound replies. Everything
//! platform-specific stays behind [`ChatTransport`].

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::language::LanguageCode;
use crate::domain::DomainError;

/// Where a reply should go; opaque to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    /// Transport-specific channel/conversation identifier
    pub channel: String,
}

impl ChatContext {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }
}

/// An inbound message with its extracted language hints
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Unique id for tracing this message through the pipeline
    pub id: Uuid,
    pub context: ChatContext,
    /// The text to translate
    pub text: String,
    /// Source language, when the platform or user indicated one
    pub source_lang: Option<LanguageCode>,
    /// Requested target language
    pub target_lang: LanguageCode,
}

impl InboundMessage {
    pub fn new(context: ChatContext, text: impl Into<String>, target_lang: LanguageCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            text: text.into(),
            source_lang: None,
            target_lang,
        }
    }

    pub fn with_source_lang(mut self, lang: LanguageCode) -> Self {
        self.source_lang = Some(lang);
        self
    }
}

/// Seam to the chat platform: receive messages, send replies
#[async_trait]
pub trait ChatTransport: Send + Sync + Debug {
    /// Next inbound message; `None` when the transport has shut down
    async fn next_message(&self) -> Option<InboundMessage>;

    /// Sends one reply chunk to the given context
    async fn send(&self, context: &ChatContext, text: &str) -> Result<(), DomainError>;

    /// Largest reply the platform accepts in a single send
    fn max_reply_chars(&self) -> usize;
}
