//! Intake service
//!
//! Pulls inbound messages off a [`ChatTransport`] and hands each one to
//! the translation pipeline on its own task, so one slow translation
//! never delays the intake of the next message. Failures become short
//! user-visible replies instead of crashes.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::chat::{ChatContext, ChatTransport, InboundMessage};
use crate::domain::language::LanguageRegistry;
use crate::domain::translation::TranslationRequest;
use crate::domain::DomainError;
use crate::infrastructure::pipeline::TranslationPipeline;

#[derive(Debug, Clone)]
pub struct IntakeService {
    pipeline: Arc<TranslationPipeline>,
    transport: Arc<dyn ChatTransport>,
    registry: Arc<LanguageRegistry>,
}

impl IntakeService {
    pub fn new(
        pipeline: Arc<TranslationPipeline>,
        transport: Arc<dyn ChatTransport>,
        registry: Arc<LanguageRegistry>,
    ) -> Self {
        Self {
            pipeline,
            transport,
            registry,
        }
    }

    /// Runs until the transport shuts down, then drains in-flight handlers
    pub async fn run(&self) {
        let mut handlers = JoinSet::new();

        while let Some(message) = self.transport.next_message().await {
            debug!(message_id = %message.id, "Received message");

            let service = self.clone();
            handlers.spawn(async move { service.handle(message).await });
        }

        info!("Transport closed, draining in-flight messages");
        while handlers.join_next().await.is_some() {}
    }

    async fn handle(&self, message: InboundMessage) {
        let reply = self.reply_for(&message).await;

        for chunk in split_reply(&reply, self.transport.max_reply_chars()) {
            if let Err(send_error) = self.transport.send(&message.context, &chunk).await {
                warn!(
                    message_id = %message.id,
                    error = %send_error,
                    "Failed to send reply"
                );
                return;
            }
        }
    }

    async fn reply_for(&self, message: &InboundMessage) -> String {
        if !self.registry.is_enabled(&message.target_lang) {
            return format!("Language '{}' is not supported here.", message.target_lang);
        }

        let request = match self.build_request(message) {
            Ok(request) => request,
            Err(build_error) => {
                debug!(message_id = %message.id, error = %build_error, "Rejected message");
                return "There is nothing to translate in that message.".to_string();
            }
        };

        match self.pipeline.translate(&request).await {
            Ok(outcome) => {
                debug!(
                    message_id = %message.id,
                    source = ?outcome.source,
                    provider = %outcome.result.provider,
                    "Translated message"
                );

                format!(
                    "{} {}",
                    self.registry.flag(&message.target_lang),
                    outcome.result.translated_text
                )
            }
            Err(DomainError::UnsupportedLanguage { code }) => {
                format!("Language '{}' is not supported here.", code)
            }
            Err(translate_error) if translate_error.is_transient() => {
                warn!(
                    message_id = %message.id,
                    error = %translate_error,
                    "Translation unavailable"
                );
                "Translation is temporarily unavailable, please try again later.".to_string()
            }
            Err(translate_error) => {
                warn!(
                    message_id = %message.id,
                    error = %translate_error,
                    "Translation failed"
                );
                "Something went wrong translating that message.".to_string()
            }
        }
    }

    fn build_request(&self, message: &InboundMessage) -> Result<TranslationRequest, DomainError> {
        let mut builder = TranslationRequest::builder()
            .source_text(&message.text)
            .target_lang(message.target_lang.clone());

        if let Some(source) = &message.source_lang {
            builder = builder.source_lang(source.clone());
        }

        builder.build()
    }
}

/// Splits a reply into chunks that fit the transport's size limit.
///
/// Splits on line boundaries where possible; a single line longer than the
/// limit is hard-split at char boundaries.
pub fn split_reply(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for line in text.split('\n') {
        let line_chars = line.chars().count();

        if current_chars + line_chars + 1 > limit && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if line_chars > limit {
            for ch in line.chars() {
                if current_chars == limit {
                    chunks.push(std::mem::take(&mut current));
                    current_chars = 0;
                }
                current.push(ch);
                current_chars += 1;
            }
            continue;
        }

        if !current.is_empty() {
            current.push('\n');
            current_chars += 1;
        }
        current.push_str(line);
        current_chars += line_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockTranslationCache;
    use crate::domain::chat::mock::ChannelTransport;
    use crate::domain::language::LanguageCode;
    use crate::domain::store::MockTranslationStore;
    use crate::domain::translation::{MockTranslationProvider, TranslationResult};

    fn service(
        provider: MockTranslationProvider,
        max_reply_chars: usize,
    ) -> (tokio::sync::mpsc::Sender<InboundMessage>, Arc<ChannelTransport>, IntakeService) {
        let (sender, transport) = ChannelTransport::new(max_reply_chars);
        let transport = Arc::new(transport);
        let pipeline = Arc::new(TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            Arc::new(MockTranslationStore::new()),
            Arc::new(provider),
        ));
        let service = IntakeService::new(
            pipeline,
            transport.clone(),
            Arc::new(LanguageRegistry::default()),
        );

        (sender, transport, service)
    }

    fn message(text: &str, target: &str) -> InboundMessage {
        InboundMessage::new(
            ChatContext::new("general"),
            text,
            LanguageCode::parse(target).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_translation_is_sent_back_with_flag() {
        let (sender, transport, service) = service(
            MockTranslationProvider::new("mock")
                .with_result(TranslationResult::new("bonjour", "mock")),
            2000,
        );

        sender.send(message("hello", "fr")).await.unwrap();
        drop(sender);
        service.run().await;

        let replies = transport.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].0.channel, "general");
        assert_eq!(replies[0].1, "\u{1F1EB}\u{1F1F7} bonjour");
    }

    #[tokio::test]
    async fn test_transient_failure_gets_a_friendly_reply() {
        let (sender, transport, service) = service(
            MockTranslationProvider::new("mock")
                .with_error(DomainError::translation_unavailable("down")),
            2000,
        );

        sender.send(message("hello", "fr")).await.unwrap();
        drop(sender);
        service.run().await;

        let replies = transport.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].1.contains("try again later"));
    }

    #[tokio::test]
    async fn test_disabled_language_is_rejected_without_a_provider_call() {
        let provider = Arc::new(MockTranslationProvider::new("mock"));
        let (sender, transport) = ChannelTransport::new(2000);
        let transport = Arc::new(transport);
        let pipeline = Arc::new(TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            Arc::new(MockTranslationStore::new()),
            provider.clone(),
        ));
        let service = IntakeService::new(
            pipeline,
            transport.clone(),
            Arc::new(LanguageRegistry::default()),
        );

        // "ja" is not in the default enabled set
        sender.send(message("hello", "ja")).await.unwrap();
        drop(sender);
        service.run().await;

        let replies = transport.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].1.contains("not supported"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_long_replies_are_split() {
        let long = "bonjour ".repeat(100).trim_end().to_string();
        let (sender, transport, service) = service(
            MockTranslationProvider::new("mock")
                .with_result(TranslationResult::new(long, "mock")),
            100,
        );

        sender.send(message("hello", "fr")).await.unwrap();
        drop(sender);
        service.run().await;

        let replies = transport.replies();
        assert!(replies.len() > 1);
        for (_, chunk) in &replies {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_split_reply_short_text_is_untouched() {
        assert_eq!(split_reply("hello", 100), vec!["hello"]);
    }

    #[test]
    fn test_split_reply_prefers_line_boundaries() {
        let text = "first line\nsecond line\nthird line";

        let chunks = split_reply(text, 12);

        assert_eq!(chunks, vec!["first line", "second line", "third line"]);
    }

    #[test]
    fn test_split_reply_hard_splits_oversized_lines() {
        let chunks = split_reply(&"a".repeat(25), 10);

        assert_eq!(chunks, vec!["a".repeat(10), "a".repeat(10), "a".repeat(5)]);
    }

    #[test]
    fn test_split_reply_preserves_all_content() {
        let text = "aa\nbb\ncc\ndd";

        let chunks = split_reply(text, 5);

        assert_eq!(chunks, vec!["aa\nbb", "cc\ndd"]);
        assert_eq!(chunks.join("\n"), text);
    }
}
