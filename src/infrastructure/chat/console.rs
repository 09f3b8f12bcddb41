//! Console chat transport
//!
//! Reads translation requests from stdin, one per line, in the form
//! `target: text` or `source->target: text`, and prints replies to
//! stdout. The target may also be a flag emoji, resolved through the
//! [`LanguageRegistry`]. Mostly useful for local runs and demos; real
//! chat platforms plug in behind the same [`ChatTransport`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::chat::{ChatContext, ChatTransport, InboundMessage};
use crate::domain::language::{LanguageCode, LanguageRegistry};
use crate::domain::DomainError;

pub const DEFAULT_MAX_REPLY_CHARS: usize = 2000;

const CONSOLE_CHANNEL: &str = "console";

#[derive(Debug)]
pub struct ConsoleTransport {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    max_reply_chars: usize,
    registry: Arc<LanguageRegistry>,
}

impl ConsoleTransport {
    pub fn new(max_reply_chars: usize, registry: Arc<LanguageRegistry>) -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            max_reply_chars,
            registry,
        }
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPLY_CHARS, Arc::new(LanguageRegistry::default()))
    }
}

/// A bare code like `fr`, or a flag emoji of an enabled language
fn resolve_lang(token: &str, registry: &LanguageRegistry) -> Option<LanguageCode> {
    let token = token.trim();

    LanguageCode::parse(token)
        .ok()
        .or_else(|| registry.language_for_flag(token))
}

/// Parses `target: text` or `source->target: text`
fn parse_line(line: &str, registry: &LanguageRegistry) -> Option<InboundMessage> {
    let (langs, text) = line.split_once(':')?;
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    let context = ChatContext::new(CONSOLE_CHANNEL);

    match langs.split_once("->") {
        Some((source, target)) => {
            let source = resolve_lang(source, registry)?;
            let target = resolve_lang(target, registry)?;

            Some(InboundMessage::new(context, text, target).with_source_lang(source))
        }
        None => {
            let target = resolve_lang(langs, registry)?;

            Some(InboundMessage::new(context, text, target))
        }
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn next_message(&self) -> Option<InboundMessage> {
        let mut lines = self.lines.lock().await;

        loop {
            let line = lines.next_line().await.ok()??;

            if line.trim().is_empty() {
                continue;
            }

            match parse_line(&line, &self.registry) {
                Some(message) => return Some(message),
                None => {
                    debug!(line = %line, "Unparseable input line");
                    println!(
                        "Usage: `target: text` or `source->target: text`, e.g. `fr: hello` \
                         (a flag emoji also works as the target)"
                    );
                }
            }
        }
    }

    async fn send(&self, _context: &ChatContext, text: &str) -> Result<(), DomainError> {
        println!("{}", text);
        Ok(())
    }

    fn max_reply_chars(&self) -> usize {
        self.max_reply_chars
    }
}
