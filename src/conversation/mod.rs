use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{completion::CompletionProvider, model::ChatMessage};

pub const SYSTEM_PROMPT: &str = "You are Alice, a large language model. Answer as concisely as possible. if user asks for code, always create it inside tags <code></code>";
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process that.";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Message is required")]
    EmptyMessage,
    #[error("completion provider failed: {0:#}")]
    Provider(anyhow::Error),
}

/// Parses the `previousMessages` form field. Anything missing or malformed
/// starts a fresh conversation.
pub fn parse_previous_messages(raw: Option<&str>) -> Vec<ChatMessage> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str(raw) {
        Ok(messages) => messages,
        Err(err) => {
            warn!(error = %err, "discarding unparseable previousMessages");
            Vec::new()
        }
    }
}

/// The full list sent upstream: the fixed preamble, then the conversation.
pub fn provider_messages(conversation: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(conversation.len() + 1);
    messages.push(ChatMessage::system(SYSTEM_PROMPT));
    messages.extend_from_slice(conversation);
    messages
}

/// Appends the user turn and the provider's reply to `conversation`.
///
/// A blank message is rejected before the provider is contacted. Existing
/// entries are never touched; the preamble is not part of the result.
pub async fn relay(
    provider: &dyn CompletionProvider,
    message: &str,
    mut conversation: Vec<ChatMessage>,
) -> Result<Vec<ChatMessage>, RelayError> {
    if message.trim().is_empty() {
        return Err(RelayError::EmptyMessage);
    }

    let request_id = Uuid::new_v4().to_string();
    conversation.push(ChatMessage::user(message));

    info!(
        request_id = request_id.as_str(),
        history = conversation.len(),
        "relaying chat turn"
    );

    let reply = provider
        .complete(&provider_messages(&conversation))
        .await
        .map_err(RelayError::Provider)?
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| {
            warn!(
                request_id = request_id.as_str(),
                "provider returned no content"
            );
            FALLBACK_REPLY.to_string()
        });

    debug!(request_id = request_id.as_str(), reply = reply.as_str(), "assistant reply");
    info!(
        request_id = request_id.as_str(),
        reply_len = reply.len(),
        "chat turn complete"
    );

    conversation.push(ChatMessage::assistant(reply));
    Ok(conversation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use anyhow::{anyhow, Result};
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<Option<String>, String>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl Scripted {
        fn new(reply: Result<Option<String>, String>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionProvider for Scripted {
        fn complete<'a>(
            &'a self,
            messages: &'a [ChatMessage],
        ) -> BoxFuture<'a, Result<Option<String>>> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let reply = self.reply.clone().map_err(|err| anyhow!(err));
            async move { reply }.boxed()
        }
    }

    #[test]
    fn previous_messages_defaults_to_empty() {
        assert!(parse_previous_messages(None).is_empty());
        assert!(parse_previous_messages(Some("")).is_empty());
        assert!(parse_previous_messages(Some("not json")).is_empty());
        assert!(parse_previous_messages(Some(r#"{"role":"user"}"#)).is_empty());
    }

    #[test]
    fn previous_messages_parse_in_order() {
        let parsed = parse_previous_messages(Some(
            r#"[{"role":"user","content":"a"},{"role":"assistant","content":"b"}]"#,
        ));
        assert_eq!(
            parsed,
            vec![ChatMessage::user("a"), ChatMessage::assistant("b")]
        );
    }

    #[test]
    fn preamble_comes_first() {
        let messages = provider_messages(&[ChatMessage::user("hi")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("<code></code>"));
        assert_eq!(messages[1], ChatMessage::user("hi"));
    }

    #[tokio::test]
    async fn blank_message_skips_provider() {
        let provider = Scripted::new(Ok(Some("unused".into())));
        let err = relay(&provider, "  \n\t", Vec::new()).await.unwrap_err();
        assert!(matches!(err, RelayError::EmptyMessage));
        assert_eq!(err.to_string(), "Message is required");
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn hello_yields_two_messages() {
        let provider = Scripted::new(Ok(Some("Hi there".into())));
        let conversation = relay(&provider, "hello", Vec::new()).await.unwrap();
        assert_eq!(
            conversation,
            vec![ChatMessage::user("hello"), ChatMessage::assistant("Hi there")]
        );
    }

    #[tokio::test]
    async fn history_is_preserved_and_extended() {
        let prior = vec![
            ChatMessage::user("one"),
            ChatMessage::assistant("two"),
            ChatMessage::user("three"),
            ChatMessage::assistant("four"),
        ];
        let provider = Scripted::new(Ok(Some("six".into())));
        let conversation = relay(&provider, "five", prior.clone()).await.unwrap();

        assert_eq!(conversation.len(), prior.len() + 2);
        assert_eq!(&conversation[..prior.len()], prior.as_slice());
        assert_eq!(conversation[4], ChatMessage::user("five"));
        assert_eq!(conversation[5].role, Role::Assistant);

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].len(), prior.len() + 2);
        assert_eq!(seen[0][0].content, SYSTEM_PROMPT);
        assert_eq!(&seen[0][1..=prior.len()], prior.as_slice());
    }

    #[tokio::test]
    async fn empty_reply_uses_fallback() {
        for reply in [None, Some(String::new())] {
            let provider = Scripted::new(Ok(reply));
            let conversation = relay(&provider, "hello", Vec::new()).await.unwrap();
            assert_eq!(conversation[1], ChatMessage::assistant(FALLBACK_REPLY));
        }
    }

    #[tokio::test]
    async fn provider_error_propagates() {
        let provider = Scripted::new(Err("connection refused".into()));
        let err = relay(&provider, "hello", Vec::new()).await.unwrap_err();
        assert!(matches!(err, RelayError::Provider(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
