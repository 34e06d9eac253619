use anyhow::Result;
use futures_util::future::BoxFuture;

use crate::model::ChatMessage;

pub mod openai;

pub use openai::OpenAiClient;

/// A hosted model that turns a message list into one assistant reply.
///
/// `Ok(None)` means the provider answered but produced no content.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(&'a self, messages: &'a [ChatMessage]) -> BoxFuture<'a, Result<Option<String>>>;
}
