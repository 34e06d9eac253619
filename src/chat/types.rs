use serde::{Deserialize, Serialize};

use crate::model::ChatMessage;

/// Fields posted by the chat form.
#[derive(Debug, Default, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: Option<String>,
    /// JSON array of the conversation so far.
    #[serde(default, rename = "previousMessages")]
    pub previous_messages: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
