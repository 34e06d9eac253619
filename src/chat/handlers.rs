use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Form, Json,
};
use tracing::error;

use crate::{
    chat::types::{ChatForm, ErrorResponse, MessagesResponse},
    conversation::{parse_previous_messages, relay, RelayError},
    model::ChatMessage,
    render,
    state::AppState,
};

const GENERIC_FAILURE: &str = "Internal Server Error";

pub async fn chat_page() -> Result<Html<String>, (StatusCode, String)> {
    render_page(&[], None)
}

/// Form post from the chat page; re-renders the page with the new turn.
pub async fn submit_chat(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let previous = parse_previous_messages(form.previous_messages.as_deref());
    let message = form.message.unwrap_or_default();

    match relay(state.provider.as_ref(), &message, previous.clone()).await {
        Ok(conversation) => render_page(&conversation, None),
        Err(err @ RelayError::EmptyMessage) => render_page(&previous, Some(&err.to_string())),
        Err(RelayError::Provider(err)) => {
            error!(error = ?err, "chat relay failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.into()))
        }
    }
}

pub async fn chat_api(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<Json<MessagesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let previous = parse_previous_messages(form.previous_messages.as_deref());
    let message = form.message.unwrap_or_default();

    match relay(state.provider.as_ref(), &message, previous).await {
        Ok(messages) => Ok(Json(MessagesResponse { messages })),
        Err(err @ RelayError::EmptyMessage) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )),
        Err(RelayError::Provider(err)) => {
            error!(error = ?err, "chat relay failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: GENERIC_FAILURE.into(),
                }),
            ))
        }
    }
}

fn render_page(
    conversation: &[ChatMessage],
    message_error: Option<&str>,
) -> Result<Html<String>, (StatusCode, String)> {
    render::chat_page(conversation, message_error)
        .map(Html)
        .map_err(|err| {
            error!(error = %err, "chat page render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.into())
        })
}
