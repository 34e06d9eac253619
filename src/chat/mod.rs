use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod handlers;
pub mod types;

use handlers::{chat_api, chat_page, submit_chat};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(chat_page).post(submit_chat))
        .route("/api/chat", post(chat_api))
}
