use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub mod chat;
pub mod code_view;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod model;
pub mod render;
pub mod state;

pub use state::AppState;

/// Full HTTP surface: chat page, JSON chat API and the code viewer.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Chat page + form relay
        .merge(chat::router())
        // Embedded code pane
        .merge(code_view::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
