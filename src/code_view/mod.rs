use axum::{
    extract::Path,
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use tracing::{error, warn};

use crate::{render, state::AppState};

pub mod codec;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/code/{id}", get(show_code))
        .route("/code", get(missing_id))
        .route("/code/", get(missing_id))
}

pub async fn show_code(Path(id): Path<String>) -> Result<Html<String>, (StatusCode, String)> {
    if id.trim().is_empty() {
        return missing_id().await;
    }

    let code = codec::decode_code_id(&id).map_err(|err| {
        warn!(error = %err, id_len = id.len(), "rejected code id");
        (StatusCode::BAD_REQUEST, err.to_string())
    })?;

    let html = render::code_page(&code).map_err(|err| {
        error!(error = %err, "code page render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    })?;

    Ok(Html(html))
}

async fn missing_id() -> Result<Html<String>, (StatusCode, String)> {
    Err((StatusCode::NOT_FOUND, "Not Found".to_string()))
}
