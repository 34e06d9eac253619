use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use codepane::{app, completion::OpenAiClient, config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Config / provider
    // -----------------------------
    let config = Config::from_env().context("invalid configuration")?;
    let provider = OpenAiClient::from_config(&config);

    info!(
        model = provider.model(),
        base_url = config.base_url.as_str(),
        "completion provider configured"
    );

    let state = AppState::new(Arc::new(provider));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = config.bind_addr.as_str(), "chat page at http://{}/", config.bind_addr);
    info!("code viewer at http://{}/code/{{id}}", config.bind_addr);

    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}
