#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use codepane::{app, completion::CompletionProvider, model::ChatMessage, AppState};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// Provider double that replays one canned outcome and records every call.
pub struct ScriptedProvider {
    reply: Result<Option<String>, String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(Some(content.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn complete<'a>(&'a self, messages: &'a [ChatMessage]) -> BoxFuture<'a, Result<Option<String>>> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let reply = self.reply.clone().map_err(|err| anyhow!(err));
        async move { reply }.boxed()
    }
}

pub fn test_app(provider: Arc<ScriptedProvider>) -> Router {
    app(AppState::new(provider))
}

pub fn form_post(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Decoded value of the page's hidden `previousMessages` input.
pub fn previous_messages_field(html: &str) -> String {
    let marker = r#"name="previousMessages" value=""#;
    let start = html.find(marker).unwrap() + marker.len();
    let len = html[start..].find('"').unwrap();
    html_escape::decode_html_entities(&html[start..start + len]).into_owned()
}
