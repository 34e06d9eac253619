use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;

use crate::{
    code_view::codec::{code_view_path, extract_code},
    model::ChatMessage,
};

pub const INDEX_TEMPLATE: &str = "index.html";
pub const CODE_TEMPLATE: &str = "code.html";

macro_rules! template_file {
    ($name:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $name))
    };
}

static TEMPLATES: OnceLock<Environment<'static>> = OnceLock::new();

fn templates() -> &'static Environment<'static> {
    TEMPLATES.get_or_init(load_templates)
}

// Embedded sources; a compile failure here is a build defect, not a runtime condition.
fn load_templates() -> Environment<'static> {
    let mut env = Environment::new();
    for (name, source) in [
        (INDEX_TEMPLATE, template_file!("index.html")),
        (CODE_TEMPLATE, template_file!("code.html")),
    ] {
        env.add_template(name, source)
            .unwrap_or_else(|err| panic!("failed to compile template {name}: {err}"));
    }
    env
}

#[derive(Serialize)]
struct PageMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatPage<'a> {
    chat_messages: Vec<PageMessage<'a>>,
    code_frames: Vec<String>,
    previous_messages: String,
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct CodePage<'a> {
    code: &'a str,
}

/// Messages carrying a complete `<code>` block go to the code pane as frames;
/// everything else stays in the chat column.
pub fn chat_page(conversation: &[ChatMessage], error: Option<&str>) -> Result<String, minijinja::Error> {
    let mut chat_messages = Vec::with_capacity(conversation.len());
    let mut code_frames = Vec::new();

    for message in conversation {
        match extract_code(&message.content) {
            Some(code) => code_frames.push(code_view_path(code)),
            None => chat_messages.push(PageMessage {
                role: message.role.as_str(),
                content: &message.content,
            }),
        }
    }

    let previous_messages = serde_json::to_string(conversation).map_err(|err| {
        minijinja::Error::new(minijinja::ErrorKind::BadSerialization, err.to_string())
    })?;

    templates().get_template(INDEX_TEMPLATE)?.render(ChatPage {
        chat_messages,
        code_frames,
        previous_messages,
        error,
    })
}

/// Dumps `code` verbatim into a `<pre>` block, without escaping.
pub fn code_page(code: &str) -> Result<String, minijinja::Error> {
    templates()
        .get_template(CODE_TEMPLATE)?
        .render(CodePage { code })
}
