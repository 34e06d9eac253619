use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

pub const CODE_OPEN: &str = "<code>";
pub const CODE_CLOSE: &str = "</code>";

#[derive(Debug, Error)]
pub enum CodeIdError {
    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Invalid code id encoding")]
    NotAscii,
    #[error("Invalid percent-encoding at byte {0}")]
    Percent(usize),
    #[error("Invalid UTF-8 in code: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Text between the first `<code>` and the next `</code>` after it.
pub fn extract_code(content: &str) -> Option<&str> {
    let start = content.find(CODE_OPEN)? + CODE_OPEN.len();
    let len = content[start..].find(CODE_CLOSE)?;
    Some(&content[start..start + len])
}

pub fn encode_code_id(code: &str) -> String {
    URL_SAFE_NO_PAD.encode(urlencoding::encode(code).as_bytes())
}

/// Accepts both base64 alphabets, padded or not, so ids minted by a
/// browser's `btoa` decode the same as ours.
pub fn decode_code_id(id: &str) -> Result<String, CodeIdError> {
    let normalized: String = id
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            c => c,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD.decode(normalized)?;
    if !bytes.is_ascii() {
        return Err(CodeIdError::NotAscii);
    }
    let percent_encoded = String::from_utf8(bytes)?;
    check_percent_escapes(&percent_encoded)?;
    Ok(urlencoding::decode(&percent_encoded)?.into_owned())
}

// `urlencoding::decode` passes stray `%` through untouched; reject them instead.
fn check_percent_escapes(encoded: &str) -> Result<(), CodeIdError> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let well_formed = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(CodeIdError::Percent(i));
        }
        i += 3;
    }
    Ok(())
}

pub fn code_view_path(code: &str) -> String {
    format!("/code/{}", encode_code_id(code))
}
