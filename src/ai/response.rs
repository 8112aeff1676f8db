// Reply extraction from chat-completion bodies
//
// The expected shape is {"choices":[{"message":{"content":"..."}}]}. Error
// bodies look like {"error":{"message":"..."}}.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ExtractionError;

const MAX_ERROR_MESSAGE_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<Value>,
}

/// Pull the assistant text out of a 2xx completion body
pub fn extract_reply(raw_body: &str) -> Result<String, ExtractionError> {
    let body: CompletionBody =
        serde_json::from_str(raw_body).map_err(|_| ExtractionError::Malformed)?;

    let Some(choices) = body.choices else {
        return match body.error.as_ref().and_then(error_text) {
            Some(message) => Err(ExtractionError::Upstream(message)),
            None => Err(ExtractionError::MissingChoices),
        };
    };

    choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .and_then(|content| match content {
            Value::String(text) => Some(text),
            _ => None,
        })
        .ok_or(ExtractionError::MissingChoices)
}

/// Best-effort readable message from an error body: `error.message` when the
/// body is JSON, otherwise the trimmed raw text, truncated
pub fn upstream_error_message(raw_body: &str) -> String {
    let from_json = serde_json::from_str::<CompletionBody>(raw_body)
        .ok()
        .and_then(|body| body.error)
        .and_then(|error| error_text(&error));

    let message = from_json.unwrap_or_else(|| raw_body.trim().to_string());
    if message.is_empty() {
        return "Unknown error".to_string();
    }
    truncate_chars(&message, MAX_ERROR_MESSAGE_CHARS)
}

/// `error` is usually {"message": "..."} but some gateways send a bare string
fn error_text(error: &Value) -> Option<String> {
    match error {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Object(fields) => match fields.get("message")? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        },
        _ => None,
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
