//! Best-effort answer extraction from a raw search document.
//!
//! Rules are evaluated in priority order and each one is guarded on its own:
//! a missing container, an empty list or a null leaf simply means the rule
//! does not match. When nothing matches the sentinel [`NO_RESULT`] is
//! returned.

use serde_json::Value;

use crate::error::{EnrichError, Stage};

pub const NO_RESULT: &str = "No good search result found";

type Rule = (&'static str, fn(&Value) -> Option<String>);

const RULES: [Rule; 6] = [
    ("answer_box.answer", answer_box_answer),
    ("answer_box.snippet", answer_box_snippet),
    (
        "answer_box.snippet_highlighted_words",
        answer_box_highlighted_word,
    ),
    ("sports_results.game_spotlight", sports_spotlight),
    ("knowledge_graph.description", knowledge_graph_description),
    ("organic_results.link", first_organic_link),
];

/// Result of running the rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    /// Name of the rule that fired, `None` for the sentinel.
    pub rule: Option<&'static str>,
}

/// Extracts the single best answer from `doc`.
///
/// # Errors
///
/// Returns [`EnrichError::Upstream`] when the document carries an `error`
/// field, before any rule is consulted.
pub fn extract(doc: &Value) -> Result<String, EnrichError> {
    extract_with_rule(doc).map(|extraction| extraction.text)
}

/// Like [`extract`], also reporting which rule produced the answer.
///
/// # Errors
///
/// Returns [`EnrichError::Upstream`] when the document carries an `error` field.
pub fn extract_with_rule(doc: &Value) -> Result<Extraction, EnrichError> {
    if let Some(error) = doc.get("error") {
        let message = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Err(EnrichError::Upstream {
            stage: Stage::Search,
            message: format!("search provider returned an error: {message}"),
        });
    }

    for (rule, apply) in RULES {
        if let Some(text) = apply(doc) {
            return Ok(Extraction {
                text,
                rule: Some(rule),
            });
        }
    }

    Ok(Extraction {
        text: NO_RESULT.to_string(),
        rule: None,
    })
}

/// Renders a leaf: strings verbatim, other non-null values as JSON text.
fn leaf_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn answer_box_answer(doc: &Value) -> Option<String> {
    doc.pointer("/answer_box/answer").and_then(leaf_text)
}

fn answer_box_snippet(doc: &Value) -> Option<String> {
    doc.pointer("/answer_box/snippet").and_then(leaf_text)
}

fn answer_box_highlighted_word(doc: &Value) -> Option<String> {
    doc.pointer("/answer_box/snippet_highlighted_words/0")
        .and_then(leaf_text)
}

fn sports_spotlight(doc: &Value) -> Option<String> {
    doc.pointer("/sports_results/game_spotlight")
        .and_then(leaf_text)
}

fn knowledge_graph_description(doc: &Value) -> Option<String> {
    doc.pointer("/knowledge_graph/description")
        .and_then(leaf_text)
}

/// The first organic link, consulted only when that result has a snippet.
fn first_organic_link(doc: &Value) -> Option<String> {
    let first = doc.pointer("/organic_results/0")?;
    first.get("snippet")?;
    first.get("link").and_then(leaf_text)
}
