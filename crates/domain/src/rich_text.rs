//! Flattening of rich-text trees to plain text.
//!
//! Rich text arrives as a tree of nodes shaped like
//! `{ "type": "paragraph", "content": [...], "text": "...", "marks": [...] }`.
//! Only text survives; marks and attrs are dropped.

use serde_json::Value;

/// Flatten a rich-text document to plain text.
///
/// Each top-level block contributes its own `text` followed by the `text` of
/// its immediate children, concatenated without separators. Non-empty blocks
/// are joined with `\n`. A plain string flattens to itself; anything else
/// without a `content` list flattens to its own `text`, or nothing.
///
/// ```
/// use serde_json::json;
/// use tavernkeep_domain::rich_text::flatten_rich_text;
///
/// let doc = json!({"type": "doc", "content": [
///     {"type": "paragraph", "content": [
///         {"type": "text", "text": "Hello, "},
///         {"type": "text", "text": "world", "marks": [{"type": "bold"}]}
///     ]},
///     {"type": "paragraph"},
///     {"type": "paragraph", "content": [{"type": "text", "text": "Bye"}]}
/// ]});
/// assert_eq!(flatten_rich_text(&doc), "Hello, world\nBye");
/// ```
pub fn flatten_rich_text(document: &Value) -> String {
    match document {
        Value::String(text) => text.clone(),
        Value::Object(_) => match document.get("content").and_then(Value::as_array) {
            Some(blocks) => blocks
                .iter()
                .map(block_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            None => node_text(document).to_string(),
        },
        _ => String::new(),
    }
}

fn block_text(block: &Value) -> String {
    let mut text = node_text(block).to_string();
    if let Some(children) = block.get("content").and_then(Value::as_array) {
        for child in children {
            text.push_str(node_text(child));
        }
    }
    text
}

fn node_text(node: &Value) -> &str {
    node.get("text").and_then(Value::as_str).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_passes_through() {
        assert_eq!(flatten_rich_text(&json!("just text")), "just text");
    }

    #[test]
    fn empty_and_odd_inputs() {
        assert_eq!(flatten_rich_text(&json!({"type": "doc", "content": []})), "");
        assert_eq!(flatten_rich_text(&json!(null)), "");
        assert_eq!(flatten_rich_text(&json!(42)), "");
        assert_eq!(flatten_rich_text(&json!({"type": "text", "text": "x"})), "x");
    }

    #[test]
    fn only_immediate_children_contribute() {
        let doc = json!({"type": "doc", "content": [
            {"type": "bulletList", "content": [
                {"type": "listItem", "content": [
                    {"type": "paragraph", "content": [{"type": "text", "text": "deep"}]}
                ]}
            ]},
            {"type": "paragraph", "content": [{"type": "text", "text": "shallow"}]}
        ]});
        assert_eq!(flatten_rich_text(&doc), "shallow");
    }

    #[test]
    fn block_text_precedes_children() {
        let doc = json!({"type": "doc", "content": [
            {"type": "heading", "text": "A", "content": [{"type": "text", "text": "B"}]}
        ]});
        assert_eq!(flatten_rich_text(&doc), "AB");
    }

    #[test]
    fn cyrillic_is_preserved() {
        let doc = json!({"type": "doc", "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": "Ярость"}]},
            {"type": "paragraph", "content": [{"type": "text", "text": "берсерка"}]}
        ]});
        assert_eq!(flatten_rich_text(&doc), "Ярость\nберсерка");
    }
}
