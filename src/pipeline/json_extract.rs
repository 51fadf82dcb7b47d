use serde_json::Value;

/// Recover a JSON value from free-form model output that may wrap it in
/// prose or code fences. Strict parse first; otherwise the outermost
/// `{...}` or `[...]` span is located and re-parsed, preferring whichever
/// delimiter opens first. Total failure yields the empty-object sentinel —
/// extraction failure is a recoverable condition, never an error.
///
/// Nested braces inside string literals are not specially handled by the
/// span heuristic; that approximation is accepted.
pub fn extract(text: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return value;
    }

    let object_span = delimited_span(text, '{', '}');
    let array_span = delimited_span(text, '[', ']');

    let candidate = match (object_span, array_span) {
        (Some(obj), Some(arr)) => {
            if arr.0 < obj.0 {
                Some(arr)
            } else {
                Some(obj)
            }
        }
        (Some(obj), None) => Some(obj),
        (None, Some(arr)) => Some(arr),
        (None, None) => None,
    };

    candidate
        .and_then(|(start, end)| serde_json::from_str::<Value>(&text[start..=end]).ok())
        .unwrap_or_else(empty_sentinel)
}

/// The documented "nothing extracted" value.
pub fn empty_sentinel() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Byte span from the first opening delimiter to the last closing one,
/// if both exist in that order.
fn delimited_span(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then_some((start, end))
}
