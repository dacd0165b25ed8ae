use serde_json::Value;

use crate::models::ProbeResult;

/// Looks up a dotted path in a successful result's JSON body.
///
/// Object keys are matched by name and array elements by numeric index
/// (`data.0.course_code`). Anything unexpected yields `None`: a failed or
/// skipped result, a non-JSON body, a missing key, or a path that runs
/// through a scalar.
pub fn extract<'a>(result: &'a ProbeResult, path: &str) -> Option<&'a Value> {
    if !result.is_success() {
        return None;
    }
    result.body.as_json().and_then(|body| extract_value(body, path))
}

pub fn extract_value<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(body);
    }

    path.split('.').try_fold(body, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// First path among `paths` that resolves to a usable scalar, rendered as text.
pub fn extract_text(result: &ProbeResult, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| extract(result, path))
        .find_map(value_text)
}

/// Strings and numbers as text; everything else is absent.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
