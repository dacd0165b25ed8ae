use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", s)
    }
}

impl HttpMethod {
    pub fn requires_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// Whether the bearer token is attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthMode {
    #[default]
    None,
    /// Token sent when one is held.
    Optional,
    /// Token sent when one is held; without one the request still goes out bare.
    Required,
}

impl AuthMode {
    pub fn sends_token(&self) -> bool {
        !matches!(self, AuthMode::None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub auth: AuthMode,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            body: None,
            auth: AuthMode::None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    /// Placeholder names referenced by the path and body, in first-seen order.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        };

        for name in placeholder_names(&self.path) {
            push(name);
        }
        if let Some(body) = &self.body {
            let mut strings = Vec::new();
            collect_strings(body, &mut strings);
            for s in strings {
                for name in placeholder_names(s) {
                    push(name);
                }
            }
        }
        names
    }

    /// Returns the first placeholder the session cannot fill.
    pub fn missing_input(&self, session: &Session) -> Option<String> {
        self.placeholders()
            .into_iter()
            .find(|name| session.lookup(name).is_none())
    }

    /// Path with placeholders filled and URL-encoded. Unknown placeholders stay literal.
    pub fn resolve_path(&self, session: &Session) -> String {
        substitute(&self.path, session, |v| urlencoding::encode(v).into_owned())
    }

    pub fn resolve_body(&self, session: &Session) -> Option<Value> {
        self.body.as_ref().map(|b| resolve_value(b, session))
    }

    pub fn display_path(&self) -> String {
        format!("{:6} {}", self.method, self.path)
    }
}

fn placeholder_names(s: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = s;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                if !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
                    names.push(name);
                }
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

fn substitute(template: &str, session: &Session, encode: impl Fn(&str) -> String) -> String {
    let mut resolved = template.to_string();
    for name in placeholder_names(template) {
        if let Some(value) = session.lookup(name) {
            resolved = resolved.replace(&format!("{{{}}}", name), &encode(value));
        }
    }
    resolved
}

fn resolve_value(value: &Value, session: &Session) -> Value {
    match value {
        Value::String(s) => Value::String(substitute(s, session, |v| v.to_string())),
        Value::Array(items) => Value::Array(items.iter().map(|v| resolve_value(v, session)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, session)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}
