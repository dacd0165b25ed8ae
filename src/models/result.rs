use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::HttpMethod;
use crate::analyzer::{CourseStats, course_list};
use crate::error::ProbeError;

/// Response payload as received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum ProbeBody {
    Json(Value),
    Text(String),
    #[default]
    Empty,
}

impl ProbeBody {
    pub fn parse(bytes: &[u8], content_type: Option<&str>) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ProbeBody::Empty;
        }

        let json_allowed = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(true);

        if json_allowed {
            if let Ok(value) = serde_json::from_slice::<Value>(bytes) {
                return ProbeBody::Json(value);
            }
        }

        ProbeBody::Text(String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ProbeBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ProbeBody::Empty)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    pub status: Option<u16>,
    pub body: ProbeBody,
    pub error: Option<ProbeError>,
    pub skipped: Option<String>,
    pub request_body: Option<Value>,
    pub duration_ms: u64,
}

impl ProbeResult {
    pub fn new(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        body: ProbeBody,
        duration_ms: u64,
    ) -> Self {
        let error = if (200..300).contains(&status) {
            None
        } else {
            Some(ProbeError::Protocol { status })
        };

        Self {
            name: name.into(),
            method,
            url: url.into(),
            status: Some(status),
            body,
            error,
            skipped: None,
            request_body: None,
            duration_ms,
        }
    }

    pub fn unreachable(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        detail: String,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            status: None,
            body: ProbeBody::Empty,
            error: Some(ProbeError::Unreachable { detail }),
            skipped: None,
            request_body: None,
            duration_ms: 0,
        }
    }

    pub fn skipped(
        name: impl Into<String>,
        method: HttpMethod,
        url: impl Into<String>,
        reason: String,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            status: None,
            body: ProbeBody::Empty,
            error: None,
            skipped: Some(reason),
            request_body: None,
            duration_ms: 0,
        }
    }

    pub fn with_request_body(mut self, body: Option<Value>) -> Self {
        self.request_body = body;
        self
    }

    pub fn is_success(&self) -> bool {
        self.skipped.is_none()
            && self.error.is_none()
            && self.status.is_some_and(|s| (200..300).contains(&s))
    }

    pub fn is_unreachable(&self) -> bool {
        self.error.as_ref().is_some_and(ProbeError::is_transport)
    }

    pub fn outcome(&self) -> Outcome {
        if let Some(reason) = &self.skipped {
            return Outcome::Skipped(reason.clone());
        }
        match &self.error {
            Some(err) => Outcome::Failure(err.to_string()),
            None if self.is_success() => Outcome::Success,
            None => Outcome::Failure("no response".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure(String),
    Skipped(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "ok"),
            Outcome::Failure(reason) => write!(f, "failed: {}", reason),
            Outcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub status: Option<u16>,
    pub outcome: Outcome,
    /// Length of a list response, bare or under `data`.
    pub items: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub entries: Vec<ReportEntry>,
    pub success_count: usize,
    pub failure_count: usize,
    pub skipped_count: usize,
    pub course_stats: Vec<(String, CourseStats)>,
    pub interrupted: bool,
}

impl RunReport {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let mut report = Self::default();

        for result in results {
            let outcome = result.outcome();
            match outcome {
                Outcome::Success => report.success_count += 1,
                Outcome::Failure(_) => report.failure_count += 1,
                Outcome::Skipped(_) => report.skipped_count += 1,
            }
            let items = if result.is_success() {
                result.body.as_json().and_then(course_list).map(Vec::len)
            } else {
                None
            };
            report.entries.push(ReportEntry {
                name: result.name.clone(),
                status: result.status,
                outcome,
                items,
            });
        }

        report
    }

    pub fn with_course_stats(mut self, stats: Vec<(String, CourseStats)>) -> Self {
        self.course_stats = stats;
        self
    }

    pub fn entry(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn stats_for(&self, name: &str) -> Option<&CourseStats> {
        self.course_stats
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }
}
