use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::fields::value_text;

const SAMPLE_SIZE: usize = 3;

/// The course list inside a catalog response, whether bare or under `data`.
pub fn course_list(body: &Value) -> Option<&Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get("data").and_then(Value::as_array),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSample {
    pub code: String,
    pub name: String,
    pub credits: u64,
    pub semester: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStats {
    pub total: usize,
    pub total_credits: u64,
    pub by_level: BTreeMap<String, usize>,
    pub by_semester: BTreeMap<String, usize>,
    pub samples: Vec<CourseSample>,
}

impl CourseStats {
    pub fn from_body(body: &Value) -> Option<Self> {
        course_list(body).map(|courses| Self::from_courses(courses))
    }

    pub fn from_courses(courses: &[Value]) -> Self {
        let mut stats = Self {
            total: courses.len(),
            ..Default::default()
        };

        for course in courses {
            *stats.by_level.entry(text_field(course, "level")).or_insert(0) += 1;
            *stats.by_semester.entry(text_field(course, "semester")).or_insert(0) += 1;
            stats.total_credits = stats.total_credits.saturating_add(credit_units(course));
        }

        stats.samples = courses
            .iter()
            .take(SAMPLE_SIZE)
            .map(|c| CourseSample {
                code: text_field(c, "course_code"),
                name: text_field(c, "course_name"),
                credits: credit_units(c),
                semester: text_field(c, "semester"),
            })
            .collect();

        stats
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn text_field(course: &Value, key: &str) -> String {
    course
        .get(key)
        .and_then(value_text)
        .unwrap_or_else(|| "unknown".to_string())
}

fn credit_units(course: &Value) -> u64 {
    match course.get("credits") {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
