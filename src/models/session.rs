use serde::{Deserialize, Serialize};
use std::fmt;

/// A value carried from one probe to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Token,
    StudentId,
    CourseCode,
    Email,
    Level,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Token,
        Field::StudentId,
        Field::CourseCode,
        Field::Email,
        Field::Level,
    ];

    /// Name used inside `{...}` placeholders and skip reasons.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Token => "token",
            Field::StudentId => "student_id",
            Field::CourseCode => "course_code",
            Field::Email => "email",
            Field::Level => "level",
        }
    }

    pub fn from_placeholder(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.placeholder() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.placeholder())
    }
}

/// Mutable state threaded through a single run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub last_student_id: Option<String>,
    pub last_course_code: Option<String>,
    pub email: Option<String>,
    pub level: Option<String>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::Token => &self.bearer_token,
            Field::StudentId => &self.last_student_id,
            Field::CourseCode => &self.last_course_code,
            Field::Email => &self.email,
            Field::Level => &self.level,
        };
        slot.as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Token => &mut self.bearer_token,
            Field::StudentId => &mut self.last_student_id,
            Field::CourseCode => &mut self.last_course_code,
            Field::Email => &mut self.email,
            Field::Level => &mut self.level,
        };
        *slot = Some(value);
    }

    pub fn lookup(&self, placeholder: &str) -> Option<&str> {
        Field::from_placeholder(placeholder).and_then(|f| self.get(f))
    }

    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }
}
