use serde_json::json;

use crate::config::ProbeConfig;
use crate::models::{AuthMode, Endpoint, Field, HttpMethod};

/// Copies a value out of a successful response into the session.
/// Paths are tried in order; the first that resolves wins.
#[derive(Debug, Clone)]
pub struct Capture {
    pub field: Field,
    pub paths: Vec<String>,
}

/// One entry of a probe plan.
#[derive(Debug, Clone)]
pub struct ProbeStep {
    pub endpoint: Endpoint,
    pub captures: Vec<Capture>,
    /// Captured fields a 2xx response must carry.
    pub expects: Vec<Field>,
    /// Run only while this field is still absent from the session.
    pub only_if_missing: Option<Field>,
    /// Response is a course list.
    pub catalog: bool,
}

impl ProbeStep {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            captures: Vec::new(),
            expects: Vec::new(),
            only_if_missing: None,
            catalog: false,
        }
    }

    pub fn capture(mut self, field: Field, paths: &[&str]) -> Self {
        self.captures.push(Capture {
            field,
            paths: paths.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn expecting(mut self, field: Field) -> Self {
        self.expects.push(field);
        self
    }

    pub fn only_if_missing(mut self, field: Field) -> Self {
        self.only_if_missing = Some(field);
        self
    }

    pub fn catalog(mut self) -> Self {
        self.catalog = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.endpoint.name
    }

    pub fn capture_for(&self, field: Field) -> Option<&Capture> {
        self.captures.iter().find(|c| c.field == field)
    }
}

/// The course-registration walkthrough.
///
/// `stamp` makes the registered email and student id unique per run.
pub fn default_plan(config: &ProbeConfig, stamp: &str) -> Vec<ProbeStep> {
    let student = &config.student;

    vec![
        ProbeStep::new(Endpoint::new("Health Check", HttpMethod::Get, "/health")),
        ProbeStep::new(
            Endpoint::new("Student Registration", HttpMethod::Post, "/auth/register").with_body(json!({
                "full_name": student.full_name,
                "email": student.email(stamp),
                "password": student.password,
                "level": config.level,
                "student_id": student.student_id(stamp),
                "phone": student.phone,
            })),
        )
        .capture(Field::Token, &["token", "data.token"])
        .capture(Field::StudentId, &["user.student_id", "data.user.student_id"])
        .capture(Field::Email, &["user.email", "data.user.email"])
        .capture(Field::Level, &["user.level", "data.user.level"])
        .expecting(Field::Token),
        ProbeStep::new(
            Endpoint::new("Student Login", HttpMethod::Post, "/auth/login").with_body(json!({
                "email": config.fallback.email,
                "password": config.fallback.password,
            })),
        )
        .capture(Field::Token, &["token", "data.token"])
        .expecting(Field::Token)
        .only_if_missing(Field::Token),
        ProbeStep::new(
            Endpoint::new("User Profile", HttpMethod::Get, "/auth/profile").with_auth(AuthMode::Required),
        )
        .capture(Field::StudentId, &["user.student_id", "data.student_id", "data.user.student_id"])
        .capture(Field::Email, &["user.email", "data.email"])
        .capture(Field::Level, &["user.level", "data.level"]),
        ProbeStep::new(
            Endpoint::new("Course Catalog", HttpMethod::Get, "/courses").with_auth(AuthMode::Optional),
        )
        .catalog(),
        ProbeStep::new(
            Endpoint::new("Courses by Level", HttpMethod::Get, "/courses/{level}")
                .with_auth(AuthMode::Optional),
        )
        .capture(Field::CourseCode, &["0.course_code", "data.0.course_code"])
        .catalog(),
        ProbeStep::new(
            Endpoint::new("Course Enrollment", HttpMethod::Post, "/enrollments/enroll")
                .with_auth(AuthMode::Required)
                .with_body(json!({
                    "student_id": "{student_id}",
                    "course_code": "{course_code}",
                    "semester": config.semester,
                })),
        ),
        ProbeStep::new(
            Endpoint::new("My Enrollments", HttpMethod::Get, "/enrollments/user")
                .with_auth(AuthMode::Required),
        ),
    ]
}

/// Sweeps alternative endpoint shapes to find which ones the server answers.
///
/// Every probe is named `METHOD /path`. Nothing here depends on a captured
/// value except the token, which only the admin login supplies and which is
/// sent when held.
pub fn discovery_plan(config: &ProbeConfig, stamp: &str) -> Vec<ProbeStep> {
    let level = config.level;
    let get = |path: String| {
        ProbeStep::new(
            Endpoint::new(format!("GET {}", path), HttpMethod::Get, path).with_auth(AuthMode::Optional),
        )
    };

    let mut plan = vec![
        ProbeStep::new(Endpoint::new("GET /health", HttpMethod::Get, "/health")),
        ProbeStep::new(
            Endpoint::new("POST /auth/register", HttpMethod::Post, "/auth/register").with_body(json!({
                "full_name": "Test User",
                "email": format!("test.{}@uniport.edu", stamp),
                "password": "test123",
                "level": level,
                "student_id": "TEST001",
            })),
        ),
        ProbeStep::new(
            Endpoint::new("POST /auth/login", HttpMethod::Post, "/auth/login").with_body(json!({
                "email": config.fallback.email,
                "password": config.fallback.password,
            })),
        )
        .capture(Field::Token, &["token", "data.token"]),
    ];

    for path in [
        "/courses".to_string(),
        "/courses/all".to_string(),
        format!("/courses/level/{}", level),
        format!("/courses/{}", level),
        format!("/course/{}", level),
        "/enrollments".to_string(),
        "/enrollments/user".to_string(),
    ] {
        plan.push(get(path));
    }

    plan.push(ProbeStep::new(
        Endpoint::new("POST /enrollments/enroll", HttpMethod::Post, "/enrollments/enroll")
            .with_auth(AuthMode::Optional)
            .with_body(json!({
                "student_id": "TEST001",
                "course_code": "CSC201",
                "semester": config.semester,
            })),
    ));

    plan
}
