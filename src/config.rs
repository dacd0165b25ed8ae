//! Run configuration.
//!
//! Everything except the base URL is fixed at its default; the CLI only
//! overrides where the API lives.

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub base_url: String,
    /// Per-request bound, applied to every probe.
    pub timeout_secs: u64,
    /// Academic level used for `{level}` until the API reports one.
    pub level: u32,
    pub semester: String,
    pub student: StudentProfile,
    pub fallback: Credentials,
}

/// Registration payload template. Email and student id get a run stamp appended.
#[derive(Debug, Clone)]
pub struct StudentProfile {
    pub full_name: String,
    pub email_local: String,
    pub email_domain: String,
    pub password: String,
    pub student_id_prefix: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            level: 200,
            semester: "First Semester 2024".to_string(),
            student: StudentProfile::default(),
            fallback: Credentials::default(),
        }
    }
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            full_name: "John Doe".to_string(),
            email_local: "john.doe".to_string(),
            email_domain: "student.uniport.edu".to_string(),
            password: "SecurePass123!".to_string(),
            student_id_prefix: "STU".to_string(),
            phone: "+2348012345678".to_string(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "admin@courseapp.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        self
    }
}

impl StudentProfile {
    pub fn email(&self, stamp: &str) -> String {
        format!("{}.{}@{}", self.email_local, stamp, self.email_domain)
    }

    pub fn student_id(&self, stamp: &str) -> String {
        format!("{}{}", self.student_id_prefix, stamp)
    }
}
