pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod reporter;
pub mod scanner;

pub use analyzer::{CourseStats, extract};
pub use config::ProbeConfig;
pub use error::{ProbeError, RunError};
pub use http::HttpClient;
pub use models::{
    AuthMode, Endpoint, Field, HttpMethod, Outcome, ProbeBody, ProbeResult, RunReport, Session,
};
pub use reporter::ConsoleReporter;
pub use scanner::{ProbeRunner, ProbeStep, RunEnd, default_plan, discovery_plan, summarize};
