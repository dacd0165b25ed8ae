use clap::Parser;

#[derive(Parser)]
#[command(name = "course-probe")]
#[command(version, about = "Walks a course-registration API end to end and reports what works")]
pub struct Cli {
    /// API base URL (defaults to http://localhost:5000/api)
    #[arg(short, long, env = "COURSE_PROBE_URL")]
    pub url: Option<String>,
}
