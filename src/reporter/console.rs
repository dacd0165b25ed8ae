use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

use crate::analyzer::{CourseStats, extract_text};
use crate::models::{Outcome, ProbeBody, ProbeResult, RunReport};
use crate::scanner::ProbeStep;

const RULE_WIDTH: usize = 60;
const TOKEN_PREVIEW: usize = 50;

pub struct ConsoleReporter;

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Probe")]
    probe: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_banner(&self, base_url: &str, started: &str) {
        println!("{}", "=".repeat(RULE_WIDTH).purple());
        println!("{}", "   COURSE REGISTRATION API PROBE   ".bold());
        println!("{}", "=".repeat(RULE_WIDTH).purple());
        println!("Started:  {}", started.cyan());
        println!("Base URL: {}", base_url.cyan());
    }

    pub fn print_probe(&self, index: usize, step: &ProbeStep, result: &ProbeResult) {
        println!("\n{}", "=".repeat(RULE_WIDTH).cyan());
        println!(
            " {}. {}  {}",
            index + 1,
            step.name().bold(),
            step.endpoint.display_path().dimmed()
        );
        println!("{}", "=".repeat(RULE_WIDTH).cyan());

        if let Some(reason) = &result.skipped {
            println!("{} {}", "Skipped:".yellow(), reason);
            return;
        }

        if let Some(request) = &result.request_body {
            println!("{}", "Request:".blue());
            println!("{}", pretty(request));
        }

        match (result.status, result.outcome()) {
            (None, outcome) => println!("{} {}", "✗".red(), outcome.to_string().red()),
            (Some(status), Outcome::Success) => println!(
                "{} Status: {} ({} ms)",
                "✓".green(),
                status.to_string().green(),
                result.duration_ms
            ),
            (Some(status), outcome) => println!(
                "{} Status: {} ({})",
                "✗".red(),
                status.to_string().red(),
                outcome.to_string().yellow()
            ),
        }

        if step.catalog && result.is_success() {
            match result.body.as_json().and_then(CourseStats::from_body) {
                Some(stats) => self.print_course_stats(&stats),
                None => self.print_body(&result.body),
            }
        } else {
            self.print_body(&result.body);
        }

        if let Some(token) = received_token(result) {
            println!("{} {}...", "Token received:".green(), preview(&token));
        }
    }

    fn print_body(&self, body: &ProbeBody) {
        match body {
            ProbeBody::Json(value) => {
                println!("{}", "Response:".blue());
                println!("{}", pretty(value));
            }
            ProbeBody::Text(text) => println!("{} {}", "Response:".blue(), text.trim()),
            ProbeBody::Empty => {}
        }
    }

    fn print_course_stats(&self, stats: &CourseStats) {
        if stats.is_empty() {
            println!("{}", "No courses found".yellow());
            return;
        }

        println!("Found {} courses, {} credit units", stats.total, stats.total_credits);

        println!("{}", "By level:".cyan());
        for (level, count) in &stats.by_level {
            println!("   {} level: {}", level, count);
        }
        println!("{}", "By semester:".cyan());
        for (semester, count) in &stats.by_semester {
            println!("   semester {}: {}", semester, count);
        }

        println!("{}", "Sample courses:".cyan());
        for (i, course) in stats.samples.iter().enumerate() {
            println!("   {}. {}: {}", i + 1, course.code, course.name);
            println!(
                "      {}",
                format!("Credits: {} | Semester: {}", course.credits, course.semester).dimmed()
            );
        }
    }

    pub fn print_summary(&self, report: &RunReport) {
        let rows: Vec<TableRow> = report
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| TableRow {
                index: i + 1,
                probe: entry.name.clone(),
                status: entry
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                items: entry
                    .items
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                outcome: match &entry.outcome {
                    Outcome::Success => entry.outcome.to_string().green().to_string(),
                    Outcome::Failure(_) => entry.outcome.to_string().red().to_string(),
                    Outcome::Skipped(_) => entry.outcome.to_string().yellow().to_string(),
                },
            })
            .collect();

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();

        println!("\n{}", "Summary".bold().underline());
        if report.interrupted {
            println!("{}", "Run interrupted, partial results below".yellow());
        }
        println!("{}", table);

        println!(
            "{} probes: {} {}, {} {}, {} {}",
            report.total(),
            report.success_count,
            "ok".green(),
            report.failure_count,
            "failed".red(),
            report.skipped_count,
            "skipped".yellow()
        );

        for (name, stats) in &report.course_stats {
            println!(
                "  {}: {} courses, {} credit units",
                name, stats.total, stats.total_credits
            );
        }
        println!();
    }

    pub fn print_abort(&self, message: &str) {
        println!("\n{} {}", "Aborting:".red().bold(), message);
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn received_token(result: &ProbeResult) -> Option<String> {
    if !result.is_success() {
        return None;
    }
    extract_text(result, &["token", "data.token"])
}

fn preview(token: &str) -> &str {
    match token.char_indices().nth(TOKEN_PREVIEW) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}
