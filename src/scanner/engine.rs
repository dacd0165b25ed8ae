use tracing::{debug, info};

use crate::analyzer::{CourseStats, extract_text};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, RunError};
use crate::http::HttpClient;
use crate::models::{AuthMode, Field, ProbeResult, RunReport, Session};

use super::plan::ProbeStep;

/// How a run ended, with the report of everything recorded up to that point.
#[derive(Debug)]
pub enum RunEnd {
    Completed(RunReport),
    Aborted(RunReport, RunError),
    Interrupted(RunReport),
}

impl RunEnd {
    pub fn report(&self) -> &RunReport {
        match self {
            RunEnd::Completed(report) | RunEnd::Interrupted(report) => report,
            RunEnd::Aborted(report, _) => report,
        }
    }
}

/// Runs a plan one probe at a time, carrying session state forward.
pub struct ProbeRunner {
    client: HttpClient,
    session: Session,
    results: Vec<ProbeResult>,
    course_stats: Vec<(String, CourseStats)>,
    failed_sources: Vec<Field>,
}

impl ProbeRunner {
    pub fn new(config: &ProbeConfig) -> Result<Self, RunError> {
        let client = HttpClient::new(config.timeout_secs)?;
        let session = Session::new(config.base_url.as_str()).with_level(config.level.to_string());
        Ok(Self::with_session(client, session))
    }

    fn with_session(client: HttpClient, session: Session) -> Self {
        Self {
            client,
            session,
            results: Vec::new(),
            course_stats: Vec::new(),
            failed_sources: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    /// Executes `plan` in order, handing each result to `on_result` as soon as it lands.
    ///
    /// Only a transport failure on the first probe stops the run; everything
    /// else is recorded and the next probe proceeds. Results recorded so far
    /// stay available through [`ProbeRunner::report`] even if this future is
    /// dropped part way.
    pub async fn run<F>(&mut self, plan: &[ProbeStep], mut on_result: F) -> Result<(), RunError>
    where
        F: FnMut(usize, &ProbeStep, &ProbeResult),
    {
        for (index, step) in plan.iter().enumerate() {
            let result = self.run_step(step).await;
            on_result(index, step, &result);

            let abort = if index == 0 {
                match &result.error {
                    Some(ProbeError::Unreachable { detail }) => Some(RunError::Unreachable {
                        url: self.session.base_url.clone(),
                        detail: detail.clone(),
                    }),
                    _ => None,
                }
            } else {
                None
            };

            self.results.push(result);

            if let Some(err) = abort {
                info!(probe = %step.name(), "liveness probe unreachable, aborting run");
                return Err(err);
            }
        }

        Ok(())
    }

    pub async fn run_step(&mut self, step: &ProbeStep) -> ProbeResult {
        let endpoint = &step.endpoint;

        if let Some(field) = step.only_if_missing {
            if self.session.has(field) {
                debug!(probe = %endpoint.name, %field, "not needed");
                return ProbeResult::skipped(
                    &endpoint.name,
                    endpoint.method,
                    self.url_for(step),
                    format!("not needed, {} already held", field),
                );
            }
        }

        if endpoint.auth == AuthMode::Required
            && !self.session.has(Field::Token)
            && self.failed_sources.contains(&Field::Token)
        {
            return ProbeResult::skipped(
                &endpoint.name,
                endpoint.method,
                self.url_for(step),
                format!("missing {}", Field::Token),
            );
        }

        let mut result = self.client.run_probe(endpoint, &self.session).await;

        if result.is_success() {
            self.apply_captures(step, &mut result);
        }

        if result.is_success() && step.catalog {
            if let Some(stats) = result.body.as_json().and_then(CourseStats::from_body) {
                self.course_stats.push((endpoint.name.clone(), stats));
            }
        }

        if !result.is_success() && result.skipped.is_none() {
            for capture in &step.captures {
                if !self.failed_sources.contains(&capture.field) {
                    self.failed_sources.push(capture.field);
                }
            }
        }

        info!(probe = %endpoint.name, outcome = %result.outcome(), "probe finished");
        result
    }

    fn apply_captures(&mut self, step: &ProbeStep, result: &mut ProbeResult) {
        for capture in &step.captures {
            let paths: Vec<&str> = capture.paths.iter().map(String::as_str).collect();
            match extract_text(result, &paths) {
                Some(value) => {
                    debug!(probe = %step.name(), field = %capture.field, "captured");
                    self.session.set(capture.field, value);
                }
                None => debug!(probe = %step.name(), field = %capture.field, "not present"),
            }
        }

        let shape_error = step
            .expects
            .iter()
            .find_map(|field| {
                let capture = step.capture_for(*field)?;
                let paths: Vec<&str> = capture.paths.iter().map(String::as_str).collect();
                match extract_text(result, &paths) {
                    Some(_) => None,
                    None => Some(capture.paths.first().cloned().unwrap_or_else(|| field.to_string())),
                }
            });

        if let Some(field) = shape_error {
            result.error = Some(ProbeError::Shape { field });
        }
    }

    fn url_for(&self, step: &ProbeStep) -> String {
        format!("{}{}", self.session.base_url, step.endpoint.resolve_path(&self.session))
    }

    /// Summary of everything recorded so far, with course statistics attached.
    pub fn report(&self) -> RunReport {
        summarize(&self.results).with_course_stats(self.course_stats.clone())
    }

    /// Runs `plan` until it finishes or `stop` resolves, whichever comes first.
    ///
    /// When `stop` wins, the probe in flight is abandoned and the report is
    /// marked interrupted.
    pub async fn run_until<F, S>(&mut self, plan: &[ProbeStep], on_result: F, stop: S) -> RunEnd
    where
        F: FnMut(usize, &ProbeStep, &ProbeResult),
        S: Future<Output = ()>,
    {
        let outcome = tokio::select! {
            res = self.run(plan, on_result) => Some(res),
            _ = stop => None,
        };

        let mut report = self.report();
        match outcome {
            Some(Ok(())) => RunEnd::Completed(report),
            Some(Err(err)) => RunEnd::Aborted(report, err),
            None => {
                info!(recorded = report.total(), "run interrupted");
                report.interrupted = true;
                RunEnd::Interrupted(report)
            }
        }
    }
}

pub fn summarize(results: &[ProbeResult]) -> RunReport {
    RunReport::from_results(results)
}
