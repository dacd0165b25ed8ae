use reqwest::{Client, Method, RequestBuilder, header};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::RunError;
use crate::models::{Endpoint, HttpMethod, ProbeBody, ProbeResult, Session};

pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, RunError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(false)
            .build()?;

        Ok(Self { client })
    }

    /// Issues one probe against `session.base_url`.
    ///
    /// Placeholders are filled from the session first; if any cannot be
    /// filled the request is not sent and the result is marked skipped.
    pub async fn run_probe(&self, endpoint: &Endpoint, session: &Session) -> ProbeResult {
        let url = format!("{}{}", session.base_url, endpoint.resolve_path(session));

        if let Some(missing) = endpoint.missing_input(session) {
            debug!(probe = %endpoint.name, %missing, "skipping probe");
            return ProbeResult::skipped(
                &endpoint.name,
                endpoint.method,
                url,
                format!("missing {}", missing),
            );
        }

        let body = endpoint.resolve_body(session);
        let mut request = self
            .client
            .request(Self::to_reqwest_method(endpoint.method), &url)
            .header(header::ACCEPT, "application/json");

        if endpoint.auth.sends_token() {
            if let Some(token) = &session.bearer_token {
                request = request.bearer_auth(token);
            }
        }

        if endpoint.method.requires_body() {
            if let Some(b) = &body {
                request = request.json(b);
            }
        }

        debug!(probe = %endpoint.name, method = %endpoint.method, %url, "sending probe");
        let result = self.execute_request(endpoint, &url, request).await;
        result.with_request_body(body)
    }

    async fn execute_request(
        &self,
        endpoint: &Endpoint,
        url: &str,
        request: RequestBuilder,
    ) -> ProbeResult {
        let start = Instant::now();

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let content_type = response
                    .headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);

                let bytes = match response.bytes().await {
                    Ok(b) => b,
                    Err(e) => {
                        warn!(probe = %endpoint.name, error = %e, "failed to read response body");
                        return ProbeResult::unreachable(
                            &endpoint.name,
                            endpoint.method,
                            url,
                            e.to_string(),
                        );
                    }
                };

                let body = ProbeBody::parse(&bytes, content_type.as_deref());
                let duration_ms = start.elapsed().as_millis() as u64;
                debug!(probe = %endpoint.name, status, duration_ms, "probe answered");

                ProbeResult::new(&endpoint.name, endpoint.method, url, status, body, duration_ms)
            }
            Err(e) => {
                warn!(probe = %endpoint.name, %url, error = %e, "probe unreachable");
                let mut result =
                    ProbeResult::unreachable(&endpoint.name, endpoint.method, url, Self::describe(&e));
                result.duration_ms = start.elapsed().as_millis() as u64;
                result
            }
        }
    }

    fn describe(err: &reqwest::Error) -> String {
        if err.is_timeout() {
            "timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        }
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}
