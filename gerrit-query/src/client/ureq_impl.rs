use std::io::Read;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};

use crate::config::Credential;
use crate::error::{Error, Result};

use super::http_trait::{HttpClient, HttpResponse};

/// Blocking HTTP client implementation using ureq.
#[derive(Clone, Debug)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Create a new ureq HTTP client with default settings.
    pub fn new() -> Self {
        Self::with_timeout(30)
    }

    /// Create a new ureq HTTP client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(timeout_secs))
                .build(),
        }
    }

    /// Wrap an already configured agent.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

fn basic_auth(credential: &Credential) -> String {
    let token = general_purpose::STANDARD.encode(format!(
        "{}:{}",
        credential.username(),
        credential.password()
    ));
    format!("Basic {}", token)
}

fn into_http_response(response: ureq::Response) -> Result<HttpResponse> {
    let status = response.status();
    let status_line = format!(
        "{} {} {}",
        response.http_version(),
        status,
        response.status_text()
    );
    // into_string() caps bodies at 10 MB, broad queries exceed that
    let mut body = String::new();
    response
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|e| Error::Transport(format!("failed to read response body: {}", e)))?;

    Ok(HttpResponse {
        status,
        status_line,
        body,
    })
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str, credential: &Credential) -> Result<HttpResponse> {
        let result = self
            .agent
            .get(url)
            .set("Authorization", &basic_auth(credential))
            .call();

        // ureq reports 4xx/5xx as Err(ureq::Error::Status(..)), the caller classifies them
        match result {
            Ok(response) => into_http_response(response),
            Err(ureq::Error::Status(_, response)) => into_http_response(response),
            Err(ureq::Error::Transport(e)) => Err(Error::Transport(e.to_string())),
        }
    }
}
