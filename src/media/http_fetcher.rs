use std::time::Duration;

use spdlog::debug;
use ureq::http::StatusCode;
use ureq::Agent;

use crate::media::{FetchError, MediaFetcher};

/// Blocking HTTP downloads with a global timeout and a size cap.
pub struct HttpFetcher {
    agent: Agent,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> HttpFetcher {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        HttpFetcher { agent, max_bytes }
    }
}

impl MediaFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("GET {}", url);
        let response = self.agent
            .get(url)
            .call()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        check_status(response.status())?;

        response.into_body()
            .with_config()
            .limit(self.max_bytes)
            .read_to_vec()
            .map_err(|e| FetchError::Io(e.to_string()))
    }
}

/// Redirects are followed by the agent, so any final status outside 2xx fails.
fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Status(status.as_u16()))
    }
}
