//! Blocking HTTP implementation of [`Backend`].

#![allow(missing_docs)]

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use super::{AggregateStats, Backend, FeedItem, SimulationCommand, SimulationStatus};
use crate::core::config::BackendConfig;
use crate::core::errors::{HecError, Result};

/// Backend reached over plain HTTP with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for the configured base address.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Self::with_timeout(&config.base_url, config.request_timeout())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("hec-overseer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| HecError::Runtime {
                details: format!("failed to build HTTP client: {error}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|error| HecError::from_transport(&url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HecError::HttpStatus {
                endpoint: url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|error| HecError::from_transport(&url, &error))?;
        serde_json::from_str(&body).map_err(|error| HecError::MalformedResponse {
            endpoint: url,
            details: error.to_string(),
        })
    }
}

impl Backend for HttpBackend {
    fn fetch_stats(&self) -> Result<AggregateStats> {
        self.get_json("/stats")
    }

    fn fetch_feed(&self, limit: usize) -> Result<Vec<FeedItem>> {
        self.get_json(&format!("/feed?limit={limit}"))
    }

    fn fetch_status(&self) -> Result<SimulationStatus> {
        self.get_json("/simulation/status")
    }

    fn send_command(&self, command: SimulationCommand) -> Result<()> {
        let url = self.url(command.path());
        let response = self
            .client
            .post(&url)
            .send()
            .map_err(|error| HecError::Command {
                command: command.as_str(),
                details: HecError::from_transport(&url, &error).to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HecError::Command {
                command: command.as_str(),
                details: format!("{url} answered with HTTP {}", status.as_u16()),
            })
        }
    }
}
