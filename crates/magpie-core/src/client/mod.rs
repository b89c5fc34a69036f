//! Lookup backend clients
//!
//! - Streaming lookups that drive a decode session to a terminal state
//! - A one-shot fallback for callers that only want the finished record

mod simple;
mod stream;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use thiserror::Error;
use url::Url;

/// Failures surfaced by the transport before any frame is decoded
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("lookup endpoint returned status {0}")]
    Status(StatusCode),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("word cannot be empty")]
    EmptyWord,
}

/// Connection settings for the lookup backend.
///
/// Paths are joined onto `base_url` per request; leading-slash paths replace
/// any path the base carries.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Backend origin, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Path of the one-shot lookup endpoint
    pub lookup_path: String,
    /// Path of the streaming lookup endpoint
    pub stream_path: String,
    /// TCP connect timeout, shared by both paths
    pub connect_timeout: Duration,
    /// Whole-request deadline for the one-shot path. Streaming requests get
    /// no deadline; a stream is allowed to run as long as it produces.
    pub request_timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            lookup_path: "/api/vocabulary/lookup".to_string(),
            stream_path: "/api/vocabulary/lookup/stream".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl LookupConfig {
    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)?.join(path)
    }

    pub(crate) fn lookup_url(&self) -> Result<Url, url::ParseError> {
        self.endpoint(&self.lookup_path)
    }

    pub(crate) fn stream_url(&self) -> Result<Url, url::ParseError> {
        self.endpoint(&self.stream_path)
    }
}

/// Client for the vocabulary lookup backend
pub struct LookupClient {
    http: reqwest::Client,
    config: LookupConfig,
}

impl LookupClient {
    /// Build a client from connection settings.
    pub fn new(config: LookupConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { http, config })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn config(&self) -> &LookupConfig {
        &self.config
    }
}

/// Map non-success statuses to a typed error before touching the body.
pub(crate) fn check_status(response: Response) -> Result<Response, LookupError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(LookupError::Status(response.status()))
    }
}
