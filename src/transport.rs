//! HTTP page fetching.
//!
//! A page fetch is a pure function of (URL, query pairs): it either yields
//! the decoded JSON body or fails. The [`Transport`] trait is the seam that
//! lets the pagination logic run against an in-memory double in tests;
//! [`UreqTransport`] is the blocking production implementation.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::{Error, Result};

/// Base URL of the LIneA Solar System Portal.
pub const API_URL: &str = "https://solarsystem.linea.org.br";

/// Server-fixed page size; not configurable by the client.
pub const PAGE_SIZE: usize = 1000;

/// One asteroid or occultation-prediction entry, as returned by the portal.
pub type Record = serde_json::Map<String, Value>;

/// One paginated response from the portal.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Total number of records matching the query, across all pages.
    pub count: u64,
    /// Locator of the next page, or `None` on the last page.
    pub next: Option<String>,
    /// Locator of the previous page, or `None` on the first page.
    pub previous: Option<String>,
    /// This page's records, in server order.
    pub results: Vec<Record>,
}

impl Page {
    pub(crate) fn from_value(value: Value) -> Result<Page> {
        serde_json::from_value(value)
            .map_err(|e| Error::Decode(format!("malformed page envelope: {e}")))
    }
}

/// Blocking HTTP GET returning decoded JSON.
pub trait Transport {
    /// Issue a GET against `url` with the given query pairs and decode the
    /// body as JSON.
    fn get_value(&self, url: &str, query: &[(String, String)]) -> Result<Value>;

    /// Fetch one page of a paginated resource.
    fn get_page(&self, url: &str, query: &[(String, String)]) -> Result<Page> {
        Page::from_value(self.get_value(url, query)?)
    }
}

/// Default overall timeout per request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Production transport over blocking [`ureq`].
///
/// Holds no connection state of its own; each call owns its full request
/// lifecycle, so a client is safe to share across threads. Every request
/// carries an overall timeout, so a stalled server fails the call instead
/// of hanging a `Limit::All` fetch.
#[derive(Debug, Clone, Copy)]
pub struct UreqTransport {
    timeout: Duration,
}

impl UreqTransport {
    /// Transport with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Transport with a caller-chosen overall timeout per request.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The overall timeout applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get_value(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
        debug!(url, params = query.len(), "portal GET");

        let mut request = ureq::get(url)
            .config()
            .http_status_as_error(false)
            .timeout_global(Some(self.timeout))
            .build();
        for (key, value) in query {
            request = request.query(key, value);
        }

        let mut response = request.call().map_err(|e| Error::Transport {
            status: None,
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response
                .body_mut()
                .read_to_string()
                .unwrap_or_else(|_| String::new());
            return Err(Error::Transport {
                status: Some(status),
                message: body,
            });
        }

        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| Error::Decode(e.to_string()))
    }
}
