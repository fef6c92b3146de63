//! Asteroid resource client (`/api/asteroids/`).

use crate::api::{paginate, record_from_value, records_from_value};
use crate::errors::{Error, Result};
use crate::params::{join_names, normalize_name, Limit, QueryParams};
use crate::transport::{Record, Transport, UreqTransport, API_URL};

const ENDPOINT: &str = "/api/asteroids/";

/// Client for the portal's asteroid resource.
///
/// Stateless: every call issues its own request(s); nothing is cached
/// between calls.
#[derive(Debug, Clone)]
pub struct AsteroidClient<T: Transport = UreqTransport> {
    base_url: String,
    transport: T,
}

impl AsteroidClient<UreqTransport> {
    /// Client against the public portal.
    pub fn new() -> Self {
        Self::with_base_url(API_URL)
    }

    /// Client against an alternative portal deployment.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl Default for AsteroidClient<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> AsteroidClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    fn resource_url(&self) -> String {
        format!("{}{ENDPOINT}", self.base_url)
    }

    fn sub_url(&self, sub: &str) -> String {
        format!("{}{ENDPOINT}{sub}/", self.base_url)
    }

    /// Query asteroids, following pagination until `limit` is satisfied.
    pub fn get_data(&self, params: &QueryParams, limit: Limit) -> Result<Vec<Record>> {
        paginate(
            &self.transport,
            &self.resource_url(),
            &params.to_query_pairs(),
            limit,
        )
    }

    /// Query asteroids by name(s); multiple names are comma-joined.
    pub fn by_name(&self, names: &[&str], limit: Limit) -> Result<Vec<Record>> {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        let query = vec![("name".to_string(), join_names(&names))];
        paginate(&self.transport, &self.resource_url(), &query, limit)
    }

    /// Fetch a single asteroid by its portal id.
    pub fn by_id(&self, id: u64) -> Result<Record> {
        let url = format!("{}{ENDPOINT}{id}/", self.base_url);
        record_from_value(self.transport.get_value(&url, &[])?)
    }

    /// Dynamical classes known to the portal.
    pub fn dynamical_classes(&self) -> Result<Vec<Record>> {
        records_from_value(self.transport.get_value(&self.sub_url("base_dynclasses"), &[])?)
    }

    /// Dynamical subclasses known to the portal.
    pub fn dynamical_subclasses(&self) -> Result<Vec<Record>> {
        records_from_value(self.transport.get_value(&self.sub_url("dynclasses"), &[])?)
    }

    /// Total asteroid count statistics.
    pub fn count(&self) -> Result<Vec<Record>> {
        records_from_value(self.transport.get_value(&self.sub_url("count"), &[])?)
    }

    /// Prediction summary for a named asteroid.
    ///
    /// The sub-endpoint accepts a single name; callers with several objects
    /// should query each one in turn.
    pub fn with_prediction(&self, name: &str) -> Result<Vec<Record>> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "with_prediction requires an asteroid name".to_string(),
            ));
        }
        let query = vec![("name".to_string(), normalize_name(name))];
        records_from_value(
            self.transport
                .get_value(&self.sub_url("with_prediction"), &query)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::FakePortal;

    #[test]
    fn test_by_name_normalizes_and_joins() {
        let portal = FakePortal::new(3, 10);
        let client = AsteroidClient::with_transport(API_URL, portal);
        client.by_name(&["chariklo", "2002 ms4"], Limit::All).unwrap();

        let calls = client.transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("https://solarsystem.linea.org.br/api/asteroids/"));
        assert!(calls[0].contains("name=Chariklo,2002 MS4"));
    }

    #[test]
    fn test_with_prediction_requires_a_name() {
        let portal = FakePortal::new(0, 10);
        let client = AsteroidClient::with_transport(API_URL, portal);
        let err = client.with_prediction("  ").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(client.transport.call_count(), 0);
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let portal = FakePortal::new(1, 10);
        let client = AsteroidClient::with_transport("http://localhost:8000/", portal);
        client.get_data(&QueryParams::new(), Limit::All).unwrap();
        let calls = client.transport.calls.lock().unwrap();
        assert!(calls[0].starts_with("http://localhost:8000/api/asteroids/"));
    }
}
