//! Occultation-prediction resource client (`/api/predictions/`).

use crate::api::{paginate, record_from_value, records_from_value};
use crate::errors::Result;
use crate::params::{Limit, QueryParams};
use crate::transport::{Record, Transport, UreqTransport, API_URL};

const ENDPOINT: &str = "/api/predictions/";

// The API still returns the legacy key; rename until the server is fixed.
const LEGACY_DESIGNATION_KEY: &str = "principal_designation";
const DESIGNATION_KEY: &str = "provisional_designation";

/// Client for the portal's occultation-prediction resource.
#[derive(Debug, Clone)]
pub struct PredictionClient<T: Transport = UreqTransport> {
    base_url: String,
    transport: T,
}

impl PredictionClient<UreqTransport> {
    /// Client against the public portal.
    pub fn new() -> Self {
        Self::with_base_url(API_URL)
    }

    /// Client against an alternative portal deployment.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl Default for PredictionClient<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> PredictionClient<T> {
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

    /// Query predictions, following pagination until `limit` is satisfied.
    pub fn get_data(&self, params: &QueryParams, limit: Limit) -> Result<Vec<Record>> {
        let mut records = paginate(
            &self.transport,
            &self.resource_url(),
            &params.to_query_pairs(),
            limit,
        )?;
        for record in &mut records {
            rename_key(record, LEGACY_DESIGNATION_KEY, DESIGNATION_KEY);
        }
        Ok(records)
    }

    /// Query predictions by object name(s); multiple names are comma-joined.
    pub fn by_name(&self, names: &[&str], limit: Limit) -> Result<Vec<Record>> {
        let params = QueryParams {
            name: names.iter().map(|n| n.to_string()).collect(),
            ..QueryParams::default()
        };
        self.get_data(&params, limit)
    }

    /// Fetch a single prediction by its portal id.
    pub fn by_id(&self, id: u64) -> Result<Record> {
        let url = format!("{}{ENDPOINT}{id}/", self.base_url);
        let mut record = record_from_value(self.transport.get_value(&url, &[])?)?;
        rename_key(&mut record, LEGACY_DESIGNATION_KEY, DESIGNATION_KEY);
        Ok(record)
    }

    /// Distinct asteroids that have at least one prediction.
    pub fn asteroids_with_prediction(&self) -> Result<Vec<Record>> {
        records_from_value(
            self.transport
                .get_value(&self.sub_url("asteroids_with_prediction"), &[])?,
        )
    }

    /// Dynamical classes that have at least one prediction.
    pub fn dynamical_classes_with_prediction(&self) -> Result<Vec<Record>> {
        records_from_value(
            self.transport
                .get_value(&self.sub_url("base_dynclass_with_prediction"), &[])?,
        )
    }

    /// Dynamical subclasses that have at least one prediction.
    pub fn dynamical_subclasses_with_prediction(&self) -> Result<Vec<Record>> {
        records_from_value(
            self.transport
                .get_value(&self.sub_url("dynclass_with_prediction"), &[])?,
        )
    }
}

/// Rename `old` to `new` in place, keeping the field's position.
fn rename_key(record: &mut Record, old: &str, new: &str) {
    if !record.contains_key(old) {
        return;
    }
    let renamed: Record = record
        .iter()
        .map(|(key, value)| {
            if key == old {
                (new.to_string(), value.clone())
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect();
    *record = renamed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::FakePortal;
    use crate::errors::Error;
    use crate::transport::Transport;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[test]
    fn test_rename_key_preserves_field_order() {
        let mut record = Record::new();
        record.insert("name".to_string(), json!("Chariklo"));
        record.insert("principal_designation".to_string(), json!("1997 CU26"));
        record.insert("diameter".to_string(), json!(302.0));

        rename_key(&mut record, LEGACY_DESIGNATION_KEY, DESIGNATION_KEY);

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["name", "provisional_designation", "diameter"]);
        assert_eq!(record["provisional_designation"], json!("1997 CU26"));
        assert!(!record.contains_key("principal_designation"));
    }

    #[test]
    fn test_rename_key_noop_when_absent() {
        let mut record = Record::new();
        record.insert("name".to_string(), json!("Quaoar"));
        rename_key(&mut record, LEGACY_DESIGNATION_KEY, DESIGNATION_KEY);
        assert_eq!(record.keys().count(), 1);
    }

    /// Backend with 37 Chariklo predictions on a single page.
    struct CharikloPortal {
        calls: Mutex<usize>,
    }

    impl Transport for CharikloPortal {
        fn get_value(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
            *self.calls.lock().unwrap() += 1;
            assert!(url.contains("/api/predictions/"));
            assert_eq!(query.len(), 1);
            assert_eq!(query[0], ("name".to_string(), "Chariklo".to_string()));

            let results: Vec<Value> = (0..37)
                .map(|i| {
                    json!({
                        "name": "Chariklo",
                        "principal_designation": "1997 CU26",
                        "event": i,
                    })
                })
                .collect();
            Ok(json!({
                "count": 37,
                "next": null,
                "previous": null,
                "results": results,
            }))
        }
    }

    #[test]
    fn test_by_name_chariklo_returns_all_records_in_order() {
        let client = PredictionClient::with_transport(
            API_URL,
            CharikloPortal {
                calls: Mutex::new(0),
            },
        );
        let records = client.by_name(&["chariklo"], Limit::All).unwrap();

        assert_eq!(records.len(), 37);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record["event"], json!(i));
            assert_eq!(record["name"], json!("Chariklo"));
            // legacy designation key is normalized on the way out
            assert_eq!(record["provisional_designation"], json!("1997 CU26"));
        }
        assert_eq!(*client.transport.calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_get_data_rejects_zero_limit_before_any_call() {
        let portal = FakePortal::new(5, 5);
        let client = PredictionClient::with_transport(API_URL, portal);
        let err = client
            .get_data(&QueryParams::new(), Limit::Count(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(client.transport.call_count(), 0);
    }
}
