//! Resource clients for the portal's REST API.
//!
//! Each resource (asteroids, predictions) gets a small client struct over a
//! [`Transport`]. Pagination is a fold over the page sequence: every page
//! fetch maps (URL, query) to (records, next locator), and the loop stops
//! when the limit is satisfied or the locator runs out.

use serde_json::Value;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::params::Limit;
use crate::transport::{Record, Transport};

pub mod asteroid;
pub mod prediction;

pub use asteroid::AsteroidClient;
pub use prediction::PredictionClient;

/// Collect records from a paginated resource.
///
/// Issues the initial GET with `query`, then follows each page's `next`
/// locator. With `Limit::Count(n)` the final page is truncated to exactly
/// `n` records and no page past the satisfying one is fetched; with
/// `Limit::All` every page is consumed.
pub(crate) fn paginate<T: Transport>(
    transport: &T,
    url: &str,
    query: &[(String, String)],
    limit: Limit,
) -> Result<Vec<Record>> {
    limit.validate()?;

    let target = match limit {
        Limit::All => None,
        Limit::Count(n) => Some(n),
    };

    let mut page = transport.get_page(url, query)?;
    let mut records: Vec<Record> = Vec::new();

    loop {
        debug!(
            total = page.count,
            fetched = page.results.len(),
            collected = records.len(),
            "page received"
        );
        records.extend(page.results);

        if let Some(n) = target {
            if records.len() >= n {
                records.truncate(n);
                break;
            }
        }

        match page.next {
            Some(next_url) => page = transport.get_page(&next_url, &[])?,
            None => break,
        }
    }

    Ok(records)
}

/// Decode a statistics sub-endpoint body into records.
///
/// Sub-endpoints return either a JSON array of objects or a single object;
/// anything else is a decode failure.
pub(crate) fn records_from_value(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(Error::Decode(format!(
                    "expected a JSON object, got: {other}"
                ))),
            })
            .collect(),
        Value::Object(record) => Ok(vec![record]),
        other => Err(Error::Decode(format!(
            "expected a JSON array or object, got: {other}"
        ))),
    }
}

/// Decode a single-record body (`/{id}/` fetches).
pub(crate) fn record_from_value(value: Value) -> Result<Record> {
    match value {
        Value::Object(record) => Ok(record),
        other => Err(Error::Decode(format!(
            "expected a JSON object, got: {other}"
        ))),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transport::{API_URL, PAGE_SIZE};
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory transport serving a fixed set of records split into pages,
    /// recording every URL it is asked for.
    pub(crate) struct FakePortal {
        pub records: Vec<Record>,
        pub page_size: usize,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakePortal {
        pub fn new(total: usize, page_size: usize) -> Self {
            let records = (0..total)
                .map(|i| {
                    let mut record = Record::new();
                    record.insert("id".to_string(), json!(i));
                    record.insert("name".to_string(), json!(format!("object-{i}")));
                    record
                })
                .collect();
            Self {
                records,
                page_size,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn page_index(&self, url: &str) -> usize {
            url.split("page=")
                .nth(1)
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(1)
        }
    }

    impl Transport for FakePortal {
        fn get_value(&self, url: &str, query: &[(String, String)]) -> Result<Value> {
            let mut full_url = url.to_string();
            for (k, v) in query {
                full_url.push_str(&format!("&{k}={v}"));
            }
            self.calls.lock().unwrap().push(full_url);

            let page = self.page_index(url);
            let start = (page - 1) * self.page_size;
            let end = (start + self.page_size).min(self.records.len());
            let results: Vec<Value> = self.records[start..end]
                .iter()
                .cloned()
                .map(Value::Object)
                .collect();
            let next = if end < self.records.len() {
                json!(format!("{API_URL}/api/test/?page={}", page + 1))
            } else {
                Value::Null
            };
            let previous = if page > 1 {
                json!(format!("{API_URL}/api/test/?page={}", page - 1))
            } else {
                Value::Null
            };
            Ok(json!({
                "count": self.records.len(),
                "next": next,
                "previous": previous,
                "results": results,
            }))
        }
    }

    #[test]
    fn test_paginate_all_returns_every_record_in_order() {
        let portal = FakePortal::new(25, 10);
        let records = paginate(&portal, "http://test/api/test/", &[], Limit::All).unwrap();
        assert_eq!(records.len(), 25);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record["id"], json!(i));
        }
        // 25 records over pages of 10 -> 3 fetches
        assert_eq!(portal.call_count(), 3);
    }

    #[test]
    fn test_paginate_limit_truncates_and_bounds_fetches() {
        let portal = FakePortal::new(25, 10);
        let records =
            paginate(&portal, "http://test/api/test/", &[], Limit::Count(15)).unwrap();
        assert_eq!(records.len(), 15);
        assert_eq!(records[14]["id"], json!(14));
        // ceil(15 / 10) = 2 fetches, never a third
        assert_eq!(portal.call_count(), 2);
    }

    #[test]
    fn test_paginate_limit_larger_than_total_returns_all() {
        let portal = FakePortal::new(7, 10);
        let records =
            paginate(&portal, "http://test/api/test/", &[], Limit::Count(100)).unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(portal.call_count(), 1);
    }

    #[test]
    fn test_paginate_is_idempotent_against_unchanged_backend() {
        let portal = FakePortal::new(12, 5);
        let first = paginate(&portal, "http://test/api/test/", &[], Limit::All).unwrap();
        let second = paginate(&portal, "http://test/api/test/", &[], Limit::All).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_paginate_rejects_zero_limit() {
        let portal = FakePortal::new(5, 5);
        let err =
            paginate(&portal, "http://test/api/test/", &[], Limit::Count(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(portal.call_count(), 0);
    }

    #[test]
    fn test_default_page_size_constant() {
        assert_eq!(PAGE_SIZE, 1000);
    }

    #[test]
    fn test_records_from_value_accepts_array_and_object() {
        let array = json!([{"base_dynclass": "Centaur"}, {"base_dynclass": "KBO"}]);
        assert_eq!(records_from_value(array).unwrap().len(), 2);

        let object = json!({"count": 3510});
        assert_eq!(records_from_value(object).unwrap().len(), 1);

        let scalar = json!(42);
        assert!(matches!(
            records_from_value(scalar).unwrap_err(),
            Error::Decode(_)
        ));
    }

    #[test]
    fn test_record_from_value_rejects_non_object() {
        assert!(record_from_value(json!({"id": 1})).is_ok());
        assert!(matches!(
            record_from_value(json!("nope")).unwrap_err(),
            Error::Decode(_)
        ));
    }

    // Pages are fetched by following the envelope's next locator; make sure
    // the fold consumes an empty result set without looping.
    #[test]
    fn test_paginate_empty_backend() {
        let portal = FakePortal::new(0, 10);
        let records = paginate(&portal, "http://test/api/test/", &[], Limit::All).unwrap();
        assert!(records.is_empty());
        assert_eq!(portal.call_count(), 1);
    }
}
