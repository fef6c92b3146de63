//! Query parameters and result limits for portal queries.
//!
//! The portal accepts a closed set of query options; [`QueryParams`]
//! enumerates them as typed fields and serializes only the ones that are
//! set. Server-specific extensions go through the explicit [`QueryParams::extra`]
//! channel and are passed through unvalidated.

use chrono::NaiveDateTime;

use crate::errors::{Error, Result};

/// Maximum number of records to collect from a paginated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Follow pagination until the server reports no further page.
    All,
    /// Stop after exactly this many records (must be positive).
    Count(usize),
}

impl Limit {
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Limit::Count(0) => Err(Error::InvalidArgument(
                "limit must be a positive number of records".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl From<usize> for Limit {
    fn from(n: usize) -> Self {
        Limit::Count(n)
    }
}

impl From<Option<usize>> for Limit {
    fn from(n: Option<usize>) -> Self {
        match n {
            Some(n) => Limit::Count(n),
            None => Limit::All,
        }
    }
}

/// Query options recognized by the asteroid and prediction resources.
///
/// All fields are optional; unset fields are omitted from the request.
/// List-valued options are comma-joined on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Keep events at or after this instant (UTC).
    pub date_time_after: Option<NaiveDateTime>,
    /// Keep events before this instant (UTC).
    pub date_time_before: Option<NaiveDateTime>,
    /// Minimum target-star magnitude.
    pub magnitude_min: Option<f64>,
    /// Maximum target-star magnitude.
    pub magnitude_max: Option<f64>,
    /// Minimum object diameter in kilometers.
    pub diameter_min: Option<f64>,
    /// Maximum object diameter in kilometers.
    pub diameter_max: Option<f64>,
    /// Dynamical class filter (e.g. `Centaur`, `KBO`).
    pub base_dynclass: Vec<String>,
    /// Dynamical subclass filter (e.g. `KBO>Resonant>3:2`).
    pub dynclass: Vec<String>,
    /// Object names; normalized with [`normalize_name`] before sending.
    pub name: Vec<String>,
    /// Object numbers.
    pub number: Vec<String>,
    /// Server-side geographic pre-filter: observer latitude in degrees.
    pub latitude: Option<f64>,
    /// Server-side geographic pre-filter: observer longitude in degrees.
    pub longitude: Option<f64>,
    /// Server-side geographic pre-filter: visibility radius in kilometers.
    pub location_radius: Option<f64>,
    /// Prediction job identifier.
    pub job_id: Option<u64>,
    /// Prediction hash identifier.
    pub hash_id: Option<String>,
    /// Passthrough for options this client does not enumerate.
    pub extra: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, after: NaiveDateTime, before: NaiveDateTime) -> Self {
        self.date_time_after = Some(after);
        self.date_time_before = Some(before);
        self
    }

    pub fn with_magnitude_range(mut self, min: f64, max: f64) -> Self {
        self.magnitude_min = Some(min);
        self.magnitude_max = Some(max);
        self
    }

    pub fn with_diameter_range(mut self, min: f64, max: f64) -> Self {
        self.diameter_min = Some(min);
        self.diameter_max = Some(max);
        self
    }

    pub fn with_base_dynclass(mut self, class: &str) -> Self {
        self.base_dynclass.push(class.to_string());
        self
    }

    pub fn with_dynclass(mut self, class: &str) -> Self {
        self.dynclass.push(class.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name.push(name.to_string());
        self
    }

    pub fn with_number(mut self, number: &str) -> Self {
        self.number.push(number.to_string());
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64, radius_km: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.location_radius = Some(radius_km);
        self
    }

    pub fn with_job_id(mut self, job_id: u64) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn with_hash_id(mut self, hash_id: &str) -> Self {
        self.hash_id = Some(hash_id.to_string());
        self
    }

    /// Add a passthrough option the client does not validate.
    pub fn with_extra(mut self, key: &str, value: &str) -> Self {
        self.extra.push((key.to_string(), value.to_string()));
        self
    }

    /// Serialize the set options to query-string key/value pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(after) = self.date_time_after {
            pairs.push((
                "date_time_after".to_string(),
                after.format("%Y-%m-%dT%H:%M:%S").to_string(),
            ));
        }
        if let Some(before) = self.date_time_before {
            pairs.push((
                "date_time_before".to_string(),
                before.format("%Y-%m-%dT%H:%M:%S").to_string(),
            ));
        }
        push_float(&mut pairs, "magnitude_min", self.magnitude_min);
        push_float(&mut pairs, "magnitude_max", self.magnitude_max);
        push_float(&mut pairs, "diameter_min", self.diameter_min);
        push_float(&mut pairs, "diameter_max", self.diameter_max);
        push_list(&mut pairs, "base_dynclass", &self.base_dynclass);
        push_list(&mut pairs, "dynclass", &self.dynclass);
        if !self.name.is_empty() {
            pairs.push(("name".to_string(), join_names(&self.name)));
        }
        push_list(&mut pairs, "number", &self.number);
        push_float(&mut pairs, "latitude", self.latitude);
        push_float(&mut pairs, "longitude", self.longitude);
        push_float(&mut pairs, "location_radius", self.location_radius);
        if let Some(job_id) = self.job_id {
            pairs.push(("job_id".to_string(), job_id.to_string()));
        }
        if let Some(hash_id) = &self.hash_id {
            pairs.push(("hash_id".to_string(), hash_id.clone()));
        }
        for (key, value) in &self.extra {
            pairs.push((key.clone(), value.clone()));
        }

        pairs
    }
}

fn push_float(pairs: &mut Vec<(String, String)>, key: &str, value: Option<f64>) {
    if let Some(value) = value {
        pairs.push((key.to_string(), value.to_string()));
    }
}

fn push_list(pairs: &mut Vec<(String, String)>, key: &str, values: &[String]) {
    if !values.is_empty() {
        pairs.push((key.to_string(), values.join(",")));
    }
}

/// Normalize an object name to the portal's naming convention.
///
/// Plain names are lower-cased with the first letter capitalized
/// (`"chariklo"` -> `"Chariklo"`); provisional designations starting with a
/// digit are fully upper-cased (`"2002 ms4"` -> `"2002 MS4"`).
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() => lowered.to_uppercase(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Comma-join a list of names after normalizing each entry.
///
/// Entries that are already comma-joined are split first, so every
/// individual name gets normalized.
pub(crate) fn join_names(names: &[String]) -> String {
    names
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(normalize_name)
        .collect::<Vec<_>>()
        .join(",")
}
