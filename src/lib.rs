#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! linea-ssp - a client for the LIneA Solar System Portal
//!
//! This crate wraps the portal's REST API (asteroids and stellar-occultation
//! predictions) with paginated query helpers, a geographic visibility filter
//! over prediction shadow tracks, and an occultation map renderer.
//!
//! All I/O is synchronous and blocking; pages are fetched strictly
//! sequentially and nothing is cached or retried. Bound a long "fetch all"
//! query with a finite [`Limit`].
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `render` (default) | Occultation map rendering to SVG | `plotters` |
//!
//! # Quick Start Examples
//!
//! ## Query predictions and filter by location
//!
//! ```rust,ignore
//! use linea_ssp::{geofilter, GeoLocation, Limit, PredictionClient};
//!
//! let client = PredictionClient::new();
//!
//! // Everything the portal has for Chariklo, in server order.
//! let predictions = client.by_name(&["chariklo"], Limit::All)?;
//!
//! // Only the events whose shadow track passes within 500 km of Rio.
//! let rio = GeoLocation::new(-22.9068, -43.1729, 500.0);
//! let visible = geofilter(predictions, &rio)?;
//! println!("{} events visible", visible.len());
//! ```
//!
//! ## Typed query parameters
//!
//! ```rust,ignore
//! use chrono::NaiveDate;
//! use linea_ssp::{Limit, PredictionClient, QueryParams};
//!
//! let params = QueryParams::new()
//!     .with_date_range(
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 12, 31).unwrap().and_hms_opt(23, 59, 59).unwrap(),
//!     )
//!     .with_base_dynclass("Centaur")
//!     .with_magnitude_range(8.0, 16.0);
//!
//! let client = PredictionClient::new();
//! let first_hundred = client.get_data(&params, Limit::Count(100))?;
//! ```
//!
//! ## Render occultation maps (feature = "render")
//!
//! ```rust,ignore
//! use linea_ssp::{generate_maps, MapOptions};
//!
//! let options = MapOptions::new("maps/");
//! let files = generate_maps(&visible, &options)?;
//! println!("wrote {} maps", files.len());
//! ```

pub mod api;
pub mod errors;
pub mod geofilter;
pub mod params;
pub mod transport;

#[cfg(feature = "render")]
pub mod map;

pub use api::{AsteroidClient, PredictionClient};
pub use errors::{Error, Result};
pub use geofilter::{geofilter, GeoLocation, EARTH_RADIUS_KM};
pub use params::{normalize_name, Limit, QueryParams};
pub use transport::{Page, Record, Transport, UreqTransport, API_URL, DEFAULT_TIMEOUT, PAGE_SIZE};

#[cfg(feature = "render")]
pub use map::{generate_maps, MapOptions};
