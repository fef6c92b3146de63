//! Occultation map rendering (feature `render`).
//!
//! Writes one SVG per prediction record: the shadow track plotted over a
//! longitude/latitude grid, with an uncertainty band when the record carries
//! one. Rendering options are an explicit typed structure rather than
//! free-form passthrough arguments.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::warn;

use crate::errors::{Error, Result};
use crate::geofilter::{record_path, EARTH_RADIUS_KM};
use crate::transport::Record;

/// Kilometers per degree of great-circle arc.
const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Rendering options for [`generate_maps`].
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Directory the image artifacts are written into (created if missing).
    pub output_dir: PathBuf,
    /// Image size in pixels (width, height).
    pub size: (u32, u32),
    /// Shadow track color.
    pub line_color: RGBColor,
    /// Track vertex marker color.
    pub point_color: RGBColor,
    /// Uncertainty band color.
    pub error_color: RGBColor,
    /// Degrees of padding around the track's bounding box.
    pub margin_deg: f64,
    /// Draw the meridian/parallel mesh.
    pub mesh: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            size: (1024, 768),
            line_color: RGBColor(0x00, 0x46, 0x8d),
            point_color: RGBColor(0x00, 0x46, 0x8d),
            error_color: RGBColor(0xd3, 0x2f, 0x2f),
            margin_deg: 5.0,
            mesh: true,
        }
    }
}

impl MapOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

/// Render one map per record into `options.output_dir`.
///
/// Returns the paths of the written images, in record order. Records
/// without a drawable track (fewer than two path points) are skipped with a
/// warning; backend and I/O failures abort the batch with
/// [`Error::Render`].
pub fn generate_maps(records: &[Record], options: &MapOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&options.output_dir)
        .map_err(|e| Error::Render(format!("creating {:?}: {e}", options.output_dir)))?;

    let mut written = Vec::new();
    for record in records {
        let name = field_str(record, "name").unwrap_or("unnamed");
        let path = match record_path(record) {
            Some(path) if path.len() >= 2 => path,
            _ => {
                warn!(name, "skipping record without a drawable path");
                continue;
            }
        };

        let file = options.output_dir.join(map_filename(record));
        render_track(record, &path, &file, options)?;
        written.push(file);
    }
    Ok(written)
}

fn render_track(
    record: &Record,
    path: &[(f64, f64)],
    file: &Path,
    options: &MapOptions,
) -> Result<()> {
    let uncertainty_deg = uncertainty_km(record).map(|km| km / KM_PER_DEGREE);
    let pad = options.margin_deg + uncertainty_deg.unwrap_or(0.0);

    let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(lat, lon) in path {
        lat_min = lat_min.min(lat);
        lat_max = lat_max.max(lat);
        lon_min = lon_min.min(lon);
        lon_max = lon_max.max(lon);
    }

    let caption = match field_str(record, "date_time") {
        Some(date_time) => format!(
            "{} - {date_time}",
            field_str(record, "name").unwrap_or("unnamed")
        ),
        None => field_str(record, "name").unwrap_or("unnamed").to_string(),
    };

    let root = SVGBackend::new(file, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lon_min - pad..lon_max + pad, lat_min - pad..lat_max + pad)
        .map_err(render_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Longitude (deg)").y_desc("Latitude (deg)");
    if !options.mesh {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(render_err)?;

    // Uncertainty band: the track shifted by the cross-track uncertainty,
    // drawn under the center line.
    if let Some(offset) = uncertainty_deg {
        for sign in [-1.0, 1.0] {
            chart
                .draw_series(LineSeries::new(
                    path.iter().map(|&(lat, lon)| (lon, lat + sign * offset)),
                    options.error_color.stroke_width(1),
                ))
                .map_err(render_err)?;
        }
    }

    chart
        .draw_series(LineSeries::new(
            path.iter().map(|&(lat, lon)| (lon, lat)),
            options.line_color.stroke_width(2),
        ))
        .map_err(render_err)?;
    chart
        .draw_series(
            path.iter()
                .map(|&(lat, lon)| Circle::new((lon, lat), 2, options.point_color.filled())),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

fn field_str<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(|v| v.as_str())
}

/// Cross-track uncertainty in km, when the record carries one.
fn uncertainty_km(record: &Record) -> Option<f64> {
    record
        .get("closest_approach_uncertainty_km")
        .or_else(|| record.get("closest_approach_uncertainty"))
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Image filename derived from the record's identity fields.
fn map_filename(record: &Record) -> String {
    let name = field_str(record, "name").unwrap_or("unnamed");
    let stem = match field_str(record, "date_time") {
        Some(date_time) => format!("{name}_{date_time}"),
        None => name.to_string(),
    };
    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{sanitized}.svg")
}
