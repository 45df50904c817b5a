//! CSV reports for the cleanup commands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::fix::FixedRecord;
use crate::models::{ComplaintRecord, Coordinate};

pub fn google_maps_link(coord: Coordinate) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        coord.latitude, coord.longitude
    )
}

/// Normalize a timestamp to RFC 3339 UTC, leaving unparseable text as-is
pub fn normalize_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).to_rfc3339())
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Debug, Serialize)]
struct OutsideRow<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Location")]
    location: &'a str,
    #[serde(rename = "Status")]
    status: &'a str,
    #[serde(rename = "Submitted At")]
    submitted_at: String,
    #[serde(rename = "Google Maps Link")]
    google_maps_link: String,
}

#[derive(Debug, Serialize)]
struct FixRow<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Title")]
    title: &'a str,
    #[serde(rename = "Old Latitude")]
    old_latitude: f64,
    #[serde(rename = "Old Longitude")]
    old_longitude: f64,
    #[serde(rename = "New Latitude")]
    new_latitude: f64,
    #[serde(rename = "New Longitude")]
    new_longitude: f64,
    #[serde(rename = "Strategy")]
    strategy: String,
    #[serde(rename = "Location")]
    location: &'a str,
}

/// One row per complaint outside the boundary
pub fn write_outside_report<P: AsRef<Path>>(
    path: P,
    rows: &[(&ComplaintRecord, Coordinate)],
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;

    for (record, coord) in rows {
        writer.serialize(OutsideRow {
            id: &record.id,
            title: record.display_title(),
            latitude: coord.latitude,
            longitude: coord.longitude,
            location: record.display_location(),
            status: record.workflow_status.as_deref().unwrap_or("unknown"),
            submitted_at: record
                .submitted_at
                .as_deref()
                .map(normalize_timestamp)
                .unwrap_or_default(),
            google_maps_link: google_maps_link(*coord),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Old and new coordinates of every repaired complaint
pub fn write_fix_report<P: AsRef<Path>>(path: P, fixed: &[FixedRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;

    for f in fixed {
        writer.serialize(FixRow {
            id: &f.id,
            title: &f.title,
            old_latitude: f.old.latitude,
            old_longitude: f.old.longitude,
            new_latitude: f.new.latitude,
            new_longitude: f.new.longitude,
            strategy: f.strategy.to_string(),
            location: &f.location_text,
        })?;
    }

    writer.flush()?;
    Ok(())
}
