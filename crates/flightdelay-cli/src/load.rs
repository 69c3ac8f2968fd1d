// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use flightdelay_core::{Airport, AirportCode, AirportTable, FlightRecord};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FlightRow {
    #[serde(rename = "DATE")]
    date: String,
    #[serde(rename = "ARRIVAL_TIME")]
    arrival_time: String,
    #[serde(rename = "ORIGIN_AIRPORT")]
    origin: String,
    #[serde(rename = "DESTINATION_AIRPORT")]
    destination: String,
    #[serde(rename = "ARRIVAL_DELAY")]
    arrival_delay: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AirportRow {
    #[serde(rename = "IATA_CODE")]
    code: String,
    #[serde(rename = "AIRPORT")]
    name: String,
    #[serde(rename = "CITY")]
    city: String,
    #[serde(rename = "STATE")]
    state: String,
    #[serde(rename = "LATITUDE")]
    latitude: Option<f64>,
    #[serde(rename = "LONGITUDE")]
    longitude: Option<f64>,
}

/// Accepts `HH:MM:SS`, `HH:MM`, or the compact `HHMM` form (`2400` is midnight).
pub fn parse_arrival_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.contains(':') {
        return NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok();
    }

    if raw.is_empty() || raw.len() > 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = raw.parse().ok()?;
    let (hours, minutes) = (value / 100, value % 100);
    if hours == 24 && minutes == 0 {
        return Some(NaiveTime::MIN);
    }
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

pub fn read_flights<R: Read>(reader: R) -> Result<Vec<FlightRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut flights = Vec::new();
    let mut skipped = 0usize;

    for (index, row) in rdr.deserialize::<FlightRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = row.with_context(|| format!("Malformed flight row on line {}", line))?;

        let Some(arrival_delay) = row.arrival_delay else {
            skipped += 1;
            continue;
        };
        let arrival_time = match parse_arrival_time(&row.arrival_time) {
            Some(t) => t,
            None if row.arrival_time.trim().is_empty() => {
                skipped += 1;
                continue;
            }
            None => {
                return Err(anyhow!(
                    "Invalid arrival time '{}' on line {}",
                    row.arrival_time,
                    line
                ))
            }
        };

        flights.push(FlightRecord {
            date: NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}' on line {}", row.date, line))?,
            arrival_time,
            origin: AirportCode::parse(&row.origin)
                .with_context(|| format!("Bad origin on line {}", line))?,
            destination: AirportCode::parse(&row.destination)
                .with_context(|| format!("Bad destination on line {}", line))?,
            arrival_delay,
        });
    }

    if skipped > 0 {
        log::warn!("Skipped {} flights without an arrival (cancelled or diverted)", skipped);
    }
    log::info!("Loaded {} flights", flights.len());
    Ok(flights)
}

pub fn read_airports<R: Read>(reader: R) -> Result<AirportTable> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut table = AirportTable::new();
    let mut skipped = 0usize;

    for (index, row) in rdr.deserialize::<AirportRow>().enumerate() {
        let line = index + 2;
        let row = row.with_context(|| format!("Malformed airport row on line {}", line))?;

        let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude) else {
            log::debug!("Airport {} has no coordinates, skipping", row.code);
            skipped += 1;
            continue;
        };

        table
            .insert(Airport {
                code: AirportCode::parse(&row.code)
                    .with_context(|| format!("Bad airport code on line {}", line))?,
                name: row.name,
                city: row.city,
                state: row.state,
                latitude,
                longitude,
            })
            .with_context(|| format!("Airport table rejected line {}", line))?;
    }

    if skipped > 0 {
        log::warn!("Skipped {} airports without coordinates", skipped);
    }
    log::info!("Loaded {} airports", table.len());
    Ok(table)
}

pub fn load_flights<P: AsRef<Path>>(path: P) -> Result<Vec<FlightRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open flights file {}", path.display()))?;
    read_flights(file)
}

pub fn load_airports<P: AsRef<Path>>(path: P) -> Result<AirportTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open airports file {}", path.display()))?;
    read_airports(file)
}
