// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width of an IATA airport code.
pub const CODE_LEN: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Invalid airport code '{0}': expected 3 ASCII letters or digits")]
    InvalidCode(String),
    #[error("Malformed route key '{0}': expected ORIGIN-DESTINATION")]
    MalformedRouteKey(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Duplicate airport code: {0}")]
    DuplicateAirport(AirportCode),
    #[error("Airport {0} has invalid coordinates ({1}, {2})")]
    InvalidCoordinates(AirportCode, f64, f64),
}

/// A validated, upper-cased, fixed-width airport code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AirportCode(String);

impl AirportCode {
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let trimmed = raw.trim();
        if trimmed.len() != CODE_LEN || !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(CodeError::InvalidCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AirportCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AirportCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AirportCode> for String {
    fn from(code: AirportCode) -> Self {
        code.0
    }
}

/// Directed origin -> destination pair. `JFK-LAX` and `LAX-JFK` are distinct keys.
///
/// Ordering is lexicographic on (origin, destination), which is the row order of
/// both route projections.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub origin: AirportCode,
    pub destination: AirportCode,
}

impl RouteKey {
    pub fn new(origin: AirportCode, destination: AirportCode) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Parses the `ORIGIN-DESTINATION` text form.
    pub fn parse(text: &str) -> Result<Self, CodeError> {
        let malformed = || CodeError::MalformedRouteKey(text.to_string());
        let (origin, destination) = text.trim().split_once('-').ok_or_else(malformed)?;
        let origin = AirportCode::parse(origin).map_err(|_| malformed())?;
        let destination = AirportCode::parse(destination).map_err(|_| malformed())?;
        Ok(Self::new(origin, destination))
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.destination)
    }
}

impl FromStr for RouteKey {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: AirportCode,
    pub name: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Airport {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// One flight leg as it arrives from the upstream table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub origin: AirportCode,
    pub destination: AirportCode,
    /// Signed minutes; negative means early.
    pub arrival_delay: f64,
}

impl FlightRecord {
    pub fn route_key(&self) -> RouteKey {
        RouteKey::new(self.origin.clone(), self.destination.clone())
    }
}

/// Airport lookup keyed by code. Codes are unique.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    airports: HashMap<AirportCode, Airport>,
}

impl AirportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_airports<I>(airports: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Airport>,
    {
        let mut table = Self::new();
        for airport in airports {
            table.insert(airport)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, airport: Airport) -> Result<(), TableError> {
        if !airport.position().is_valid() {
            return Err(TableError::InvalidCoordinates(
                airport.code,
                airport.latitude,
                airport.longitude,
            ));
        }
        if self.airports.contains_key(&airport.code) {
            return Err(TableError::DuplicateAirport(airport.code));
        }
        self.airports.insert(airport.code.clone(), airport);
        Ok(())
    }

    pub fn get(&self, code: &AirportCode) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}
