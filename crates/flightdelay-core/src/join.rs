// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::model::{Airport, AirportCode, AirportTable, FlightRecord};
use std::collections::HashMap;

/// A flight with both endpoints left-joined against the airport table.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedFlight {
    pub flight: FlightRecord,
    pub origin: Option<Airport>,
    pub destination: Option<Airport>,
    /// Share of the origin airport's flights arriving late, in percent.
    pub percentage_delayed: f64,
}

/// Read-only flight x airport view shared by both renderers.
#[derive(Debug, Clone, Default)]
pub struct JoinedView {
    rows: Vec<JoinedFlight>,
}

impl JoinedView {
    /// Wraps rows that were joined upstream.
    pub fn from_rows(rows: Vec<JoinedFlight>) -> Self {
        Self { rows }
    }

    /// Joins every flight against `airports` on both endpoints and attaches the
    /// per-origin delayed percentage. Unknown codes leave the side empty.
    pub fn build(
        flights: &[FlightRecord],
        airports: &AirportTable,
        threshold_minutes: f64,
    ) -> Self {
        let percentages = percentage_delayed_by_origin(flights, threshold_minutes);

        let rows: Vec<JoinedFlight> = flights
            .iter()
            .map(|flight| JoinedFlight {
                origin: airports.get(&flight.origin).cloned(),
                destination: airports.get(&flight.destination).cloned(),
                percentage_delayed: percentages.get(&flight.origin).copied().unwrap_or(0.0),
                flight: flight.clone(),
            })
            .collect();

        let unmatched = rows
            .iter()
            .filter(|r| r.origin.is_none() || r.destination.is_none())
            .count();
        if unmatched > 0 {
            log::debug!(
                "Joined view has {} of {} rows with an unknown endpoint airport",
                unmatched,
                rows.len()
            );
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[JoinedFlight] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Percent of each origin's flights with an arrival delay strictly above
/// `threshold_minutes`.
pub fn percentage_delayed_by_origin(
    flights: &[FlightRecord],
    threshold_minutes: f64,
) -> HashMap<AirportCode, f64> {
    let mut counts: HashMap<&AirportCode, (usize, usize)> = HashMap::new();
    for flight in flights {
        let entry = counts.entry(&flight.origin).or_insert((0, 0));
        entry.1 += 1;
        if flight.arrival_delay > threshold_minutes {
            entry.0 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(code, (delayed, total))| (code.clone(), delayed as f64 * 100.0 / total as f64))
        .collect()
}
