// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Route aggregation.
//!
//! Flights are grouped by directed [`RouteKey`] into a sorted accumulator map,
//! then each group is joined against the airport table twice: once on the
//! origin code and once on the destination code. A route is only emitted when
//! both joins succeed, so the origin and destination projections always have
//! the same length and the same key at every row.

use crate::model::{Airport, AirportTable, FlightRecord, RouteKey};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
struct DelayAccumulator {
    sum: f64,
    count: usize,
}

impl DelayAccumulator {
    fn push(&mut self, delay: f64) {
        self.sum += delay;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Mean arrival delay of one directed route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteStats {
    pub mean_arrival_delay: f64,
    pub flight_count: usize,
}

/// One row of a projection: the route, the airport on this side, and the
/// route's mean delay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEndpoint {
    pub key: RouteKey,
    pub airport: Airport,
    pub mean_arrival_delay: f64,
    pub flight_count: usize,
}

/// Origin-facing and destination-facing views of the same aggregate, row-aligned
/// by [`RouteKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteProjections {
    origins: Vec<RouteEndpoint>,
    destinations: Vec<RouteEndpoint>,
}

impl RouteProjections {
    pub fn origins(&self) -> &[RouteEndpoint] {
        &self.origins
    }

    pub fn destinations(&self) -> &[RouteEndpoint] {
        &self.destinations
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<(&RouteEndpoint, &RouteEndpoint)> {
        Some((self.origins.get(index)?, self.destinations.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouteEndpoint, &RouteEndpoint)> {
        self.origins.iter().zip(self.destinations.iter())
    }
}

/// Groups flights by directed route and averages arrival delay. Keys come back
/// in ascending order.
pub fn group_routes<'a, I>(flights: I) -> BTreeMap<RouteKey, RouteStats>
where
    I: IntoIterator<Item = &'a FlightRecord>,
{
    let mut groups: BTreeMap<RouteKey, DelayAccumulator> = BTreeMap::new();
    for flight in flights {
        groups
            .entry(flight.route_key())
            .or_default()
            .push(flight.arrival_delay);
    }

    groups
        .into_iter()
        .map(|(key, acc)| {
            (
                key,
                RouteStats {
                    mean_arrival_delay: acc.mean(),
                    flight_count: acc.count,
                },
            )
        })
        .collect()
}

/// Aggregates `flights` into row-aligned origin and destination projections.
///
/// Routes whose origin or destination is missing from `airports` are dropped
/// from both projections.
pub fn aggregate_routes<'a, I>(flights: I, airports: &AirportTable) -> RouteProjections
where
    I: IntoIterator<Item = &'a FlightRecord>,
{
    let groups = group_routes(flights);
    let mut projections = RouteProjections {
        origins: Vec::with_capacity(groups.len()),
        destinations: Vec::with_capacity(groups.len()),
    };
    let mut dropped = 0usize;

    for (key, stats) in groups {
        let (Some(origin), Some(destination)) =
            (airports.get(&key.origin), airports.get(&key.destination))
        else {
            log::debug!("Dropping route {}: endpoint missing from airport table", key);
            dropped += 1;
            continue;
        };

        projections.origins.push(RouteEndpoint {
            key: key.clone(),
            airport: origin.clone(),
            mean_arrival_delay: stats.mean_arrival_delay,
            flight_count: stats.flight_count,
        });
        projections.destinations.push(RouteEndpoint {
            key,
            airport: destination.clone(),
            mean_arrival_delay: stats.mean_arrival_delay,
            flight_count: stats.flight_count,
        });
    }

    log::debug!(
        "Aggregated {} routes ({} dropped for unknown airports)",
        projections.len(),
        dropped
    );
    projections
}
