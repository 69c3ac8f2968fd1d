// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Regression tests for route aggregation: directed grouping, per-route means,
// and the row alignment between the origin and destination projections.

use chrono::{NaiveDate, NaiveTime};
use flightdelay_core::routes::aggregate_routes;
use flightdelay_core::{Airport, AirportCode, AirportTable, FlightRecord, RouteKey};
use std::collections::HashMap;

// --- Mock Helpers ---

fn code(s: &str) -> AirportCode {
    AirportCode::parse(s).unwrap()
}

fn flight(origin: &str, destination: &str, delay: f64) -> FlightRecord {
    FlightRecord {
        date: NaiveDate::from_ymd_opt(2015, 7, 4).unwrap(),
        arrival_time: NaiveTime::from_hms_opt(17, 45, 0).unwrap(),
        origin: code(origin),
        destination: code(destination),
        arrival_delay: delay,
    }
}

fn airport(c: &str, name: &str, lat: f64, lon: f64) -> Airport {
    Airport {
        code: code(c),
        name: name.to_string(),
        city: format!("{} City", c),
        state: "ST".to_string(),
        latitude: lat,
        longitude: lon,
    }
}

fn us_airports() -> AirportTable {
    AirportTable::from_airports([
        airport("JFK", "John F. Kennedy International Airport", 40.64, -73.78),
        airport("LAX", "Los Angeles International Airport", 33.94, -118.41),
        airport("ORD", "Chicago O'Hare International Airport", 41.98, -87.90),
        airport("ATL", "Hartsfield-Jackson Atlanta International Airport", 33.64, -84.43),
        airport("SEA", "Seattle-Tacoma International Airport", 47.45, -122.31),
    ])
    .unwrap()
}

// =====================================================================
// Scenarios
// =====================================================================

#[test]
fn test_two_directed_routes() {
    let flights = vec![
        flight("JFK", "LAX", 10.0),
        flight("JFK", "LAX", 20.0),
        flight("LAX", "JFK", 5.0),
    ];
    let projections = aggregate_routes(&flights, &us_airports());

    assert_eq!(projections.len(), 2);

    let (o0, d0) = projections.get(0).unwrap();
    assert_eq!(o0.key, RouteKey::parse("JFK-LAX").unwrap());
    assert_eq!(o0.airport.code, code("JFK"));
    assert_eq!(d0.airport.code, code("LAX"));
    assert_eq!(o0.mean_arrival_delay, 15.0);
    assert_eq!(d0.mean_arrival_delay, 15.0);

    let (o1, d1) = projections.get(1).unwrap();
    assert_eq!(o1.key, RouteKey::parse("LAX-JFK").unwrap());
    assert_eq!(o1.airport.code, code("LAX"));
    assert_eq!(d1.airport.code, code("JFK"));
    assert_eq!(o1.mean_arrival_delay, 5.0);
}

#[test]
fn test_unknown_airport_excluded_from_both_projections() {
    let flights = vec![
        flight("JFK", "LAX", 10.0),
        flight("JFK", "BOS", 30.0), // BOS missing from table
        flight("BOS", "ORD", 12.0),
    ];
    let projections = aggregate_routes(&flights, &us_airports());

    assert_eq!(projections.origins().len(), 1);
    assert_eq!(projections.destinations().len(), 1);
    assert!(projections
        .iter()
        .all(|(o, d)| o.airport.code != code("BOS") && d.airport.code != code("BOS")));
}

// =====================================================================
// Properties over a generated table
// =====================================================================

fn generated_flights() -> Vec<FlightRecord> {
    let codes = ["JFK", "LAX", "ORD", "ATL", "SEA", "BOS"];
    let mut flights = Vec::new();
    for i in 0..600usize {
        let origin = codes[i % codes.len()];
        let destination = codes[(i * 7 + 3) % codes.len()];
        // Deterministic spread of early and late arrivals
        let delay = ((i * 37) % 91) as f64 - 30.0;
        flights.push(flight(origin, destination, delay));
    }
    flights
}

#[test]
fn test_projections_aligned() {
    let flights = generated_flights();
    let projections = aggregate_routes(&flights, &us_airports());

    assert!(!projections.is_empty());
    assert_eq!(projections.origins().len(), projections.destinations().len());

    for (origin, destination) in projections.iter() {
        assert_eq!(origin.key, destination.key);
        assert_eq!(origin.mean_arrival_delay, destination.mean_arrival_delay);
        assert_eq!(origin.flight_count, destination.flight_count);
        assert_eq!(origin.airport.code, origin.key.origin);
        assert_eq!(destination.airport.code, destination.key.destination);
    }
}

#[test]
fn test_projections_sorted_by_key() {
    let flights = generated_flights();
    let projections = aggregate_routes(&flights, &us_airports());

    let keys: Vec<&RouteKey> = projections.origins().iter().map(|e| &e.key).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_mean_matches_exact_rows() {
    let flights = generated_flights();
    let projections = aggregate_routes(&flights, &us_airports());

    let mut expected: HashMap<(AirportCode, AirportCode), Vec<f64>> = HashMap::new();
    for f in &flights {
        expected
            .entry((f.origin.clone(), f.destination.clone()))
            .or_default()
            .push(f.arrival_delay);
    }

    for (origin, _) in projections.iter() {
        let delays = &expected[&(origin.key.origin.clone(), origin.key.destination.clone())];
        let mean = delays.iter().sum::<f64>() / delays.len() as f64;
        assert!(
            (origin.mean_arrival_delay - mean).abs() < 1e-9,
            "route {} mean {} != {}",
            origin.key,
            origin.mean_arrival_delay,
            mean
        );
        assert_eq!(origin.flight_count, delays.len());
    }
}

#[test]
fn test_input_untouched() {
    let flights = generated_flights();
    let before = flights.clone();
    let _ = aggregate_routes(&flights, &us_airports());
    assert_eq!(flights, before);
}
