// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::join::JoinedFlight;
use crate::model::{Airport, AirportCode, FlightRecord};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Date range plus time-of-day range. Every bound is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeWindow {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            start_date,
            end_date,
            start_time,
            end_time,
        }
    }

    /// Whole days, 00:00:00 through 23:59:59.
    pub fn all_day(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(start_date, end_date, NaiveTime::MIN, end_of_day())
    }

    pub fn contains(&self, flight: &FlightRecord) -> bool {
        flight.date >= self.start_date
            && flight.date <= self.end_date
            && flight.arrival_time >= self.start_time
            && flight.arrival_time <= self.end_time
    }

    pub fn apply<'a>(&self, rows: &'a [JoinedFlight]) -> Vec<&'a JoinedFlight> {
        rows.iter().filter(|row| self.contains(&row.flight)).collect()
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Categorical route filters. An empty set lets every row through; a non-empty
/// set keeps exactly the rows whose value is a member. Sets are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteFilter {
    pub departure_cities: HashSet<String>,
    pub arrival_cities: HashSet<String>,
    pub departure_airports: HashSet<AirportCode>,
    pub arrival_airports: HashSet<AirportCode>,
}

impl RouteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_departure_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departure_cities = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_arrival_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arrival_cities = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_departure_airports<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = AirportCode>,
    {
        self.departure_airports = codes.into_iter().collect();
        self
    }

    pub fn with_arrival_airports<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = AirportCode>,
    {
        self.arrival_airports = codes.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.departure_cities.is_empty()
            && self.arrival_cities.is_empty()
            && self.departure_airports.is_empty()
            && self.arrival_airports.is_empty()
    }

    pub fn matches(&self, row: &JoinedFlight) -> bool {
        city_matches(&self.departure_cities, row.origin.as_ref())
            && city_matches(&self.arrival_cities, row.destination.as_ref())
            && code_matches(&self.departure_airports, &row.flight.origin)
            && code_matches(&self.arrival_airports, &row.flight.destination)
    }

    pub fn apply<'a>(&self, rows: &'a [JoinedFlight]) -> Vec<&'a JoinedFlight> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

// A row without airport metadata on that side has no city to match.
fn city_matches(cities: &HashSet<String>, side: Option<&Airport>) -> bool {
    cities.is_empty() || side.is_some_and(|a| cities.contains(&a.city))
}

fn code_matches(codes: &HashSet<AirportCode>, code: &AirportCode) -> bool {
    codes.is_empty() || codes.contains(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    fn flight_at(d: u32, h: u32, m: u32) -> FlightRecord {
        FlightRecord {
            date: date(d),
            arrival_time: time(h, m),
            origin: code("JFK"),
            destination: code("LAX"),
            arrival_delay: 0.0,
        }
    }

    fn airport(c: &str, city: &str) -> Airport {
        Airport {
            code: code(c),
            name: format!("{} Intl", c),
            city: city.to_string(),
            state: "XX".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn row(origin: (&str, &str), destination: (&str, &str)) -> JoinedFlight {
        JoinedFlight {
            flight: FlightRecord {
                date: date(1),
                arrival_time: time(8, 0),
                origin: code(origin.0),
                destination: code(destination.0),
                arrival_delay: 0.0,
            },
            origin: Some(airport(origin.0, origin.1)),
            destination: Some(airport(destination.0, destination.1)),
            percentage_delayed: 0.0,
        }
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let window = TimeWindow::new(date(2), date(4), time(6, 0), time(18, 0));

        assert!(window.contains(&flight_at(2, 6, 0)));
        assert!(window.contains(&flight_at(4, 18, 0)));
        assert!(window.contains(&flight_at(3, 12, 30)));

        assert!(!window.contains(&flight_at(1, 12, 0)));
        assert!(!window.contains(&flight_at(5, 12, 0)));
        assert!(!window.contains(&flight_at(3, 5, 59)));
        assert!(!window.contains(&flight_at(3, 18, 1)));
    }

    #[test]
    fn test_all_day_window() {
        let window = TimeWindow::all_day(date(1), date(1));
        assert!(window.contains(&flight_at(1, 0, 0)));
        assert!(window.contains(&flight_at(1, 23, 59)));
    }

    #[test]
    fn test_empty_filter_is_noop() {
        let rows = vec![
            row(("JFK", "New York"), ("LAX", "Los Angeles")),
            row(("ORD", "Chicago"), ("BOS", "Boston")),
        ];
        let filter = RouteFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&rows).len(), 2);
    }

    #[test]
    fn test_city_filter_is_exact_membership() {
        let rows = vec![
            row(("JFK", "New York"), ("LAX", "Los Angeles")),
            row(("EWR", "Newark"), ("LAX", "Los Angeles")),
            row(("ORD", "Chicago"), ("BOS", "Boston")),
        ];
        // "New" is a substring of two cities but equal to none
        let filter = RouteFilter::new().with_departure_cities(["New"]);
        assert!(filter.apply(&rows).is_empty());

        let filter = RouteFilter::new().with_departure_cities(["New York", "Chicago"]);
        let kept = filter.apply(&rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].flight.origin, code("JFK"));
        assert_eq!(kept[1].flight.origin, code("ORD"));
    }

    #[test]
    fn test_filters_and_together() {
        let rows = vec![
            row(("JFK", "New York"), ("LAX", "Los Angeles")),
            row(("JFK", "New York"), ("BOS", "Boston")),
            row(("ORD", "Chicago"), ("LAX", "Los Angeles")),
        ];
        let filter = RouteFilter::new()
            .with_departure_airports([code("JFK")])
            .with_arrival_cities(["Los Angeles"]);
        let kept = filter.apply(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].flight.destination, code("LAX"));
    }

    #[test]
    fn test_city_filter_drops_unjoined_side() {
        let mut unjoined = row(("JFK", "New York"), ("LAX", "Los Angeles"));
        unjoined.destination = None;
        let rows = vec![unjoined];

        assert_eq!(RouteFilter::new().apply(&rows).len(), 1);
        let filter = RouteFilter::new().with_arrival_cities(["Los Angeles"]);
        assert!(filter.apply(&rows).is_empty());
        // Airport-code filters read the flight itself, not the joined side
        let filter = RouteFilter::new().with_arrival_airports([code("LAX")]);
        assert_eq!(filter.apply(&rows).len(), 1);
    }
}
