// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::color::{ColorRange, DELAY_DIVERGING, GOLD, OUTLINE_GREY, STEEL_BLUE};
use crate::config::{RenderConfig, RouteColoring};
use crate::filter::RouteFilter;
use crate::join::JoinedView;
use crate::model::{AirportCode, AirportTable};
use crate::routes::{aggregate_routes, RouteEndpoint, RouteProjections};
use crate::scene::{
    ClickEvent, GeoLayout, Geometry, LayerRole, Line, LineStyle, Margin, Marker, MarkerStyle,
    Projection, Scene, SelectionTarget,
};
use crate::state::UiState;
use std::collections::HashSet;

const ENDPOINT_STYLE: MarkerStyle = MarkerStyle {
    size: 6.0,
    opacity: 0.8,
    outline: OUTLINE_GREY,
    outline_width: 1.0,
};

const ROUTE_STYLE: LineStyle = LineStyle {
    color: STEEL_BLUE,
    width: 1.0,
    opacity: 0.8,
};

const MARGIN: Margin = Margin {
    left: 20,
    right: 80,
    bottom: 30,
    top: 20,
    pad: 30,
};

#[derive(Debug, Clone)]
pub struct RouteMapFrame {
    pub projections: RouteProjections,
    pub scene: Scene,
}

/// Truncates (not rounds) to hundredths and prints two decimals.
pub fn format_delay(minutes: f64) -> String {
    // Snap float noise so exact hundredths (1.15 * 100 = 114.999..) keep their cent
    let cents = (minutes * 100.0 * 1e6).round() / 1e6;
    let truncated = cents.trunc() / 100.0;
    // Avoid printing "-0.00" for tiny negative means
    let truncated = if truncated == 0.0 { 0.0 } else { truncated };
    format!("{:.2}", truncated)
}

fn route_tooltip(origin: &RouteEndpoint, destination: &RouteEndpoint) -> String {
    format!(
        "From: {}<br>To: {}<br>Avg. Delay: {} mins",
        origin.airport.name,
        destination.airport.name,
        format_delay(origin.mean_arrival_delay)
    )
}

fn endpoint_markers(endpoints: &[RouteEndpoint]) -> Vec<Marker> {
    let mut seen: HashSet<&AirportCode> = HashSet::new();
    endpoints
        .iter()
        .filter(|e| seen.insert(&e.airport.code))
        .map(|e| Marker {
            position: e.airport.position(),
            color: GOLD,
            value: None,
            tooltip: None,
            target: None,
        })
        .collect()
}

/// Filters the view, aggregates routes, and lays out the route map: origin
/// markers, destination markers, then one line per route.
pub fn render_route_map(
    view: &JoinedView,
    airports: &AirportTable,
    filter: &RouteFilter,
    config: &RenderConfig,
) -> RouteMapFrame {
    let rows = filter.apply(view.rows());
    let projections = aggregate_routes(rows.iter().map(|row| &row.flight), airports);

    let mut scene = Scene::new(GeoLayout::new(
        config.scope,
        Projection::AzimuthalEqualArea,
        MARGIN,
    ));
    scene.push(
        LayerRole::RouteOrigins,
        Geometry::Markers {
            style: ENDPOINT_STYLE,
            markers: endpoint_markers(projections.origins()),
        },
    );
    scene.push(
        LayerRole::RouteDestinations,
        Geometry::Markers {
            style: ENDPOINT_STYLE,
            markers: endpoint_markers(projections.destinations()),
        },
    );

    let delay_range = match config.route_coloring {
        RouteColoring::Uniform => None,
        RouteColoring::ByMeanDelay => {
            ColorRange::spanning(projections.origins().iter().map(|e| e.mean_arrival_delay)).ok()
        }
    };

    for (index, (origin, destination)) in projections.iter().enumerate() {
        let style = match &delay_range {
            Some(range) => LineStyle {
                color: DELAY_DIVERGING.sample(range.normalize(origin.mean_arrival_delay)),
                ..ROUTE_STYLE
            },
            None => ROUTE_STYLE,
        };
        scene.push(
            LayerRole::Route(index),
            Geometry::Line {
                style,
                line: Line {
                    from: origin.airport.position(),
                    to: destination.airport.position(),
                    tooltip: route_tooltip(origin, destination),
                    target: Some(SelectionTarget::Route(origin.key.clone())),
                },
            },
        );
    }

    log::info!(
        "Route map: {} rows after filters, {} routes drawn",
        rows.len(),
        projections.len()
    );

    RouteMapFrame { projections, scene }
}

/// Renders, then applies `click` to `state`.
pub fn draw_route_map(
    view: &JoinedView,
    airports: &AirportTable,
    filter: &RouteFilter,
    config: &RenderConfig,
    click: Option<ClickEvent>,
    state: &mut UiState,
) -> RouteMapFrame {
    let frame = render_route_map(view, airports, filter, config);
    state.apply_click(&frame.scene, click);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_delay_truncates() {
        assert_eq!(format_delay(15.0), "15.00");
        assert_eq!(format_delay(12.349), "12.34");
        assert_eq!(format_delay(12.999), "12.99");
        assert_eq!(format_delay(-3.456), "-3.45");
        assert_eq!(format_delay(-0.004), "0.00");
    }

    #[test]
    fn test_format_delay_keeps_exact_hundredths() {
        assert_eq!(format_delay(23.0 / 20.0), "1.15");
        assert_eq!(format_delay(1.15), "1.15");
        assert_eq!(format_delay(0.29), "0.29");
        assert_eq!(format_delay(4.35), "4.35");
        assert_eq!(format_delay(-4.35), "-4.35");
    }
}
