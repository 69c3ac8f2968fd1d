// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::color::{ColorRange, ScaleError, OUTLINE_GREY, YL_OR_RD};
use crate::config::{ColorScaling, RenderConfig};
use crate::filter::TimeWindow;
use crate::join::{JoinedFlight, JoinedView};
use crate::scene::{
    ClickEvent, ColorBar, GeoLayout, Geometry, LayerRole, Margin, Marker, MarkerStyle,
    Projection, Scene, SelectionTarget,
};
use crate::state::UiState;

pub const COLOR_BAR_TITLE: &str = "Percentage of Delay (%)";

const MARKER_STYLE: MarkerStyle = MarkerStyle {
    size: 8.0,
    opacity: 0.8,
    outline: OUTLINE_GREY,
    outline_width: 1.0,
};

const MARGIN: Margin = Margin {
    left: 20,
    right: 20,
    bottom: 30,
    top: 20,
    pad: 30,
};

/// Result of one delay-map render.
#[derive(Debug, Clone)]
pub struct DelayMapFrame {
    pub scene: Scene,
    /// `Err(ScaleError::Empty)` when adaptive scaling had no rows to scale.
    pub color_range: Result<ColorRange, ScaleError>,
}

fn scale_range(
    rows: &[&JoinedFlight],
    scaling: ColorScaling,
) -> Result<ColorRange, ScaleError> {
    match scaling {
        ColorScaling::Adaptive => {
            ColorRange::zero_to_max(rows.iter().map(|r| r.percentage_delayed))
        }
        ColorScaling::Fixed { max } => ColorRange::fixed(max),
    }
}

fn tooltip(row: &JoinedFlight) -> Option<String> {
    let airport = row.origin.as_ref()?;
    Some(format!(
        "Airport: {}<br>City: {}<br>State: {}<br>Percentage of delayed flights: {:.2}%<br>",
        airport.name, airport.city, airport.state, row.percentage_delayed
    ))
}

/// Builds the airport delay scatter for flights inside `window`.
///
/// One marker per filtered row; rows whose origin airport is unknown have no
/// position and are skipped.
pub fn render_delay_map(
    view: &JoinedView,
    window: &TimeWindow,
    config: &RenderConfig,
) -> DelayMapFrame {
    let rows: Vec<&JoinedFlight> = window
        .apply(view.rows())
        .into_iter()
        .filter(|row| row.origin.is_some())
        .collect();

    let color_range = scale_range(&rows, config.color_scaling);
    let low_end = YL_OR_RD.sample(0.0);

    let markers: Vec<Marker> = rows
        .iter()
        .filter_map(|row| {
            let airport = row.origin.as_ref()?;
            let color = match &color_range {
                Ok(range) => YL_OR_RD.sample(range.normalize(row.percentage_delayed)),
                Err(_) => low_end,
            };
            Some(Marker {
                position: airport.position(),
                color,
                value: Some(row.percentage_delayed),
                tooltip: tooltip(row),
                target: Some(SelectionTarget::Airport(row.flight.origin.clone())),
            })
        })
        .collect();

    let layout = GeoLayout::new(config.scope, Projection::NaturalEarth, MARGIN);
    let mut scene = Scene::new(layout);
    match &color_range {
        Ok(range) => {
            scene.color_bar = Some(ColorBar {
                title: COLOR_BAR_TITLE.to_string(),
                scale: YL_OR_RD,
                range: *range,
            });
        }
        Err(e) => log::warn!("Delay map drawn without a color bar: {}", e),
    }

    log::info!(
        "Delay map: {} of {} rows inside {} .. {}",
        markers.len(),
        view.len(),
        window.start_date,
        window.end_date
    );

    scene.push(
        LayerRole::Airports,
        Geometry::Markers {
            style: MARKER_STYLE,
            markers,
        },
    );

    DelayMapFrame { scene, color_range }
}

/// Renders, then applies `click` to `state`.
pub fn draw_delay_map(
    view: &JoinedView,
    window: &TimeWindow,
    config: &RenderConfig,
    click: Option<ClickEvent>,
    state: &mut UiState,
) -> DelayMapFrame {
    let frame = render_delay_map(view, window, config);
    state.apply_click(&frame.scene, click);
    frame
}
