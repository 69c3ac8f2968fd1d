// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Chart-agnostic scene description handed to the geographic charting layer.
//!
//! Every layer carries a [`LayerRole`] and every clickable element carries the
//! [`SelectionTarget`] it stands for, so resolving a click is a lookup by
//! `(layer, point)` and never depends on how many layers were drawn before it.

use crate::color::{Color, ColorRange, ColorScale, LAKE_BLUE, LAND_WHITE};
use crate::model::{AirportCode, GeoPoint, RouteKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a click on an element selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SelectionTarget {
    Airport(AirportCode),
    Route(RouteKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "index", rename_all = "snake_case")]
pub enum LayerRole {
    /// Delay-map airports, one marker per filtered row.
    Airports,
    RouteOrigins,
    RouteDestinations,
    /// Line for row `n` of the route projections.
    Route(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub size: f64,
    pub opacity: f64,
    pub outline: Color,
    pub outline_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub color: Color,
    /// Raw value behind `color`, when the marker is color-scaled.
    pub value: Option<f64>,
    pub tooltip: Option<String>,
    pub target: Option<SelectionTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub tooltip: String,
    pub target: Option<SelectionTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Markers {
        style: MarkerStyle,
        markers: Vec<Marker>,
    },
    Line {
        style: LineStyle,
        line: Line,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub role: LayerRole,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapScope {
    #[default]
    #[serde(rename = "north america")]
    NorthAmerica,
    #[serde(rename = "usa")]
    Usa,
    #[serde(rename = "world")]
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    NaturalEarth,
    AzimuthalEqualArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub left: u32,
    pub right: u32,
    pub bottom: u32,
    pub top: u32,
    pub pad: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoLayout {
    pub scope: MapScope,
    pub projection: Projection,
    pub show_lakes: bool,
    pub show_land: bool,
    pub lake_color: Color,
    pub land_color: Color,
    pub margin: Margin,
    pub autosize: bool,
    pub show_legend: bool,
}

impl GeoLayout {
    pub fn new(scope: MapScope, projection: Projection, margin: Margin) -> Self {
        Self {
            scope,
            projection,
            show_lakes: true,
            show_land: true,
            lake_color: LAKE_BLUE,
            land_color: LAND_WHITE,
            margin,
            autosize: true,
            show_legend: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: String,
    pub scale: ColorScale,
    pub range: ColorRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub layers: Vec<Layer>,
    pub layout: GeoLayout,
    pub color_bar: Option<ColorBar>,
}

impl Scene {
    pub fn new(layout: GeoLayout) -> Self {
        Self {
            layers: Vec::new(),
            layout,
            color_bar: None,
        }
    }

    pub fn push(&mut self, role: LayerRole, geometry: Geometry) {
        self.layers.push(Layer { role, geometry });
    }

    pub fn marker_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| match &layer.geometry {
                Geometry::Markers { markers, .. } => markers.len(),
                Geometry::Line { .. } => 0,
            })
            .sum()
    }

    pub fn line_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|layer| matches!(layer.geometry, Geometry::Line { .. }))
            .count()
    }

    /// Looks up what a click selects. Indices outside the scene, and elements
    /// with no target, resolve to `None`.
    pub fn resolve(&self, click: ClickEvent) -> Option<&SelectionTarget> {
        let layer = self.layers.get(click.layer)?;
        match &layer.geometry {
            Geometry::Markers { markers, .. } => markers.get(click.point)?.target.as_ref(),
            // A line has two points, either end selects it
            Geometry::Line { line, .. } if click.point < 2 => line.target.as_ref(),
            Geometry::Line { .. } => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid click '{0}': expected LAYER:POINT")]
pub struct ClickParseError(String);

/// Click reported back by the charting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub layer: usize,
    pub point: usize,
}

impl ClickEvent {
    pub fn new(layer: usize, point: usize) -> Self {
        Self { layer, point }
    }
}

impl fmt::Display for ClickEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.layer, self.point)
    }
}

impl FromStr for ClickEvent {
    type Err = ClickParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClickParseError(s.to_string());
        let (layer, point) = s.trim().split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            layer: layer.trim().parse().map_err(|_| invalid())?,
            point: point.trim().parse().map_err(|_| invalid())?,
        })
    }
}
