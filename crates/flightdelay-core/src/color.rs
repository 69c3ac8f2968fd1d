// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ScaleError {
    #[error("Color range is undefined: no values to scale")]
    Empty,
    #[error("Color range maximum must be a positive finite number, got {0}")]
    InvalidMax(f64),
}

/// Opaque RGB color, written out as `rgb(r,g,b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgb(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub const GOLD: Color = Color::rgb(255, 215, 0);
pub const STEEL_BLUE: Color = Color::rgb(70, 130, 180);
pub const OUTLINE_GREY: Color = Color::rgb(102, 102, 102);
pub const LAKE_BLUE: Color = Color::rgb(95, 145, 237);
pub const LAND_WHITE: Color = Color::rgb(250, 250, 250);

/// Piecewise-linear color scale over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorScale {
    pub name: &'static str,
    pub stops: &'static [(f64, Color)],
}

/// ColorBrewer yellow-orange-red, nine stops.
pub const YL_OR_RD: ColorScale = ColorScale {
    name: "YlOrRd",
    stops: &[
        (0.0, Color::rgb(255, 255, 204)),
        (0.125, Color::rgb(255, 237, 160)),
        (0.25, Color::rgb(254, 217, 118)),
        (0.375, Color::rgb(254, 178, 76)),
        (0.5, Color::rgb(253, 141, 60)),
        (0.625, Color::rgb(252, 78, 42)),
        (0.75, Color::rgb(227, 26, 28)),
        (0.875, Color::rgb(189, 0, 38)),
        (1.0, Color::rgb(128, 0, 38)),
    ],
};

/// Green through gold to tomato, for signed delay values.
pub const DELAY_DIVERGING: ColorScale = ColorScale {
    name: "DelayDiverging",
    stops: &[
        (0.0, Color::rgb(0, 100, 0)),
        (0.2, Color::rgb(34, 139, 34)),
        (0.4, Color::rgb(60, 179, 60)),
        (0.6, Color::rgb(173, 255, 47)),
        (0.8, Color::rgb(255, 215, 0)),
        (1.0, Color::rgb(255, 99, 71)),
    ],
};

impl ColorScale {
    /// Color at position `t`, clamped to `[0, 1]`. NaN samples the low end.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let Some(&(_, first)) = self.stops.first() else {
            return OUTLINE_GREY;
        };

        let mut prev = (0.0, first);
        for &(pos, color) in self.stops {
            if t <= pos {
                let span = pos - prev.0;
                if span <= f64::EPSILON {
                    return color;
                }
                return prev.1.lerp(color, (t - prev.0) / span);
            }
            prev = (pos, color);
        }
        prev.1
    }
}

/// Value bounds mapped onto a [`ColorScale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    pub min: f64,
    pub max: f64,
}

impl ColorRange {
    /// `0 ..= max` with a caller-chosen maximum.
    pub fn fixed(max: f64) -> Result<Self, ScaleError> {
        if !max.is_finite() || max <= 0.0 {
            return Err(ScaleError::InvalidMax(max));
        }
        Ok(Self { min: 0.0, max })
    }

    /// `0 ..= max(values)`. NaN values are ignored; an empty input has no maximum.
    pub fn zero_to_max<I>(values: I) -> Result<Self, ScaleError>
    where
        I: IntoIterator<Item = f64>,
    {
        let max = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .ok_or(ScaleError::Empty)?;
        Ok(Self {
            min: 0.0,
            max: max.max(0.0),
        })
    }

    /// `min(values) ..= max(values)`, for signed data such as mean delays.
    pub fn spanning<I>(values: I) -> Result<Self, ScaleError>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, v| {
                Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
            })
            .ok_or(ScaleError::Empty)?;
        Ok(Self { min, max })
    }

    /// Position of `value` inside the range, clamped to `[0, 1]`. A degenerate
    /// range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_display() {
        assert_eq!(GOLD.to_string(), "rgb(255,215,0)");
        assert_eq!(serde_json::to_string(&STEEL_BLUE).unwrap(), "\"rgb(70,130,180)\"");
    }

    #[test]
    fn test_sample_endpoints_and_midpoint() {
        assert_eq!(DELAY_DIVERGING.sample(0.0), Color::rgb(0, 100, 0));
        assert_eq!(DELAY_DIVERGING.sample(1.0), Color::rgb(255, 99, 71));
        assert_eq!(DELAY_DIVERGING.sample(0.2), Color::rgb(34, 139, 34));
        // Halfway between the first two stops
        assert_eq!(YL_OR_RD.sample(0.0625), Color::rgb(255, 246, 182));
    }

    #[test]
    fn test_sample_clamps() {
        assert_eq!(YL_OR_RD.sample(-3.0), YL_OR_RD.sample(0.0));
        assert_eq!(YL_OR_RD.sample(7.0), Color::rgb(128, 0, 38));
        assert_eq!(YL_OR_RD.sample(f64::NAN), Color::rgb(255, 255, 204));
    }

    #[test]
    fn test_zero_to_max_empty_is_error() {
        assert_eq!(
            ColorRange::zero_to_max(Vec::<f64>::new()),
            Err(ScaleError::Empty)
        );
        assert_eq!(
            ColorRange::zero_to_max([f64::NAN]),
            Err(ScaleError::Empty)
        );
    }

    #[test]
    fn test_zero_to_max() {
        let range = ColorRange::zero_to_max([12.5, 40.0, 3.0]).unwrap();
        assert_eq!(range, ColorRange { min: 0.0, max: 40.0 });
        assert_eq!(range.normalize(20.0), 0.5);
        assert_eq!(range.normalize(80.0), 1.0);
    }

    #[test]
    fn test_spanning_keeps_negative_minimum() {
        let range = ColorRange::spanning([-10.0, 30.0, 5.0]).unwrap();
        assert_eq!(range, ColorRange { min: -10.0, max: 30.0 });
        assert_eq!(range.normalize(10.0), 0.5);
        assert_eq!(ColorRange::spanning(Vec::<f64>::new()), Err(ScaleError::Empty));
    }

    #[test]
    fn test_degenerate_range_normalizes_to_zero() {
        let range = ColorRange::zero_to_max([0.0, 0.0]).unwrap();
        assert_eq!(range.normalize(0.0), 0.0);
    }

    #[test]
    fn test_fixed_range_validation() {
        assert!(ColorRange::fixed(100.0).is_ok());
        assert_eq!(ColorRange::fixed(0.0), Err(ScaleError::InvalidMax(0.0)));
        assert!(ColorRange::fixed(f64::INFINITY).is_err());
    }
}
