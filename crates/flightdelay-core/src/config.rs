// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::color::{ColorRange, ScaleError};
use crate::scene::MapScope;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Delay threshold must be a finite number of minutes, got {0}")]
    InvalidThreshold(f64),
    #[error("Invalid color scaling: {0}")]
    Scale(#[from] ScaleError),
}

/// How the delay map picks the top of its color range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorScaling {
    /// Recomputed from the filtered rows on every render.
    #[default]
    Adaptive,
    /// Same maximum for every filter state.
    Fixed { max: f64 },
}

/// How route lines are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteColoring {
    #[default]
    Uniform,
    /// Diverging green-to-red scale across the rendered routes' mean delays.
    ByMeanDelay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Arrivals later than this count as delayed.
    pub delay_threshold_minutes: f64,
    pub color_scaling: ColorScaling,
    pub route_coloring: RouteColoring,
    pub scope: MapScope,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            delay_threshold_minutes: 15.0,
            color_scaling: ColorScaling::Adaptive,
            route_coloring: RouteColoring::Uniform,
            scope: MapScope::NorthAmerica,
        }
    }
}

impl RenderConfig {
    /// Loads from `path`, or from the platform config dir when `path` is `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: RenderConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delay_threshold_minutes.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.delay_threshold_minutes));
        }
        if let ColorScaling::Fixed { max } = self.color_scaling {
            ColorRange::fixed(max)?;
        }
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "flightdelay", "FlightDelay")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
