// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::model::AirportCode;
use crate::scene::{ClickEvent, Scene, SelectionTarget};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid UI state file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Selections shared with the host UI between renderer calls.
///
/// The three keys are independent: selecting an airport leaves the route
/// selection alone and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub selected_airport: Option<AirportCode>,
    pub route_origin: Option<AirportCode>,
    pub route_destination: Option<AirportCode>,
}

impl UiState {
    pub fn select(&mut self, target: &SelectionTarget) {
        match target {
            SelectionTarget::Airport(code) => {
                self.selected_airport = Some(code.clone());
            }
            SelectionTarget::Route(key) => {
                self.route_origin = Some(key.origin.clone());
                self.route_destination = Some(key.destination.clone());
            }
        }
    }

    /// Applies an optional click against the scene it was made on. Returns the
    /// target that was selected, if any. No click, or a click on an element
    /// that selects nothing, leaves the state untouched.
    pub fn apply_click(
        &mut self,
        scene: &Scene,
        click: Option<ClickEvent>,
    ) -> Option<SelectionTarget> {
        let click = click?;
        match scene.resolve(click) {
            Some(target) => {
                log::info!("Click {} selected {:?}", click, target);
                self.select(target);
                Some(target.clone())
            }
            None => {
                log::debug!("Ignoring click {}: no selectable element there", click);
                None
            }
        }
    }

    /// Loads state from `path`. A missing file yields the empty state.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StateError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StateError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
