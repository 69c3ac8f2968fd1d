// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod color;
pub mod config;
pub mod delay_map;
pub mod filter;
pub mod join;
pub mod model;
pub mod route_map;
pub mod routes;
pub mod scene;
pub mod state;

pub use config::RenderConfig;
pub use filter::{RouteFilter, TimeWindow};
pub use join::{JoinedFlight, JoinedView};
pub use model::{Airport, AirportCode, AirportTable, FlightRecord, RouteKey};
pub use scene::{ClickEvent, Scene, SelectionTarget};
pub use state::UiState;
