// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

mod load;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use flightdelay_core::delay_map::draw_delay_map;
use flightdelay_core::route_map::{draw_route_map, format_delay};
use flightdelay_core::routes::aggregate_routes;
use flightdelay_core::{
    AirportCode, AirportTable, ClickEvent, JoinedView, RenderConfig, RouteFilter, Scene,
    TimeWindow, UiState,
};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Flights CSV (DATE, ARRIVAL_TIME, ORIGIN_AIRPORT, DESTINATION_AIRPORT, ARRIVAL_DELAY)
    #[arg(long, env = "FLIGHTDELAY_FLIGHTS")]
    flights: Option<PathBuf>,

    /// Airports CSV (IATA_CODE, AIRPORT, CITY, STATE, LATITUDE, LONGITUDE)
    #[arg(long, env = "FLIGHTDELAY_AIRPORTS")]
    airports: Option<PathBuf>,

    /// Render config (JSON). Defaults to the platform config dir
    #[arg(long, env = "FLIGHTDELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Shared UI state carried between invocations
    #[arg(long, default_value = "flightdelay_state.json")]
    state: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RouteFilterArgs {
    /// Departure city (repeatable)
    #[arg(long = "dep-city")]
    departure_cities: Vec<String>,
    /// Arrival city (repeatable)
    #[arg(long = "arr-city")]
    arrival_cities: Vec<String>,
    /// Departure airport code (repeatable)
    #[arg(long = "dep-airport")]
    departure_airports: Vec<AirportCode>,
    /// Arrival airport code (repeatable)
    #[arg(long = "arr-airport")]
    arrival_airports: Vec<AirportCode>,
}

impl RouteFilterArgs {
    fn to_filter(&self) -> RouteFilter {
        RouteFilter::new()
            .with_departure_cities(self.departure_cities.iter().cloned())
            .with_arrival_cities(self.arrival_cities.iter().cloned())
            .with_departure_airports(self.departure_airports.iter().cloned())
            .with_arrival_airports(self.arrival_airports.iter().cloned())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Airport scatter colored by percentage of delayed flights
    DelayMap {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// Earliest arrival time of day (HH:MM:SS)
        #[arg(long, default_value = "00:00:00")]
        start_time: NaiveTime,
        /// Latest arrival time of day (HH:MM:SS)
        #[arg(long, default_value = "23:59:59")]
        end_time: NaiveTime,
        /// Click reported by the chart, as LAYER:POINT
        #[arg(long)]
        click: Option<ClickEvent>,
        /// Write the scene JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the aggregated route table
    Routes {
        #[command(flatten)]
        filter: RouteFilterArgs,
    },
    /// Origin/destination markers and one line per route
    RouteMap {
        #[command(flatten)]
        filter: RouteFilterArgs,
        /// Click reported by the chart, as LAYER:POINT
        #[arg(long)]
        click: Option<ClickEvent>,
        /// Write the scene JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the default render config (to --config, or the platform config dir)
    InitConfig,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let logger = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    if logger.is_err() {
        eprintln!("Logger already initialised");
    }
}

fn emit_scene(scene: &Scene, out: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(scene)?;
    match out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write scene to {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}

fn init_config(path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(RenderConfig::default_path)
        .ok_or_else(|| anyhow!("No config directory available. Please specify with --config."))?;
    RenderConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write config {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn load_tables(cli: &Cli, config: &RenderConfig) -> Result<(AirportTable, JoinedView)> {
    let airports_path = cli
        .airports
        .as_ref()
        .ok_or_else(|| anyhow!("Missing airports table. Please specify with --airports."))?;
    let flights_path = cli
        .flights
        .as_ref()
        .ok_or_else(|| anyhow!("Missing flights table. Please specify with --flights."))?;

    let airports = load::load_airports(airports_path)?;
    let flights = load::load_flights(flights_path)?;
    let view = JoinedView::build(&flights, &airports, config.delay_threshold_minutes);
    Ok((airports, view))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::InitConfig = cli.command {
        return init_config(cli.config);
    }

    let config = RenderConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let (airports, view) = load_tables(&cli, &config)?;

    let mut state = UiState::load(&cli.state)
        .with_context(|| format!("Failed to read UI state {}", cli.state.display()))?;
    let before = state.clone();

    match &cli.command {
        Commands::DelayMap {
            from,
            to,
            start_time,
            end_time,
            click,
            out,
        } => {
            let window = TimeWindow::new(*from, *to, *start_time, *end_time);
            let frame = draw_delay_map(&view, &window, &config, *click, &mut state);
            if let Err(e) = &frame.color_range {
                eprintln!("Note: {}", e);
            }
            emit_scene(&frame.scene, out.as_ref())?;
        }
        Commands::Routes { filter } => {
            let filter = filter.to_filter();
            let rows = filter.apply(view.rows());
            let projections = aggregate_routes(rows.iter().map(|r| &r.flight), &airports);
            for (origin, destination) in projections.iter() {
                println!(
                    "{:<8} {} -> {}  avg {} mins  ({} flights)",
                    origin.key.to_string(),
                    origin.airport.name,
                    destination.airport.name,
                    format_delay(origin.mean_arrival_delay),
                    origin.flight_count
                );
            }
            println!("{} routes", projections.len());
        }
        Commands::RouteMap { filter, click, out } => {
            let frame = draw_route_map(
                &view,
                &airports,
                &filter.to_filter(),
                &config,
                *click,
                &mut state,
            );
            emit_scene(&frame.scene, out.as_ref())?;
        }
        Commands::InitConfig => {}
    }

    if state != before {
        state
            .save(&cli.state)
            .with_context(|| format!("Failed to save UI state {}", cli.state.display()))?;
        log::info!("Selection updated in {}", cli.state.display());
    }

    Ok(())
}
