#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime atlas.
//!
//! Each subcommand runs one boundary operation against the incident CSV and
//! prints the response as JSON, or writes the map fragment for the map
//! commands. Without a subcommand an interactive menu is shown.

mod interactive;
mod output;
mod settings;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crime_atlas_crime_models::{ALL_SENTINEL, Coordinate, FilterCriteria};

#[derive(Parser)]
#[command(name = "crime_atlas", about = "Crime incident map and statistics tool")]
struct Cli {
    /// Incident CSV file (overrides `CRIME_ATLAS_DATA`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Map config TOML file (overrides `CRIME_ATLAS_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// The three filter fields. "All" or an empty value leaves a field unused.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct FilterArgs {
    /// Case-insensitive substring of the location description
    #[arg(long, default_value = ALL_SENTINEL)]
    location: String,
    /// Exact crime type
    #[arg(long, default_value = ALL_SENTINEL)]
    crime_type: String,
    /// Severity label (low, medium, high)
    #[arg(long, default_value = ALL_SENTINEL)]
    severity: String,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(&self.location, &self.crime_type, &self.severity)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the map of every incident
    Map {
        /// Write the HTML fragment to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render the map of incidents matching the filters
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
        /// Write the HTML fragment to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the sorted values available for each filter
    Options,
    /// List distinct locations in dataset order
    Locations,
    /// List distinct crime types in dataset order
    CrimeTypes,
    /// Show summary statistics
    Stats,
    /// Show monthly counts per crime type
    Trends,
    /// Find incidents near a point (approximate planar distance)
    Nearby {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in kilometers
        #[arg(long, default_value = "5")]
        radius: f64,
    },
    /// Export incidents matching the filters to a timestamped CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Directory the CSV is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Render a route map between two places
    Route {
        /// Starting place name
        start: String,
        /// Destination place name
        destination: String,
        /// Latitude of the user's current position
        #[arg(long, allow_hyphen_values = true, requires = "user_lng")]
        user_lat: Option<f64>,
        /// Longitude of the user's current position
        #[arg(long, allow_hyphen_values = true, requires = "user_lat")]
        user_lng: Option<f64>,
        /// Write the HTML fragment to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let atlas = settings::atlas(cli.data, cli.config)?;

    let Some(command) = cli.command else {
        return interactive::run(&atlas);
    };

    match command {
        Commands::Map { output } => output::write_html(&atlas.map_html(), output.as_deref())?,
        Commands::Filter { filter, output } => {
            let criteria = filter.criteria();
            log::debug!("Filtering with {criteria:?}");
            output::write_html(&atlas.filtered_map_html(&criteria), output.as_deref())?;
        }
        Commands::Options => output::print_json(&atlas.filter_options())?,
        Commands::Locations => output::print_json(&atlas.locations())?,
        Commands::CrimeTypes => output::print_json(&atlas.crime_types())?,
        Commands::Stats => output::print_json(&atlas.statistics())?,
        Commands::Trends => output::print_json(&atlas.trend_data())?,
        Commands::Nearby { lat, lng, radius } => {
            output::print_json(&atlas.search_nearby(lat, lng, radius))?;
        }
        Commands::Export { filter, out_dir } => {
            output::print_json(&atlas.export_filtered(&filter.criteria(), &out_dir))?;
        }
        Commands::Route {
            start,
            destination,
            user_lat,
            user_lng,
            output,
        } => {
            let user_location = user_lat
                .zip(user_lng)
                .map(|(lat, lng)| Coordinate::new(lat, lng));
            output::write_html(
                &atlas.route_map(&start, &destination, user_location),
                output.as_deref(),
            )?;
        }
    }

    Ok(())
}
