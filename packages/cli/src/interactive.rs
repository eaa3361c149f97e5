#![allow(clippy::module_name_repetitions)]

//! Interactive menu for the crime atlas.
//!
//! Provides a menu-driven interface using `dialoguer` for running the
//! boundary operations without memorizing CLI flags.

use std::path::PathBuf;

use crime_atlas_api::CrimeAtlas;
use crime_atlas_crime_models::{ALL_SENTINEL, Coordinate, FilterCriteria};
use dialoguer::{Confirm, Input, Select};

use crate::output;

/// Top-level actions available in the interactive menu.
enum Action {
    OverviewMap,
    FilteredMap,
    Statistics,
    Trends,
    Nearby,
    Export,
    Route,
    ListLocations,
    ListCrimeTypes,
}

impl Action {
    const ALL: &[Self] = &[
        Self::OverviewMap,
        Self::FilteredMap,
        Self::Statistics,
        Self::Trends,
        Self::Nearby,
        Self::Export,
        Self::Route,
        Self::ListLocations,
        Self::ListCrimeTypes,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::OverviewMap => "Render map of all incidents",
            Self::FilteredMap => "Render filtered map",
            Self::Statistics => "Show statistics",
            Self::Trends => "Show monthly trends",
            Self::Nearby => "Search near a point",
            Self::Export => "Export filtered incidents",
            Self::Route => "Render route map",
            Self::ListLocations => "List locations",
            Self::ListCrimeTypes => "List crime types",
        }
    }
}

/// Prompts for an action and runs it against `atlas`.
///
/// # Errors
///
/// Returns an error if a prompt fails or the result cannot be written.
pub fn run(atlas: &CrimeAtlas) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Atlas");
    println!("Dataset: {}", atlas.dataset().display());
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::OverviewMap => {
            let path = prompt_output("crime_map.html")?;
            output::write_html(&atlas.map_html(), Some(&path))?;
        }
        Action::FilteredMap => {
            let criteria = prompt_criteria(atlas)?;
            let path = prompt_output("filtered_crime_map.html")?;
            output::write_html(&atlas.filtered_map_html(&criteria), Some(&path))?;
        }
        Action::Statistics => output::print_json(&atlas.statistics())?,
        Action::Trends => output::print_json(&atlas.trend_data())?,
        Action::Nearby => {
            let lat: f64 = Input::new().with_prompt("Latitude").interact_text()?;
            let lng: f64 = Input::new().with_prompt("Longitude").interact_text()?;
            let radius: f64 = Input::new()
                .with_prompt("Radius (km)")
                .default(5.0)
                .interact_text()?;
            output::print_json(&atlas.search_nearby(lat, lng, radius))?;
        }
        Action::Export => {
            let criteria = prompt_criteria(atlas)?;
            let dir: String = Input::new()
                .with_prompt("Output directory")
                .default(".".to_string())
                .interact_text()?;
            output::print_json(&atlas.export_filtered(&criteria, &PathBuf::from(dir)))?;
        }
        Action::Route => {
            let start: String = Input::new().with_prompt("Start").interact_text()?;
            let destination: String = Input::new().with_prompt("Destination").interact_text()?;
            let user_location = if Confirm::new()
                .with_prompt("Start from your current position?")
                .default(false)
                .interact()?
            {
                let lat: f64 = Input::new().with_prompt("Your latitude").interact_text()?;
                let lng: f64 = Input::new().with_prompt("Your longitude").interact_text()?;
                Some(Coordinate::new(lat, lng))
            } else {
                None
            };
            let path = prompt_output("route_map.html")?;
            output::write_html(
                &atlas.route_map(&start, &destination, user_location),
                Some(&path),
            )?;
        }
        Action::ListLocations => output::print_json(&atlas.locations())?,
        Action::ListCrimeTypes => output::print_json(&atlas.crime_types())?,
    }

    Ok(())
}

/// Offers the dataset's filter options, each with "All" first.
fn prompt_criteria(atlas: &CrimeAtlas) -> Result<FilterCriteria, dialoguer::Error> {
    let options = atlas.filter_options();
    if let Some(error) = &options.error {
        log::warn!("Filter options unavailable: {error}");
    }

    let location = select_with_all("Location", &options.data.locations)?;
    let crime_type = select_with_all("Crime type", &options.data.crime_types)?;
    let severity = select_with_all("Severity", &options.data.severities)?;

    Ok(FilterCriteria::new(&location, &crime_type, &severity))
}

fn select_with_all(prompt: &str, values: &[String]) -> Result<String, dialoguer::Error> {
    let mut items = Vec::with_capacity(values.len() + 1);
    items.push(ALL_SENTINEL);
    items.extend(values.iter().map(String::as_str));

    let idx = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(items[idx].to_string())
}

fn prompt_output(default: &str) -> Result<PathBuf, dialoguer::Error> {
    let path: String = Input::new()
        .with_prompt("Output file")
        .default(default.to_string())
        .interact_text()?;
    Ok(PathBuf::from(path))
}
