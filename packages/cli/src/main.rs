#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for building and inspecting the summit map dataset.
//!
//! Loads province boundaries and mountain points from data directories,
//! attributes mountains to provinces, and reports, exports, or browses the
//! result. Climb status is kept in a JSON file.

mod load;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use summit_map_cli_utils::{IndicatifProgress, MultiProgress};
use summit_map_climbs::{ClimbStatusStore, JsonFileClimbStore, MemoryClimbStore};
use summit_map_geography::normalize::normalize;
use summit_map_geography::{Dataset, MapConfig, MatchTier};
use summit_map_geography_models::MountainId;
use summit_map_selection::{HeadlessViewport, MapViewport, SelectionController};
use summit_map_selection_models::SelectionEvent;

#[derive(Parser)]
#[command(name = "summit_map", about = "Mountain-to-province map data tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Data locations shared by every subcommand.
#[derive(Args)]
struct DataArgs {
    /// Directory of province boundary `.json` files
    #[arg(long)]
    provinces: PathBuf,

    /// Directory of mountain `.geojson` files
    #[arg(long)]
    mountains: PathBuf,

    /// TOML config overriding the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print per-province mountain counts and data problems
    Summary {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Write the province collection with a `mountainCount` property
    Annotate {
        #[command(flatten)]
        data: DataArgs,

        /// Output file
        #[arg(long)]
        output: PathBuf,
    },
    /// List the mountains of one province
    Province {
        #[command(flatten)]
        data: DataArgs,

        /// Province name (case-insensitive)
        name: String,

        /// Climb status file
        #[arg(long)]
        climbs: Option<PathBuf>,
    },
    /// Flip a mountain's climbed status
    Toggle {
        #[command(flatten)]
        data: DataArgs,

        /// Mountain identifier
        id: String,

        /// Climb status file
        #[arg(long)]
        climbs: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = summit_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { data } => {
            let config = load_config(data.config.as_deref())?;
            let dataset = load_dataset(&data, &config, &multi)?;
            print_summary(&dataset);
        }
        Commands::Annotate { data, output } => {
            let config = load_config(data.config.as_deref())?;
            let dataset = load_dataset(&data, &config, &multi)?;
            write_annotated(&dataset, &output)?;
        }
        Commands::Province { data, name, climbs } => {
            let config = load_config(data.config.as_deref())?;
            let dataset = load_dataset(&data, &config, &multi)?;
            let store: Box<dyn ClimbStatusStore> = match climbs {
                Some(path) => Box::new(JsonFileClimbStore::open(path)?),
                None => Box::new(MemoryClimbStore::new()),
            };
            show_province(dataset, &config, &name, store.as_ref())?;
        }
        Commands::Toggle { data, id, climbs } => {
            let config = load_config(data.config.as_deref())?;
            let dataset = load_dataset(&data, &config, &multi)?;
            let id = MountainId::new(id);
            if dataset.mountain(&id).is_none() {
                log::warn!("Mountain {id} is not in the loaded dataset");
            }

            let mut store = JsonFileClimbStore::open(climbs)?;
            let climbed = store.try_toggle(&id)?;
            println!("{id}: {}", if climbed { "climbed" } else { "not climbed" });
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MapConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            MapConfig::load(path)?
        }
        None => MapConfig::default(),
    })
}

/// Loads both directories and builds the dataset, with progress bars.
fn load_dataset(
    args: &DataArgs,
    config: &MapConfig,
    multi: &MultiProgress,
) -> Result<Dataset, Box<dyn std::error::Error>> {
    let province_files = load::list_files(&args.provinces, load::PROVINCE_EXTENSION)?;
    let mountain_files = load::list_files(&args.mountains, load::MOUNTAIN_EXTENSION)?;

    let files_bar = IndicatifProgress::files_bar(
        multi,
        "read",
        (province_files.len() + mountain_files.len()) as u64,
    );
    let provinces = load::merge_files(&province_files, files_bar.as_ref())?;
    let mountains = load::merge_files(&mountain_files, files_bar.as_ref())?;
    files_bar.finish(format!(
        "Read {} province and {} mountain features",
        provinces.features.len(),
        mountains.features.len()
    ));

    let assign_bar = IndicatifProgress::batch_bar(multi, "assign");
    let dataset = Dataset::build_with_progress(
        provinces,
        &mountains,
        &config.matching,
        assign_bar.as_ref(),
    );

    Ok(dataset)
}

fn print_summary(dataset: &Dataset) {
    println!("{:<32} {:>9}  tier", "province", "mountains");
    for province in dataset.provinces() {
        println!(
            "{:<32} {:>9}  {}",
            province.display_name(),
            dataset.mountain_count(province.id),
            dataset.bucket(province.id)
        );
    }

    let report = dataset.report();
    println!();
    println!("mountains:     {}", report.mountains.len());
    println!("associations:  {}", report.associations.len());
    for tier in [
        MatchTier::Exact,
        MatchTier::Normalized,
        MatchTier::Fuzzy,
        MatchTier::Geometric,
    ] {
        println!("  {:<12}{}", tier.to_string(), report.count_by_tier(tier));
    }
    println!("unassociated:  {}", report.unassociated.len());
    println!("quarantined:   {}", dataset.quarantined().len());
    println!("skipped provinces: {}", dataset.index().skipped());

    if !report.unmatched.is_empty() {
        println!();
        println!("unmatched province names:");
        for unmatched in &report.unmatched {
            println!("  {:?} ({})", unmatched.declared, unmatched.mountain);
        }
    }
}

fn write_annotated(dataset: &Dataset, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let annotated = dataset.annotated_provinces();
    std::fs::write(output, serde_json::to_string(&annotated)?)?;

    log::info!(
        "Wrote {} annotated provinces to {}",
        annotated.features.len(),
        output.display()
    );
    Ok(())
}

/// Selects the named province in a headless map session and prints what
/// the map would show.
fn show_province(
    dataset: Dataset,
    config: &MapConfig,
    name: &str,
    climbs: &dyn ClimbStatusStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(id) = dataset.index().lookup(&normalize(name)) else {
        return Err(format!("Unknown province: {name}").into());
    };

    let mut viewport = HeadlessViewport::new(config.labels.min_zoom);
    let mut controller = SelectionController::new(config.labels, viewport.zoom());
    let ticket = controller.begin_load();
    if let Some(commands) = controller.finish_load(ticket, Arc::new(dataset)) {
        viewport.apply_all(&commands);
    }
    controller.dispatch_to(&mut viewport, SelectionEvent::Click(id), climbs);

    for marker in &viewport.markers {
        let mountain = &marker.mountain;
        let elevation = mountain
            .elevation
            .map_or_else(String::new, |e| format!(" {e} m"));
        println!(
            "[{}] {}{elevation}  {}",
            if marker.climbed { "x" } else { " " },
            mountain.name,
            mountain.id
        );
    }

    if let Some(panel) = &viewport.panel {
        println!(
            "{}: {}/{} climbed ({:.1}%)",
            panel.name,
            panel.climbed_count,
            panel.mountain_count,
            panel.progress_percent()
        );
    }

    Ok(())
}
