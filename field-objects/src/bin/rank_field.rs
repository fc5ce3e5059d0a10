//! Rank comparison stars from a saved catalog query
//!
//! Reads a JSON array of field objects (as returned by a catalog query),
//! computes separation and delta magnitude against the chosen target,
//! applies the observation-count and magnitude-window filters, then prints
//! the survivors in ranked order.
//!
//! # Usage
//!
//! ```bash
//! # Rank by distance from the target using default settings
//! cargo run --bin rank_field -- --input wasp12_apass.json --target wasp12
//!
//! # Apply a saved settings file and rank by brightness match
//! cargo run --bin rank_field -- --input wasp12_apass.json --target wasp12 \
//!     --settings catalog_settings.json --sort delta-mag
//!
//! # Show every candidate, not only those passing the filters
//! RUST_LOG=debug cargo run --bin rank_field -- --input q.json --target wasp12 --all
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use field_objects::coords::{dec_deg_to_dms, ra_hr_to_hms};
use field_objects::{CatalogSettings, FieldObject, FieldObjectCollection};
use log::info;

/// Ranking order for the printed table
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortOrder {
    /// Nearest to the target first
    Distance,
    /// Closest in magnitude to the target first
    DeltaMag,
}

#[derive(Parser, Debug)]
#[command(
    name = "Field Ranker",
    about = "Filters and ranks comparison stars around a photometry target",
    long_about = None
)]
struct Args {
    /// JSON file holding an array of catalog field objects
    #[arg(long)]
    input: PathBuf,

    /// Object id of the target star within the input
    #[arg(long)]
    target: Option<String>,

    /// Catalog settings JSON (defaults apply when omitted)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the minimum number of observations from the settings
    #[arg(long)]
    min_obs: Option<u32>,

    /// Ranking order
    #[arg(long, value_enum, default_value_t = SortOrder::Distance)]
    sort: SortOrder,

    /// Print candidates that fail the filters too
    #[arg(long)]
    all: bool,
}

fn print_row(fo: &FieldObject) {
    let marker = if fo.is_target() { "*" } else { " " };
    println!(
        "{}{:<20} {} {} {:>7.3} {:>6.3} {:>5} {:>9.2} {:>7.3} {}",
        marker,
        fo.object_id(),
        ra_hr_to_hms(fo.ra_hr()),
        dec_deg_to_dms(fo.dec_deg()),
        fo.mag(),
        fo.mag_err(),
        fo.n_obs(),
        fo.rad_sep_amin(),
        fo.delta_mag(),
        if fo.is_filtered() { "yes" } else { "no" }
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => CatalogSettings::load_from_file(path)?,
        None => CatalogSettings::default(),
    };
    if let Some(min_obs) = args.min_obs {
        settings.min_observations = min_obs;
    }

    let json = std::fs::read_to_string(&args.input)?;
    let candidates: Vec<FieldObject> = serde_json::from_str(&json)?;
    info!(
        "Loaded {} field objects from {}",
        candidates.len(),
        args.input.display()
    );

    let mut collection = FieldObjectCollection::new();
    collection.add_field_objects(candidates);

    if let Some(target_id) = &args.target {
        let mut found = false;
        for fo in collection.iter_mut() {
            let is_target = !found && fo.object_id() == target_id;
            found |= is_target;
            fo.set_target(is_target);
        }
        if !found {
            return Err(format!(
                "Target '{target_id}' not found in {}",
                args.input.display()
            )
            .into());
        }
    }

    if !collection.update_from_flagged_target() {
        return Err("No target given: pass --target or flag one with \"is_target\": true".into());
    }
    collection.apply_filters(&settings);

    let ranked = match args.sort {
        SortOrder::Distance => collection.sorted_by_distance(),
        SortOrder::DeltaMag => collection.sorted_by_delta_mag(),
    };

    println!(
        " {:<20} {:<12} {:<12} {:>7} {:>6} {:>5} {:>9} {:>7} pass",
        "object_id", "ra", "dec", "mag", "err", "n_obs", "sep_amin", "d_mag"
    );
    for fo in ranked.into_iter().filter(|fo| args.all || fo.is_filtered()) {
        print_row(fo);
    }

    println!();
    println!("Total:    {}", collection.total_count());
    println!("Filtered: {}", collection.filtered_count());
    println!("Selected: {}", collection.selected_count());

    Ok(())
}
