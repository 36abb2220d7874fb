//! Init and Config commands.

use std::path::PathBuf;

use crate::config::{CONFIG_DIR, Settings};
use crate::error::Asset;

/// Each configured asset with its resolved path and whether it exists.
pub fn asset_report(config: &Settings) -> Vec<(Asset, PathBuf, bool)> {
    let assets = &config.assets;
    [
        (Asset::Dataset, &assets.dataset),
        (Asset::Labels, &assets.labels),
        (Asset::Model, &assets.model),
        (Asset::Orders, &assets.orders),
    ]
    .into_iter()
    .map(|(asset, path)| {
        let resolved = config.resolve(path);
        let present = resolved.is_file();
        (asset, resolved, present)
    })
    .collect()
}

fn print_assets(config: &Settings) {
    for (asset, path, present) in asset_report(config) {
        // The orders file is created by the first purchase
        let state = match (present, asset) {
            (true, _) => "found",
            (false, Asset::Orders) => "created on first order",
            (false, _) => "missing",
        };
        println!("  {:<16} {}  ({state})", asset.to_string(), path.display());
    }
}

/// Run init command - create configuration file and report asset locations.
pub fn run_init(force: bool) {
    let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

    if config_path.exists() && !force {
        eprintln!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        eprintln!("Use --force to overwrite");
        std::process::exit(1);
    }

    let path = match Settings::init_config_file(force) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    println!("Created configuration file at: {}", path.display());

    match Settings::load_from(&path) {
        Ok(settings) => {
            println!("Assets:");
            print_assets(&settings);
        }
        Err(e) => eprintln!("Error reading back {}: {e}", path.display()),
    }
}

/// Run config command - display current configuration and asset state.
pub fn run_config(config: &Settings) {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    match toml::to_string_pretty(config) {
        Ok(toml_str) => println!("{toml_str}"),
        Err(e) => eprintln!("Error displaying config: {e}"),
    }
    println!("Assets:");
    print_assets(config);
}
