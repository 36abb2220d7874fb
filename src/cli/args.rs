//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Car catalog and recommendation service
#[derive(Parser)]
#[command(
    name = "carmatch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Car catalog and cluster-based recommendation service",
    long_about = "Browse a vehicle catalog, classify budget/seat preferences into market segments, and record purchase intents.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .carmatch directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .carmatch/settings.toml")]
    Config,

    /// Start the HTTP server
    #[command(
        about = "Start the catalog HTTP server",
        after_help = "Examples:\n  carmatch serve\n  carmatch serve --bind 0.0.0.0:3000"
    )]
    Serve {
        /// Bind address (overrides server.bind)
        #[arg(long, help = "Address to bind the HTTP server to")]
        bind: Option<String>,
    },

    /// Classify a budget/seat preference offline
    #[command(
        about = "Predict the market segment for a price and seat count",
        after_help = "Examples:\n  carmatch classify '$25,000' 5\n  carmatch classify '$10,000-$20,000' 7 --page 2 --json"
    )]
    Classify {
        /// Price, e.g. "$25,000" or "$10,000-$20,000"
        #[arg(allow_hyphen_values = true)]
        price: String,

        /// Number of seats
        seats: String,

        /// Page of matching vehicles to show
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print one page of the catalog
    #[command(about = "List catalog vehicles with their cluster names")]
    List {
        /// Page number (1-indexed)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
