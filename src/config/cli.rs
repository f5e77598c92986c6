use crate::domain::model::SortMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mypage")]
#[command(about = "Profile page for saved trip itineraries")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "mypage.toml")]
    pub config: PathBuf,

    /// Override the storage directory from the config
    #[arg(long)]
    pub storage_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the profile and the itinerary list
    Show {
        /// Itinerary snapshot (.json or .csv)
        #[arg(short, long)]
        itineraries: Option<PathBuf>,

        /// Case-insensitive text matched against titles and tags
        #[arg(short, long, default_value = "")]
        search: String,

        /// newest (alias: latest) or oldest
        #[arg(long)]
        sort: Option<SortMode>,
    },
    /// Change the nickname
    Nickname { name: String },
    /// Change the profile image to a local file or URL
    Avatar { image: String },
    /// Check a date or date range against the span limit
    Dates {
        /// YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS
        start: String,
        end: Option<String>,
    },
}
