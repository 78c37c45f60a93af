use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simulcast")]
#[command(author, version, about = "Anime broadcast schedule aggregator")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize and merge raw source listings into canonical records
    Aggregate {
        /// Source listing as LANG=FILE, where FILE holds a JSON array of entries
        #[arg(short, long = "source", value_name = "LANG=FILE", required = true)]
        sources: Vec<String>,

        /// Merge without touching the database
        #[arg(long)]
        dry_run: bool,

        /// Output records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert one broadcast slot into the viewer's timezone
    Normalize {
        /// Weekday as 0-6 (Monday = 0), a label such as "Sat" or "星期六",
        /// or a premiere date such as "10/05"
        #[arg(short, long, required_unless_present = "broadcast")]
        day: Option<String>,

        /// Listing time, may run past midnight ("25:30")
        #[arg(short, long, required_unless_present = "broadcast")]
        time: Option<String>,

        /// Source timezone (IANA name or JST/CST/HKT/KST/UTC)
        #[arg(short, long, required_unless_present = "broadcast")]
        zone: Option<String>,

        /// Broadcast line such as "Saturdays at 23:00 (JST)", instead of
        /// --day/--time/--zone
        #[arg(short, long, conflicts_with_all = ["day", "time", "zone"])]
        broadcast: Option<String>,

        /// Viewer timezone (overrides the configured one)
        #[arg(long)]
        viewer: Option<String>,

        /// Reference date for offset lookup (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Print stored canonical records
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the current anime season
    Season,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
