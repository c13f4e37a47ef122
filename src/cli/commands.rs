//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "haggle")]
#[command(
    about = "haggle - buyer/seller price negotiation over a shared state file",
    long_about = None
)]
pub struct Cli {
    /// Shared state file
    #[arg(short, long, global = true, env = "HAGGLE_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reset state, open negotiations for catalogue items and run them
    Simulate {
        /// Seconds to run before forcing termination
        #[arg(short, long)]
        duration: Option<u64>,

        /// Round limit per negotiation
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Pause between rounds in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Buyer budget
        #[arg(short, long)]
        budget: Option<u64>,

        /// Number of catalogue items to negotiate over
        #[arg(short, long, default_value = "2")]
        items: usize,

        /// Seed for message selection
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Register a new negotiation for a catalogue item
    Start {
        /// Item ID
        #[arg(short, long)]
        item: String,

        /// Buyer budget
        #[arg(short, long)]
        budget: Option<u64>,
    },

    /// Drive all active negotiations to completion
    Run {
        /// Seconds to run before forcing termination
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Print counts of active and completed negotiations
    Status,

    /// Print deals, savings and failures
    Summary,

    /// Poll the state file and print recent activity
    Watch {
        /// Seconds to keep watching
        #[arg(short, long)]
        duration: Option<u64>,

        /// Poll interval in milliseconds
        #[arg(long, default_value = "3000")]
        interval_ms: u64,

        /// Activity lines to show
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Write an empty state file
    Reset,
}
