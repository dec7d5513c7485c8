pub mod demo;
pub mod ingest;
pub mod init;
pub mod recent;
pub mod status;
pub mod sync;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fintrack",
    about = "Offline-first ingestion of bank notification text into transaction records."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up FinTrack: choose a data directory and initialize the database.
    Init {
        /// Path for FinTrack data (default: ~/.local/share/fintrack)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Base URL of the FinTrack server
        #[arg(long = "api-url")]
        api_url: Option<String>,
        /// User identity sent with every transaction
        #[arg(long)]
        user: Option<String>,
    },
    /// Ingest one notification text: extract, store, and attempt a sync.
    Ingest {
        /// Combined notification text (title and body)
        text: String,
        /// Source app package (e.g. com.shinhan.sbanking)
        #[arg(long, conflicts_with = "bank")]
        source: Option<String>,
        /// Bank label to attach directly, bypassing the source mapping
        #[arg(long)]
        bank: Option<String>,
    },
    /// Flush unsynced transactions to the server.
    Sync {
        /// Keep attempting the rest of the backlog after a failure
        #[arg(long)]
        keep_going: bool,
    },
    /// List recent transactions.
    Recent {
        /// Month to list: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Show current database and backlog statistics.
    Status,
    /// Ingest sample notifications to explore FinTrack.
    Demo,
}
