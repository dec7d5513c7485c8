mod cli;
mod error;
mod event;
mod fmt;
mod ingestor;
mod models;
mod parser;
mod remote;
mod repository;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            data_dir,
            api_url,
            user,
        } => cli::init::run(data_dir, api_url, user),
        Commands::Ingest { text, source, bank } => {
            cli::ingest::run(&text, source.as_deref(), bank.as_deref())
        }
        Commands::Sync { keep_going } => cli::sync::run(keep_going),
        Commands::Recent { month } => cli::recent::run(month.as_deref()),
        Commands::Status => cli::status::run(),
        Commands::Demo => cli::demo::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
