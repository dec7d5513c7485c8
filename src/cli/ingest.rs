use std::sync::Arc;

use colored::Colorize;

use crate::error::{FintrackError, Result};
use crate::event;
use crate::fmt::won;
use crate::parser;
use crate::remote::HttpRemoteClient;
use crate::repository::TransactionRepository;
use crate::settings::{db_path, load_settings};
use crate::store::TransactionStore;

pub fn run(text: &str, source: Option<&str>, bank: Option<&str>) -> Result<()> {
    let bank = match (bank, source) {
        (Some(label), _) => label.to_string(),
        (None, Some(pkg)) => event::bank_label(pkg)
            .ok_or_else(|| FintrackError::UnknownSource(pkg.to_string()))?
            .to_string(),
        (None, None) => {
            return Err(FintrackError::Other(
                "pass --source <package> or --bank <label>".to_string(),
            ))
        }
    };

    let Some(candidate) = parser::extract(text, &bank) else {
        println!("No transaction found in the text; nothing stored.");
        return Ok(());
    };

    let settings = load_settings();
    let store = Arc::new(TransactionStore::open(&db_path())?);
    let client = HttpRemoteClient::new(&settings.api_base_url)
        .map_err(|e| FintrackError::Remote(e.to_string()))?;
    let repository = TransactionRepository::new(store, client);

    let outcome = repository.save_and_sync(&settings.user_id, &candidate, text)?;

    println!(
        "{} {} {} ({})",
        "Stored:".green(),
        candidate.vendor,
        won(candidate.amount),
        candidate.bank
    );
    if outcome.synced {
        println!("Synced to server.");
    } else {
        println!("{}", "Server unreachable; queued for the next sync.".yellow());
    }
    Ok(())
}
