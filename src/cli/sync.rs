use std::sync::Arc;

use colored::Colorize;

use crate::error::{FintrackError, Result};
use crate::remote::HttpRemoteClient;
use crate::repository::{BacklogPolicy, TransactionRepository};
use crate::settings::{db_path, load_settings};
use crate::store::TransactionStore;

pub fn run(keep_going: bool) -> Result<()> {
    let settings = load_settings();
    let store = Arc::new(TransactionStore::open(&db_path())?);
    let client = HttpRemoteClient::new(&settings.api_base_url)
        .map_err(|e| FintrackError::Remote(e.to_string()))?;
    let repository = TransactionRepository::new(store, client);

    let policy = if keep_going {
        BacklogPolicy::ContinueOnFailure
    } else {
        BacklogPolicy::StopOnFirstFailure
    };

    let report = repository.sync_pending(&settings.user_id, policy)?;
    if report.attempted == 0 {
        println!("Nothing to sync.");
    } else if report.flushed == report.attempted {
        println!("{} {} transaction(s) synced.", "Done:".green(), report.flushed);
    } else {
        println!(
            "{} {}/{} synced; the rest stay queued.",
            "Partial:".yellow(),
            report.flushed,
            report.attempted
        );
    }
    Ok(())
}
