use crate::error::Result;
use crate::settings::{db_path, load_settings};
use crate::store::TransactionStore;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db = db_path();

    println!("User:     {}", settings.user_id);
    println!("Server:   {}", settings.api_base_url);
    println!("Database: {}", db.display());

    if db.exists() {
        let store = TransactionStore::open(&db)?;
        let total = store.count()?;
        let pending = store.count_unsynced()?;
        println!();
        println!("Transactions: {total}");
        println!("Sync backlog: {pending}");
    } else {
        println!();
        println!("Database not found. Run `fintrack init` to set up.");
    }

    Ok(())
}
