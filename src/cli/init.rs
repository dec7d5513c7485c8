use crate::error::Result;
use crate::settings::{save_settings, Settings};
use crate::store::TransactionStore;

pub fn run(data_dir: Option<String>, api_url: Option<String>, user: Option<String>) -> Result<()> {
    let mut settings = Settings::default();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    if let Some(url) = api_url {
        settings.api_base_url = url;
    }
    if let Some(user) = user {
        settings.user_id = user;
    }

    let dir = std::path::PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;
    TransactionStore::open(&dir.join("fintrack.db"))?;
    save_settings(&settings)?;

    println!("Initialized database at {}", dir.join("fintrack.db").display());
    println!("Server: {}", settings.api_base_url);
    println!("User:   {}", settings.user_id);
    Ok(())
}
