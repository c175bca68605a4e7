use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{db_path, load_settings, settings_file_exists};
use crate::store::{SqliteStore, Store};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = db_path();

    if !settings_file_exists() {
        println!("Settings:   (defaults, run `fintrack init` to save)");
    }
    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Server:     {} ({} store)", settings.bind_addr, settings.store);

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let stats = SqliteStore::open(&db_path)?.stats()?;
        println!();
        println!("Users:         {}", stats.users);
        println!("Transactions:  {}", stats.transactions);
        println!("Budgets:       {}", stats.budgets);
        println!("Goals:         {}", stats.goals);
        println!("Alerts:        {}", stats.alerts);
    } else {
        println!();
        println!("Database not found. Run `fintrack init` to set up.");
    }

    Ok(())
}
