use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_file_exists, shellexpand_path, DB_FILE};
use crate::store::SqliteStore;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    let db_path = resolved.join(DB_FILE);
    let existed = db_path.exists();
    SqliteStore::open(&db_path)?;

    let first_run = !settings_file_exists();
    save_settings(&settings)?;

    if existed {
        println!("Using existing database at {}", db_path.display());
    } else {
        println!("Created database at {}", db_path.display());
    }
    if first_run {
        println!("Settings saved. Next steps:");
        println!("  fintrack register <username>");
        println!("  fintrack demo");
        println!("  fintrack serve");
    }
    Ok(())
}
