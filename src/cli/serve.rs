use chrono::Local;
use tracing::info;

use crate::demo;
use crate::error::{FintrackError, Result};
use crate::settings::{db_path, load_settings, StoreBackend};
use crate::store::{MemoryStore, SqliteStore, Store};

pub fn run(bind: Option<String>, memory: bool, no_demo: bool) -> Result<()> {
    let settings = load_settings();
    let addr = bind.unwrap_or(settings.bind_addr);
    let backend = if memory { StoreBackend::Memory } else { settings.store };

    let store: Box<dyn Store> = match backend {
        StoreBackend::Memory => {
            let mut store = MemoryStore::new();
            if settings.seed_demo && !no_demo {
                if let Some(seeded) = demo::seed(&mut store, Local::now().date_naive())? {
                    info!(
                        transactions = seeded.transactions,
                        budgets = seeded.budgets,
                        goals = seeded.goals,
                        "seeded demo account"
                    );
                }
            }
            Box::new(store)
        }
        StoreBackend::Sqlite => {
            let path = db_path();
            if !path.exists() {
                return Err(FintrackError::Other(
                    "No database found. Run `fintrack init` first, or pass --memory.".to_string(),
                ));
            }
            info!(path = %path.display(), "opening database");
            Box::new(SqliteStore::open(&path)?)
        }
    };
    info!(backend = %backend, "starting server");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime
        .block_on(crate::server::serve(store, &addr))
        .map_err(|e| FintrackError::Other(format!("{e:#}")))
}
