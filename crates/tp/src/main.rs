use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use tp_core::config::Config;
use tp_sqlite::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tp_core::logging::init("tp")?;

    let cfg = Arc::new(Config::load()?);

    let store = Arc::new(
        SqliteStore::open(cfg.database_path())
            .with_context(|| format!("opening database {}", cfg.database_path()))?,
    );
    info!("storage ready");

    tp_telegram::router::run_polling(cfg, store.clone(), store)
        .await
        .context("telegram bot failed")?;

    Ok(())
}
