use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use user_store::{Config, UserStore, init_db};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let store = UserStore::new(init_db(&config).await?);

    let users = store.get_all_users().await?;
    info!("{} users stored in {}", users.len(), config.database_url);

    store.close().await;
    Ok(())
}
