//! Application state for the coin catalog API

use anyhow::Result;

use crate::store::CoinStore;

pub struct AppState {
    pub store: CoinStore,
}

impl AppState {
    pub async fn new(database_url: &str) -> Result<Self> {
        let store = CoinStore::connect(database_url).await?;
        Ok(Self { store })
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let store = CoinStore::in_memory().await?;
        Ok(Self { store })
    }
}
