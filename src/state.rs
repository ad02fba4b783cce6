use std::time::Duration;

use crate::{auth::token::TokenIssuer, config::Config, database::DbPool};

/// Built once in `main` and shared with every worker as app data.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub tokens: TokenIssuer,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let pool = crate::database::connect(config)?;
        Ok(Self {
            pool,
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl),
            store_timeout: config.db_timeout,
        })
    }
}
