use std::time::Duration;

use diesel::{r2d2::ConnectionManager, SqliteConnection};
use r2d2::PooledConnection;
use tempfile::TempDir;

use crate::{
    auth::{register_user, NewUser},
    config::Config,
    models::users::{UserData, ROLE_PROFESSOR, ROLE_STUDENT},
    state::AppState,
};

/// A fresh SQLite database in a temp dir, removed on drop.
pub struct TestContext {
    pub state: AppState,
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Like `new`, with `tune` applied to the config before the pool is built.
    pub fn with_config<F: FnOnce(&mut Config)>(tune: F) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            database_url: dir.path().join("test.db").to_string_lossy().into_owned(),
            jwt_secret: "test-secret".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            token_ttl: chrono::Duration::hours(1),
            db_timeout: Duration::from_secs(5),
            db_pool_size: 4,
        };
        tune(&mut config);
        let state = AppState::new(&config).unwrap();
        Self { state, _dir: dir }
    }

    pub fn conn(&self) -> PooledConnection<ConnectionManager<SqliteConnection>> {
        self.state.pool.get().unwrap()
    }

    pub fn professor(&self, email: &str) -> UserData {
        self.user(email, ROLE_PROFESSOR)
    }

    pub fn student(&self, email: &str) -> UserData {
        self.user(email, ROLE_STUDENT)
    }

    fn user(&self, email: &str, role: &'static str) -> UserData {
        let new_user = NewUser {
            email: email.to_string(),
            password: "password123".to_string(),
            name: email.to_string(),
            role,
        };
        register_user(&self.conn(), new_user).unwrap()
    }
}
