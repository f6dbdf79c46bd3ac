use std::fmt;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::storage::FileStore;

#[derive(Clone)]
pub struct HandinState {
    pub db_pool: SqlitePool,
    pub files: FileStore,
}

impl fmt::Debug for HandinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandinState")
            .field("db_pool", &self.db_pool)
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

impl FromRef<HandinState> for SqlitePool {
    fn from_ref(state: &HandinState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<HandinState> for FileStore {
    fn from_ref(state: &HandinState) -> Self {
        state.files.clone()
    }
}
