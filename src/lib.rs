#![deny(
    clippy::as_conversions,
    clippy::expect_used,
    clippy::future_not_send,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::pedantic,
    clippy::string_slice,
    clippy::todo,
    clippy::unwrap_used,
    unsafe_code
)]
#![allow(
    clippy::manual_non_exhaustive,
    clippy::missing_errors_doc,
    clippy::module_inception,
    clippy::module_name_repetitions,
    clippy::needless_return,
    clippy::single_match_else,
    clippy::multiple_crate_versions
)]

use std::io;

use axum::{Router, extract::DefaultBodyLimit};
use sqlx::SqlitePool;

use crate::state::HandinState;
use crate::storage::{FileStore, MAX_UPLOAD_BYTES};

pub use args::HandinArgs;

mod args;
mod auth;
mod error;
pub mod logging;
mod models;
mod routes;
mod state;
mod storage;

#[cfg(test)]
mod test_utils;

/// Builds the application: connects the database, runs migrations, opens the
/// upload store, and wires the routes.
pub async fn server(args: HandinArgs) -> Result<Router, io::Error> {
    let db_pool = SqlitePool::connect(&args.database_url)
        .await
        .map_err(io::Error::other)?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(io::Error::other)?;

    let files = FileStore::open(args.uploads.clone()).await?;

    Ok(router(HandinState { db_pool, files }))
}

/// Router over an already-built state, split out so tests can drive the full
/// HTTP surface against an in-memory database and a temporary upload root.
pub(crate) fn router(state: HandinState) -> Router {
    Router::new()
        .merge(routes::assignment::router())
        .merge(routes::submission::router())
        // Room for the payload ceiling plus multipart framing; the per-field
        // limit on the submit form is the limit that decides.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES * 2))
        .with_state(state)
}
