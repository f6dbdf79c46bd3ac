#![deny(
    clippy::expect_used,
    clippy::future_not_send,
    clippy::pedantic,
    clippy::as_conversions,
    clippy::unwrap_used,
    unsafe_code
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::manual_non_exhaustive,
    clippy::multiple_crate_versions
)]

use std::io;

use clap::Parser;
use handin::{HandinArgs, logging, server};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    dotenvy::dotenv().ok();

    let args = HandinArgs::parse();

    logging::init_logging(&args.log_level);

    let listener = TcpListener::bind(format!("127.0.0.1:{}", args.port))
        .await
        .map_err(io::Error::other)?;

    tracing::info!(port = args.port, "handin listening");

    let app = server(args).await?;

    axum::serve(listener, app).await
}
