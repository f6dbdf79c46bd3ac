use std::path::PathBuf;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
pub struct HandinArgs {
    /// Directory where submitted files are stored
    #[clap(short, long, env = "HANDIN_UPLOADS", default_value = "uploads/assignments")]
    pub uploads: PathBuf,

    /// Database connection string
    #[clap(long, env = "HANDIN_DATABASE_URL", default_value = "sqlite:data.db")]
    pub database_url: String,

    /// Port
    #[clap(long, env = "HANDIN_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, env = "HANDIN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
