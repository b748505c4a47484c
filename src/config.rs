//! Runtime configuration
//!
//! Three required settings come from the environment (or flags): the Notion
//! integration token and the two database ids. The archive path and the
//! throttle interval have defaults matching the original run.

use clap::Parser;
use std::path::PathBuf;

/// Command-line and environment configuration
#[derive(Parser, Debug)]
#[command(name = "grammophon-import")]
#[command(about = "One-off migration of the grammophon YAML archive into Notion")]
#[command(version)]
pub struct Args {
    /// Notion integration token
    #[arg(long, env = "NOTION_KEY", hide_env_values = true)]
    pub notion_key: String,

    /// Id of the Notion database holding playlist records
    #[arg(long, env = "NOTION_PLAYLISTS_DB_ID")]
    pub playlists_db_id: String,

    /// Id of the Notion database holding work records
    #[arg(long, env = "NOTION_WORKS_DB_ID")]
    pub works_db_id: String,

    /// Path to the legacy YAML archive
    #[arg(long, default_value = "data/grammophon.yaml")]
    pub archive: PathBuf,

    /// Minimum spacing between Notion API calls, in milliseconds
    #[arg(long, default_value = "500")]
    pub interval_ms: u64,
}
