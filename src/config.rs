use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_DATA_FILE: &str = "library_data.json";
pub const DATA_FILE_ENV: &str = "LIBRARY_DATA_FILE";
pub const DEFAULT_LOG_FILTER: &str = "library_mcp=info";

#[derive(Debug, Clone, Parser)]
#[command(name = "library-mcp", version, about = "Book inventory with borrow/return tracking")]
pub struct Config {
    /// JSON file holding the book collection
    #[arg(env = DATA_FILE_ENV, default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// Run the interactive text menu instead of the MCP server (stdio)
    #[arg(long)]
    pub menu: bool,
}
