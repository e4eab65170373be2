pub mod handler;

use clap::Args;
use std::path::PathBuf;

use crate::config::DEFAULT_INPUT_FILE;

#[derive(Args, Debug)]
pub struct SyncCommand {
    /// CSV file to read products from
    #[arg(short, long, env = "INPUT_FILE", default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,

    /// Publication newly created products are published to
    #[arg(long, env = "PUBLICATION_ID")]
    pub publication: Option<String>,
}

pub use handler::handle_sync_command;
