pub mod handler;

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PublishCommand {
    /// Product ids to publish, numeric or gid://shopify/Product/<id>
    pub ids: Vec<String>,

    /// File with one product id per line (# starts a comment)
    #[arg(long)]
    pub ids_file: Option<PathBuf>,

    /// Publication id to publish to
    #[arg(long, env = "PUBLICATION_ID")]
    pub publication: String,
}

pub use handler::handle_publish_command;
