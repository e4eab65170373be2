pub mod handler;

use clap::Args;

use super::output::OutputFormat;

#[derive(Args, Debug)]
pub struct PublicationsCommand {
    /// Output format; json prints the raw response body
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub use handler::handle_publications_command;
