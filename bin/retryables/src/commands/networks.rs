//! Networks Subcommand

use crate::{
    flags::GlobalArgs,
    render::{self, OutputFormat},
};
use clap::Parser;
use retryable_protocol::NITRO_CHAINS;

/// The `networks` Subcommand
///
/// The `networks` subcommand lists the known Nitro chains and their parent chain contracts.
///
/// # Usage
///
/// ```sh
/// retryables networks [FLAGS] [OPTIONS]
/// ```
#[derive(Parser, Default, Debug, Clone, PartialEq, Eq)]
#[command(about = "Lists the known Nitro chains")]
pub struct NetworksCommand {
    /// The output format.
    #[arg(long, short = 'o', default_value = "table", env = "RETRYABLES_OUTPUT")]
    pub output: OutputFormat,
}

impl NetworksCommand {
    /// Runs the subcommand.
    pub fn run(self, _args: &GlobalArgs) -> anyhow::Result<()> {
        println!("{}", render::networks(&NITRO_CHAINS, self.output)?);
        Ok(())
    }
}
