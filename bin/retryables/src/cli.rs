//! Contains the retryables CLI.

use crate::{
    commands::{DiscoverCommand, FindCommand, NetworksCommand},
    flags::GlobalArgs,
    version,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use retryable_cli::{CliError, cli_styles};
use std::future::Future;

/// Subcommands for the CLI.
#[derive(Debug, PartialEq, Eq, Clone, Subcommand)]
#[allow(clippy::large_enum_variant)]
pub enum Commands {
    /// Finds retryable tickets that were not redeemed.
    #[command(alias = "f")]
    Find(FindCommand),
    /// Lists the inboxes feeding a bridge.
    #[command(alias = "d")]
    Discover(DiscoverCommand),
    /// Lists the known Nitro chains.
    #[command(alias = "n", alias = "chains")]
    Networks(NetworksCommand),
}

/// The retryables CLI.
#[derive(Parser, Clone, Debug)]
#[command(
    author,
    version = version::SHORT_VERSION,
    long_version = version::LONG_VERSION,
    about,
    styles = cli_styles(),
    long_about = None
)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.global.init_tracing()?;
        self.global.init_metrics()?;

        match self.subcommand {
            Commands::Find(find) => Self::run_until_ctrl_c(find.run(&self.global)),
            Commands::Discover(discover) => Self::run_until_ctrl_c(discover.run(&self.global)),
            Commands::Networks(networks) => networks.run(&self.global),
        }
    }

    /// Run until ctrl-c is pressed. An interrupted command fails with [`CliError::Interrupted`].
    pub fn run_until_ctrl_c<F>(fut: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let rt = Self::tokio_runtime().map_err(|e| anyhow::anyhow!(e))?;
        rt.block_on(Self::run_until(fut, tokio::signal::ctrl_c()))
    }

    /// Runs `fut` unless `shutdown` resolves first.
    async fn run_until<F, S>(fut: F, shutdown: S) -> Result<()>
    where
        F: Future<Output = Result<()>>,
        S: Future,
    {
        tokio::select! {
            res = fut => res,
            _ = shutdown => {
                tracing::warn!(target: "cli", "Received Ctrl-C, shutting down...");
                Err(CliError::Interrupted.into())
            }
        }
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled
    pub fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const RPCS: [&str; 4] =
        ["--parent-rpc", "http://localhost:8545", "--child-rpc", "http://localhost:8547"];

    #[rstest]
    #[case::find_long("find")]
    #[case::find_short("f")]
    fn test_parse_find(#[case] alias: &str) {
        let mut argv = vec!["retryables", alias, "--network", "arb1"];
        argv.extend(RPCS);
        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(matches!(cli.subcommand, Commands::Find(_)));
    }

    #[rstest]
    #[case::discover_long("discover")]
    #[case::discover_short("d")]
    fn test_parse_discover(#[case] alias: &str) {
        let argv = ["retryables", alias, "--network", "nova", "--parent-rpc", "http://x:1"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(matches!(cli.subcommand, Commands::Discover(_)));
    }

    #[rstest]
    #[case::networks_long("networks")]
    #[case::networks_short("n")]
    #[case::networks_alias("chains")]
    fn test_parse_networks(#[case] alias: &str) {
        let cli = Cli::try_parse_from(["retryables", alias]).unwrap();
        assert_eq!(cli.subcommand, Commands::Networks(Default::default()));
    }

    #[rstest]
    #[case::verbose(&["retryables", "-vv", "networks"], 2)]
    #[case::after_subcommand(&["retryables", "networks", "-v"], 1)]
    #[case::none(&["retryables", "networks"], 0)]
    fn test_global_verbosity(#[case] argv: &[&str], #[case] expected: u8) {
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.global.log_args.verbosity, expected);
    }

    #[test]
    fn test_global_metrics_flags() {
        let cli = Cli::try_parse_from([
            "retryables",
            "networks",
            "--metrics.enabled",
            "--metrics.port",
            "9191",
        ])
        .unwrap();
        assert!(cli.global.metrics.enabled);
        assert_eq!(cli.global.metrics.port, 9191);
    }

    #[tokio::test]
    async fn test_interrupted_command_fails() {
        let err = Cli::run_until(std::future::pending(), async {}).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Interrupted)));
    }

    #[tokio::test]
    async fn test_completed_command_succeeds() {
        Cli::run_until(async { Ok(()) }, std::future::pending::<()>()).await.unwrap();
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["retryables"]).is_err());
    }
}
