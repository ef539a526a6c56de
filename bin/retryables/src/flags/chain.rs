//! Parent chain connection and contract selection.

use alloy_primitives::Address;
use clap::Parser;
use retryable_cli::CliError;
use retryable_protocol::NitroChain;
use url::Url;

/// The network name that selects no preset.
const CUSTOM_NETWORK: &str = "custom";

/// Parent chain RPC and the messaging contracts to scan.
///
/// Explicit `--inbox` and `--bridge` addresses take precedence over the network preset.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct ParentChainArgs {
    /// The parent chain RPC URL.
    #[arg(long = "parent-rpc", alias = "l1-rpc", env = "RETRYABLES_PARENT_RPC")]
    pub parent_rpc: Url,
    /// A known network, by name or child chain id, or `custom`.
    #[arg(long, short = 'n', env = "RETRYABLES_NETWORK")]
    pub network: Option<String>,
    /// The inbox emitting `InboxMessageDelivered`.
    #[arg(long, env = "RETRYABLES_INBOX")]
    pub inbox: Option<Address>,
    /// The bridge emitting `MessageDelivered`.
    #[arg(long, env = "RETRYABLES_BRIDGE")]
    pub bridge: Option<Address>,
}

impl ParentChainArgs {
    /// Returns the selected network preset, if any.
    pub fn preset(&self) -> Result<Option<NitroChain>, CliError> {
        match self.network.as_deref() {
            None => Ok(None),
            Some(name) if name.eq_ignore_ascii_case(CUSTOM_NETWORK) => Ok(None),
            Some(name) => NitroChain::lookup(name)
                .map(Some)
                .ok_or_else(|| CliError::UnknownNetwork(name.to_string())),
        }
    }

    /// Returns the inbox address.
    pub fn inbox(&self) -> Result<Address, CliError> {
        self.inbox.or(self.preset()?.map(|chain| chain.inbox)).ok_or(CliError::MissingContracts)
    }

    /// Returns the bridge address.
    pub fn bridge(&self) -> Result<Address, CliError> {
        self.bridge.or(self.preset()?.map(|chain| chain.bridge)).ok_or(CliError::MissingContracts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use retryable_protocol::networks::{ARBITRUM_NOVA, ARBITRUM_ONE};

    fn parse(args: &[&str]) -> ParentChainArgs {
        let mut argv = vec!["test", "--parent-rpc", "http://localhost:8545"];
        argv.extend_from_slice(args);
        ParentChainArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_preset_contracts() {
        let args = parse(&["--network", "arb1"]);
        assert_eq!(args.inbox().unwrap(), ARBITRUM_ONE.inbox);
        assert_eq!(args.bridge().unwrap(), ARBITRUM_ONE.bridge);
    }

    #[test]
    fn test_preset_by_chain_id() {
        let args = parse(&["-n", "42170"]);
        assert_eq!(args.preset().unwrap(), Some(ARBITRUM_NOVA));
    }

    #[test]
    fn test_explicit_addresses_override_preset() {
        let inbox = address!("0x0000000000000000000000000000000000000001");
        let args = parse(&["--network", "arb1", "--inbox", &inbox.to_string()]);
        assert_eq!(args.inbox().unwrap(), inbox);
        assert_eq!(args.bridge().unwrap(), ARBITRUM_ONE.bridge);
    }

    #[test]
    fn test_custom_requires_addresses() {
        let args = parse(&["--network", "custom"]);
        assert_eq!(args.preset().unwrap(), None);
        assert!(matches!(args.inbox(), Err(CliError::MissingContracts)));
        assert!(matches!(args.bridge(), Err(CliError::MissingContracts)));
    }

    #[test]
    fn test_unknown_network() {
        let args = parse(&["--network", "mainnet-beta"]);
        assert!(matches!(
            args.inbox(),
            Err(CliError::UnknownNetwork(name)) if name == "mainnet-beta"
        ));
    }

    #[test]
    fn test_invalid_rpc_url() {
        assert!(ParentChainArgs::try_parse_from(["test", "--parent-rpc", "not a url"]).is_err());
    }
}
