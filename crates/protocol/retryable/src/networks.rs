//! Known Nitro chains and their parent chain messaging contracts.

use alloy_primitives::{Address, ChainId, address};

/// The parent chain contracts feeding a Nitro child chain's delayed inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "tabled", derive(tabled::Tabled))]
pub struct NitroChain {
    /// The short name used on the command line.
    pub name: &'static str,
    /// The child chain id.
    pub chain_id: ChainId,
    /// The parent chain id.
    pub parent_chain_id: ChainId,
    /// The inbox emitting `InboxMessageDelivered`.
    pub inbox: Address,
    /// The bridge emitting `MessageDelivered`.
    pub bridge: Address,
}

/// Arbitrum One.
pub const ARBITRUM_ONE: NitroChain = NitroChain {
    name: "arb1",
    chain_id: 42161,
    parent_chain_id: 1,
    inbox: address!("0x4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f"),
    bridge: address!("0x8315177aB297bA92A06054cE80a67Ed4DBd7ed3a"),
};

/// Arbitrum Nova.
pub const ARBITRUM_NOVA: NitroChain = NitroChain {
    name: "nova",
    chain_id: 42170,
    parent_chain_id: 1,
    inbox: address!("0xc4448b71118c9071Bcb9734A0EAc55D18A153949"),
    bridge: address!("0xC1Ebd02f738644983b6C4B2d440b8e77DdE276Bd"),
};

/// Arbitrum Sepolia.
pub const ARBITRUM_SEPOLIA: NitroChain = NitroChain {
    name: "arb-sepolia",
    chain_id: 421614,
    parent_chain_id: 11155111,
    inbox: address!("0xaAe29B0366299461418F5324a79Afc425BE5ae21"),
    bridge: address!("0x38f918D0E9F1b721EDaA41302E399fa1B79333a9"),
};

/// Every known chain.
pub const NITRO_CHAINS: [NitroChain; 3] = [ARBITRUM_ONE, ARBITRUM_NOVA, ARBITRUM_SEPOLIA];

impl NitroChain {
    /// Looks up a known chain by name or numeric chain id.
    pub fn lookup(name_or_id: &str) -> Option<Self> {
        let by_id = name_or_id.parse::<ChainId>().ok();
        NITRO_CHAINS.into_iter().find(|chain| {
            chain.name.eq_ignore_ascii_case(name_or_id) || by_id == Some(chain.chain_id)
        })
    }
}
