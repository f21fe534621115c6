use serde::Serialize;

use crate::chain_id::ChainId;

/// Placeholder substituted with the provider API key in RPC URL templates.
pub const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// Definition of an EVM-compatible blockchain network.
#[derive(Debug, Clone, Serialize)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub namespace: &'static str,
    /// RPC endpoint, parameterised by [`API_KEY_PLACEHOLDER`].
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub is_testnet: bool,
}

impl EvmChain {
    pub fn id(&self) -> ChainId {
        ChainId(self.chain_id)
    }

    /// Chain id as the gateway expects it (`"0x4"`).
    pub fn hex_id(&self) -> String {
        self.id().to_hex()
    }

    /// RPC endpoint with the provider API key filled in.
    pub fn rpc_url_with_key(&self, api_key: &str) -> String {
        fill_api_key(self.rpc_url, api_key)
    }
}

/// Substitutes every [`API_KEY_PLACEHOLDER`] in `template` with `api_key`.
pub fn fill_api_key(template: &str, api_key: &str) -> String {
    template.replace(API_KEY_PLACEHOLDER, api_key)
}

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    name: "Ethereum Mainnet",
    symbol: "ETH",
    namespace: "evm",
    rpc_url: "https://mainnet.infura.io/v3/{api_key}",
    explorer_url: "https://etherscan.io",
    is_testnet: false,
};

/// Ropsten Testnet (chain ID 3).
pub const ROPSTEN: EvmChain = EvmChain {
    chain_id: 3,
    name: "Ethereum Ropsten Testnet",
    symbol: "tROP",
    namespace: "evm",
    rpc_url: "https://ropsten.infura.io/v3/{api_key}",
    explorer_url: "https://ropsten.etherscan.io",
    is_testnet: true,
};

/// Rinkeby Testnet (chain ID 4).
pub const RINKEBY: EvmChain = EvmChain {
    chain_id: 4,
    name: "Ethereum Rinkeby Testnet",
    symbol: "rETH",
    namespace: "evm",
    rpc_url: "https://rinkeby.infura.io/v3/{api_key}",
    explorer_url: "https://rinkeby.etherscan.io",
    is_testnet: true,
};

/// All supported EVM chains.
const ALL_CHAINS: &[&EvmChain] = &[&ETHEREUM, &ROPSTEN, &RINKEBY];

/// Returns the chain definition for a given chain ID, or `None` if unsupported.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS
        .iter()
        .find(|c| c.chain_id == chain_id)
        .copied()
}

/// Returns all supported EVM chain definitions.
pub fn supported_chains() -> Vec<&'static EvmChain> {
    ALL_CHAINS.to_vec()
}
