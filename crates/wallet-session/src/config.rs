//! Startup configuration handed to the gateway and the panel.
//!
//! Mostly data for the gateway (app metadata, wallet modules, chain list).
//! The panel itself only reads `networks`, the set offered by the switch
//! control.

use std::collections::HashSet;

use chain_eth::chains::{self, EvmChain};
use chain_eth::{ChainId, EthError};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::NetworkOption;

/// Wallet integrations the gateway is initialised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletModule {
    Injected,
    WalletConnect,
    WalletLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedWallet {
    pub name: String,
    pub url: String,
}

/// How the app presents itself inside wallet prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    pub icon: String,
    pub logo: String,
    pub description: String,
    #[serde(default)]
    pub recommended_injected_wallets: Vec<RecommendedWallet>,
}

/// A chain the gateway may connect to. `id` is gateway hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub id: String,
    pub token: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    pub label: String,
    pub rpc_url: String,
}

impl ChainConfig {
    pub fn chain_id(&self) -> Result<ChainId, EthError> {
        ChainId::from_hex(&self.id)
    }
}

impl From<&EvmChain> for ChainConfig {
    fn from(chain: &EvmChain) -> Self {
        Self {
            id: chain.hex_id(),
            token: chain.symbol.to_string(),
            namespace: chain.namespace.to_string(),
            label: chain.name.to_string(),
            rpc_url: chain.rpc_url.to_string(),
        }
    }
}

fn default_namespace() -> String {
    "evm".to_string()
}

fn default_api_key_env() -> String {
    "INFURA_KEY".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelConfig {
    pub app: AppMetadata,
    pub wallets: Vec<WalletModule>,
    pub chains: Vec<ChainConfig>,
    /// Networks offered by the switch control.
    pub networks: Vec<NetworkOption>,
    /// Environment variable holding the RPC provider API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl PanelConfig {
    /// Mainnet plus the Ropsten and Rinkeby testnets, with Ropsten and
    /// Rinkeby offered for switching.
    pub fn sampled() -> Self {
        Self {
            app: AppMetadata {
                name: "My App".into(),
                icon: "https://upload.wikimedia.org/wikipedia/commons/a/a7/React-icon.svg".into(),
                logo: "https://upload.wikimedia.org/wikipedia/commons/a/a7/React-icon.svg".into(),
                description: "My app using Onboard".into(),
                recommended_injected_wallets: vec![
                    RecommendedWallet {
                        name: "Coinbase".into(),
                        url: "https://wallet.coinbase.com/".into(),
                    },
                    RecommendedWallet {
                        name: "MetaMask".into(),
                        url: "https://metamask.io".into(),
                    },
                ],
            },
            wallets: vec![
                WalletModule::WalletLink,
                WalletModule::WalletConnect,
                WalletModule::Injected,
            ],
            chains: chains::supported_chains()
                .into_iter()
                .map(ChainConfig::from)
                .collect(),
            networks: vec![
                NetworkOption {
                    id: chains::ROPSTEN.id(),
                    label: "Ropsten".into(),
                },
                NetworkOption {
                    id: chains::RINKEBY.id(),
                    label: "Rinkeby".into(),
                },
            ],
            api_key_env: default_api_key_env(),
        }
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wallets.is_empty() {
            return Err(ConfigError::Invalid("no wallet modules configured".into()));
        }

        let mut chain_ids = HashSet::new();
        for chain in &self.chains {
            let id = chain.chain_id()?;
            if !chain_ids.insert(id) {
                return Err(ConfigError::Invalid(format!("duplicate chain {id}")));
            }
        }

        let mut network_ids = HashSet::new();
        for network in &self.networks {
            if !network_ids.insert(network.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate network option {}",
                    network.id
                )));
            }
            if !chain_ids.contains(&network.id) {
                return Err(ConfigError::Invalid(format!(
                    "network option {} ({}) is not a configured chain",
                    network.id, network.label
                )));
            }
        }

        Ok(())
    }

    pub fn chain(&self, id: ChainId) -> Option<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.chain_id().map(|cid| cid == id).unwrap_or(false))
    }

    /// Fills `{api_key}` in every chain RPC URL.
    pub fn resolve_rpc_urls(&mut self, api_key: &str) {
        for chain in &mut self.chains {
            chain.rpc_url = chains::fill_api_key(&chain.rpc_url, api_key);
        }
    }

    /// Like [`Self::resolve_rpc_urls`], reading the key from `api_key_env`.
    pub fn resolve_rpc_urls_from_env(&mut self) -> Result<(), ConfigError> {
        let api_key = std::env::var(&self.api_key_env)
            .map_err(|_| ConfigError::MissingApiKey(self.api_key_env.clone()))?;
        self.resolve_rpc_urls(&api_key);
        Ok(())
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::sampled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TOML: &str = r#"
wallets = ["injected", "walletconnect"]

[app]
name = "Think Forward"
icon = "/logo.svg"
logo = "/logo.svg"
description = "Welcome to the world of crypto"

[[app.recommended_injected_wallets]]
name = "MetaMask"
url = "https://metamask.io"

[[chains]]
id = "0x1"
token = "ETH"
label = "Ethereum Mainnet"
rpc_url = "https://mainnet.infura.io/v3/{api_key}"

[[chains]]
id = "0x4"
token = "rETH"
label = "Ethereum Rinkeby Testnet"
rpc_url = "https://rinkeby.infura.io/v3/{api_key}"

[[networks]]
id = 4
label = "Rinkeby"
"#;

    #[test]
    fn sampled_config_is_valid() {
        let config = PanelConfig::sampled();
        config.validate().unwrap();
        assert_eq!(config.chains.len(), 3);
        assert_eq!(config.chains[0].id, "0x1");
        assert_eq!(config.chains[2].token, "rETH");
        let ids: Vec<u64> = config.networks.iter().map(|n| n.id.get()).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(config.api_key_env, "INFURA_KEY");
    }

    #[test]
    fn parses_toml() {
        let config = PanelConfig::from_toml_str(SAMPLE_TOML).unwrap();
        assert_eq!(config.app.name, "Think Forward");
        assert_eq!(
            config.wallets,
            vec![WalletModule::Injected, WalletModule::WalletConnect]
        );
        assert_eq!(config.chains[1].namespace, "evm");
        assert_eq!(config.networks[0].id, ChainId(4));
        assert_eq!(config.api_key_env, "INFURA_KEY");
    }

    #[test]
    fn rejects_network_outside_chain_list() {
        let toml = SAMPLE_TOML.replace("id = 4\nlabel = \"Rinkeby\"", "id = 3\nlabel = \"Ropsten\"");
        let err = PanelConfig::from_toml_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn rejects_bad_chain_id() {
        let toml = SAMPLE_TOML.replace("id = \"0x1\"", "id = \"1\"");
        let err = PanelConfig::from_toml_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::Chain(_)), "{err}");
    }

    #[test]
    fn rejects_empty_wallet_list() {
        let mut config = PanelConfig::sampled();
        config.wallets.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_chain() {
        let mut config = PanelConfig::sampled();
        let dup = config.chains[0].clone();
        config.chains.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = PanelConfig::from_toml_str("wallets = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn resolves_api_key() {
        let mut config = PanelConfig::sampled();
        config.resolve_rpc_urls("k3y");
        assert_eq!(config.chains[1].rpc_url, "https://ropsten.infura.io/v3/k3y");
        assert!(config.chains.iter().all(|c| !c.rpc_url.contains("{api_key}")));
    }

    #[test]
    fn missing_api_key_env_is_reported() {
        let mut config = PanelConfig::sampled();
        config.api_key_env = "WALLET_SESSION_TEST_UNSET_KEY".into();
        let err = config.resolve_rpc_urls_from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(ref v) if v == "WALLET_SESSION_TEST_UNSET_KEY"));
    }

    #[test]
    fn looks_up_chain_by_id() {
        let config = PanelConfig::sampled();
        let chain = config.chain(ChainId(3)).unwrap();
        assert_eq!(chain.label, "Ethereum Ropsten Testnet");
        assert!(config.chain(ChainId(5)).is_none());
    }
}
