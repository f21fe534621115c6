//! Ethereum/EVM chain support for the wallet connection panel.
//!
//! This crate provides:
//! - `ChainId`, a decimal chain identifier with the `0x`-hex codec wallet
//!   gateways expect on the wire
//! - The registry of EVM networks the panel can connect to, with RPC URL
//!   templating for provider API keys
//! - Address validation, EIP-55 checksums and display truncation

pub mod address;
pub mod chain_id;
pub mod chains;
pub mod error;

pub use chain_id::ChainId;
pub use error::EthError;
