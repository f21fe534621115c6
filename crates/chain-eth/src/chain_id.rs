use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EthError;

/// Numeric identifier of an EVM network.
///
/// Held as a plain integer everywhere inside the panel. Wallet gateways speak
/// `0x`-prefixed lowercase hex (`"0x4"` for Rinkeby), so conversion happens
/// only at that boundary via [`ChainId::to_hex`] and [`ChainId::from_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Returns the raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Encodes the id the way gateways expect it: `"0x" + lowercase hex`.
    pub fn to_hex(self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Decodes a gateway hex chain id. Accepts `0x` or `0X`, rejects empty,
    /// non-hex and values that overflow a `u64`.
    pub fn from_hex(s: &str) -> Result<Self, EthError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| EthError::InvalidChainId(format!("{s:?} must start with 0x")))?;

        if digits.is_empty() {
            return Err(EthError::InvalidChainId(format!("{s:?} has no hex digits")));
        }

        // from_str_radix tolerates a leading sign, hex ids never carry one.
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EthError::InvalidChainId(format!(
                "{s:?} contains non-hex characters"
            )));
        }

        u64::from_str_radix(digits, 16)
            .map(ChainId)
            .map_err(|e| EthError::InvalidChainId(format!("{s:?}: {e}")))
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        ChainId(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
