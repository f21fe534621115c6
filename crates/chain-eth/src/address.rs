use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Label shown in place of an address when no account is connected.
pub const NO_ACCOUNT: &str = "No Account";

/// Splits off the `0x` prefix and checks the remainder is 40 hex digits.
fn hex_body(address: &str) -> Result<&str, EthError> {
    let body = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if body.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            body.len()
        )));
    }

    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    Ok(body)
}

/// Validates an account address reported by a wallet.
///
/// Malformed input is an error. Single-case addresses carry no checksum and
/// are accepted; mixed-case ones must match their EIP-55 encoding, otherwise
/// `Ok(false)` is returned.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    let body = hex_body(address)?;

    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    if !(has_upper && has_lower) {
        return Ok(true);
    }

    Ok(checksum_address(address)?[2..] == *body)
}

/// Applies EIP-55 mixed-case checksum encoding to an address of any case.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    let lower = hex_body(address)?.to_ascii_lowercase();
    let hash_hex = hex::encode(Keccak256::digest(lower.as_bytes()));

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        // Hash nibble i decides the case of character i.
        let nibble = u8::from_str_radix(&hash_hex[i..i + 1], 16).unwrap_or(0);
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }

    Ok(out)
}

/// Shortens an address for display: `0x5aAeb6053F...BeAed` becomes
/// `0x5a…ed` (prefix plus two leading and two trailing characters).
///
/// An empty address yields [`NO_ACCOUNT`]. Anything that is not `0x` followed
/// by at least five alphanumerics is returned unchanged.
pub fn truncate_address(address: &str) -> String {
    if address.is_empty() {
        return NO_ACCOUNT.to_string();
    }

    let Some(body) = address.strip_prefix("0x") else {
        return address.to_string();
    };

    if body.len() < 5 || !body.chars().all(|c| c.is_ascii_alphanumeric()) {
        return address.to_string();
    }

    format!("0x{}\u{2026}{}", &body[..2], &body[body.len() - 2..])
}
