//! Amount and address parsing for user input, and ether display formatting.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};

use crate::blockchain::types::{WalletError, WalletResult};

/// Decimal places of the native unit.
const ETHER_DECIMALS: usize = 18;

/// Format a wei value as ether without trailing zeros, e.g. `2.5` or `0.0`.
pub fn display_ether(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => format!("{}.0", formatted),
    }
}

/// Parse a non-negative ether-denominated decimal string into wei.
pub fn parse_amount(input: &str) -> WalletResult<U256> {
    let trimmed = input.trim();
    let invalid = |reason: &str| WalletError::InvalidAmount(format!("'{}' {}", input, reason));

    if trimmed.is_empty() {
        return Err(invalid("is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("is negative"));
    }

    let (whole, frac) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid("is not a decimal number"));
    }
    if !digits_only(whole) || !digits_only(frac) {
        return Err(invalid("is not a decimal number"));
    }
    if frac.len() > ETHER_DECIMALS {
        return Err(invalid("has more than 18 decimal places"));
    }

    let normalized = match (whole.is_empty(), frac.is_empty()) {
        (true, _) => format!("0.{}", frac),
        (false, true) => whole.to_string(),
        (false, false) => format!("{}.{}", whole, frac),
    };
    parse_ether(&normalized).map_err(|e| invalid(&format!("cannot be converted: {}", e)))
}

/// Parse a recipient address.
///
/// Requires the `0x` prefix and 40 hex digits. Mixed-case input must carry a
/// valid EIP-55 checksum.
pub fn parse_recipient(input: &str) -> WalletResult<Address> {
    let trimmed = input.trim();
    let invalid = |reason: &str| WalletError::InvalidRecipient(format!("'{}' {}", input, reason));

    let hex = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| invalid("must start with 0x"))?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("must be 40 hex digits"));
    }

    let is_mixed_case =
        hex.bytes().any(|b| b.is_ascii_lowercase()) && hex.bytes().any(|b| b.is_ascii_uppercase());
    if is_mixed_case {
        Address::parse_checksummed(trimmed, None).map_err(|_| invalid("has an invalid checksum"))
    } else {
        trimmed
            .parse::<Address>()
            .map_err(|e| invalid(&format!("is not an address: {}", e)))
    }
}
