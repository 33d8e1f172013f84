//! Credential generation.
//!
//! # Security
//! - Credentials live only in memory for the lifetime of the view
//! - Phrases and keys are never logged or serialized

use alloy::primitives::{hex, Address};
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{MnemonicBuilder, PrivateKeySigner};
use bip39::Mnemonic;

use crate::blockchain::types::{WalletError, WalletResult};

/// Entropy for a 12-word phrase.
const ENTROPY_BYTES: usize = 16;

/// A freshly generated address / recovery phrase / private key triple.
///
/// Immutable once generated.
#[derive(Clone)]
pub struct WalletCredential {
    address: Address,
    mnemonic_phrase: String,
    private_key: String,
}

impl WalletCredential {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn mnemonic_phrase(&self) -> &str {
        &self.mnemonic_phrase
    }

    /// 0x-prefixed hex private key.
    pub fn private_key_hex(&self) -> &str {
        &self.private_key
    }

    /// A signer for this credential's key.
    pub fn signer(&self) -> WalletResult<PrivateKeySigner> {
        parse_private_key(&self.private_key)
    }
}

impl std::fmt::Debug for WalletCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletCredential")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Produces self-contained credentials from system randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialGenerator;

impl CredentialGenerator {
    /// Generate a new 12-word credential on the default Ethereum path.
    pub fn generate(&self) -> WalletResult<WalletCredential> {
        let entropy = rand::random::<[u8; ENTROPY_BYTES]>();
        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| WalletError::Credential(format!("Mnemonic generation failed: {}", e)))?;
        let phrase = mnemonic.to_string();

        let signer = signer_from_phrase(&phrase)?;
        let credential = WalletCredential {
            address: signer.address(),
            mnemonic_phrase: phrase,
            private_key: hex::encode_prefixed(signer.to_bytes()),
        };

        tracing::info!(address = %credential.address, "Credential generated");
        Ok(credential)
    }
}

fn signer_from_phrase(phrase: &str) -> WalletResult<PrivateKeySigner> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .build()
        .map_err(|e| WalletError::Credential(format!("Key derivation failed: {}", e)))
}

fn parse_private_key(private_key_hex: &str) -> WalletResult<PrivateKeySigner> {
    let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
    key_hex
        .parse()
        .map_err(|e| WalletError::Credential(format!("Invalid private key format: {}", e)))
}

/// Address controlled by a hex private key (with or without 0x prefix).
pub fn address_from_private_key(private_key_hex: &str) -> WalletResult<Address> {
    Ok(parse_private_key(private_key_hex)?.address())
}

/// Address of the first account derived from a recovery phrase.
pub fn address_from_phrase(phrase: &str) -> WalletResult<Address> {
    Mnemonic::parse(phrase)
        .map_err(|e| WalletError::Credential(format!("Invalid mnemonic: {}", e)))?;
    Ok(signer_from_phrase(phrase)?.address())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's well-known development mnemonic and its first account.
    const TEST_PHRASE: &str = "test test test test test test test test test test test junk";
    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[test]
    fn test_address_from_private_key() {
        let address = address_from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(address.to_string().to_lowercase(), TEST_ADDRESS);

        let prefixed = address_from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(prefixed, address);
    }

    #[test]
    fn test_address_from_phrase() {
        let address = address_from_phrase(TEST_PHRASE).unwrap();
        assert_eq!(address.to_string().to_lowercase(), TEST_ADDRESS);
    }

    #[test]
    fn test_generated_credential_is_consistent() {
        let credential = CredentialGenerator.generate().unwrap();

        assert_eq!(credential.mnemonic_phrase().split_whitespace().count(), 12);
        assert_eq!(credential.private_key_hex().len(), 66);
        assert!(credential.private_key_hex().starts_with("0x"));
        assert_eq!(
            address_from_private_key(credential.private_key_hex()).unwrap(),
            credential.address()
        );
        assert_eq!(
            address_from_phrase(credential.mnemonic_phrase()).unwrap(),
            credential.address()
        );
        assert_eq!(credential.signer().unwrap().address(), credential.address());
    }

    #[test]
    fn test_generated_credentials_differ() {
        let a = CredentialGenerator.generate().unwrap();
        let b = CredentialGenerator.generate().unwrap();
        assert_ne!(a.address(), b.address());
        assert_ne!(a.mnemonic_phrase(), b.mnemonic_phrase());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let credential = CredentialGenerator.generate().unwrap();
        let debug = format!("{:?}", credential);
        assert!(!debug.contains(credential.private_key_hex()));
        assert!(!debug.contains(credential.mnemonic_phrase()));
    }

    #[test]
    fn test_invalid_inputs() {
        let err = address_from_private_key("invalid_key").unwrap_err();
        assert!(err.to_string().contains("Invalid private key"));

        let err = address_from_phrase("not a real phrase").unwrap_err();
        assert!(matches!(err, WalletError::Credential(_)));
    }
}
