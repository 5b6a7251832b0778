//! EIP-712 message signing
//!
//! Login data and formed orders are served as EIP-712 typed messages. A
//! [`MessageSigner`] turns such a message into a `0x`-prefixed hex signature.

use crate::{
    error::{Result, SwapRateError},
    types::account::Eip712Message,
};
use async_trait::async_trait;
use ethers::{
    signers::{LocalWallet, Signer},
    types::{transaction::eip712::Eip712, Address, Signature, H256},
};
use std::str::FromStr;

/// Signs typed messages on behalf of an address
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Checksummed address the signatures belong to
    fn address(&self) -> String;

    /// Sign an EIP-712 typed message, returning a `0x`-prefixed hex signature
    async fn sign_message(&self, message: &Eip712Message) -> Result<String>;
}

/// EIP-712 digest of a typed message
pub fn typed_data_digest(message: &Eip712Message) -> Result<[u8; 32]> {
    message
        .encode_eip712()
        .map_err(|e| SwapRateError::eip712(format!("Failed to encode EIP-712: {}", e)))
}

/// Recover the address that produced `signature` over `message`
pub fn recover_signer(message: &Eip712Message, signature: &str) -> Result<Address> {
    let digest = typed_data_digest(message)?;
    let signature = Signature::from_str(signature)?;
    Ok(signature.recover(H256(digest))?)
}

/// Signer backed by a local private key
#[derive(Debug, Clone)]
pub struct WalletSigner {
    wallet: LocalWallet,
}

impl WalletSigner {
    /// Wrap an existing wallet
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    /// Create a signer from a hex private key, with or without `0x`
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let wallet = LocalWallet::from_str(private_key)
            .map_err(|e| SwapRateError::signer(format!("Invalid private key: {}", e)))?;
        Ok(Self { wallet })
    }

    /// Underlying wallet
    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }
}

#[async_trait]
impl MessageSigner for WalletSigner {
    fn address(&self) -> String {
        ethers::utils::to_checksum(&self.wallet.address(), None)
    }

    async fn sign_message(&self, message: &Eip712Message) -> Result<String> {
        let digest = typed_data_digest(message)?;
        let signature = self
            .wallet
            .sign_hash(H256(digest))
            .map_err(|e| SwapRateError::signer(format!("Failed to sign EIP-712 digest: {}", e)))?;
        Ok(format!("0x{}", hex::encode(signature.to_vec())))
    }
}

/// Signer returning a predetermined signature, for tests
#[derive(Debug, Clone)]
pub struct MockMessageSigner {
    address: String,
    signature: String,
}

impl MockMessageSigner {
    /// Create a new mock signer
    pub fn new(address: &str, signature: &str) -> Self {
        Self {
            address: address.to_string(),
            signature: signature.to_string(),
        }
    }
}

#[async_trait]
impl MessageSigner for MockMessageSigner {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn sign_message(&self, _message: &Eip712Message) -> Result<String> {
        Ok(self.signature.clone())
    }
}
