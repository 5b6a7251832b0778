//! Access tokens and message signing

pub mod access_token;
pub mod signer;

pub use access_token::{now_secs, require, AccessToken};
pub use signer::{MessageSigner, MockMessageSigner, WalletSigner};
