//! EIP-712 signing of intents.
//!
//! 1. `structHash` of the message under its primary type
//! 2. `digest = keccak256(0x19 || 0x01 || domainSeparator || structHash)`
//! 3. secp256k1 signature over `digest`, recovery id shifted into {27, 28}
//! 4. `"0x" + hex(r || s || v)`

use std::sync::Arc;

use alloy::primitives::{keccak256, Address, PrimitiveSignature, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use ethereal_core::Intent;
use once_cell::sync::OnceCell;

use crate::builder::to_message;
use crate::domain::{DomainSeparator, TypedDataContext};
use crate::error::{SignerError, SignerResult};
use crate::key::KeyManager;
use crate::value::Message;

/// Offset added to the raw recovery id (0 or 1).
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// `keccak256(0x19 || 0x01 || domain_separator || struct_hash)`.
pub fn signing_digest(domain_separator: &DomainSeparator, struct_hash: &B256) -> B256 {
    let mut buf = [0u8; 66];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(domain_separator.as_b256().as_slice());
    buf[34..66].copy_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

/// `r || s || v` with `v` in {27, 28}.
pub fn normalize_signature(signature: &PrimitiveSignature) -> [u8; 65] {
    let mut out = [0u8; 65];
    out[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    out[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    out[64] = u8::from(signature.v()) + RECOVERY_ID_OFFSET;
    out
}

/// Sign a 32-byte digest and return the `0x`-prefixed hex signature.
pub fn sign_digest(signer: &PrivateKeySigner, digest: &B256) -> SignerResult<String> {
    // NOTE: Do not log the signature
    let signature = signer.sign_hash_sync(digest)?;
    Ok(format!("0x{}", hex::encode(normalize_signature(&signature))))
}

/// Signs intents for one session.
///
/// The typed-data context (schema and domain separator) is installed exactly
/// once, after the exchange config has been fetched. Any signing attempt
/// before that fails with `SignerError::DomainNotInitialized`.
pub struct IntentSigner {
    key_manager: Arc<KeyManager>,
    typed_data: OnceCell<TypedDataContext>,
}

impl IntentSigner {
    pub fn new(key_manager: Arc<KeyManager>) -> Self {
        Self {
            key_manager,
            typed_data: OnceCell::new(),
        }
    }

    /// Signer with the typed-data context already installed.
    pub fn with_typed_data(key_manager: Arc<KeyManager>, typed_data: TypedDataContext) -> Self {
        Self {
            key_manager,
            typed_data: OnceCell::with_value(typed_data),
        }
    }

    /// Install the session's typed-data context.
    ///
    /// # Errors
    /// `SignerError::DomainAlreadyInitialized` on a second call; the first
    /// context stays in place.
    pub fn install_typed_data(&self, typed_data: TypedDataContext) -> SignerResult<DomainSeparator> {
        let separator = typed_data.separator();
        self.typed_data
            .set(typed_data)
            .map_err(|_| SignerError::DomainAlreadyInitialized)?;
        tracing::info!(domain_separator = %separator, "typed-data domain installed");
        Ok(separator)
    }

    pub fn typed_data(&self) -> SignerResult<&TypedDataContext> {
        self.typed_data.get().ok_or(SignerError::DomainNotInitialized)
    }

    pub fn is_ready(&self) -> bool {
        self.typed_data.get().is_some()
    }

    pub fn domain_separator(&self) -> SignerResult<DomainSeparator> {
        self.typed_data().map(TypedDataContext::separator)
    }

    pub fn address(&self) -> Address {
        self.key_manager.address()
    }

    /// Hash `message` under `primary_type` and sign it.
    pub fn sign_message(&self, primary_type: &str, message: &Message) -> SignerResult<String> {
        let typed_data = self.typed_data()?;
        let struct_hash = typed_data.hash_struct(primary_type, message)?;
        let digest = signing_digest(&typed_data.separator(), &struct_hash);
        sign_digest(self.key_manager.signer(), &digest)
    }

    /// Sign an already stamped intent under its own primary type.
    pub fn sign_intent(&self, intent: &Intent) -> SignerResult<String> {
        // Checked first so an unready signer reports that, not a hash error.
        self.typed_data()?;
        let message = to_message(intent)?;
        self.sign_message(intent.kind().primary_type(), &message)
    }
}

impl std::fmt::Debug for IntentSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentSigner")
            .field("address", &self.address())
            .field("ready", &self.is_ready())
            .finish()
    }
}
