//! Stamp, hash and sign one intent into a submittable envelope.

use std::sync::Arc;

use ethereal_core::{Intent, SignedEnvelope};
use tracing::debug;

use crate::builder::MessageBuilder;
use crate::error::SignerResult;
use crate::nonce::{Clock, SystemClock};
use crate::signer::IntentSigner;

/// `MessageBuilder` + `IntentSigner`.
///
/// Cheap to clone; every task of a batch holds its own handle.
pub struct SigningPipeline<C: Clock = SystemClock> {
    signer: Arc<IntentSigner>,
    builder: Arc<MessageBuilder<C>>,
}

impl<C: Clock> Clone for SigningPipeline<C> {
    fn clone(&self) -> Self {
        Self {
            signer: Arc::clone(&self.signer),
            builder: Arc::clone(&self.builder),
        }
    }
}

impl<C: Clock> SigningPipeline<C> {
    pub fn new(signer: Arc<IntentSigner>, builder: Arc<MessageBuilder<C>>) -> Self {
        Self { signer, builder }
    }

    pub fn signer(&self) -> &Arc<IntentSigner> {
        &self.signer
    }

    pub fn builder(&self) -> &Arc<MessageBuilder<C>> {
        &self.builder
    }

    /// Stamp `intent` with session fields and a fresh nonce, then sign it.
    ///
    /// # Errors
    /// `SignerError::DomainNotInitialized` before the domain is installed;
    /// scale, hash and EC failures otherwise. No nonce is consumed when the
    /// domain is missing.
    pub fn seal(&self, mut intent: Intent) -> SignerResult<SignedEnvelope> {
        self.signer.typed_data()?;

        let nonce = self.builder.build(&mut intent);
        let signature = self.signer.sign_intent(&intent)?;

        debug!(
            kind = %intent.kind(),
            nonce = %nonce,
            client_order_id = intent.client_order_id().unwrap_or_default(),
            "intent signed"
        );

        Ok(SignedEnvelope {
            data: intent,
            signature,
        })
    }
}
