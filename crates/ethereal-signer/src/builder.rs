//! Stamping intents and converting them into typed-data messages.
//!
//! `build` fills in the session fields (`sender`, `subaccount`, `nonce`,
//! `signedAt`). `to_message` then maps the stamped intent onto the field
//! names of its primary type. Scaled amounts go in as decimal strings so no
//! JSON number width limits them; the declared ABI width is applied by the
//! hasher.

use alloy::primitives::Address;
use ethereal_core::{CancelIntent, Intent, OrderIntent};

use crate::error::SignerResult;
use crate::nonce::{Clock, Nonce, NonceManager, SystemClock};
use crate::value::Message;

/// Stamps intents with the session's sender, subaccount and a fresh nonce.
pub struct MessageBuilder<C: Clock = SystemClock> {
    sender: Address,
    subaccount: String,
    nonces: NonceManager<C>,
}

impl MessageBuilder<SystemClock> {
    pub fn new(sender: Address, subaccount: impl Into<String>) -> Self {
        Self::with_clock(sender, subaccount, SystemClock)
    }
}

impl<C: Clock> MessageBuilder<C> {
    pub fn with_clock(sender: Address, subaccount: impl Into<String>, clock: C) -> Self {
        Self {
            sender,
            subaccount: subaccount.into(),
            nonces: NonceManager::new(clock),
        }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    /// `bytes32` subaccount name.
    pub fn subaccount(&self) -> &str {
        &self.subaccount
    }

    /// Stamp `intent` in place and return the nonce it received.
    ///
    /// Orders also get `signedAt`; cancels only carry the nonce.
    pub fn build(&self, intent: &mut Intent) -> Nonce {
        let nonce = self.nonces.next();
        let sender = self.sender.to_checksum(None);

        match intent {
            Intent::Order(order) => {
                order.sender = sender;
                order.subaccount = self.subaccount.clone();
                order.nonce = nonce.to_string();
                order.signed_at = nonce.signed_at();
            }
            Intent::Cancel(cancel) => {
                cancel.sender = sender;
                cancel.subaccount = self.subaccount.clone();
                cancel.nonce = nonce.to_string();
            }
        }
        nonce
    }
}

/// Field map of a stamped intent under its primary type.
///
/// # Errors
/// `SignerError::Scale` if quantity or price cannot be scaled.
pub fn to_message(intent: &Intent) -> SignerResult<Message> {
    match intent {
        Intent::Order(order) => order_message(order),
        Intent::Cancel(cancel) => Ok(cancel_message(cancel)),
    }
}

/// `TradeOrder` fields.
pub fn order_message(order: &OrderIntent) -> SignerResult<Message> {
    let quantity = order.quantity.scaled()?;
    let price = order.price.scaled()?;

    Ok(Message::new()
        .with("sender", order.sender.as_str())
        .with("subaccount", order.subaccount.as_str())
        .with("quantity", quantity.to_string())
        .with("price", price.to_string())
        .with("reduceOnly", order.reduce_only)
        .with("side", order.side.as_u8())
        .with("engineType", order.engine_type.as_u8())
        .with("productId", order.onchain_id)
        .with("nonce", order.nonce.as_str())
        .with("signedAt", order.signed_at))
}

/// `CancelOrder` fields.
pub fn cancel_message(cancel: &CancelIntent) -> Message {
    Message::new()
        .with("sender", cancel.sender.as_str())
        .with("subaccount", cancel.subaccount.as_str())
        .with("nonce", cancel.nonce.as_str())
}
