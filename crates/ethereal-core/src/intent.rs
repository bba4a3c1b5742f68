//! Trade intents and the records the exchange returns for them.
//!
//! `sender`, `subaccount`, `nonce` and `signedAt` are stamped by the signing
//! side right before hashing. Callers construct intents with those fields
//! empty and never set them directly.

use crate::decimal::{Price, Quantity};
use crate::order::{EngineType, OrderSide, OrderType, TimeInForce};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

fn wire_quantity<S: Serializer>(value: &Quantity, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_wire())
}

fn wire_price<S: Serializer>(value: &Price, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_wire())
}

/// Order placement intent (`TradeOrder`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIntent {
    #[serde(default)]
    pub subaccount: String,
    #[serde(default)]
    pub sender: String,
    /// Nanosecond epoch timestamp as decimal digits.
    #[serde(default)]
    pub nonce: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(serialize_with = "wire_quantity")]
    pub quantity: Quantity,
    pub side: OrderSide,
    /// Product id used on-chain (`productId` in the signed message).
    pub onchain_id: u64,
    pub engine_type: EngineType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    pub reduce_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<i64>,
    /// Seconds since epoch, derived from `nonce`.
    #[serde(default)]
    pub signed_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_contingency_type: Option<i32>,
    #[serde(serialize_with = "wire_price")]
    pub price: Price,
    pub time_in_force: TimeInForce,
    pub post_only: bool,
}

impl OrderIntent {
    /// Good-til-date limit order.
    pub fn limit(
        onchain_id: u64,
        engine_type: EngineType,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            subaccount: String::new(),
            sender: String::new(),
            nonce: String::new(),
            order_type: OrderType::Limit,
            quantity: Quantity::new(quantity),
            side,
            onchain_id,
            engine_type,
            client_order_id: None,
            reduce_only: false,
            close: None,
            stop_price: None,
            stop_type: None,
            signed_at: 0,
            expires_at: None,
            group_id: None,
            group_contingency_type: None,
            price: Price::new(price),
            time_in_force: TimeInForce::GoodTilDate,
            post_only: false,
        }
    }

    /// Immediate-or-cancel market order. Price is zero on the wire.
    pub fn market(onchain_id: u64, engine_type: EngineType, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            order_type: OrderType::Market,
            time_in_force: TimeInForce::ImmediateOrCancel,
            ..Self::limit(onchain_id, engine_type, side, quantity, Decimal::ZERO)
        }
    }

    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    pub fn with_reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    pub fn with_post_only(mut self, post_only: bool) -> Self {
        self.post_only = post_only;
        self
    }

    /// Expiry in seconds since epoch (GTD orders).
    pub fn with_expires_at(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Cancellation intent (`CancelOrder`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelIntent {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub subaccount: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub order_ids: Vec<String>,
    #[serde(default)]
    pub client_order_ids: Vec<String>,
}

impl CancelIntent {
    pub fn new(order_ids: Vec<String>) -> Self {
        Self {
            order_ids,
            ..Self::default()
        }
    }

    pub fn by_client_order_ids(client_order_ids: Vec<String>) -> Self {
        Self {
            client_order_ids,
            ..Self::default()
        }
    }

    /// Cancel every order from a set of creation responses.
    pub fn from_created(created: &[OrderCreated]) -> Self {
        Self::new(created.iter().map(|c| c.id.clone()).collect())
    }
}

/// Which endpoint and typed-data primary type an intent uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Order,
    Cancel,
}

impl IntentKind {
    /// EIP-712 primary type name.
    pub fn primary_type(&self) -> &'static str {
        match self {
            Self::Order => "TradeOrder",
            Self::Cancel => "CancelOrder",
        }
    }

    /// REST path the signed envelope is posted to.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Order => "/v1/order",
            Self::Cancel => "/v1/order/cancel",
        }
    }

    /// Short label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signable intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Intent {
    Order(OrderIntent),
    Cancel(CancelIntent),
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::Order(_) => IntentKind::Order,
            Self::Cancel(_) => IntentKind::Cancel,
        }
    }

    pub fn nonce(&self) -> &str {
        match self {
            Self::Order(o) => &o.nonce,
            Self::Cancel(c) => &c.nonce,
        }
    }

    /// Caller-assigned id, if any. Used to correlate logs.
    pub fn client_order_id(&self) -> Option<&str> {
        match self {
            Self::Order(o) => o.client_order_id.as_deref(),
            Self::Cancel(c) => c.client_order_ids.first().map(String::as_str),
        }
    }
}

impl From<OrderIntent> for Intent {
    fn from(order: OrderIntent) -> Self {
        Self::Order(order)
    }
}

impl From<CancelIntent> for Intent {
    fn from(cancel: CancelIntent) -> Self {
        Self::Cancel(cancel)
    }
}

/// Unit submitted to the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    pub data: Intent,
    /// `0x`-prefixed 65-byte signature.
    pub signature: String,
}

/// Response to an order placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub id: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub filled: String,
    #[serde(default)]
    pub result: String,
}

/// One entry of a cancellation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelled {
    pub id: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub result: String,
}

/// Trading subaccount owned by the signer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subaccount {
    pub id: String,
    /// `bytes32` hex name; this is what gets signed as `subaccount`.
    pub name: String,
    pub account: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_wire_json_field_names() {
        let order = OrderIntent::limit(2, EngineType::Perpetual, OrderSide::Sell, dec!(1.50), dec!(3000))
            .with_client_order_id("abc");
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["type"], "LIMIT");
        assert_eq!(json["quantity"], "1.5");
        assert_eq!(json["price"], "3000");
        assert_eq!(json["side"], 1);
        assert_eq!(json["onchainId"], 2);
        assert_eq!(json["engineType"], 0);
        assert_eq!(json["clientOrderId"], "abc");
        assert_eq!(json["timeInForce"], "GTD");
        assert_eq!(json["reduceOnly"], false);
        assert_eq!(json["postOnly"], false);
        assert_eq!(json["signedAt"], 0);
        assert!(json.get("expiresAt").is_none());
        assert!(json.get("close").is_none());
    }

    #[test]
    fn test_order_wire_json_key_order() {
        let order = OrderIntent::limit(1, EngineType::Spot, OrderSide::Buy, dec!(1), dec!(2));
        let json = serde_json::to_string(&order).unwrap();
        let subaccount = json.find("\"subaccount\"").unwrap();
        let sender = json.find("\"sender\"").unwrap();
        let price = json.find("\"price\"").unwrap();
        let post_only = json.find("\"postOnly\"").unwrap();
        assert!(subaccount < sender);
        assert!(sender < price);
        assert!(price < post_only);
    }

    #[test]
    fn test_market_order_defaults() {
        let order = OrderIntent::market(7, EngineType::Perpetual, OrderSide::Buy, dec!(0.25));
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.time_in_force, TimeInForce::ImmediateOrCancel);
        assert_eq!(order.price, Price::ZERO);
    }

    #[test]
    fn test_cancel_from_created() {
        let created = vec![
            OrderCreated {
                id: "a".into(),
                client_order_id: None,
                filled: "0".into(),
                result: "Ok".into(),
            },
            OrderCreated {
                id: "b".into(),
                client_order_id: Some("x".into()),
                filled: "0".into(),
                result: "Ok".into(),
            },
        ];
        let cancel = CancelIntent::from_created(&created);
        assert_eq!(cancel.order_ids, vec!["a".to_string(), "b".to_string()]);

        let json = serde_json::to_value(&cancel).unwrap();
        assert_eq!(json["orderIds"][1], "b");
        assert!(json["clientOrderIds"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_intent_kind_routing() {
        let order: Intent = OrderIntent::limit(1, EngineType::Perpetual, OrderSide::Buy, dec!(1), dec!(1)).into();
        let cancel: Intent = CancelIntent::new(vec!["1".into()]).into();

        assert_eq!(order.kind().primary_type(), "TradeOrder");
        assert_eq!(order.kind().path(), "/v1/order");
        assert_eq!(cancel.kind().primary_type(), "CancelOrder");
        assert_eq!(cancel.kind().path(), "/v1/order/cancel");
        assert_eq!(cancel.kind().to_string(), "cancel");
    }

    #[test]
    fn test_envelope_serializes_intent_untagged() {
        let envelope = SignedEnvelope {
            data: CancelIntent::new(vec!["id-1".into()]).into(),
            signature: "0xabc".into(),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"]["orderIds"][0], "id-1");
        assert_eq!(json["signature"], "0xabc");
    }

    #[test]
    fn test_order_created_tolerates_missing_optionals() {
        let created: OrderCreated = serde_json::from_str(r#"{"id":"o-1"}"#).unwrap();
        assert_eq!(created.id, "o-1");
        assert!(created.client_order_id.is_none());
        assert!(created.filled.is_empty());
    }
}
