//! Shared fixtures for client integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::primitives::U256;
use ethereal_core::{EngineType, Intent, OrderIntent, OrderSide};
use ethereal_signer::{
    DomainConfig, IntentSigner, KeyManager, MessageBuilder, SigningPipeline, TypedDataContext,
};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

pub const PRIVATE_KEY: &str = "0bb5d63b84421e1268dda020818ae30cf26e7f10e321fb820a8aa69216dea92a";
pub const CHECKSUM_ADDRESS: &str = "0x9e4F7e220113D0B12BE4996ad8b73A09AAacDb2C";
pub const SUBACCOUNT_NAME: &str =
    "0x7072696d61727900000000000000000000000000000000000000000000000000";
pub const TRADE_ORDER: &str = "address sender,bytes32 subaccount,uint128 quantity,uint128 price,bool reduceOnly,uint8 side,uint8 engineType,uint32 productId,uint64 nonce,uint64 signedAt";
pub const CANCEL_ORDER: &str = "address sender,bytes32 subaccount,uint64 nonce";
pub const DOMAIN_SEPARATOR: &str =
    "0x2d258fb6543ebfc5deb7bfbdb5734fe6e3645a5e4c7fa70f8d2d69001c620d09";

pub fn rpc_config_json() -> Value {
    json!({
        "domain": {
            "name": "Ethereal",
            "version": "1",
            "chainId": 996353,
            "verifyingContract": "0xb3cdc82035c495c484c9ff11ed5f3ff6d342e3cc"
        },
        "signatureTypes": {
            "TradeOrder": TRADE_ORDER,
            "CancelOrder": CANCEL_ORDER
        }
    })
}

pub fn subaccounts_json() -> Value {
    json!({
        "data": [{
            "id": "5f6e1a40-0000-4000-8000-000000000001",
            "name": SUBACCOUNT_NAME,
            "account": CHECKSUM_ADDRESS
        }]
    })
}

pub fn key_manager() -> KeyManager {
    KeyManager::from_hex(PRIVATE_KEY, None).unwrap()
}

pub fn typed_data() -> TypedDataContext {
    let mut types = BTreeMap::new();
    types.insert("TradeOrder".to_string(), TRADE_ORDER.to_string());
    types.insert("CancelOrder".to_string(), CANCEL_ORDER.to_string());
    TypedDataContext::new(
        DomainConfig {
            name: "Ethereal".into(),
            version: "1".into(),
            chain_id: U256::from(996353u64),
            verifying_contract: "0xb3cdc82035c495c484c9ff11ed5f3ff6d342e3cc".into(),
        },
        &types,
    )
    .unwrap()
}

/// Pipeline for the test key; `ready = false` leaves the domain uninstalled.
pub fn pipeline(ready: bool) -> SigningPipeline {
    let key = Arc::new(key_manager());
    let builder = Arc::new(MessageBuilder::new(key.address(), SUBACCOUNT_NAME));
    let signer = if ready {
        IntentSigner::with_typed_data(key, typed_data())
    } else {
        IntentSigner::new(key)
    };
    SigningPipeline::new(Arc::new(signer), builder)
}

pub fn order(client_order_id: &str) -> OrderIntent {
    OrderIntent::limit(2, EngineType::Perpetual, OrderSide::Buy, dec!(0.5), dec!(3000.25))
        .with_client_order_id(client_order_id)
}

pub fn order_intent(client_order_id: &str) -> Intent {
    order(client_order_id).into()
}
