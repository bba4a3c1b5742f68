//! Core domain types for the Ethereal exchange client.
//!
//! This crate provides the pure, I/O-free pieces shared by the signer and
//! the REST client:
//! - `scale_1e9`, `Price`, `Quantity`: exact fixed-point conversion
//! - `OrderIntent`, `CancelIntent`, `Intent`: what gets signed and submitted
//! - `OrderSide`, `EngineType`, `OrderType`, `TimeInForce`: trading enums

pub mod decimal;
pub mod error;
pub mod intent;
pub mod order;

pub use decimal::{scale_1e9, scale_decimal, Price, Quantity, FIXED_POINT_DECIMALS, FIXED_POINT_SCALE};
pub use error::{ScaleError, ScaleResult, SchemaError, SchemaResult};
pub use intent::{
    CancelIntent, Intent, IntentKind, OrderCancelled, OrderCreated, OrderIntent, SignedEnvelope,
    Subaccount,
};
pub use order::{EngineType, OrderSide, OrderType, TimeInForce};
