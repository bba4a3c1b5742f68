//! Order-related enums.
//!
//! `OrderSide` and `EngineType` travel as integers on the wire and inside the
//! signed message; `OrderType` and `TimeInForce` are upper-case strings.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum OrderSide {
    #[default]
    Buy = 0,
    Sell = 1,
}

impl OrderSide {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Integer code used in the signed message.
    #[inline]
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Matching engine a product trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum EngineType {
    #[default]
    Perpetual = 0,
    Spot = 1,
}

impl EngineType {
    #[inline]
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perpetual => write!(f, "PERPETUAL"),
            Self::Spot => write!(f, "SPOT"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    #[default]
    Limit,
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "LIMIT"),
            Self::Market => write!(f, "MARKET"),
        }
    }
}

/// Time-in-force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-til-date (rests until expiry or cancel).
    #[default]
    #[serde(rename = "GTD")]
    GoodTilDate,
    /// Fill-or-kill.
    #[serde(rename = "FOK")]
    FillOrKill,
    /// Immediate-or-cancel.
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoodTilDate => write!(f, "GTD"),
            Self::FillOrKill => write!(f, "FOK"),
            Self::ImmediateOrCancel => write!(f, "IOC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), "0");
        assert_eq!(serde_json::to_string(&OrderSide::Sell).unwrap(), "1");
        let side: OrderSide = serde_json::from_str("1").unwrap();
        assert_eq!(side, OrderSide::Sell);
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
    }

    #[test]
    fn test_engine_type_codes() {
        assert_eq!(EngineType::Perpetual.as_u8(), 0);
        assert_eq!(EngineType::Spot.as_u8(), 1);
        assert_eq!(serde_json::to_string(&EngineType::Spot).unwrap(), "1");
    }

    #[test]
    fn test_string_enums() {
        assert_eq!(serde_json::to_string(&OrderType::Market).unwrap(), "\"MARKET\"");
        assert_eq!(
            serde_json::to_string(&TimeInForce::ImmediateOrCancel).unwrap(),
            "\"IOC\""
        );
        assert_eq!(TimeInForce::default().to_string(), "GTD");
    }
}
