//! Typed-data domain and the one-time domain separator.
//!
//! The exchange serves its domain parameters and the schema of every
//! primary type from `GET /v1/rpc/config`. The domain is hashed under the
//! four-field `EIP712Domain` type; the resulting separator is computed once
//! and reused for every signature of the session.

use crate::error::{HashError, HashResult, SignerResult};
use crate::hasher::{build_resolver, hash_struct_with};
use crate::schema::{TypeSchema, TypedField};
use crate::value::Message;
use alloy::dyn_abi::{Resolver, TypedData};
use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::Eip712Domain;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// `EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)`.
pub fn eip712_domain_fields() -> Vec<TypedField> {
    vec![
        TypedField::new("name", "string"),
        TypedField::new("version", "string"),
        TypedField::new("chainId", "uint256"),
        TypedField::new("verifyingContract", "address"),
    ]
}

/// Domain parameters as served by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
    /// Full `uint256`; accepted as a JSON number, a decimal string or a
    /// `0x` hex string.
    #[serde(
        deserialize_with = "chain_id_from_json",
        serialize_with = "chain_id_to_json"
    )]
    pub chain_id: U256,
    pub verifying_contract: String,
}

/// Parse a chain id written in decimal or `0x` hex.
pub fn parse_chain_id(input: &str) -> Result<U256, String> {
    let trimmed = input.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(digits) if !digits.is_empty() => U256::from_str_radix(digits, 16),
        Some(_) => return Err(format!("invalid chain id {input:?}")),
        None => U256::from_str_radix(trimmed, 10),
    };
    parsed.map_err(|e| format!("invalid chain id {input:?}: {e}"))
}

fn chain_id_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(U256::from(n)),
        Raw::Text(s) => parse_chain_id(&s).map_err(serde::de::Error::custom),
    }
}

fn chain_id_to_json<S: Serializer>(chain_id: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&chain_id.to_string())
}

impl DomainConfig {
    /// The domain as alloy's `EIP712Domain`.
    ///
    /// # Errors
    /// `HashError::InvalidValue` if `verifying_contract` is not an address.
    pub fn to_eip712_domain(&self) -> HashResult<Eip712Domain> {
        let verifying_contract: Address =
            self.verifying_contract
                .trim()
                .parse()
                .map_err(|e| HashError::InvalidValue {
                    field: "verifyingContract".to_string(),
                    reason: format!("{e}"),
                })?;
        Ok(Eip712Domain::new(
            Some(self.name.clone().into()),
            Some(self.version.clone().into()),
            Some(self.chain_id),
            Some(verifying_contract),
            None,
        ))
    }
}

/// Body of `GET /v1/rpc/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcConfig {
    pub domain: DomainConfig,
    /// `primaryType -> "type name,type name,..."`.
    pub signature_types: BTreeMap<String, String>,
}

/// 32-byte domain separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainSeparator(pub B256);

impl DomainSeparator {
    /// Struct hash of `domain` under the `EIP712Domain` type.
    pub fn compute(domain: &DomainConfig) -> HashResult<Self> {
        Ok(Self(domain.to_eip712_domain()?.hash_struct()))
    }

    #[inline]
    pub fn as_b256(&self) -> &B256 {
        &self.0
    }
}

impl fmt::Display for DomainSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Everything needed to hash intents for one session: the server schema
/// (with `EIP712Domain` merged in) and the resolver built from it, the
/// domain and its separator.
#[derive(Debug, Clone)]
pub struct TypedDataContext {
    schema: TypeSchema,
    resolver: Resolver,
    domain: DomainConfig,
    eip712_domain: Eip712Domain,
    separator: DomainSeparator,
}

impl TypedDataContext {
    /// Parse every server schema and compute the domain separator.
    ///
    /// # Errors
    /// `SignerError::Schema` for a malformed schema string,
    /// `SignerError::Hash` for an invalid type name or domain value.
    pub fn new(domain: DomainConfig, signature_types: &BTreeMap<String, String>) -> SignerResult<Self> {
        let schema = TypeSchema::from_signature_types(signature_types)?
            .with_type(EIP712_DOMAIN_TYPE, eip712_domain_fields());
        let resolver = build_resolver(&schema)?;
        let eip712_domain = domain.to_eip712_domain()?;
        let separator = DomainSeparator(eip712_domain.hash_struct());
        Ok(Self {
            schema,
            resolver,
            domain,
            eip712_domain,
            separator,
        })
    }

    pub fn from_rpc_config(config: &RpcConfig) -> SignerResult<Self> {
        Self::new(config.domain.clone(), &config.signature_types)
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    pub fn domain(&self) -> &DomainConfig {
        &self.domain
    }

    pub fn separator(&self) -> DomainSeparator {
        self.separator
    }

    /// Struct hash of `message` under `primary_type`.
    pub fn hash_struct(&self, primary_type: &str, message: &Message) -> HashResult<B256> {
        hash_struct_with(&self.schema, &self.resolver, primary_type, message)
    }

    /// Full typed-data payload (`eth_signTypedData` shape) for `message`.
    pub fn typed_data(&self, primary_type: &str, message: &Message) -> TypedData {
        TypedData {
            domain: self.eip712_domain.clone(),
            resolver: self.resolver.clone(),
            primary_type: primary_type.to_string(),
            message: message.to_json(),
        }
    }
}
