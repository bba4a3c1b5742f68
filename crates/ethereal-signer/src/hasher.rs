//! EIP-712 struct hashing on top of alloy's dynamic typed-data encoder.
//!
//! The parsed [`TypeSchema`] is ingested into an alloy [`Resolver`], which
//! owns `encodeType` (primary type first, then referenced types in
//! alphabetical order), the type hash and the per-field ABI encoding. The
//! message is coerced from JSON against the declared types, so the declared
//! ABI type alone decides width, range and padding.
//!
//! Checked here before delegating: the primary type exists and the message
//! carries exactly the fields it declares.

use crate::error::{HashError, HashResult};
use crate::schema::{TypeSchema, TypedField};
use crate::value::Message;
use alloy::dyn_abi::{PropertyDef, Resolver, TypeDef, TypedData};
use alloy::primitives::B256;
use alloy::sol_types::Eip712Domain;
use serde_json::Value;

/// Ingest every struct type of `schema` into an alloy resolver.
///
/// # Errors
/// `HashError::InvalidType` if a type or field name is not a valid
/// EIP-712 identifier.
pub fn build_resolver(schema: &TypeSchema) -> HashResult<Resolver> {
    let mut resolver = Resolver::default();
    for (name, fields) in schema.iter() {
        let props = fields
            .iter()
            .map(|f| {
                PropertyDef::new(f.type_name.as_str(), f.name.as_str())
                    .map_err(|e| invalid_type(&f.type_name, e))
            })
            .collect::<HashResult<Vec<_>>>()?;
        let def = TypeDef::new(name, props).map_err(|e| invalid_type(name, e))?;
        resolver.ingest(def);
    }
    Ok(resolver)
}

/// Canonical type signature of `primary_type`, dependencies included.
pub fn encode_type(schema: &TypeSchema, primary_type: &str) -> HashResult<String> {
    require_type(schema, primary_type)?;
    typed_data(&build_resolver(schema)?, primary_type, Value::Null)
        .encode_type()
        .map_err(|e| encoding(primary_type, e))
}

/// `keccak256(encodeType(primary_type))`.
pub fn type_hash(schema: &TypeSchema, primary_type: &str) -> HashResult<B256> {
    require_type(schema, primary_type)?;
    typed_data(&build_resolver(schema)?, primary_type, Value::Null)
        .type_hash()
        .map_err(|e| encoding(primary_type, e))
}

/// EIP-712 struct hash of `message` under `primary_type`.
///
/// Every declared field must be present, and the message must not carry
/// fields the type does not declare.
pub fn hash_struct(schema: &TypeSchema, primary_type: &str, message: &Message) -> HashResult<B256> {
    let resolver = build_resolver(schema)?;
    hash_struct_with(schema, &resolver, primary_type, message)
}

/// [`hash_struct`] against a resolver already built from `schema`.
pub fn hash_struct_with(
    schema: &TypeSchema,
    resolver: &Resolver,
    primary_type: &str,
    message: &Message,
) -> HashResult<B256> {
    let fields = require_type(schema, primary_type)?;

    if let Some((extra, _)) = message
        .iter()
        .find(|(name, _)| !fields.iter().any(|f| f.name == *name))
    {
        return Err(HashError::UnexpectedField {
            field: extra.to_string(),
            primary_type: primary_type.to_string(),
        });
    }
    if let Some(missing) = fields.iter().find(|f| message.get(&f.name).is_none()) {
        return Err(HashError::MissingField {
            field: missing.name.clone(),
        });
    }

    typed_data(resolver, primary_type, message.to_json())
        .hash_struct()
        .map_err(|e| encoding(primary_type, e))
}

/// Typed-data payload for struct-level operations; the domain is unused.
fn typed_data(resolver: &Resolver, primary_type: &str, message: Value) -> TypedData {
    TypedData {
        domain: Eip712Domain::default(),
        resolver: resolver.clone(),
        primary_type: primary_type.to_string(),
        message,
    }
}

fn require_type<'a>(schema: &'a TypeSchema, primary_type: &str) -> HashResult<&'a [TypedField]> {
    schema
        .get(primary_type)
        .ok_or_else(|| HashError::UnknownPrimaryType(primary_type.to_string()))
}

fn invalid_type(ty: &str, err: alloy::dyn_abi::Error) -> HashError {
    HashError::InvalidType {
        ty: ty.to_string(),
        reason: err.to_string(),
    }
}

fn encoding(primary_type: &str, err: alloy::dyn_abi::Error) -> HashError {
    HashError::Encoding {
        primary_type: primary_type.to_string(),
        reason: err.to_string(),
    }
}
