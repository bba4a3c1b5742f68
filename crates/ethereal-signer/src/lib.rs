//! EIP-712 typed-data hashing and signing of Ethereal trade intents.
//!
//! Per session:
//! 1. `TypedDataContext::from_rpc_config` parses the server schemas and
//!    computes the domain separator, installed once into an `IntentSigner`
//! 2. `MessageBuilder::build` stamps each intent with sender, subaccount and nonce
//! 3. `SigningPipeline::seal` hashes and signs it into a `SignedEnvelope`

pub mod builder;
pub mod domain;
pub mod error;
pub mod hasher;
pub mod key;
pub mod nonce;
pub mod pipeline;
pub mod schema;
pub mod signer;
pub mod value;

pub use builder::{cancel_message, order_message, to_message, MessageBuilder};
pub use domain::{
    eip712_domain_fields, parse_chain_id, DomainConfig, DomainSeparator, RpcConfig, TypedDataContext,
    EIP712_DOMAIN_TYPE,
};
pub use error::{HashError, HashResult, KeyError, KeyResult, SignerError, SignerResult};
pub use hasher::{build_resolver, encode_type, hash_struct, hash_struct_with, type_hash};
pub use key::{KeyManager, KeySource};
pub use nonce::{Clock, Nonce, NonceManager, SystemClock};
pub use pipeline::SigningPipeline;
pub use schema::{format_type_schema, parse_type_schema, TypeSchema, TypedField};
pub use signer::{normalize_signature, sign_digest, signing_digest, IntentSigner};
pub use value::Message;
