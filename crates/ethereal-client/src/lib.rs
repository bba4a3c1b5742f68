//! REST transport and concurrent batch submission of signed Ethereal intents.
//!
//! `EtherealClient::connect` fetches the signing config, installs the
//! EIP-712 domain once and binds the sender's first subaccount. Intents are
//! then submitted one at a time or as batches through `BatchSubmitter`.

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod rest;
pub mod transport;

pub use batch::{BatchConfig, BatchResult, BatchSubmitter};
pub use client::EtherealClient;
pub use config::{ClientConfig, Environment};
pub use error::{ClientError, ClientResult};
pub use rest::RestClient;
pub use transport::{BoxFuture, IntentReceipt, IntentTransport, MockTransport};
