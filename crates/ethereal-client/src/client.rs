//! Session-level client: bootstrap, single submissions and batches.

use std::sync::Arc;

use alloy::primitives::Address;
use ethereal_core::{CancelIntent, Intent, OrderCancelled, OrderCreated, OrderIntent, Subaccount};
use ethereal_signer::{
    DomainSeparator, IntentSigner, KeyManager, MessageBuilder, SigningPipeline, TypedDataContext,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::batch::{BatchResult, BatchSubmitter};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::rest::RestClient;

/// Connected trading session for one key and its first subaccount.
pub struct EtherealClient {
    config: ClientConfig,
    rest: Arc<RestClient>,
    subaccount: Subaccount,
    batch: BatchSubmitter<RestClient>,
}

impl EtherealClient {
    /// Load the key named by `config` and connect.
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let expected = config.expected_address()?;
        let key = KeyManager::load(&config.key_source(), expected)?;
        Self::connect_with_key(config, key).await
    }

    /// Bootstrap a session:
    /// 1. fetch the signing config and install the typed-data domain
    /// 2. fetch the sender's subaccounts and bind the first one
    pub async fn connect_with_key(config: ClientConfig, key: KeyManager) -> ClientResult<Self> {
        let rest = Arc::new(RestClient::new(&config)?);
        let key = Arc::new(key);
        let address = key.address();
        let signer = Arc::new(IntentSigner::new(key));

        let rpc_config = rest.fetch_rpc_config().await?;
        signer.install_typed_data(TypedDataContext::from_rpc_config(&rpc_config)?)?;

        let subaccount = rest
            .fetch_subaccounts(address)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NoSubaccount(address.to_checksum(None)))?;

        info!(
            base_url = %rest.base_url(),
            address = %address,
            subaccount_id = %subaccount.id,
            "Ethereal client connected"
        );

        let builder = Arc::new(MessageBuilder::new(address, subaccount.name.clone()));
        let pipeline = SigningPipeline::new(signer, builder);
        let batch = BatchSubmitter::new(pipeline, Arc::clone(&rest), config.batch_config());

        Ok(Self {
            config,
            rest,
            subaccount,
            batch,
        })
    }

    pub fn address(&self) -> Address {
        self.batch.pipeline().signer().address()
    }

    pub fn subaccount(&self) -> &Subaccount {
        &self.subaccount
    }

    pub fn domain_separator(&self) -> ClientResult<DomainSeparator> {
        Ok(self.batch.pipeline().signer().domain_separator()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// `POST /v1/order`.
    pub async fn place_order(&self, order: OrderIntent) -> ClientResult<OrderCreated> {
        self.batch
            .submit_one(order.into())
            .await?
            .into_created()
            .ok_or_else(|| ClientError::Decode("expected an order response".to_string()))
    }

    /// `POST /v1/order/cancel`.
    pub async fn cancel_orders(&self, cancel: CancelIntent) -> ClientResult<Vec<OrderCancelled>> {
        self.batch
            .submit_one(cancel.into())
            .await?
            .into_cancelled()
            .ok_or_else(|| ClientError::Decode("expected a cancellation response".to_string()))
    }

    /// Submit a mixed batch; see `BatchSubmitter::submit`.
    pub async fn submit_batch(&self, intents: Vec<Intent>, cancel: CancellationToken) -> BatchResult {
        self.batch.submit(intents, cancel).await
    }

    pub async fn batch_orders(&self, orders: Vec<OrderIntent>) -> BatchResult {
        let intents = orders.into_iter().map(Intent::from).collect();
        self.submit_batch(intents, CancellationToken::new()).await
    }

    pub async fn batch_cancels(&self, cancels: Vec<CancelIntent>) -> BatchResult {
        let intents = cancels.into_iter().map(Intent::from).collect();
        self.submit_batch(intents, CancellationToken::new()).await
    }
}

impl std::fmt::Debug for EtherealClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtherealClient")
            .field("base_url", &self.rest.base_url())
            .field("address", &self.address())
            .field("subaccount", &self.subaccount.id)
            .finish()
    }
}
