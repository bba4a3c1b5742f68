//! REST client for the Ethereal HTTP API.

use alloy::primitives::Address;
use ethereal_core::{IntentKind, OrderCancelled, OrderCreated, SignedEnvelope, Subaccount};
use ethereal_signer::RpcConfig;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{BoxFuture, IntentReceipt, IntentTransport};

const RPC_CONFIG_PATH: &str = "/v1/rpc/config";
const SUBACCOUNT_PATH: &str = "/v1/subaccount";

/// Response body, either wrapped as `{ "data": T }` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> DataEnvelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Cancellation answers come back as a list or, for a single id, an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// HTTP client bound to one exchange base URL.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ClientError::Http(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.resolved_base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("GET {path} failed: {e}")))?;
        Self::read(response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // `json` sets Content-Type: application/json
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Http(format!("POST {path} failed: {e}")))?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Http(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ClientError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("{e} (body: {body})")))
    }

    /// `GET /v1/rpc/config`: EIP-712 domain and signature type strings.
    pub async fn fetch_rpc_config(&self) -> ClientResult<RpcConfig> {
        info!(url = %self.url(RPC_CONFIG_PATH), "Fetching signing config");
        let config: DataEnvelope<RpcConfig> = self.get(RPC_CONFIG_PATH, &[]).await?;
        let config = config.into_inner();
        debug!(
            chain_id = %config.domain.chain_id,
            types = config.signature_types.len(),
            "Signing config received"
        );
        Ok(config)
    }

    /// `GET /v1/subaccount?sender=<checksummed address>`.
    pub async fn fetch_subaccounts(&self, sender: Address) -> ClientResult<Vec<Subaccount>> {
        let sender = sender.to_checksum(None);
        info!(url = %self.url(SUBACCOUNT_PATH), sender = %sender, "Fetching subaccounts");
        let subaccounts: DataEnvelope<Vec<Subaccount>> = self
            .get(SUBACCOUNT_PATH, &[("sender", sender)])
            .await?;
        Ok(subaccounts.into_inner())
    }

    /// POST a signed envelope to its kind's endpoint.
    pub async fn submit_envelope(&self, envelope: &SignedEnvelope) -> ClientResult<IntentReceipt> {
        let kind = envelope.data.kind();
        match kind {
            IntentKind::Order => {
                let created: DataEnvelope<OrderCreated> = self.post(kind.path(), envelope).await?;
                Ok(IntentReceipt::Created(created.into_inner()))
            }
            IntentKind::Cancel => {
                let cancelled: DataEnvelope<OneOrMany<OrderCancelled>> =
                    self.post(kind.path(), envelope).await?;
                Ok(IntentReceipt::Cancelled(cancelled.into_inner().into_vec()))
            }
        }
    }
}

impl IntentTransport for RestClient {
    fn submit(&self, envelope: SignedEnvelope) -> BoxFuture<'_, ClientResult<IntentReceipt>> {
        Box::pin(async move { self.submit_envelope(&envelope).await })
    }
}
