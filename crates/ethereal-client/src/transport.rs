//! Transport abstraction for signed envelopes.
//!
//! Separates signing from delivery so the batch submitter can run against
//! the REST client or an in-process mock.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ethereal_core::{Intent, OrderCancelled, OrderCreated, SignedEnvelope};
use parking_lot::Mutex;

use crate::error::{ClientError, ClientResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Decoded exchange response for one submitted envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentReceipt {
    Created(OrderCreated),
    Cancelled(Vec<OrderCancelled>),
}

impl IntentReceipt {
    pub fn into_created(self) -> Option<OrderCreated> {
        match self {
            Self::Created(created) => Some(created),
            Self::Cancelled(_) => None,
        }
    }

    pub fn into_cancelled(self) -> Option<Vec<OrderCancelled>> {
        match self {
            Self::Cancelled(cancelled) => Some(cancelled),
            Self::Created(_) => None,
        }
    }
}

/// Delivers a signed envelope and decodes the exchange's answer.
pub trait IntentTransport: Send + Sync + 'static {
    fn submit(&self, envelope: SignedEnvelope) -> BoxFuture<'_, ClientResult<IntentReceipt>>;
}

/// Mock transport for testing.
///
/// Records every envelope it receives. Per client order id it can delay the
/// answer or reject with a status and body; everything else succeeds with a
/// generated receipt.
#[derive(Debug, Default)]
pub struct MockTransport {
    sends: Mutex<Vec<SignedEnvelope>>,
    delays: Mutex<HashMap<String, Duration>>,
    rejects: Mutex<HashMap<String, (u16, String)>>,
    default_delay: Mutex<Duration>,
    inflight: AtomicUsize,
    max_inflight: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay applied to every submission without a specific delay.
    pub fn set_default_delay(&self, delay: Duration) {
        *self.default_delay.lock() = delay;
    }

    pub fn set_delay(&self, client_order_id: impl Into<String>, delay: Duration) {
        self.delays.lock().insert(client_order_id.into(), delay);
    }

    /// Answer submissions of `client_order_id` with a non-2xx response.
    pub fn reject(&self, client_order_id: impl Into<String>, status: u16, body: impl Into<String>) {
        self.rejects
            .lock()
            .insert(client_order_id.into(), (status, body.into()));
    }

    /// Envelopes received so far, in arrival order.
    pub fn sent(&self) -> Vec<SignedEnvelope> {
        self.sends.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sends.lock().len()
    }

    /// Highest number of submissions observed in flight at once.
    pub fn max_inflight(&self) -> usize {
        self.max_inflight.load(Ordering::SeqCst)
    }

    fn receipt(&self, intent: &Intent) -> IntentReceipt {
        match intent {
            Intent::Order(order) => {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                IntentReceipt::Created(OrderCreated {
                    id: format!("mock-order-{n}"),
                    client_order_id: order.client_order_id.clone(),
                    filled: "0".to_string(),
                    result: "Ok".to_string(),
                })
            }
            Intent::Cancel(cancel) => IntentReceipt::Cancelled(
                cancel
                    .order_ids
                    .iter()
                    .map(|id| OrderCancelled {
                        id: id.clone(),
                        client_order_id: None,
                        result: "Ok".to_string(),
                    })
                    .collect(),
            ),
        }
    }
}

impl IntentTransport for MockTransport {
    fn submit(&self, envelope: SignedEnvelope) -> BoxFuture<'_, ClientResult<IntentReceipt>> {
        Box::pin(async move {
            let key = envelope.data.client_order_id().map(str::to_string);
            self.sends.lock().push(envelope.clone());

            let now = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_inflight.fetch_max(now, Ordering::SeqCst);

            let delay = key
                .as_ref()
                .and_then(|k| self.delays.lock().get(k).copied())
                .unwrap_or_else(|| *self.default_delay.lock());
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            self.inflight.fetch_sub(1, Ordering::SeqCst);

            if let Some((status, body)) = key.as_ref().and_then(|k| self.rejects.lock().get(k).cloned()) {
                return Err(ClientError::Transport { status, body });
            }
            Ok(self.receipt(&envelope.data))
        })
    }
}
