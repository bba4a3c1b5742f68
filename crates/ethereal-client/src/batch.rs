//! Concurrent batch submission.
//!
//! Every intent gets its own task: wait for a concurrency permit, stamp and
//! sign, submit. Results are joined back in input order. A failed slot never
//! affects its siblings and nothing is rolled back; each submission stands
//! on its own.

use std::sync::Arc;
use std::time::Instant;

use ethereal_core::Intent;
use ethereal_signer::{Clock, SigningPipeline, SystemClock};
use ethereal_telemetry::Metrics;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::transport::{IntentReceipt, IntentTransport};

/// Batch fan-out settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Max submissions in flight within one `submit` call; concurrent
    /// batches on the same submitter each get their own ceiling.
    /// 0 = unbounded.
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 16 }
    }
}

/// Signs and submits intents concurrently through a transport.
pub struct BatchSubmitter<T: IntentTransport, C: Clock + 'static = SystemClock> {
    pipeline: SigningPipeline<C>,
    transport: Arc<T>,
    max_concurrency: usize,
}

impl<T: IntentTransport, C: Clock + 'static> BatchSubmitter<T, C> {
    pub fn new(pipeline: SigningPipeline<C>, transport: Arc<T>, config: BatchConfig) -> Self {
        Self {
            pipeline,
            transport,
            max_concurrency: config.max_concurrency,
        }
    }

    pub fn pipeline(&self) -> &SigningPipeline<C> {
        &self.pipeline
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Sign and submit a single intent on the caller's task.
    pub async fn submit_one(&self, intent: Intent) -> ClientResult<IntentReceipt> {
        submit_signed(&self.pipeline, self.transport.as_ref(), intent).await
    }

    /// Submit `intents` concurrently; `results[i]` answers `intents[i]`.
    ///
    /// Once `cancel` fires, slots that have not started yet resolve to
    /// `ClientError::Cancelled`. Submissions already on the wire complete.
    pub async fn submit(&self, intents: Vec<Intent>, cancel: CancellationToken) -> BatchResult {
        Metrics::batch_size(intents.len());
        debug!(size = intents.len(), "Submitting batch");

        let semaphore = match self.max_concurrency {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };
        let handles: Vec<_> = intents
            .into_iter()
            .map(|intent| {
                let pipeline = self.pipeline.clone();
                let transport = Arc::clone(&self.transport);
                let semaphore = semaphore.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    run_slot(pipeline, transport, semaphore, cancel, intent).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ClientError::TaskFailed(e.to_string())),
            };
            if let Err(e) = &result {
                warn!(index, error = %e, "Batch slot failed");
            }
            results.push(result);
        }

        BatchResult { results }
    }
}

async fn run_slot<T: IntentTransport, C: Clock>(
    pipeline: SigningPipeline<C>,
    transport: Arc<T>,
    semaphore: Option<Arc<Semaphore>>,
    cancel: CancellationToken,
    intent: Intent,
) -> ClientResult<IntentReceipt> {
    let _permit = match semaphore {
        Some(semaphore) => tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            permit = semaphore.acquire_owned() => {
                Some(permit.map_err(|_| ClientError::Cancelled)?)
            }
        },
        None => None,
    };

    // A permit may be granted in the same poll that cancellation lands.
    if cancel.is_cancelled() {
        return Err(ClientError::Cancelled);
    }

    submit_signed(&pipeline, transport.as_ref(), intent).await
}

async fn submit_signed<T: IntentTransport, C: Clock>(
    pipeline: &SigningPipeline<C>,
    transport: &T,
    intent: Intent,
) -> ClientResult<IntentReceipt> {
    let kind = intent.kind().as_str();
    let envelope = pipeline.seal(intent)?;
    Metrics::intent_signed(kind);

    let inflight = InflightGuard::new();
    let started = Instant::now();
    let result = transport.submit(envelope).await;
    drop(inflight);

    Metrics::submission_latency(kind, started.elapsed().as_secs_f64() * 1000.0);
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    Metrics::submission(kind, outcome);
    result
}

/// Holds one unit of the in-flight gauge; released on drop, so a submission
/// future dropped mid-await still decrements it.
struct InflightGuard;

impl InflightGuard {
    fn new() -> Self {
        Metrics::inflight_inc();
        Self
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        Metrics::inflight_dec();
    }
}

/// Per-index outcome of a batch.
#[derive(Debug)]
pub struct BatchResult {
    results: Vec<ClientResult<IntentReceipt>>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ClientResult<IntentReceipt>> {
        self.results.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClientResult<IntentReceipt>> {
        self.results.iter()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn is_all_ok(&self) -> bool {
        self.failed() == 0
    }

    pub fn into_results(self) -> Vec<ClientResult<IntentReceipt>> {
        self.results
    }

    /// All receipts, or the error of the lowest failed index.
    ///
    /// Sibling submissions may still have gone through.
    pub fn into_all(self) -> ClientResult<Vec<IntentReceipt>> {
        self.results.into_iter().collect()
    }
}

impl IntoIterator for BatchResult {
    type Item = ClientResult<IntentReceipt>;
    type IntoIter = std::vec::IntoIter<ClientResult<IntentReceipt>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a ClientResult<IntentReceipt>;
    type IntoIter = std::slice::Iter<'a, ClientResult<IntentReceipt>>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
