use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::{DataReshaper, PreparedData, ReshapeRequest};
use crate::error::{PlotError, PlotResult};

use super::{Admission, ExhaustWithTrailing};

/// Seam between the pipeline and whatever produces prepared data.
#[async_trait]
pub trait Reshape: Send + Sync {
    async fn reshape(&self, request: ReshapeRequest) -> PreparedData;
}

#[async_trait]
impl Reshape for DataReshaper {
    async fn reshape(&self, request: ReshapeRequest) -> PreparedData {
        self.reshape_request(&request).await
    }
}

/// Counters describing how the pipeline collapsed its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineStats {
    pub submitted: u64,
    pub started: u64,
    pub completed: u64,
    pub superseded: u64,
}

type Subscriber = Box<dyn Fn(Arc<PreparedData>) + Send + Sync>;
type InFlight = Pin<Box<dyn Future<Output = PreparedData> + Send>>;

struct PipelineShared {
    cancel: CancellationToken,
    subscribers: Mutex<Vec<Subscriber>>,
    // Registered since the last delivery; merged before the next one.
    joining: Mutex<Vec<Subscriber>>,
    stats: Mutex<PipelineStats>,
}

impl PipelineShared {
    fn deliver(&self, prepared: PreparedData) {
        let prepared = Arc::new(prepared);
        // Held across the callbacks so `dispose` cannot return mid-delivery.
        let mut subscribers = self.subscribers.lock();
        if self.cancel.is_cancelled() {
            trace!("dropping reshape result after disposal");
            return;
        }
        subscribers.append(&mut self.joining.lock());
        for subscriber in subscribers.iter() {
            subscriber(Arc::clone(&prepared));
        }
    }
}

/// Serializes reshapes for one plot instance.
///
/// Requests go through [`ExhaustWithTrailing`]: one reshape in flight at a
/// time, bursts collapse onto the newest request, and results reach
/// subscribers in completion order. Dropping the pipeline disposes it.
///
/// Subscribers run on the driver task. They may subscribe further callbacks,
/// which first fire on the next result, but must not call [`Self::dispose`].
pub struct ReshapePipeline {
    requests: mpsc::UnboundedSender<ReshapeRequest>,
    shared: Arc<PipelineShared>,
}

impl std::fmt::Debug for ReshapePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReshapePipeline")
            .field("disposed", &self.is_disposed())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl ReshapePipeline {
    /// Spawns the driver task on the current tokio runtime.
    ///
    /// Fails with [`PlotError::RuntimeUnavailable`] outside of a runtime.
    pub fn spawn(reshaper: Arc<dyn Reshape>) -> PlotResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|err| PlotError::RuntimeUnavailable(err.to_string()))?;
        let (requests, inbox) = mpsc::unbounded_channel();
        let shared = Arc::new(PipelineShared {
            cancel: CancellationToken::new(),
            subscribers: Mutex::new(Vec::new()),
            joining: Mutex::new(Vec::new()),
            stats: Mutex::new(PipelineStats::default()),
        });
        runtime.spawn(drive(reshaper, inbox, Arc::clone(&shared)));
        Ok(Self { requests, shared })
    }

    pub fn submit(&self, request: ReshapeRequest) -> PlotResult<()> {
        if self.shared.cancel.is_cancelled() {
            return Err(PlotError::PipelineDisposed);
        }
        trace!(current_step = request.current_step, "submit reshape request");
        self.requests
            .send(request)
            .map_err(|_| PlotError::PipelineDisposed)?;
        self.shared.stats.lock().submitted += 1;
        Ok(())
    }

    pub fn subscribe(&self, on_result: impl Fn(Arc<PreparedData>) + Send + Sync + 'static) {
        if self.shared.cancel.is_cancelled() {
            return;
        }
        self.shared.joining.lock().push(Box::new(on_result));
    }

    /// Stops the driver and drops every subscriber. No callback fires once
    /// this returns; an in-flight reshape is abandoned.
    pub fn dispose(&self) {
        if self.shared.cancel.is_cancelled() {
            return;
        }
        self.shared.cancel.cancel();
        self.shared.subscribers.lock().clear();
        self.shared.joining.lock().clear();
        debug!(stats = ?self.stats(), "reshape pipeline disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        *self.shared.stats.lock()
    }
}

impl Drop for ReshapePipeline {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn start(
    reshaper: &Arc<dyn Reshape>,
    shared: &PipelineShared,
    request: ReshapeRequest,
) -> InFlight {
    shared.stats.lock().started += 1;
    trace!(current_step = request.current_step, "start reshape");
    let reshaper = Arc::clone(reshaper);
    Box::pin(async move { reshaper.reshape(request).await })
}

async fn wait_in_flight(in_flight: &mut Option<InFlight>) -> PreparedData {
    match in_flight {
        Some(reshape) => reshape.await,
        None => std::future::pending().await,
    }
}

async fn drive(
    reshaper: Arc<dyn Reshape>,
    mut inbox: mpsc::UnboundedReceiver<ReshapeRequest>,
    shared: Arc<PipelineShared>,
) {
    let mut slot = ExhaustWithTrailing::new();
    let mut in_flight: Option<InFlight> = None;

    loop {
        tokio::select! {
            biased;

            () = shared.cancel.cancelled() => break,

            request = inbox.recv() => {
                let Some(request) = request else { break };
                match slot.submit(request) {
                    Admission::Start(request) => {
                        in_flight = Some(start(&reshaper, &shared, request));
                    }
                    Admission::Pending => {}
                    Admission::Superseded(dropped) => {
                        shared.stats.lock().superseded += 1;
                        trace!(current_step = dropped.current_step, "superseded pending reshape");
                    }
                }
            }

            prepared = wait_in_flight(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                shared.stats.lock().completed += 1;
                shared.deliver(prepared);
                if let Some(next) = slot.complete() {
                    in_flight = Some(start(&reshaper, &shared, next));
                }
            }
        }
    }

    trace!("reshape pipeline driver stopped");
}
