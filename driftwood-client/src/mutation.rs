//! Generic mutation lifecycle controller.
//!
//! One controller per (consumer, operation kind). The controller owns the
//! idle/pending/success/error state machine; what a successful mutation
//! should do afterward (invalidate a query, clear a draft) is injected
//! through the single `on_success` extension point.

use crate::error::MutationError;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// The write operation a controller drives.
pub type MutationOp<I, O> =
    Arc<dyn Fn(I) -> BoxFuture<'static, Result<O, MutationError>> + Send + Sync>;

/// Wrap an async closure as a [`MutationOp`].
pub fn mutation_op<I, O, F, Fut>(f: F) -> MutationOp<I, O>
where
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, MutationError>> + Send + 'static,
{
    Arc::new(move |input| Box::pin(f(input)))
}

struct MutationState {
    status: MutationStatus,
    last_error: Option<MutationError>,
}

/// Executes a write operation and tracks its lifecycle.
///
/// `pending` is reachable only from `idle`, `success`, or `error`; a `run`
/// while pending is rejected locally with [`MutationError::Concurrent`] and
/// never reaches the write operation. `success` and `error` persist until
/// the next `run`. Clones share state, so a UI can observe `Pending` while
/// a spawned `run` is in flight.
pub struct MutationController<I, O> {
    op: MutationOp<I, O>,
    on_success: Option<Arc<dyn Fn(&O) + Send + Sync>>,
    state: Arc<Mutex<MutationState>>,
}

impl<I, O> Clone for MutationController<I, O> {
    fn clone(&self) -> Self {
        Self {
            op: Arc::clone(&self.op),
            on_success: self.on_success.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<I, O> MutationController<I, O> {
    pub fn new(op: MutationOp<I, O>) -> Self {
        Self {
            op,
            on_success: None,
            state: Arc::new(Mutex::new(MutationState {
                status: MutationStatus::Idle,
                last_error: None,
            })),
        }
    }

    /// Register the side effect to run after a successful mutation, before
    /// `run`'s future resolves. The only extension point.
    pub fn on_success(mut self, hook: impl Fn(&O) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    pub fn status(&self) -> MutationStatus {
        self.lock().status
    }

    pub fn last_error(&self) -> Option<MutationError> {
        self.lock().last_error.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == MutationStatus::Pending
    }

    /// Execute the write operation with `input`.
    ///
    /// Errors from the operation are stored in `last_error` *and* returned;
    /// nothing is swallowed. Recovery (retry, dismiss) is the caller's call.
    pub async fn run(&self, input: I) -> Result<O, MutationError> {
        {
            let mut state = self.lock();
            if state.status == MutationStatus::Pending {
                trace!("mutation rejected: already pending");
                return Err(MutationError::Concurrent);
            }
            state.status = MutationStatus::Pending;
            state.last_error = None;
        }
        debug!("mutation started");

        match (self.op)(input).await {
            Ok(output) => {
                self.lock().status = MutationStatus::Success;
                if let Some(hook) = &self.on_success {
                    hook(&output);
                }
                debug!("mutation succeeded");
                Ok(output)
            }
            Err(err) => {
                debug!(error = %err, "mutation failed");
                let mut state = self.lock();
                state.status = MutationStatus::Error;
                state.last_error = Some(err.clone());
                drop(state);
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, MutationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
