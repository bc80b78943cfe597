// ── Per-intent listener ──
//
// One long-lived task per intent. It receives REQUESTED actions in
// dispatch order, applies the intent's policy and runs each accepted
// request on a worker task. A failing worker never ends the listener.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::effects::{self, FollowUp};
use super::gateway::Gateway;
use super::pending::PendingGuard;
use super::policy::{ListenerSpec, Policy, ThrottleGate};
use crate::action::{Action, DiscardReason, Intent, OperationId, Request};
use crate::error::ErrorRecord;
use crate::store::Store;

pub(crate) type Envelope = (OperationId, Request);

pub(crate) struct Listener<G: Gateway> {
    pub(crate) intent: Intent,
    pub(crate) spec: ListenerSpec,
    pub(crate) store: Arc<Store>,
    pub(crate) gateway: Arc<G>,
    pub(crate) cancel: CancellationToken,
}

impl<G: Gateway> Listener<G> {
    pub(crate) async fn run(self, mut rx: mpsc::UnboundedReceiver<Envelope>) {
        let mut workers = JoinSet::new();
        let mut gate = match self.spec.policy {
            Policy::Throttle(window) => Some(ThrottleGate::new(window)),
            _ => None,
        };
        let mut latest: Option<CancellationToken> = None;

        debug!(intent = %self.intent, policy = ?self.spec.policy, "listener started");

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    workers.abort_all();
                    break;
                }
                Some(joined) = workers.join_next(), if !workers.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            warn!(intent = %self.intent, "worker panicked");
                        }
                    }
                }
                envelope = rx.recv() => {
                    let Some((op, request)) = envelope else { break };

                    if let Some(gate) = gate.as_mut() {
                        if !gate.admit(Instant::now()) {
                            debug!(intent = %self.intent, %op, "throttled");
                            self.store.dispatch(Action::Discarded {
                                op,
                                intent: self.intent,
                                reason: DiscardReason::Throttled,
                            });
                            continue;
                        }
                    }

                    let token = self.cancel.child_token();
                    if self.spec.policy == Policy::Supersede {
                        if let Some(previous) = latest.replace(token.clone()) {
                            previous.cancel();
                        }
                    }

                    workers.spawn(run_worker(
                        Worker {
                            store: Arc::clone(&self.store),
                            gateway: Arc::clone(&self.gateway),
                            root: self.cancel.clone(),
                            token,
                            pending: self.spec.pending,
                        },
                        op,
                        request,
                    ));
                }
            }
        }

        while workers.join_next().await.is_some() {}
        debug!(intent = %self.intent, "listener stopped");
    }
}

struct Worker<G: Gateway> {
    store: Arc<Store>,
    gateway: Arc<G>,
    /// Session-wide shutdown.
    root: CancellationToken,
    /// This invocation only; cancelled when superseded.
    token: CancellationToken,
    pending: bool,
}

async fn run_worker<G: Gateway>(worker: Worker<G>, op: OperationId, request: Request) {
    let intent = request.intent();
    let mut guard = worker
        .pending
        .then(|| PendingGuard::engage(Arc::clone(&worker.store), op, intent));
    let follow_ups = effects::after_success(&request);

    let outcome = tokio::select! {
        biased;
        () = worker.token.cancelled() => None,
        result = worker.gateway.execute(request) => Some(result),
    };

    if worker.root.is_cancelled() {
        // Shutting down: the guard clears the flag, nobody awaits the result.
        return;
    }

    if let Some(guard) = guard.as_mut() {
        guard.disarm();
    }

    let result = match outcome {
        Some(result) if !worker.token.is_cancelled() => result,
        _ => {
            debug!(%intent, %op, "superseded");
            worker.store.dispatch(Action::Discarded {
                op,
                intent,
                reason: DiscardReason::Superseded,
            });
            return;
        }
    };

    match result {
        Ok(response) => {
            worker.store.dispatch(Action::Succeeded {
                op,
                intent,
                response,
            });
            for follow_up in follow_ups {
                match follow_up {
                    FollowUp::Navigate(navigation) => {
                        worker.store.dispatch(Action::Navigate(navigation));
                    }
                    FollowUp::Refetch(request) => {
                        worker.store.request(request);
                    }
                }
            }
        }
        Err(e) => {
            warn!(%intent, %op, error = %e, "request failed");
            worker.store.dispatch(Action::Failed {
                op,
                intent,
                error: ErrorRecord::from(&e),
            });
        }
    }
}
