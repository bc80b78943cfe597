// ── Orchestration layer ──
//
// A scheduler task reads the store's action tap and forwards every
// REQUESTED action to the listener for its intent, spawning listeners on
// first use. Listeners apply their policy and answer through the store.

mod effects;
mod gateway;
mod listener;
mod pending;
pub mod policy;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::action::{Action, Intent};
use crate::store::{ActionTap, Store};

pub use gateway::{ApiGateway, Gateway};
pub use policy::{ListenerSpec, Policy};

use listener::{Envelope, Listener};

/// Routes REQUESTED actions to per-intent listeners.
pub struct Orchestrator<G: Gateway> {
    store: Arc<Store>,
    gateway: Arc<G>,
    throttle_window: Duration,
    cancel: CancellationToken,
}

impl<G: Gateway> Orchestrator<G> {
    pub fn new(
        store: Arc<Store>,
        gateway: Arc<G>,
        throttle_window: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            gateway,
            throttle_window,
            cancel,
        }
    }

    /// Start the scheduler task.
    ///
    /// The tap is registered before this returns, so every REQUESTED
    /// dispatched afterwards is seen.
    pub fn spawn(self) -> JoinHandle<()> {
        let tap = self.store.tap();
        tokio::spawn(self.run(tap))
    }

    async fn run(self, mut tap: ActionTap) {
        let mut routes: HashMap<Intent, mpsc::UnboundedSender<Envelope>> = HashMap::new();
        let mut listeners = JoinSet::new();

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                action = tap.recv() => {
                    let Some(action) = action else { break };
                    let Action::Requested { op, request } = &*action else { continue };

                    let intent = request.intent();
                    let route = routes.entry(intent).or_insert_with(|| {
                        let (tx, rx) = mpsc::unbounded_channel();
                        let listener = Listener {
                            intent,
                            spec: ListenerSpec::for_intent(intent, self.throttle_window),
                            store: Arc::clone(&self.store),
                            gateway: Arc::clone(&self.gateway),
                            cancel: self.cancel.clone(),
                        };
                        listeners.spawn(listener.run(rx));
                        tx
                    });

                    if route.send((*op, request.clone())).is_err() {
                        warn!(%intent, %op, "listener gone; request dropped");
                    }
                }
            }
        }

        drop(routes);
        while listeners.join_next().await.is_some() {}
        debug!("orchestrator stopped");
    }
}
