// ── State store ──
//
// Owns the current `AppState` snapshot and serializes every dispatch:
// the reducer runs under the watch sender's lock, then the action is
// forwarded to each registered tap in dispatch order.

mod reducer;
mod state;
mod subscription;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::action::{Action, OperationId, Request};

pub use reducer::reduce;
pub use state::{AppState, HmmSlice, ListSlice, OtuSlice, RouterState};
pub use subscription::{SliceStream, Subscription};

/// Central store. Shared as `Arc<Store>`.
pub struct Store {
    state: watch::Sender<Arc<AppState>>,
    taps: Mutex<Vec<mpsc::UnboundedSender<Arc<Action>>>>,
    next_op: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (state, _) = watch::channel(Arc::new(state));
        Self {
            state,
            taps: Mutex::new(Vec::new()),
            next_op: AtomicU64::new(1),
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn state(&self) -> Arc<AppState> {
        self.state.borrow().clone()
    }

    /// Apply an action and forward it to every tap.
    pub fn dispatch(&self, action: Action) {
        let mut taps = self.taps.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(action = %action.label(), op = ?action.op(), "dispatch");

        self.state.send_modify(|state| {
            *state = Arc::new(reduce(state, &action));
        });

        let action = Arc::new(action);
        taps.retain(|tap| tap.send(Arc::clone(&action)).is_ok());
    }

    /// Assign an operation id and dispatch REQUESTED.
    ///
    /// No validation happens here; `Session::request` validates first.
    pub fn request(&self, request: Request) -> OperationId {
        let op = OperationId(self.next_op.fetch_add(1, Ordering::Relaxed));
        self.dispatch(Action::Requested { op, request });
        op
    }

    /// Register a tap that sees every action dispatched from now on.
    ///
    /// A dropped tap is pruned on the next dispatch.
    pub fn tap(&self) -> ActionTap {
        let (tx, rx) = mpsc::unbounded_channel();
        self.taps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        ActionTap { rx }
    }

    /// Subscribe to one slice of the state.
    pub fn subscribe<S, F>(&self, selector: F) -> Subscription<S>
    where
        S: Send + Sync + 'static,
        F: Fn(&AppState) -> Arc<S> + Send + Sync + 'static,
    {
        Subscription::new(self.state.subscribe(), selector)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state.receiver_count()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered feed of dispatched actions.
pub struct ActionTap {
    rx: mpsc::UnboundedReceiver<Arc<Action>>,
}

impl ActionTap {
    /// Next action, or `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<Arc<Action>> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Arc<Action>> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Intent, Response};
    use crate::model::Group;

    #[test]
    fn request_assigns_increasing_ids() {
        let store = Store::new();
        let a = store.request(Request::ListGroups);
        let b = store.request(Request::ListGroups);
        assert!(b > a);
    }

    #[test]
    fn taps_see_actions_in_dispatch_order() {
        let store = Store::new();
        let mut tap = store.tap();

        let op = store.request(Request::ListGroups);
        store.dispatch(Action::Succeeded {
            op,
            intent: Intent::ListGroups,
            response: Response::Groups(Vec::<Group>::new()),
        });

        let first = tap.try_recv().map(|a| a.label());
        let second = tap.try_recv().map(|a| a.label());
        assert_eq!(first.as_deref(), Some("LIST_GROUPS_REQUESTED"));
        assert_eq!(second.as_deref(), Some("LIST_GROUPS_SUCCEEDED"));
        assert!(tap.try_recv().is_none());
    }

    #[test]
    fn dropped_taps_are_pruned() {
        let store = Store::new();
        drop(store.tap());
        store.request(Request::ListGroups);
        assert!(store.taps.lock().unwrap_or_else(PoisonError::into_inner).is_empty());
    }
}
