// ── Pending decorator ──
//
// Holds the pending flag of one operation for as long as its worker
// runs. A worker that ends without a terminal action (aborted on
// shutdown) still clears the flag when the guard drops.

use std::sync::Arc;

use crate::action::{Action, Intent, OperationId};
use crate::store::Store;

pub(crate) struct PendingGuard {
    store: Arc<Store>,
    op: OperationId,
    intent: Intent,
    armed: bool,
}

impl PendingGuard {
    pub(crate) fn engage(store: Arc<Store>, op: OperationId, intent: Intent) -> Self {
        store.dispatch(Action::PendingChanged {
            op,
            intent,
            pending: true,
        });
        Self {
            store,
            op,
            intent,
            armed: true,
        }
    }

    /// The terminal action about to be dispatched clears the flag itself.
    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.armed {
            self.store.dispatch(Action::PendingChanged {
                op: self.op,
                intent: self.intent,
                pending: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_clears_flag() {
        let store = Arc::new(Store::new());
        let guard = PendingGuard::engage(Arc::clone(&store), OperationId(3), Intent::RemoveGroup);
        assert!(store.state().is_op_pending(OperationId(3)));

        drop(guard);
        assert!(!store.state().is_op_pending(OperationId(3)));
    }

    #[test]
    fn disarmed_guard_is_silent() {
        let store = Arc::new(Store::new());
        let mut guard =
            PendingGuard::engage(Arc::clone(&store), OperationId(4), Intent::CreateGroup);
        let mut tap = store.tap();

        guard.disarm();
        drop(guard);
        assert!(tap.try_recv().is_none());
        assert!(store.state().is_op_pending(OperationId(4)));
    }
}
