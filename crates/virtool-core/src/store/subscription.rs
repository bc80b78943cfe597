// ── Slice subscriptions ──
//
// A subscription selects one `Arc` slice out of the state and wakes only
// when that slice is replaced. Dropping it releases the watch receiver.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::{StreamExt, future};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::state::AppState;

type Selector<S> = Arc<dyn Fn(&AppState) -> Arc<S> + Send + Sync>;

/// Handle on one slice of the store.
pub struct Subscription<S: Send + Sync + 'static> {
    receiver: watch::Receiver<Arc<AppState>>,
    selector: Selector<S>,
    current: Arc<S>,
}

impl<S: Send + Sync + 'static> Subscription<S> {
    pub(crate) fn new<F>(receiver: watch::Receiver<Arc<AppState>>, selector: F) -> Self
    where
        F: Fn(&AppState) -> Arc<S> + Send + Sync + 'static,
    {
        let current = selector(&receiver.borrow());
        Self {
            receiver,
            selector: Arc::new(selector),
            current,
        }
    }

    /// The slice as of the last wake-up (or creation).
    pub fn current(&self) -> &Arc<S> {
        &self.current
    }

    /// The slice in the latest snapshot, which may be newer than `current`.
    pub fn latest(&self) -> Arc<S> {
        (self.selector)(&self.receiver.borrow())
    }

    /// Wait until the selected slice changes identity.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<S>> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = (self.selector)(&self.receiver.borrow_and_update());
            if !Arc::ptr_eq(&next, &self.current) {
                self.current = Arc::clone(&next);
                return Some(next);
            }
        }
    }

    /// Convert into a `Stream` of slice changes.
    pub fn into_stream(self) -> SliceStream<S> {
        let Self {
            receiver,
            selector,
            current,
        } = self;
        let mut last = current;

        let inner = WatchStream::from_changes(receiver).filter_map(move |state| {
            let next = selector(&state);
            let changed = !Arc::ptr_eq(&next, &last);
            if changed {
                last = Arc::clone(&next);
            }
            future::ready(changed.then_some(next))
        });

        SliceStream {
            inner: Box::pin(inner),
        }
    }
}

/// `Stream` adapter over a subscription.
pub struct SliceStream<S> {
    inner: Pin<Box<dyn Stream<Item = Arc<S>> + Send>>,
}

impl<S> Stream for SliceStream<S> {
    type Item = Arc<S>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::StreamExt;

    use crate::action::{Action, Intent, Modal, Navigation, OperationId, Response};
    use crate::store::Store;

    #[tokio::test]
    async fn wakes_only_on_selected_slice() {
        let store = Store::new();
        let mut groups = store.subscribe(|s| s.groups.clone());

        // Router change: groups slice keeps its pointer.
        store.dispatch(Action::Navigate(Navigation::OpenModal(Modal::CreateGroup)));
        let woke = tokio::time::timeout(Duration::from_millis(20), groups.changed()).await;
        assert!(woke.is_err());

        store.dispatch(Action::Succeeded {
            op: OperationId(1),
            intent: Intent::ListGroups,
            response: Response::Groups(Vec::new()),
        });
        let slice = groups.changed().await;
        assert_eq!(slice.and_then(|s| s.documents.clone()), Some(Vec::new()));
    }

    #[tokio::test]
    async fn stream_yields_changes() {
        let store = Store::new();
        let mut router = store.subscribe(|s| s.router.clone()).into_stream();

        store.dispatch(Action::Navigate(Navigation::Push("/jobs".into())));
        let next = router.next().await;
        assert_eq!(next.map(|r| r.path.clone()).as_deref(), Some("/jobs"));
    }

    #[test]
    fn drop_releases_subscription() {
        let store = Store::new();
        let sub = store.subscribe(|s| s.errors.clone());
        assert_eq!(store.subscriber_count(), 1);
        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }
}
