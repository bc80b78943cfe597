// ── Session ──
//
// Entry point for presentation layers. Owns the store and the
// orchestrator, validates requests before they are dispatched and offers
// an awaitable `execute` for callers that want one result.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use virtool_api::{ApiClient, TlsMode, TransportConfig};

use crate::action::{Action, Navigation, OperationId, Request, Response};
use crate::config::{SessionConfig, TlsVerification};
use crate::error::{CoreError, ErrorRecord};
use crate::orchestration::{ApiGateway, Gateway, Orchestrator};
use crate::store::{AppState, Store, Subscription};

/// A running client session.
///
/// Cheaply cloneable via `Arc<SessionInner>`.
pub struct Session<G: Gateway = ApiGateway> {
    inner: Arc<SessionInner<G>>,
}

impl<G: Gateway> Clone for Session<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SessionInner<G: Gateway> {
    config: SessionConfig,
    store: Arc<Store>,
    gateway: Arc<G>,
    cancel: CancellationToken,
    orchestrator: Mutex<Option<JoinHandle<()>>>,
}

impl Session<ApiGateway> {
    /// Build the HTTP client, log in if credentials are configured and
    /// start the orchestrator. Without credentials no request is made.
    pub async fn connect(config: SessionConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = ApiClient::new(config.url.as_str(), &transport)?;

        if let Some(credentials) = &config.credentials {
            client
                .login(&credentials.username, &credentials.password)
                .await?;
            info!(url = %config.url, username = %credentials.username, "logged in");
        } else {
            debug!(url = %config.url, "no credentials configured; skipping login");
        }

        Ok(Self::with_gateway(config, ApiGateway::new(client)))
    }

    /// End the server session (if one was started) and stop all tasks.
    pub async fn disconnect(&self) {
        if self.inner.config.credentials.is_some() {
            if let Err(e) = self.inner.gateway.client().logout().await {
                warn!(error = %e, "logout failed (non-fatal)");
            }
        }
        self.shutdown().await;
    }

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(config: SessionConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let session = Self::connect(config).await?;
        let result = f(session.clone()).await;
        session.disconnect().await;
        result
    }
}

impl<G: Gateway> Session<G> {
    /// Start a session over any gateway. Must be called inside a Tokio runtime.
    pub fn with_gateway(config: SessionConfig, gateway: G) -> Self {
        let store = Arc::new(Store::new());
        let gateway = Arc::new(gateway);
        let cancel = CancellationToken::new();

        let handle = Orchestrator::new(
            Arc::clone(&store),
            Arc::clone(&gateway),
            config.throttle_window,
            cancel.clone(),
        )
        .spawn();

        Self {
            inner: Arc::new(SessionInner {
                config,
                store,
                gateway,
                cancel,
                orchestrator: Mutex::new(Some(handle)),
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.inner.store
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Validate and dispatch REQUESTED. Returns the operation id.
    ///
    /// A validation failure is recorded under the intent's error key and
    /// nothing is dispatched.
    pub fn request(&self, request: Request) -> Result<OperationId, CoreError> {
        self.check(&request)?;
        Ok(self.inner.store.request(request))
    }

    /// Dispatch a request and wait for its outcome.
    pub async fn execute(&self, request: Request) -> Result<Response, CoreError> {
        self.check(&request)?;

        let mut tap = self.inner.store.tap();
        let op = self.inner.store.request(request);

        loop {
            let action = tokio::select! {
                biased;
                () = self.inner.cancel.cancelled() => return Err(CoreError::SessionClosed),
                action = tap.recv() => action.ok_or(CoreError::SessionClosed)?,
            };

            if action.op() != Some(op) {
                continue;
            }

            match &*action {
                Action::Succeeded { response, .. } => return Ok(response.clone()),
                Action::Failed { error, .. } => return Err(CoreError::from(error.clone())),
                Action::Discarded { intent, reason, .. } => {
                    return Err(CoreError::Discarded {
                        intent: *intent,
                        reason: *reason,
                    });
                }
                _ => {}
            }
        }
    }

    fn check(&self, request: &Request) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::SessionClosed);
        }
        if let Err(e) = request.validate() {
            debug!(intent = %request.intent(), error = %e, "request rejected");
            self.inner.store.dispatch(Action::Rejected {
                intent: request.intent(),
                error: ErrorRecord::from(&e),
            });
            return Err(e);
        }
        Ok(())
    }

    pub fn navigate(&self, navigation: Navigation) {
        self.inner.store.dispatch(Action::Navigate(navigation));
    }

    // ── State observation ────────────────────────────────────────────

    pub fn state(&self) -> Arc<AppState> {
        self.inner.store.state()
    }

    pub fn subscribe<S, F>(&self, selector: F) -> Subscription<S>
    where
        S: Send + Sync + 'static,
        F: Fn(&AppState) -> Arc<S> + Send + Sync + 'static,
    {
        self.inner.store.subscribe(selector)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Cancel all listeners and workers and wait for them to stop.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handle = self
            .inner
            .orchestrator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "orchestrator task failed");
            }
        }

        // Requests still queued when the orchestrator stopped, or workers
        // aborted before their first poll, never engaged a guard.
        let leftover: Vec<_> = self
            .inner
            .store
            .state()
            .pending
            .iter()
            .map(|(op, intent)| (*op, *intent))
            .collect();
        for (op, intent) in leftover {
            debug!(%intent, %op, "clearing pending flag on shutdown");
            self.inner.store.dispatch(Action::PendingChanged {
                op,
                intent,
                pending: false,
            });
        }
        debug!("session shut down");
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn build_transport(config: &SessionConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
        cookie_jar: None, // ApiClient::new adds one
    }
}
