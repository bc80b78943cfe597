// virtool-core: Action vocabulary, state store and request orchestration
// between virtool-api and presentation layers (the CLI).

pub mod action;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestration;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use action::{
    Action, DiscardReason, Intent, Modal, Navigation, OperationId, Phase, Request, Response,
};
pub use config::{Credentials, SessionConfig, TlsVerification};
pub use error::{CoreError, ErrorRecord};
pub use orchestration::{ApiGateway, Gateway, ListenerSpec, Orchestrator, Policy};
pub use session::Session;
pub use store::{AppState, ListSlice, Store, Subscription};
