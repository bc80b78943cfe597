// virtool-api: Async Rust client for the Virtool REST API
//
// One method per logical operation, grouped by resource family under
// `resources/`. The client is stateless apart from its session cookie jar:
// no retries, no caching, no interpretation of server errors beyond
// decoding the `{ id, message }` error body.

pub mod client;
pub mod error;
pub mod models;
pub mod resources;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
