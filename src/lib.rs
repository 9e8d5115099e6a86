//! `resilient-fetch` is an async JSON-over-HTTP client with bounded retry.
//!
//! The crate wraps a single request flow:
//! - [`FetchClient::request`] — send, retry transport and non-2xx failures
//!   with a fixed delay, decode JSON
//! - [`FetchClient::load`] — fetch an [`ApiEnvelope`] and fold it into a
//!   [`LoadState`] for presentation
//!
//! Terminal failures are reported as a single [`FetchError`] carrying the
//! HTTP status (when one was received) and a message.

mod client;
mod envelope;
mod error;
mod options;
mod state;

pub use client::FetchClient;
pub use envelope::{ApiEnvelope, DEFAULT_ENVELOPE_FAILURE_MESSAGE, SUCCESS_CODE};
pub use error::{ErrorKind, FetchError, DECODE_FAILURE_MESSAGE, TRANSPORT_FAILURE_MESSAGE};
pub use options::{ClientOptions, RequestOptions};
pub use state::LoadState;

pub type Result<T> = std::result::Result<T, FetchError>;
