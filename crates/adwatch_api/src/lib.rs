//! Adwatch API: resilient HTTP pipeline and typed backend client.
mod client;
mod error;
mod handle;
mod pipeline;

pub use client::{MonitorApi, MonitorBackend};
pub use error::{ApiError, ErrorKind};
pub use handle::{ApiEvent, ApiHandle};
pub use pipeline::{RequestPipeline, RetryPolicy, TRANSIENT_STATUS_CODES};
