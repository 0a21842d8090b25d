pub mod client;
pub mod envelope;

pub use client::{Endpoint, Payload, UpstreamClient, UpstreamError, UpstreamResponse};
pub use envelope::{Envelope, ListData, Page};
