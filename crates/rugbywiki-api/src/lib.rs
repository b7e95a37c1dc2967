// HTTP retrieval layer for the rugby backend.

pub mod client;
pub mod error;

pub use client::{ClientOptions, RangeEndpoint, RugbyApi, RugbyApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
