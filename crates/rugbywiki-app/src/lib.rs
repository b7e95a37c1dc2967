// Application layer: configuration, per-page orchestrators, the response
// cache, and the event loop that ties requests to UI updates.

pub mod app;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod pages;
pub mod protocol;
