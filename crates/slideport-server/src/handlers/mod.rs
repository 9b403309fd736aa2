//! HTTP handler modules for the slideport API.
//!
//! Each sub-module implements thin handlers that decode requests, acquire the
//! service lock, delegate to [`DeckService`](crate::service::DeckService), and
//! return JSON responses. No business logic lives in handlers. Body and query
//! decoding failures are reported as `ValidationError`.

pub mod commands;
pub mod presentations;
pub mod shapes;
pub mod slides;
