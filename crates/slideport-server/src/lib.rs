//! HTTP/JSON API server for driving a presentation application.
//!
//! Wraps a [`PresentationHost`](slideport_host::PresentationHost) in an
//! [`ApplicationHandle`](app::ApplicationHandle), keeps stable opaque ids for
//! presentations, slides and shapes in the [`ObjectRegistry`](registry::ObjectRegistry),
//! and exposes every operation through [`DeckService`](service::DeckService),
//! the axum router and the `{"op": ...}` command dispatcher.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
