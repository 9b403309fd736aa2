//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for one group of
//! operations. Ids travel as strings and are parsed by the service, so that a
//! malformed id is reported as a validation failure rather than a decoding
//! error.

pub mod commands;
pub mod common;
pub mod presentations;
pub mod shapes;
pub mod slides;
