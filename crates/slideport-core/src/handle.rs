//! Native object handles as reported by the host application.
//!
//! Handles are what the host itself uses to tell its objects apart (a COM
//! host would carry `SlideID`/`Shape.Id` here). They are never shown to
//! callers and are only trusted after the registry has re-validated them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Native handle of an open document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocHandle(pub u64);

/// Native handle of a slide inside its document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideHandle(pub u64);

/// Native handle of a shape inside its slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeHandle(pub u64);

impl fmt::Display for DocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

impl fmt::Display for SlideHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slide#{}", self.0)
    }
}

impl fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}
