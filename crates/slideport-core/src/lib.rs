//! Shared vocabulary for slideport: opaque caller-facing ids, native host
//! handles, slide layouts and the shape model.
//!
//! Nothing in this crate talks to a host application. The host contract lives
//! in `slideport-host`, the identity registry and operation facade in
//! `slideport-server`.

pub mod error;
pub mod handle;
pub mod id;
pub mod layout;
pub mod shape;

// Re-export commonly used types
pub use error::CoreError;
pub use handle::{DocHandle, ShapeHandle, SlideHandle};
pub use id::{PresentationId, ShapeId, SlideId};
pub use layout::{LayoutType, PlaceholderRole};
pub use shape::{Font, FontPatch, Geometry, GeometryPatch, NativeShapeType, ShapeKind, ShapeSnapshot};
