//! The [`PresentationHost`] trait defining the contract for host backends.
//!
//! A host backend drives one running presentation application. Every call is
//! synchronous and runs to completion; callers serialize access. Objects are
//! addressed by native handles, which the host may invalidate at any time
//! (for example when the user edits the document in the application window),
//! so callers must treat every handle as a hint to be re-validated.
//!
//! All backends (the in-memory host, a COM automation host, ...) implement
//! this trait and are fully swappable without changing the service layer.

use std::path::{Path, PathBuf};

use slideport_core::{
    DocHandle, FontPatch, Geometry, GeometryPatch, LayoutType, ShapeHandle, ShapeSnapshot,
    SlideHandle,
};

use crate::error::HostError;
use crate::types::{AppStatus, DocumentInfo, HostSelection, SectionInfo, SlideSummary};

/// The contract between slideport and a presentation application.
pub trait PresentationHost: Send {
    // -------------------------------------------------------------------
    // Application
    // -------------------------------------------------------------------

    /// Attaches to the running application, launching it if needed, and
    /// makes its window visible unless the host is configured hidden.
    fn attach(&mut self) -> Result<AppStatus, HostError>;

    /// Current process state, without attaching.
    fn status(&self) -> AppStatus;

    /// Whether the host can open and save files with this path's format.
    fn supports_format(&self, path: &Path) -> bool;

    // -------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------

    /// All open documents, in the application's own order.
    fn documents(&self) -> Result<Vec<DocumentInfo>, HostError>;

    fn document(&self, doc: DocHandle) -> Result<DocumentInfo, HostError>;

    /// The document shown in the active window, if any.
    fn active_document(&self) -> Result<Option<DocHandle>, HostError>;

    /// Creates a blank document with a single title slide.
    fn create_document(&mut self) -> Result<DocHandle, HostError>;

    /// Opens a file. Returns the existing handle if the file is already open.
    fn open_document(&mut self, path: &Path) -> Result<DocHandle, HostError>;

    /// Saves in place (`None`) or under a new path, which becomes the
    /// document's path. Returns the path written. Atomic: on failure the
    /// previous file is untouched.
    fn save_document(&mut self, doc: DocHandle, path: Option<&Path>)
        -> Result<PathBuf, HostError>;

    /// Writes a full copy without changing the document's path or dirty flag.
    fn save_copy(&mut self, doc: DocHandle, path: &Path) -> Result<(), HostError>;

    /// Closes without saving.
    fn close_document(&mut self, doc: DocHandle) -> Result<(), HostError>;

    fn sections(&self, doc: DocHandle) -> Result<Vec<SectionInfo>, HostError>;

    // -------------------------------------------------------------------
    // Slides
    // -------------------------------------------------------------------

    /// Slides in structural order.
    fn slides(&self, doc: DocHandle) -> Result<Vec<SlideSummary>, HostError>;

    /// Inserts a new slide so that it ends up at `position` (1-based).
    fn add_slide(
        &mut self,
        doc: DocHandle,
        position: usize,
        layout: LayoutType,
    ) -> Result<SlideHandle, HostError>;

    /// Duplicates a slide with its layout, master, formatting and every
    /// shape. The duplicate is placed directly after the source.
    fn duplicate_slide(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
    ) -> Result<SlideHandle, HostError>;

    /// Moves a slide to `position` (1-based) keeping its identity.
    fn move_slide(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        position: usize,
    ) -> Result<(), HostError>;

    fn delete_slide(&mut self, doc: DocHandle, slide: SlideHandle) -> Result<(), HostError>;

    // -------------------------------------------------------------------
    // Shapes
    // -------------------------------------------------------------------

    /// Shapes of a slide in z-order.
    fn shapes(&self, doc: DocHandle, slide: SlideHandle) -> Result<Vec<ShapeSnapshot>, HostError>;

    /// Replaces the whole text of a frame, keeping its formatting.
    fn set_text(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
        text: &str,
    ) -> Result<(), HostError>;

    fn set_font(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
        patch: &FontPatch,
    ) -> Result<(), HostError>;

    /// Applies a partial geometry update and returns the resulting geometry.
    fn set_geometry(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
        patch: &GeometryPatch,
    ) -> Result<Geometry, HostError>;

    /// Adds a horizontal text box on top of the slide's z-order.
    fn add_text_box(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        geometry: Geometry,
        text: &str,
    ) -> Result<ShapeHandle, HostError>;

    /// Copies a shape onto another slide of the same document, on top of its
    /// z-order, with all formatting.
    fn copy_shape(
        &mut self,
        doc: DocHandle,
        from: SlideHandle,
        shape: ShapeHandle,
        to: SlideHandle,
    ) -> Result<ShapeHandle, HostError>;

    fn delete_shape(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
    ) -> Result<(), HostError>;

    /// The user's current selection in the active window.
    fn selection(&self) -> Result<Option<HostSelection>, HostError>;
}
