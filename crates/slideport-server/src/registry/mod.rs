//! Object registry: stable opaque ids for transient host objects.
//!
//! The registry keeps three independent tables (presentations, slides,
//! shapes), each keyed by a generated id and holding the last known native
//! handle plus enough cached state to re-validate it. Every table has its own
//! monotonic counter; an id value is never handed out twice within the
//! process lifetime, even after eviction.
//!
//! Ownership is strictly hierarchical. Evicting a presentation evicts its
//! slides, and evicting a slide evicts its shapes, so no id ever outlives the
//! parent it belongs to.
//!
//! Host-aware resolution and re-synchronization live in [`resolve`].

pub mod resolve;

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use slideport_core::{
    DocHandle, PresentationId, ShapeHandle, ShapeId, ShapeKind, SlideHandle, SlideId,
};
use slideport_host::{HostError, SlideFingerprint};
use thiserror::Error;

pub use resolve::{ResolvedShape, ResolvedSlide};

/// Errors produced while resolving ids.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("presentation {0} not found")]
    PresentationNotFound(PresentationId),

    #[error("slide {0} not found")]
    SlideNotFound(SlideId),

    #[error("shape {0} not found")]
    ShapeNotFound(ShapeId),

    #[error("slide {slide} does not belong to presentation {presentation}")]
    SlideNotInPresentation {
        slide: SlideId,
        presentation: PresentationId,
    },

    #[error("shape {shape} is not on slide {slide}")]
    ShapeNotOnSlide { shape: ShapeId, slide: SlideId },

    /// The host failed while the registry was re-validating a reference.
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Clone)]
pub struct PresentationEntry {
    pub handle: DocHandle,
    /// Child slides in registration order.
    pub slides: IndexSet<SlideId>,
}

#[derive(Debug, Clone)]
pub struct SlideEntry {
    pub presentation: PresentationId,
    pub handle: SlideHandle,
    /// Last observed 1-based position. A hint, never trusted.
    pub position: usize,
    pub fingerprint: SlideFingerprint,
    pub shapes: IndexSet<ShapeId>,
}

#[derive(Debug, Clone)]
pub struct ShapeEntry {
    pub slide: SlideId,
    pub handle: ShapeHandle,
    /// Last observed 1-based z-order position.
    pub position: usize,
    /// Decided at discovery.
    pub kind: ShapeKind,
    pub fingerprint: blake3::Hash,
}

/// The id tables and their reverse indexes.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    presentations: IndexMap<PresentationId, PresentationEntry>,
    slides: IndexMap<SlideId, SlideEntry>,
    shapes: IndexMap<ShapeId, ShapeEntry>,
    doc_index: HashMap<DocHandle, PresentationId>,
    slide_index: HashMap<(PresentationId, SlideHandle), SlideId>,
    shape_index: HashMap<(SlideId, ShapeHandle), ShapeId>,
    next_presentation: u64,
    next_slide: u64,
    next_shape: u64,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------

    /// Registers a document. A handle that is already bound keeps its id.
    pub fn register_presentation(&mut self, handle: DocHandle) -> PresentationId {
        if let Some(&id) = self.doc_index.get(&handle) {
            return id;
        }
        self.next_presentation += 1;
        let id = PresentationId(self.next_presentation);
        self.presentations.insert(
            id,
            PresentationEntry {
                handle,
                slides: IndexSet::new(),
            },
        );
        self.doc_index.insert(handle, id);
        id
    }

    /// Registers a slide under a live presentation.
    pub fn register_slide(
        &mut self,
        presentation: PresentationId,
        handle: SlideHandle,
        position: usize,
        fingerprint: SlideFingerprint,
    ) -> Result<SlideId, RegistryError> {
        if let Some(&id) = self.slide_index.get(&(presentation, handle)) {
            return Ok(id);
        }
        let parent = self
            .presentations
            .get_mut(&presentation)
            .ok_or(RegistryError::PresentationNotFound(presentation))?;
        self.next_slide += 1;
        let id = SlideId(self.next_slide);
        parent.slides.insert(id);
        self.slides.insert(
            id,
            SlideEntry {
                presentation,
                handle,
                position,
                fingerprint,
                shapes: IndexSet::new(),
            },
        );
        self.slide_index.insert((presentation, handle), id);
        Ok(id)
    }

    /// Registers a shape under a live slide.
    pub fn register_shape(
        &mut self,
        slide: SlideId,
        handle: ShapeHandle,
        position: usize,
        kind: ShapeKind,
        fingerprint: blake3::Hash,
    ) -> Result<ShapeId, RegistryError> {
        if let Some(&id) = self.shape_index.get(&(slide, handle)) {
            return Ok(id);
        }
        let parent = self
            .slides
            .get_mut(&slide)
            .ok_or(RegistryError::SlideNotFound(slide))?;
        self.next_shape += 1;
        let id = ShapeId(self.next_shape);
        parent.shapes.insert(id);
        self.shapes.insert(
            id,
            ShapeEntry {
                slide,
                handle,
                position,
                kind,
                fingerprint,
            },
        );
        self.shape_index.insert((slide, handle), id);
        Ok(id)
    }

    // -------------------------------------------------------------------
    // Lookup (no host involved)
    // -------------------------------------------------------------------

    pub fn presentation(&self, id: PresentationId) -> Result<&PresentationEntry, RegistryError> {
        self.presentations
            .get(&id)
            .ok_or(RegistryError::PresentationNotFound(id))
    }

    pub fn slide(&self, id: SlideId) -> Result<&SlideEntry, RegistryError> {
        self.slides.get(&id).ok_or(RegistryError::SlideNotFound(id))
    }

    pub fn shape(&self, id: ShapeId) -> Result<&ShapeEntry, RegistryError> {
        self.shapes.get(&id).ok_or(RegistryError::ShapeNotFound(id))
    }

    pub fn presentation_by_handle(&self, handle: DocHandle) -> Option<PresentationId> {
        self.doc_index.get(&handle).copied()
    }

    pub fn slide_by_handle(
        &self,
        presentation: PresentationId,
        handle: SlideHandle,
    ) -> Option<SlideId> {
        self.slide_index.get(&(presentation, handle)).copied()
    }

    pub fn shape_by_handle(&self, slide: SlideId, handle: ShapeHandle) -> Option<ShapeId> {
        self.shape_index.get(&(slide, handle)).copied()
    }

    /// Live presentation ids in registration order.
    pub fn presentation_ids(&self) -> Vec<PresentationId> {
        self.presentations.keys().copied().collect()
    }

    /// Live slide ids of a presentation in registration order.
    pub fn slide_ids(&self, presentation: PresentationId) -> Vec<SlideId> {
        self.presentations
            .get(&presentation)
            .map(|entry| entry.slides.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Live shape ids of a slide in registration order.
    pub fn shape_ids(&self, slide: SlideId) -> Vec<ShapeId> {
        self.slides
            .get(&slide)
            .map(|entry| entry.shapes.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_presentation(&self, id: PresentationId) -> bool {
        self.presentations.contains_key(&id)
    }

    pub fn contains_slide(&self, id: SlideId) -> bool {
        self.slides.contains_key(&id)
    }

    pub fn contains_shape(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Number of live ids per namespace: (presentations, slides, shapes).
    pub fn len(&self) -> (usize, usize, usize) {
        (self.presentations.len(), self.slides.len(), self.shapes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.presentations.is_empty()
    }

    // -------------------------------------------------------------------
    // Re-binding
    // -------------------------------------------------------------------

    /// Points a slide id at a different native handle and position.
    pub(crate) fn rebind_slide(&mut self, id: SlideId, handle: SlideHandle, position: usize) {
        if let Some(entry) = self.slides.get_mut(&id) {
            self.slide_index.remove(&(entry.presentation, entry.handle));
            entry.handle = handle;
            entry.position = position;
            self.slide_index.insert((entry.presentation, handle), id);
        }
    }

    /// Points a shape id at a different native handle and position.
    pub(crate) fn rebind_shape(&mut self, id: ShapeId, handle: ShapeHandle, position: usize) {
        if let Some(entry) = self.shapes.get_mut(&id) {
            self.shape_index.remove(&(entry.slide, entry.handle));
            entry.handle = handle;
            entry.position = position;
            self.shape_index.insert((entry.slide, handle), id);
        }
    }

    pub(crate) fn update_slide(&mut self, id: SlideId, position: usize, fingerprint: SlideFingerprint) {
        if let Some(entry) = self.slides.get_mut(&id) {
            entry.position = position;
            entry.fingerprint = fingerprint;
        }
    }

    pub(crate) fn update_shape(&mut self, id: ShapeId, position: usize, fingerprint: blake3::Hash) {
        if let Some(entry) = self.shapes.get_mut(&id) {
            entry.position = position;
            entry.fingerprint = fingerprint;
        }
    }

    pub(crate) fn set_slide_position(&mut self, id: SlideId, position: usize) {
        if let Some(entry) = self.slides.get_mut(&id) {
            entry.position = position;
        }
    }

    // -------------------------------------------------------------------
    // Eviction
    // -------------------------------------------------------------------

    /// Removes a presentation and every slide and shape beneath it.
    /// Returns false if the id was not live.
    pub fn evict_presentation(&mut self, id: PresentationId) -> bool {
        let Some(entry) = self.presentations.shift_remove(&id) else {
            return false;
        };
        self.doc_index.remove(&entry.handle);
        for slide in entry.slides {
            self.remove_slide_entry(slide);
        }
        true
    }

    /// Removes a slide and its shapes.
    pub fn evict_slide(&mut self, id: SlideId) -> bool {
        let Some(presentation) = self.slides.get(&id).map(|entry| entry.presentation) else {
            return false;
        };
        if let Some(parent) = self.presentations.get_mut(&presentation) {
            parent.slides.shift_remove(&id);
        }
        self.remove_slide_entry(id);
        true
    }

    pub fn evict_shape(&mut self, id: ShapeId) -> bool {
        let Some(entry) = self.shapes.shift_remove(&id) else {
            return false;
        };
        self.shape_index.remove(&(entry.slide, entry.handle));
        if let Some(parent) = self.slides.get_mut(&entry.slide) {
            parent.shapes.shift_remove(&id);
        }
        true
    }

    fn remove_slide_entry(&mut self, id: SlideId) {
        let Some(entry) = self.slides.shift_remove(&id) else {
            return;
        };
        self.slide_index.remove(&(entry.presentation, entry.handle));
        for shape in entry.shapes {
            if let Some(shape_entry) = self.shapes.shift_remove(&shape) {
                self.shape_index.remove(&(id, shape_entry.handle));
            }
        }
    }
}
