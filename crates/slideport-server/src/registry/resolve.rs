//! Host-aware resolution and re-synchronization.
//!
//! A registry entry is only a hint: the user may reorder, delete, or cut and
//! paste objects in the application window at any time. Every resolve
//! re-validates the stored native handle against the host's current children
//! and repairs the entry when it drifted:
//!
//! 1. the child at the cached position still carries the cached handle
//!    (and, for shapes, the cached kind);
//! 2. the cached handle is found elsewhere in the parent, so only the
//!    position is updated;
//! 3. exactly one child that no other live id claims has the cached content
//!    fingerprint, so the id is re-bound to it;
//! 4. for slides only: no child matches by content but exactly one unclaimed
//!    child has the cached outline (layout and shape structure), which covers
//!    a slide edited and then cut and pasted in the application window;
//! 5. otherwise the id is evicted, with its descendants, and reported as
//!    not found.
//!
//! Every successful resolve records the fingerprints it observed, and a slide
//! that is re-bound carries its shape ids over to the new shapes in z-order.
//!
//! Full walks (`sync_*`) reconcile a whole parent at once: they refresh
//! positions and fingerprints, re-bind or evict stale ids, and register
//! children that appeared out-of-band.

use slideport_core::{
    DocHandle, LayoutType, PresentationId, ShapeHandle, ShapeId, ShapeSnapshot, SlideHandle,
    SlideId,
};
use slideport_host::{
    shape_fingerprint, DocumentInfo, HostError, PresentationHost, SlideFingerprint, SlideSummary,
};

use super::{ObjectRegistry, RegistryError};

/// A slide id checked against the host.
#[derive(Debug, Clone)]
pub struct ResolvedSlide {
    pub presentation: PresentationId,
    pub doc: DocHandle,
    pub id: SlideId,
    pub handle: SlideHandle,
    pub position: usize,
    pub layout: LayoutType,
}

/// A shape id checked against the host, with what the host reports about it.
#[derive(Debug, Clone)]
pub struct ResolvedShape {
    pub slide: ResolvedSlide,
    pub id: ShapeId,
    pub position: usize,
    pub snapshot: ShapeSnapshot,
}

impl ResolvedShape {
    pub fn handle(&self) -> ShapeHandle {
        self.snapshot.handle
    }
}

/// One slide of a full walk.
#[derive(Debug, Clone)]
pub struct BoundSlide {
    pub id: SlideId,
    pub summary: SlideSummary,
    pub shapes: Vec<ShapeSnapshot>,
}

impl ResolvedSlide {
    fn from_summary(presentation: PresentationId, doc: DocHandle, id: SlideId, s: &SlideSummary) -> Self {
        ResolvedSlide {
            presentation,
            doc,
            id,
            handle: s.handle,
            position: s.position,
            layout: s.layout,
        }
    }
}

impl ObjectRegistry {
    /// Resolves a presentation id to a document the host still has open.
    pub fn resolve_presentation(
        &mut self,
        host: &dyn PresentationHost,
        id: PresentationId,
    ) -> Result<DocHandle, RegistryError> {
        let handle = self.presentation(id)?.handle;
        match host.document(handle) {
            Ok(_) => Ok(handle),
            Err(HostError::DocumentNotFound(_)) => {
                tracing::warn!(presentation = %id, "document closed out-of-band, evicting");
                self.evict_presentation(id);
                Err(RegistryError::PresentationNotFound(id))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Resolves a slide id, re-binding or evicting it if it drifted.
    pub fn resolve_slide(
        &mut self,
        host: &dyn PresentationHost,
        presentation: PresentationId,
        id: SlideId,
    ) -> Result<ResolvedSlide, RegistryError> {
        let doc = self.resolve_presentation(host, presentation)?;
        let (owner, handle, position, fingerprint) = {
            let entry = self.slide(id)?;
            (entry.presentation, entry.handle, entry.position, entry.fingerprint)
        };
        if owner != presentation {
            return Err(RegistryError::SlideNotInPresentation {
                slide: id,
                presentation,
            });
        }

        let summaries = host.slides(doc)?;
        let at_position = position
            .checked_sub(1)
            .and_then(|index| summaries.get(index))
            .filter(|summary| summary.handle == handle);
        if let Some(summary) = at_position {
            let shapes = host.shapes(doc, summary.handle)?;
            self.observe_slide(id, summary, &shapes);
            return Ok(ResolvedSlide::from_summary(presentation, doc, id, summary));
        }

        if let Some(summary) = summaries.iter().find(|summary| summary.handle == handle) {
            tracing::debug!(slide = %id, from = position, to = summary.position, "slide moved, position re-bound");
            let shapes = host.shapes(doc, summary.handle)?;
            self.refresh_positions(presentation, &summaries);
            self.observe_slide(id, summary, &shapes);
            return Ok(ResolvedSlide::from_summary(presentation, doc, id, summary));
        }

        let mut candidates = Vec::new();
        for summary in &summaries {
            if self.slide_by_handle(presentation, summary.handle).is_some() {
                continue;
            }
            let shapes = host.shapes(doc, summary.handle)?;
            let observed = SlideFingerprint::of(summary.layout, &shapes);
            candidates.push((summary, shapes, observed));
        }
        let picked = pick_slide(
            fingerprint,
            candidates.iter().map(|(_, _, observed)| *observed),
        );
        match picked {
            Some(index) => {
                let (summary, shapes, _) = &candidates[index];
                tracing::debug!(slide = %id, handle = %summary.handle, "slide re-created by host, re-bound");
                self.rebind_slide(id, summary.handle, summary.position);
                self.carry_shapes(id, shapes);
                self.observe_slide(id, summary, shapes);
                self.refresh_positions(presentation, &summaries);
                Ok(ResolvedSlide::from_summary(presentation, doc, id, summary))
            }
            None => {
                tracing::warn!(slide = %id, candidates = candidates.len(), "slide no longer in document, evicting");
                self.evict_slide(id);
                Err(RegistryError::SlideNotFound(id))
            }
        }
    }

    /// Resolves a shape id on a slide, re-binding or evicting it if it drifted.
    pub fn resolve_shape(
        &mut self,
        host: &dyn PresentationHost,
        presentation: PresentationId,
        slide: SlideId,
        id: ShapeId,
    ) -> Result<ResolvedShape, RegistryError> {
        let resolved = self.resolve_slide(host, presentation, slide)?;
        let (owner, handle, position, kind, fingerprint) = {
            let entry = self.shape(id)?;
            (entry.slide, entry.handle, entry.position, entry.kind, entry.fingerprint)
        };
        if owner != slide {
            return Err(RegistryError::ShapeNotOnSlide { shape: id, slide });
        }

        let snapshots = host.shapes(resolved.doc, resolved.handle)?;
        let at_position = position
            .checked_sub(1)
            .filter(|&index| {
                snapshots
                    .get(index)
                    .is_some_and(|snapshot| snapshot.handle == handle && snapshot.kind == kind)
            });
        let by_handle = at_position.or_else(|| {
            snapshots
                .iter()
                .position(|snapshot| snapshot.handle == handle && snapshot.kind == kind)
        });
        if let Some(index) = by_handle {
            let snapshot = snapshots[index].clone();
            if index + 1 != position {
                tracing::debug!(shape = %id, from = position, to = index + 1, "shape z-order changed, position re-bound");
            }
            self.update_shape(id, index + 1, shape_fingerprint(&snapshot));
            return Ok(ResolvedShape {
                slide: resolved,
                id,
                position: index + 1,
                snapshot,
            });
        }

        let matches: Vec<usize> = snapshots
            .iter()
            .enumerate()
            .filter(|(_, snapshot)| {
                snapshot.kind == kind
                    && self.shape_by_handle(slide, snapshot.handle).is_none()
                    && shape_fingerprint(snapshot) == fingerprint
            })
            .map(|(index, _)| index)
            .collect();
        match matches.as_slice() {
            &[index] => {
                let snapshot = snapshots[index].clone();
                tracing::debug!(shape = %id, handle = %snapshot.handle, "shape re-created by host, re-bound by content");
                self.rebind_shape(id, snapshot.handle, index + 1);
                Ok(ResolvedShape {
                    slide: resolved,
                    id,
                    position: index + 1,
                    snapshot,
                })
            }
            _ => {
                tracing::warn!(shape = %id, candidates = matches.len(), "shape no longer on slide, evicting");
                self.evict_shape(id);
                Err(RegistryError::ShapeNotFound(id))
            }
        }
    }

    /// Reconciles the registry with the host's open documents. Documents
    /// closed out-of-band are evicted; documents opened out-of-band are bound.
    pub fn sync_presentations(
        &mut self,
        host: &dyn PresentationHost,
    ) -> Result<Vec<(PresentationId, DocumentInfo)>, RegistryError> {
        let documents = host.documents()?;
        let stale: Vec<PresentationId> = self
            .presentations
            .iter()
            .filter(|(_, entry)| !documents.iter().any(|doc| doc.handle == entry.handle))
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            tracing::warn!(presentation = %id, "document closed out-of-band, evicting");
            self.evict_presentation(id);
        }

        let mut listed = Vec::with_capacity(documents.len());
        for info in documents {
            let known = self.presentation_by_handle(info.handle).is_some();
            let id = self.register_presentation(info.handle);
            if !known {
                tracing::debug!(presentation = %id, name = %info.name, "bound document opened out-of-band");
                self.sync_slides(host, id)?;
            }
            listed.push((id, info));
        }
        Ok(listed)
    }

    /// Walks every slide of a presentation in structural order.
    pub fn sync_slides(
        &mut self,
        host: &dyn PresentationHost,
        presentation: PresentationId,
    ) -> Result<Vec<BoundSlide>, RegistryError> {
        let doc = self.resolve_presentation(host, presentation)?;
        let mut walked = Vec::new();
        for summary in host.slides(doc)? {
            let shapes = host.shapes(doc, summary.handle)?;
            let fingerprint = SlideFingerprint::of(summary.layout, &shapes);
            walked.push((summary, shapes, fingerprint));
        }

        let stale: Vec<SlideId> = self
            .slide_ids(presentation)
            .into_iter()
            .filter(|id| {
                let handle = self.slides[id].handle;
                !walked.iter().any(|(summary, _, _)| summary.handle == handle)
            })
            .collect();
        for id in stale {
            let fingerprint = self.slides[&id].fingerprint;
            let unbound: Vec<usize> = walked
                .iter()
                .enumerate()
                .filter(|(_, (summary, _, _))| {
                    self.slide_by_handle(presentation, summary.handle).is_none()
                })
                .map(|(index, _)| index)
                .collect();
            let picked = pick_slide(fingerprint, unbound.iter().map(|&index| walked[index].2));
            match picked.map(|pick| unbound[pick]) {
                Some(index) => {
                    let (summary, shapes, _) = &walked[index];
                    tracing::debug!(slide = %id, handle = %summary.handle, "slide re-created by host, re-bound");
                    self.rebind_slide(id, summary.handle, summary.position);
                    self.carry_shapes(id, shapes);
                }
                None => {
                    tracing::warn!(slide = %id, "slide no longer in document, evicting");
                    self.evict_slide(id);
                }
            }
        }

        let mut bound = Vec::with_capacity(walked.len());
        for (summary, shapes, fingerprint) in walked {
            let id = match self.slide_by_handle(presentation, summary.handle) {
                Some(id) => {
                    self.update_slide(id, summary.position, fingerprint);
                    self.observe_shapes(id, &shapes);
                    id
                }
                None => {
                    let id = self.register_slide(
                        presentation,
                        summary.handle,
                        summary.position,
                        fingerprint,
                    )?;
                    self.reconcile_shapes(id, &shapes)?;
                    id
                }
            };
            bound.push(BoundSlide { id, summary, shapes });
        }
        Ok(bound)
    }

    /// Walks every shape of a slide in z-order and refreshes the slide's
    /// fingerprint.
    pub fn sync_shapes(
        &mut self,
        host: &dyn PresentationHost,
        presentation: PresentationId,
        slide: SlideId,
    ) -> Result<(ResolvedSlide, Vec<(ShapeId, ShapeSnapshot)>), RegistryError> {
        let resolved = self.resolve_slide(host, presentation, slide)?;
        let snapshots = host.shapes(resolved.doc, resolved.handle)?;
        let ids = self.reconcile_shapes(slide, &snapshots)?;
        self.update_slide(
            slide,
            resolved.position,
            SlideFingerprint::of(resolved.layout, &snapshots),
        );
        Ok((resolved, ids.into_iter().zip(snapshots).collect()))
    }

    /// Registers a slide that this system just created on the host, together
    /// with all of its shapes.
    pub fn register_slide_tree(
        &mut self,
        host: &dyn PresentationHost,
        presentation: PresentationId,
        doc: DocHandle,
        handle: SlideHandle,
        position: usize,
        layout: LayoutType,
    ) -> Result<(SlideId, Vec<ShapeId>), RegistryError> {
        let shapes = host.shapes(doc, handle)?;
        let fingerprint = SlideFingerprint::of(layout, &shapes);
        let id = self.register_slide(presentation, handle, position, fingerprint)?;
        let shape_ids = self.reconcile_shapes(id, &shapes)?;
        Ok((id, shape_ids))
    }

    /// Updates cached positions of every bound slide from a fresh listing.
    pub fn refresh_positions(&mut self, presentation: PresentationId, summaries: &[SlideSummary]) {
        for summary in summaries {
            if let Some(id) = self.slide_by_handle(presentation, summary.handle) {
                self.set_slide_position(id, summary.position);
            }
        }
    }

    /// Records the current position and fingerprints of a bound slide and
    /// of the shapes it still shares handles with.
    fn observe_slide(&mut self, id: SlideId, summary: &SlideSummary, shapes: &[ShapeSnapshot]) {
        self.update_slide(id, summary.position, SlideFingerprint::of(summary.layout, shapes));
        self.observe_shapes(id, shapes);
    }

    fn observe_shapes(&mut self, slide: SlideId, shapes: &[ShapeSnapshot]) {
        for (index, snapshot) in shapes.iter().enumerate() {
            if let Some(shape) = self.shape_by_handle(slide, snapshot.handle) {
                self.update_shape(shape, index + 1, shape_fingerprint(snapshot));
            }
        }
    }

    /// Points the shape ids of a re-bound slide at the re-created shapes,
    /// matching by z-order position and kind. Ids with no counterpart are
    /// left for the next reconcile to resolve.
    fn carry_shapes(&mut self, slide: SlideId, shapes: &[ShapeSnapshot]) {
        for id in self.shape_ids(slide) {
            let (position, kind) = {
                let entry = &self.shapes[&id];
                (entry.position, entry.kind)
            };
            let Some(snapshot) = position.checked_sub(1).and_then(|index| shapes.get(index)) else {
                continue;
            };
            if snapshot.kind == kind && self.shape_by_handle(slide, snapshot.handle).is_none() {
                self.rebind_shape(id, snapshot.handle, position);
            }
        }
    }

    /// Matches a slide's registered shapes against a fresh z-order listing,
    /// returning one id per snapshot.
    fn reconcile_shapes(
        &mut self,
        slide: SlideId,
        snapshots: &[ShapeSnapshot],
    ) -> Result<Vec<ShapeId>, RegistryError> {
        let stale: Vec<ShapeId> = self
            .shape_ids(slide)
            .into_iter()
            .filter(|id| {
                let handle = self.shapes[id].handle;
                !snapshots.iter().any(|snapshot| snapshot.handle == handle)
            })
            .collect();
        for id in stale {
            let (kind, fingerprint) = {
                let entry = &self.shapes[&id];
                (entry.kind, entry.fingerprint)
            };
            let matches: Vec<usize> = snapshots
                .iter()
                .enumerate()
                .filter(|(_, snapshot)| {
                    snapshot.kind == kind
                        && self.shape_by_handle(slide, snapshot.handle).is_none()
                        && shape_fingerprint(snapshot) == fingerprint
                })
                .map(|(index, _)| index)
                .collect();
            match matches.as_slice() {
                &[index] => {
                    tracing::debug!(shape = %id, "shape re-created by host, re-bound by content");
                    self.rebind_shape(id, snapshots[index].handle, index + 1);
                }
                _ => {
                    tracing::warn!(shape = %id, "shape no longer on slide, evicting");
                    self.evict_shape(id);
                }
            }
        }

        let mut ids = Vec::with_capacity(snapshots.len());
        for (index, snapshot) in snapshots.iter().enumerate() {
            let fingerprint = shape_fingerprint(snapshot);
            let id = match self.shape_by_handle(slide, snapshot.handle) {
                Some(id) => {
                    self.update_shape(id, index + 1, fingerprint);
                    id
                }
                None => self.register_shape(
                    slide,
                    snapshot.handle,
                    index + 1,
                    snapshot.kind,
                    fingerprint,
                )?,
            };
            ids.push(id);
        }
        Ok(ids)
    }
}

/// Picks the one unclaimed slide a stale id should move to: by content
/// first, then by outline. More than one match at either step is no match.
fn pick_slide(
    target: SlideFingerprint,
    candidates: impl Iterator<Item = SlideFingerprint> + Clone,
) -> Option<usize> {
    let unique = |matches: Vec<usize>| match matches.as_slice() {
        &[index] => Some(index),
        _ => None,
    };
    let by_content: Vec<usize> = candidates
        .clone()
        .enumerate()
        .filter(|(_, observed)| observed.content == target.content)
        .map(|(index, _)| index)
        .collect();
    if !by_content.is_empty() {
        return unique(by_content);
    }
    unique(
        candidates
            .enumerate()
            .filter(|(_, observed)| observed.outline == target.outline)
            .map(|(index, _)| index)
            .collect(),
    )
}
