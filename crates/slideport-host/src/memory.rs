//! In-memory [`PresentationHost`] implementation.
//!
//! [`MemoryHost`] behaves like a desktop presentation application: it has a
//! process that must be attached before use, a list of open documents, an
//! active window and a user selection. Documents are saved as deck files via
//! [`crate::persist`].
//!
//! The host is a cheap-to-clone handle over shared state. One clone is given
//! to the service layer; others can play the part of the human user through
//! the `ui_*` methods, editing documents out-of-band exactly as someone
//! working in the application window would. Tests also use
//! [`MemoryHost::fail_next`] to make the next call of a given kind fail.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use slideport_core::{
    DocHandle, Font, FontPatch, Geometry, GeometryPatch, LayoutType, NativeShapeType,
    ShapeHandle, ShapeSnapshot, SlideHandle,
};

use crate::deck::{Deck, DeckShape, DeckSlide, Master, TextFrame};
use crate::error::HostError;
use crate::persist;
use crate::traits::PresentationHost;
use crate::types::{AppStatus, DocumentInfo, HostSelection, SectionInfo, SlideSummary};

/// File extensions the host opens and saves.
const SUPPORTED_EXTENSIONS: [&str; 4] = ["pptx", "pptm", "ppt", "potx"];

/// Host operations that can be made to fail once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFault {
    Launch,
    Open,
    Save,
    SaveCopy,
    Close,
    AddSlide,
    DuplicateSlide,
    MoveSlide,
    DeleteSlide,
    SetText,
    SetFont,
    SetGeometry,
    AddTextBox,
    CopyShape,
    DeleteShape,
    /// Reading a document's slide list.
    ListSlides,
}

impl HostFault {
    fn operation(self) -> &'static str {
        match self {
            HostFault::Launch => "launch",
            HostFault::Open => "open",
            HostFault::Save => "save",
            HostFault::SaveCopy => "save copy",
            HostFault::Close => "close",
            HostFault::AddSlide => "add slide",
            HostFault::DuplicateSlide => "duplicate slide",
            HostFault::MoveSlide => "move slide",
            HostFault::DeleteSlide => "delete slide",
            HostFault::SetText => "set text",
            HostFault::SetFont => "set font",
            HostFault::SetGeometry => "set geometry",
            HostFault::AddTextBox => "add text box",
            HostFault::CopyShape => "copy shape",
            HostFault::DeleteShape => "delete shape",
            HostFault::ListSlides => "list slides",
        }
    }
}

#[derive(Debug)]
struct OpenDocument {
    handle: DocHandle,
    deck: Deck,
    path: Option<PathBuf>,
    untitled_name: String,
    dirty: bool,
}

impl OpenDocument {
    fn name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.untitled_name.clone())
    }

    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            handle: self.handle,
            name: self.name(),
            path: self.path.clone(),
            dirty: self.dirty,
            slide_count: self.deck.slides.len(),
        }
    }

    fn slide_index(&self, slide: SlideHandle) -> Result<usize, HostError> {
        self.deck
            .slide_index(slide)
            .ok_or(HostError::SlideNotFound {
                doc: self.handle,
                slide,
            })
    }

    fn slide_mut(&mut self, slide: SlideHandle) -> Result<&mut DeckSlide, HostError> {
        let index = self.slide_index(slide)?;
        Ok(&mut self.deck.slides[index])
    }

    fn slide_at(&self, position: usize) -> Result<&DeckSlide, HostError> {
        position
            .checked_sub(1)
            .and_then(|index| self.deck.slides.get(index))
            .ok_or(HostError::PositionOutOfRange {
                position,
                count: self.deck.slides.len(),
            })
    }

    fn shape_mut(
        &mut self,
        slide: SlideHandle,
        shape: ShapeHandle,
    ) -> Result<&mut DeckShape, HostError> {
        let slide_ref = self.slide_mut(slide)?;
        let index = slide_ref
            .shape_index(shape)
            .ok_or(HostError::ShapeNotFound { slide, shape })?;
        Ok(&mut slide_ref.shapes[index])
    }
}

#[derive(Debug)]
struct HostState {
    installed: bool,
    running: bool,
    hidden: bool,
    visible: bool,
    documents: Vec<OpenDocument>,
    active: Option<DocHandle>,
    selection: Option<HostSelection>,
    next_handle: u64,
    untitled: u32,
    /// Armed faults with the number of matching calls still to let through.
    faults: Vec<(HostFault, usize)>,
}

impl HostState {
    fn alloc(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn ensure_running(&self) -> Result<(), HostError> {
        if self.running {
            Ok(())
        } else {
            Err(HostError::NotRunning)
        }
    }

    /// Consumes an armed fault for `fault`, turning it into a rejection.
    fn check_fault(&mut self, fault: HostFault) -> Result<(), HostError> {
        let Some(index) = self.faults.iter().position(|(armed, _)| *armed == fault) else {
            return Ok(());
        };
        if self.faults[index].1 > 0 {
            self.faults[index].1 -= 1;
            return Ok(());
        }
        self.faults.remove(index);
        Err(HostError::rejected(fault.operation(), "injected failure"))
    }

    fn doc(&self, handle: DocHandle) -> Result<&OpenDocument, HostError> {
        self.ensure_running()?;
        self.documents
            .iter()
            .find(|doc| doc.handle == handle)
            .ok_or(HostError::DocumentNotFound(handle))
    }

    fn doc_mut(&mut self, handle: DocHandle) -> Result<&mut OpenDocument, HostError> {
        self.ensure_running()?;
        self.documents
            .iter_mut()
            .find(|doc| doc.handle == handle)
            .ok_or(HostError::DocumentNotFound(handle))
    }

    fn status(&self) -> AppStatus {
        AppStatus {
            running: self.running,
            visible: self.running && self.visible,
            version: format!("MemoryHost/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    fn new_document(&mut self) -> DocHandle {
        let handle = DocHandle(self.alloc());
        self.untitled += 1;
        let master = Master::default();
        let mut deck = Deck::blank(master.clone());
        let title = DeckSlide::from_layout(LayoutType::Title, &master, || self.alloc());
        deck.insert_slide(0, title);
        self.documents.push(OpenDocument {
            handle,
            deck,
            path: None,
            untitled_name: format!("Presentation{}", self.untitled),
            dirty: false,
        });
        self.active = Some(handle);
        handle
    }

    fn forget_selection_of(&mut self, doc: DocHandle, slide: Option<SlideHandle>) {
        let stale = self.selection.as_ref().is_some_and(|selection| {
            selection.document == doc && (slide.is_none() || selection.slide == slide)
        });
        if stale {
            self.selection = None;
        }
    }
}

/// An in-process presentation application.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    state: Arc<Mutex<HostState>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// An installed host whose process has not been started yet.
    pub fn new() -> Self {
        MemoryHost {
            state: Arc::new(Mutex::new(HostState {
                installed: true,
                running: false,
                hidden: false,
                visible: false,
                documents: Vec::new(),
                active: None,
                selection: None,
                next_handle: 0,
                untitled: 0,
                faults: Vec::new(),
            })),
        }
    }

    /// A host that keeps its window hidden after attach.
    pub fn hidden() -> Self {
        let host = Self::new();
        host.lock().hidden = true;
        host
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulates the application being absent from the machine.
    pub fn set_installed(&self, installed: bool) {
        self.lock().installed = installed;
    }

    /// Makes the next call of the given kind fail with a host rejection.
    pub fn fail_next(&self, fault: HostFault) {
        self.fail_after(fault, 0);
    }

    /// Lets `calls` calls of the given kind succeed, then fails the next one.
    pub fn fail_after(&self, fault: HostFault, calls: usize) {
        self.lock().faults.push((fault, calls));
    }

    /// Simulates the user quitting the application.
    pub fn ui_quit(&self) {
        let mut state = self.lock();
        state.running = false;
        state.visible = false;
        state.documents.clear();
        state.active = None;
        state.selection = None;
    }

    // -------------------------------------------------------------------
    // Out-of-band edits, as made by a user in the application window
    // -------------------------------------------------------------------

    /// File > New in the application window.
    pub fn ui_new_document(&self) -> Result<DocHandle, HostError> {
        let mut state = self.lock();
        state.ensure_running()?;
        Ok(state.new_document())
    }

    /// Closes a document window without saving.
    pub fn ui_close_document(&self, doc: DocHandle) -> Result<(), HostError> {
        let mut state = self.lock();
        close(&mut state, doc)
    }

    pub fn ui_add_slide(
        &self,
        doc: DocHandle,
        position: usize,
        layout: LayoutType,
    ) -> Result<SlideHandle, HostError> {
        let mut state = self.lock();
        insert_new_slide(&mut state, doc, position, layout)
    }

    /// Drags a slide in the thumbnail pane; identity is preserved.
    pub fn ui_move_slide(&self, doc: DocHandle, from: usize, to: usize) -> Result<(), HostError> {
        let mut state = self.lock();
        let document = state.doc_mut(doc)?;
        let handle = document.slide_at(from)?.handle;
        reposition(document, handle, to)
    }

    pub fn ui_delete_slide(&self, doc: DocHandle, position: usize) -> Result<(), HostError> {
        let mut state = self.lock();
        let document = state.doc_mut(doc)?;
        let handle = document.slide_at(position)?.handle;
        let index = document.slide_index(handle)?;
        document.deck.remove_slide(index);
        document.dirty = true;
        state.forget_selection_of(doc, Some(handle));
        Ok(())
    }

    /// Cuts a slide and pastes it at `to`. The host re-creates the slide and
    /// its shapes, so every native handle changes while content is kept.
    pub fn ui_cut_paste_slide(
        &self,
        doc: DocHandle,
        from: usize,
        to: usize,
    ) -> Result<SlideHandle, HostError> {
        let mut state = self.lock();
        let (index, count) = {
            let document = state.doc(doc)?;
            let old = document.slide_at(from)?.handle;
            (document.slide_index(old)?, document.deck.slides.len())
        };
        if to == 0 || to > count {
            return Err(HostError::PositionOutOfRange { position: to, count });
        }
        let mut slide = state.doc_mut(doc)?.deck.remove_slide(index);
        let old = slide.handle;
        slide.rehandle(|| state.alloc());
        let handle = slide.handle;
        let document = state.doc_mut(doc)?;
        document.deck.insert_slide(to - 1, slide);
        document.dirty = true;
        state.forget_selection_of(doc, Some(old));
        Ok(handle)
    }

    /// Types over the whole text of a shape, addressed by 1-based positions.
    pub fn ui_set_text(
        &self,
        doc: DocHandle,
        slide: usize,
        shape: usize,
        text: &str,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        let document = state.doc_mut(doc)?;
        let target = shape_at_mut(document, slide, shape)?;
        let handle = target.handle;
        let frame = target
            .text_frame
            .as_mut()
            .ok_or(HostError::NoTextFrame(handle))?;
        frame.text = text.to_string();
        document.dirty = true;
        Ok(())
    }

    pub fn ui_delete_shape(
        &self,
        doc: DocHandle,
        slide: usize,
        shape: usize,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        let document = state.doc_mut(doc)?;
        let slide_handle = document.slide_at(slide)?.handle;
        let index = document.slide_index(slide_handle)?;
        let shapes = &mut document.deck.slides[index].shapes;
        if shape == 0 || shape > shapes.len() {
            return Err(HostError::PositionOutOfRange {
                position: shape,
                count: shapes.len(),
            });
        }
        shapes.remove(shape - 1);
        document.dirty = true;
        Ok(())
    }

    /// Insert > Picture.
    pub fn ui_insert_picture(
        &self,
        doc: DocHandle,
        slide: usize,
        geometry: Geometry,
        media: &str,
    ) -> Result<ShapeHandle, HostError> {
        let mut state = self.lock();
        let handle = ShapeHandle(state.alloc());
        let document = state.doc_mut(doc)?;
        let slide_handle = document.slide_at(slide)?.handle;
        let target = document.slide_mut(slide_handle)?;
        let ordinal = target.shapes.len() + 1;
        target.shapes.push(DeckShape {
            handle,
            name: format!("Picture {ordinal}"),
            native_type: NativeShapeType::Picture,
            placeholder: None,
            geometry,
            text_frame: None,
            fill: None,
            media: Some(media.to_string()),
        });
        document.dirty = true;
        Ok(handle)
    }

    /// Adds a section whose first slide is at `first_position`.
    pub fn ui_add_section(
        &self,
        doc: DocHandle,
        name: &str,
        first_position: usize,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        let document = state.doc_mut(doc)?;
        let count = document.deck.slides.len();
        if first_position == 0 || first_position > count + 1 {
            return Err(HostError::PositionOutOfRange {
                position: first_position,
                count,
            });
        }
        document.deck.add_section(name, first_position);
        document.dirty = true;
        Ok(())
    }

    /// Selects shapes (1-based z-order positions) on a slide and activates
    /// the document's window.
    pub fn ui_select_shapes(
        &self,
        doc: DocHandle,
        slide: usize,
        shapes: &[usize],
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        let document = state.doc(doc)?;
        let target = document.slide_at(slide)?;
        let handles = shapes
            .iter()
            .map(|&position| {
                position
                    .checked_sub(1)
                    .and_then(|index| target.shapes.get(index))
                    .map(|shape| shape.handle)
                    .ok_or(HostError::PositionOutOfRange {
                        position,
                        count: target.shapes.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let selection = HostSelection {
            document: doc,
            slide: Some(target.handle),
            shapes: handles,
            text: None,
        };
        state.active = Some(doc);
        state.selection = Some(selection);
        Ok(())
    }

    /// Places the caret inside a shape's text frame with `text` highlighted.
    pub fn ui_select_text(
        &self,
        doc: DocHandle,
        slide: usize,
        shape: usize,
        text: &str,
    ) -> Result<(), HostError> {
        self.ui_select_shapes(doc, slide, &[shape])?;
        let mut state = self.lock();
        if let Some(selection) = state.selection.as_mut() {
            selection.text = Some(text.to_string());
        }
        Ok(())
    }
}

fn shape_at_mut(
    document: &mut OpenDocument,
    slide: usize,
    shape: usize,
) -> Result<&mut DeckShape, HostError> {
    let slide_handle = document.slide_at(slide)?.handle;
    let target = document.slide_mut(slide_handle)?;
    let count = target.shapes.len();
    shape
        .checked_sub(1)
        .and_then(|index| target.shapes.get_mut(index))
        .ok_or(HostError::PositionOutOfRange {
            position: shape,
            count,
        })
}

fn insert_new_slide(
    state: &mut HostState,
    doc: DocHandle,
    position: usize,
    layout: LayoutType,
) -> Result<SlideHandle, HostError> {
    let (count, master) = {
        let document = state.doc(doc)?;
        (document.deck.slides.len(), document.deck.default_master())
    };
    if position == 0 || position > count + 1 {
        return Err(HostError::PositionOutOfRange {
            position,
            count: count + 1,
        });
    }
    let slide = DeckSlide::from_layout(layout, &master, || state.alloc());
    let handle = slide.handle;
    let document = state.doc_mut(doc)?;
    document.deck.insert_slide(position - 1, slide);
    document.dirty = true;
    Ok(handle)
}

fn reposition(
    document: &mut OpenDocument,
    slide: SlideHandle,
    position: usize,
) -> Result<(), HostError> {
    let count = document.deck.slides.len();
    if position == 0 || position > count {
        return Err(HostError::PositionOutOfRange { position, count });
    }
    let index = document.slide_index(slide)?;
    if index + 1 != position {
        let moved = document.deck.remove_slide(index);
        document.deck.insert_slide(position - 1, moved);
        document.dirty = true;
    }
    Ok(())
}

fn close(state: &mut HostState, doc: DocHandle) -> Result<(), HostError> {
    state.doc(doc)?;
    state.documents.retain(|document| document.handle != doc);
    if state.active == Some(doc) {
        state.active = state.documents.last().map(|document| document.handle);
    }
    state.forget_selection_of(doc, None);
    Ok(())
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl PresentationHost for MemoryHost {
    fn attach(&mut self) -> Result<AppStatus, HostError> {
        let mut state = self.lock();
        if !state.installed {
            return Err(HostError::NotInstalled(
                "no presentation application is registered".to_string(),
            ));
        }
        if !state.running {
            state.check_fault(HostFault::Launch)?;
            state.running = true;
            tracing::debug!("memory host launched");
        }
        state.visible = !state.hidden;
        Ok(state.status())
    }

    fn status(&self) -> AppStatus {
        self.lock().status()
    }

    fn supports_format(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
    }

    fn documents(&self) -> Result<Vec<DocumentInfo>, HostError> {
        let state = self.lock();
        state.ensure_running()?;
        Ok(state.documents.iter().map(OpenDocument::info).collect())
    }

    fn document(&self, doc: DocHandle) -> Result<DocumentInfo, HostError> {
        Ok(self.lock().doc(doc)?.info())
    }

    fn active_document(&self) -> Result<Option<DocHandle>, HostError> {
        let state = self.lock();
        state.ensure_running()?;
        Ok(state.active)
    }

    fn create_document(&mut self) -> Result<DocHandle, HostError> {
        let mut state = self.lock();
        state.ensure_running()?;
        Ok(state.new_document())
    }

    fn open_document(&mut self, path: &Path) -> Result<DocHandle, HostError> {
        let mut state = self.lock();
        state.ensure_running()?;
        let path = canonical(path);
        if let Some(open) = state
            .documents
            .iter()
            .find(|doc| doc.path.as_deref() == Some(path.as_path()))
        {
            let handle = open.handle;
            state.active = Some(handle);
            return Ok(handle);
        }
        state.check_fault(HostFault::Open)?;
        let mut deck = persist::read_deck(&path).map_err(|err| match err {
            HostError::Io { source, .. } => HostError::OpenRejected {
                path: path.clone(),
                reason: source.to_string(),
            },
            HostError::Serialization(source) => HostError::OpenRejected {
                path: path.clone(),
                reason: format!("not a presentation: {source}"),
            },
            other => other,
        })?;
        for slide in &mut deck.slides {
            slide.rehandle(|| state.alloc());
        }
        let handle = DocHandle(state.alloc());
        state.documents.push(OpenDocument {
            handle,
            deck,
            path: Some(path),
            untitled_name: String::new(),
            dirty: false,
        });
        state.active = Some(handle);
        Ok(handle)
    }

    fn save_document(
        &mut self,
        doc: DocHandle,
        path: Option<&Path>,
    ) -> Result<PathBuf, HostError> {
        let mut state = self.lock();
        let target = {
            let document = state.doc(doc)?;
            match path {
                Some(path) => path.to_path_buf(),
                None => document.path.clone().ok_or(HostError::NoPath(doc))?,
            }
        };
        state.check_fault(HostFault::Save)?;
        let document = state.doc_mut(doc)?;
        let bytes = persist::encode_deck(&document.deck)?;
        persist::write_atomic(&target, &bytes)?;
        let target = canonical(&target);
        document.path = Some(target.clone());
        document.dirty = false;
        Ok(target)
    }

    fn save_copy(&mut self, doc: DocHandle, path: &Path) -> Result<(), HostError> {
        let mut state = self.lock();
        state.doc(doc)?;
        state.check_fault(HostFault::SaveCopy)?;
        let bytes = persist::encode_deck(&state.doc(doc)?.deck)?;
        persist::write_atomic(path, &bytes)
    }

    fn close_document(&mut self, doc: DocHandle) -> Result<(), HostError> {
        let mut state = self.lock();
        state.doc(doc)?;
        state.check_fault(HostFault::Close)?;
        close(&mut state, doc)
    }

    fn sections(&self, doc: DocHandle) -> Result<Vec<SectionInfo>, HostError> {
        Ok(self.lock().doc(doc)?.deck.section_ranges())
    }

    fn slides(&self, doc: DocHandle) -> Result<Vec<SlideSummary>, HostError> {
        let mut state = self.lock();
        state.check_fault(HostFault::ListSlides)?;
        let document = state.doc(doc)?;
        Ok(document
            .deck
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| SlideSummary {
                handle: slide.handle,
                position: index + 1,
                layout: slide.layout,
                master: slide.master.clone(),
                shape_count: slide.shapes.len(),
            })
            .collect())
    }

    fn add_slide(
        &mut self,
        doc: DocHandle,
        position: usize,
        layout: LayoutType,
    ) -> Result<SlideHandle, HostError> {
        let mut state = self.lock();
        state.doc(doc)?;
        state.check_fault(HostFault::AddSlide)?;
        insert_new_slide(&mut state, doc, position, layout)
    }

    fn duplicate_slide(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
    ) -> Result<SlideHandle, HostError> {
        let mut state = self.lock();
        let (index, mut copy) = {
            let document = state.doc(doc)?;
            let index = document.slide_index(slide)?;
            (index, document.deck.slides[index].clone())
        };
        state.check_fault(HostFault::DuplicateSlide)?;
        copy.rehandle(|| state.alloc());
        let handle = copy.handle;
        let document = state.doc_mut(doc)?;
        document.deck.insert_slide(index + 1, copy);
        document.dirty = true;
        Ok(handle)
    }

    fn move_slide(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        position: usize,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        state.doc(doc)?.slide_index(slide)?;
        state.check_fault(HostFault::MoveSlide)?;
        reposition(state.doc_mut(doc)?, slide, position)
    }

    fn delete_slide(&mut self, doc: DocHandle, slide: SlideHandle) -> Result<(), HostError> {
        let mut state = self.lock();
        let index = state.doc(doc)?.slide_index(slide)?;
        state.check_fault(HostFault::DeleteSlide)?;
        let document = state.doc_mut(doc)?;
        document.deck.remove_slide(index);
        document.dirty = true;
        state.forget_selection_of(doc, Some(slide));
        Ok(())
    }

    fn shapes(&self, doc: DocHandle, slide: SlideHandle) -> Result<Vec<ShapeSnapshot>, HostError> {
        let state = self.lock();
        let document = state.doc(doc)?;
        let index = document.slide_index(slide)?;
        Ok(document.deck.slides[index]
            .shapes
            .iter()
            .map(DeckShape::snapshot)
            .collect())
    }

    fn set_text(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
        text: &str,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        state.doc_mut(doc)?.shape_mut(slide, shape)?;
        state.check_fault(HostFault::SetText)?;
        let document = state.doc_mut(doc)?;
        let frame = document
            .shape_mut(slide, shape)?
            .text_frame
            .as_mut()
            .ok_or(HostError::NoTextFrame(shape))?;
        frame.text = text.to_string();
        document.dirty = true;
        Ok(())
    }

    fn set_font(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
        patch: &FontPatch,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        state.doc_mut(doc)?.shape_mut(slide, shape)?;
        state.check_fault(HostFault::SetFont)?;
        let document = state.doc_mut(doc)?;
        let frame = document
            .shape_mut(slide, shape)?
            .text_frame
            .as_mut()
            .ok_or(HostError::NoTextFrame(shape))?;
        frame.font = patch.apply(&frame.font);
        document.dirty = true;
        Ok(())
    }

    fn set_geometry(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
        patch: &GeometryPatch,
    ) -> Result<Geometry, HostError> {
        let mut state = self.lock();
        state.doc_mut(doc)?.shape_mut(slide, shape)?;
        state.check_fault(HostFault::SetGeometry)?;
        let document = state.doc_mut(doc)?;
        let target = document.shape_mut(slide, shape)?;
        target.geometry = patch.apply(target.geometry);
        let geometry = target.geometry;
        document.dirty = true;
        Ok(geometry)
    }

    fn add_text_box(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        geometry: Geometry,
        text: &str,
    ) -> Result<ShapeHandle, HostError> {
        let mut state = self.lock();
        let theme_font = {
            let document = state.doc(doc)?;
            document.slide_index(slide)?;
            document.deck.default_master().theme_font
        };
        state.check_fault(HostFault::AddTextBox)?;
        let handle = ShapeHandle(state.alloc());
        let document = state.doc_mut(doc)?;
        let target = document.slide_mut(slide)?;
        let ordinal = target.shapes.len() + 1;
        target.shapes.push(DeckShape {
            handle,
            name: format!("TextBox {ordinal}"),
            native_type: NativeShapeType::TextBox,
            placeholder: None,
            geometry,
            text_frame: Some(TextFrame {
                text: text.to_string(),
                font: Font {
                    name: Some(theme_font),
                    size: Some(18.0),
                    bold: Some(false),
                },
            }),
            fill: None,
            media: None,
        });
        document.dirty = true;
        Ok(handle)
    }

    fn copy_shape(
        &mut self,
        doc: DocHandle,
        from: SlideHandle,
        shape: ShapeHandle,
        to: SlideHandle,
    ) -> Result<ShapeHandle, HostError> {
        let mut state = self.lock();
        let mut copy = {
            let document = state.doc_mut(doc)?;
            document.slide_index(to)?;
            document.shape_mut(from, shape)?.clone()
        };
        state.check_fault(HostFault::CopyShape)?;
        copy.handle = ShapeHandle(state.alloc());
        let handle = copy.handle;
        let document = state.doc_mut(doc)?;
        document.slide_mut(to)?.shapes.push(copy);
        document.dirty = true;
        Ok(handle)
    }

    fn delete_shape(
        &mut self,
        doc: DocHandle,
        slide: SlideHandle,
        shape: ShapeHandle,
    ) -> Result<(), HostError> {
        let mut state = self.lock();
        state.doc_mut(doc)?.shape_mut(slide, shape)?;
        state.check_fault(HostFault::DeleteShape)?;
        let document = state.doc_mut(doc)?;
        let target = document.slide_mut(slide)?;
        target.shapes.retain(|s| s.handle != shape);
        document.dirty = true;
        Ok(())
    }

    fn selection(&self) -> Result<Option<HostSelection>, HostError> {
        let state = self.lock();
        state.ensure_running()?;
        Ok(state.selection.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached() -> (MemoryHost, DocHandle) {
        let mut host = MemoryHost::new();
        host.attach().unwrap();
        let doc = host.create_document().unwrap();
        (host, doc)
    }

    fn slide_handles(host: &MemoryHost, doc: DocHandle) -> Vec<SlideHandle> {
        host.slides(doc).unwrap().iter().map(|s| s.handle).collect()
    }

    #[test]
    fn operations_require_attach() {
        let mut host = MemoryHost::new();
        assert!(!host.status().running);
        assert!(matches!(host.create_document(), Err(HostError::NotRunning)));
        let status = host.attach().unwrap();
        assert!(status.running && status.visible);
    }

    #[test]
    fn hidden_host_stays_hidden() {
        let mut host = MemoryHost::hidden();
        let status = host.attach().unwrap();
        assert!(status.running);
        assert!(!status.visible);
    }

    #[test]
    fn missing_application_is_not_installed() {
        let mut host = MemoryHost::new();
        host.set_installed(false);
        assert!(matches!(host.attach(), Err(HostError::NotInstalled(_))));
    }

    #[test]
    fn launch_fault_leaves_host_stopped() {
        let mut host = MemoryHost::new();
        host.fail_next(HostFault::Launch);
        assert!(host.attach().is_err());
        assert!(!host.status().running);
        assert!(host.attach().is_ok());
    }

    #[test]
    fn new_document_has_one_title_slide() {
        let (host, doc) = attached();
        let slides = host.slides(doc).unwrap();
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].layout, LayoutType::Title);
        let info = host.document(doc).unwrap();
        assert_eq!(info.name, "Presentation1");
        assert!(info.path.is_none());
    }

    #[test]
    fn add_slide_rejects_positions_past_end() {
        let (mut host, doc) = attached();
        let err = host.add_slide(doc, 3, LayoutType::Blank).unwrap_err();
        assert!(matches!(err, HostError::PositionOutOfRange { position: 3, count: 2 }));
        host.add_slide(doc, 2, LayoutType::Blank).unwrap();
        assert_eq!(host.slides(doc).unwrap().len(), 2);
    }

    #[test]
    fn duplicate_lands_after_source_with_fresh_handles() {
        let (mut host, doc) = attached();
        let first = slide_handles(&host, doc)[0];
        let second = host.add_slide(doc, 2, LayoutType::TitleAndContent).unwrap();
        let shapes = host.shapes(doc, second).unwrap();
        host.set_text(doc, second, shapes[0].handle, "Agenda").unwrap();

        let copy = host.duplicate_slide(doc, second).unwrap();
        assert_eq!(slide_handles(&host, doc), vec![first, second, copy]);

        let original = host.shapes(doc, second).unwrap();
        let copied = host.shapes(doc, copy).unwrap();
        assert_eq!(original.len(), copied.len());
        for (a, b) in original.iter().zip(&copied) {
            assert_ne!(a.handle, b.handle);
            assert_eq!(a.text, b.text);
            assert_eq!(a.geometry, b.geometry);
        }
    }

    #[test]
    fn move_keeps_identity() {
        let (mut host, doc) = attached();
        let first = slide_handles(&host, doc)[0];
        let second = host.add_slide(doc, 2, LayoutType::Blank).unwrap();
        host.move_slide(doc, second, 1).unwrap();
        assert_eq!(slide_handles(&host, doc), vec![second, first]);
        assert!(host.move_slide(doc, second, 3).is_err());
    }

    #[test]
    fn cut_paste_rehandles_slide_and_shapes() {
        let (mut host, doc) = attached();
        let first = slide_handles(&host, doc)[0];
        let before = host.shapes(doc, first).unwrap();
        host.add_slide(doc, 2, LayoutType::Blank).unwrap();

        let pasted = host.ui_cut_paste_slide(doc, 1, 2).unwrap();
        assert_ne!(pasted, first);
        assert_eq!(slide_handles(&host, doc)[1], pasted);
        let after = host.shapes(doc, pasted).unwrap();
        assert_eq!(before.len(), after.len());
        assert!(before.iter().zip(&after).all(|(a, b)| a.handle != b.handle));
    }

    #[test]
    fn text_on_picture_has_no_frame() {
        let (mut host, doc) = attached();
        let slide = slide_handles(&host, doc)[0];
        let picture = host
            .ui_insert_picture(doc, 1, Geometry::new(0.0, 0.0, 10.0, 10.0), "logo.png")
            .unwrap();
        let err = host.set_text(doc, slide, picture, "x").unwrap_err();
        assert!(matches!(err, HostError::NoTextFrame(_)));
    }

    #[test]
    fn save_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let (mut host, doc) = attached();
        let slide = slide_handles(&host, doc)[0];
        let title = host.shapes(doc, slide).unwrap()[0].handle;
        host.set_text(doc, slide, title, "Quarterly").unwrap();
        assert!(host.document(doc).unwrap().dirty);

        assert!(matches!(host.save_document(doc, None), Err(HostError::NoPath(_))));
        let written = host.save_document(doc, Some(&path)).unwrap();
        assert!(!host.document(doc).unwrap().dirty);
        assert_eq!(host.document(doc).unwrap().name, "deck.pptx");

        host.close_document(doc).unwrap();
        let reopened = host.open_document(&written).unwrap();
        assert_ne!(reopened, doc);
        let slide = slide_handles(&host, reopened)[0];
        let shapes = host.shapes(reopened, slide).unwrap();
        assert_eq!(shapes[0].text.as_deref(), Some("Quarterly"));
        // Opening again returns the same document.
        assert_eq!(host.open_document(&path).unwrap(), reopened);
    }

    #[test]
    fn save_copy_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (mut host, doc) = attached();
        host.add_slide(doc, 2, LayoutType::Blank).unwrap();
        host.save_copy(doc, &dir.path().join("copy.pptx")).unwrap();
        let info = host.document(doc).unwrap();
        assert!(info.dirty);
        assert!(info.path.is_none());
    }

    #[test]
    fn open_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.pptx");
        fs::write(&path, b"junk").unwrap();
        let (mut host, _) = attached();
        assert!(matches!(
            host.open_document(&path),
            Err(HostError::OpenRejected { .. })
        ));
        assert!(matches!(
            host.open_document(&dir.path().join("absent.pptx")),
            Err(HostError::OpenRejected { .. })
        ));
    }

    #[test]
    fn injected_fault_fires_once() {
        let (mut host, doc) = attached();
        host.fail_next(HostFault::AddSlide);
        assert!(matches!(
            host.add_slide(doc, 2, LayoutType::Blank),
            Err(HostError::Rejected { .. })
        ));
        assert_eq!(host.slides(doc).unwrap().len(), 1);
        host.add_slide(doc, 2, LayoutType::Blank).unwrap();
    }

    #[test]
    fn delayed_fault_skips_earlier_calls() {
        let (host, doc) = attached();
        host.fail_after(HostFault::ListSlides, 1);
        assert!(host.slides(doc).is_ok());
        assert!(matches!(
            host.slides(doc),
            Err(HostError::Rejected { .. })
        ));
        assert!(host.slides(doc).is_ok());
    }

    #[test]
    fn closing_active_document_activates_previous() {
        let (mut host, first) = attached();
        let second = host.create_document().unwrap();
        assert_eq!(host.active_document().unwrap(), Some(second));
        host.close_document(second).unwrap();
        assert_eq!(host.active_document().unwrap(), Some(first));
        assert!(matches!(
            host.document(second),
            Err(HostError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn selection_tracks_ui_and_clears_on_delete() {
        let (mut host, doc) = attached();
        host.ui_select_shapes(doc, 1, &[1, 2]).unwrap();
        let selection = host.selection().unwrap().unwrap();
        assert_eq!(selection.shapes.len(), 2);
        let slide = selection.slide.unwrap();
        host.add_slide(doc, 2, LayoutType::Blank).unwrap();
        host.delete_slide(doc, slide).unwrap();
        assert!(host.selection().unwrap().is_none());
    }

    #[test]
    fn sections_follow_structural_edits() {
        let (mut host, doc) = attached();
        host.add_slide(doc, 2, LayoutType::Blank).unwrap();
        host.ui_add_section(doc, "Opening", 1).unwrap();
        host.ui_add_section(doc, "Details", 2).unwrap();
        let second = slide_handles(&host, doc)[1];
        host.duplicate_slide(doc, second).unwrap();
        let sections = host.sections(doc).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].slide_count, 2);
        assert_eq!(sections[1].first_slide, 2);
    }
}
