//! The document model of the in-memory host and its on-disk format.
//!
//! A [`Deck`] is what one open document holds: slide masters, sections and
//! slides with their shapes. Native handles are runtime-only and are skipped
//! during serialization; a deck read from disk gets fresh handles.
//!
//! Sections are stored as contiguous slide counts, the same way the host
//! application keeps them. Structural edits go through [`Deck::insert_slide`]
//! and [`Deck::remove_slide`] so the counts always sum to the slide total.

use serde::{Deserialize, Serialize};
use slideport_core::{
    Font, Geometry, LayoutType, NativeShapeType, PlaceholderRole, ShapeHandle, ShapeKind,
    ShapeSnapshot, SlideHandle,
};

use crate::types::SectionInfo;

/// Current version of the deck file format.
pub const DECK_FORMAT_VERSION: u32 = 1;

/// Default slide size, 16:9 in points.
pub const SLIDE_WIDTH: f64 = 960.0;
pub const SLIDE_HEIGHT: f64 = 540.0;

/// Envelope written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckFile {
    pub format_version: u32,
    pub deck: Deck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub slide_width: f64,
    pub slide_height: f64,
    pub masters: Vec<Master>,
    #[serde(default)]
    pub sections: Vec<DeckSection>,
    pub slides: Vec<DeckSlide>,
}

/// A slide master: the theme new slides inherit from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Master {
    pub name: String,
    pub theme_font: String,
    pub background: String,
}

impl Default for Master {
    fn default() -> Self {
        Master {
            name: "Office Theme".to_string(),
            theme_font: "Calibri".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSection {
    pub name: String,
    pub slide_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSlide {
    #[serde(skip)]
    pub handle: SlideHandle,
    pub layout: LayoutType,
    pub master: String,
    /// Slide-level background override.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub shapes: Vec<DeckShape>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckShape {
    #[serde(skip)]
    pub handle: ShapeHandle,
    pub name: String,
    pub native_type: NativeShapeType,
    #[serde(default)]
    pub placeholder: Option<PlaceholderRole>,
    pub geometry: Geometry,
    #[serde(default)]
    pub text_frame: Option<TextFrame>,
    #[serde(default)]
    pub fill: Option<String>,
    /// Source of embedded media, for pictures.
    #[serde(default)]
    pub media: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    pub text: String,
    pub font: Font,
}

impl DeckShape {
    pub fn snapshot(&self) -> ShapeSnapshot {
        ShapeSnapshot {
            handle: self.handle,
            name: self.name.clone(),
            native_type: self.native_type,
            kind: ShapeKind::classify(
                self.native_type,
                self.text_frame.is_some(),
                self.placeholder,
            ),
            placeholder: self.placeholder,
            geometry: self.geometry,
            text: self.text_frame.as_ref().map(|frame| frame.text.clone()),
            font: self.text_frame.as_ref().map(|frame| frame.font.clone()),
        }
    }
}

impl DeckSlide {
    /// A fresh slide carrying the placeholders of `layout`.
    pub fn from_layout(
        layout: LayoutType,
        master: &Master,
        mut next_handle: impl FnMut() -> u64,
    ) -> Self {
        let roles = layout.placeholders();
        let columns = roles
            .iter()
            .filter(|role| matches!(role, PlaceholderRole::Body | PlaceholderRole::Picture))
            .count();
        let mut column = 0;
        let shapes = roles
            .iter()
            .enumerate()
            .map(|(index, &role)| {
                let geometry = match role {
                    PlaceholderRole::Title => Geometry::new(48.0, 30.0, SLIDE_WIDTH - 96.0, 90.0),
                    PlaceholderRole::CenterTitle => {
                        Geometry::new(72.0, 160.0, SLIDE_WIDTH - 144.0, 120.0)
                    }
                    PlaceholderRole::Subtitle => {
                        Geometry::new(96.0, 300.0, SLIDE_WIDTH - 192.0, 80.0)
                    }
                    PlaceholderRole::Body | PlaceholderRole::Picture => {
                        let span = (SLIDE_WIDTH - 96.0) / columns as f64;
                        let geometry = Geometry::new(
                            48.0 + span * column as f64,
                            130.0,
                            span - 12.0,
                            SLIDE_HEIGHT - 170.0,
                        );
                        column += 1;
                        geometry
                    }
                };
                placeholder_shape(next_handle(), role, index + 1, geometry, master)
            })
            .collect();

        DeckSlide {
            handle: SlideHandle(next_handle()),
            layout,
            master: master.name.clone(),
            background: None,
            notes: String::new(),
            shapes,
        }
    }

    pub fn shape_index(&self, handle: ShapeHandle) -> Option<usize> {
        self.shapes.iter().position(|shape| shape.handle == handle)
    }

    /// Gives the slide and every shape a fresh handle, keeping content.
    pub fn rehandle(&mut self, mut next_handle: impl FnMut() -> u64) {
        self.handle = SlideHandle(next_handle());
        for shape in &mut self.shapes {
            shape.handle = ShapeHandle(next_handle());
        }
    }
}

fn placeholder_shape(
    handle: u64,
    role: PlaceholderRole,
    ordinal: usize,
    geometry: Geometry,
    master: &Master,
) -> DeckShape {
    let (label, size, bold) = match role {
        PlaceholderRole::Title | PlaceholderRole::CenterTitle => ("Title", 44.0, true),
        PlaceholderRole::Subtitle => ("Subtitle", 24.0, false),
        PlaceholderRole::Body => ("Content Placeholder", 18.0, false),
        PlaceholderRole::Picture => ("Picture Placeholder", 0.0, false),
    };
    let text_frame = (role != PlaceholderRole::Picture).then(|| TextFrame {
        text: String::new(),
        font: Font {
            name: Some(master.theme_font.clone()),
            size: Some(size),
            bold: Some(bold),
        },
    });
    DeckShape {
        handle: ShapeHandle(handle),
        name: format!("{label} {ordinal}"),
        native_type: NativeShapeType::Placeholder,
        placeholder: Some(role),
        geometry,
        text_frame,
        fill: None,
        media: None,
    }
}

impl Deck {
    /// An empty deck with a single master and no sections.
    pub fn blank(master: Master) -> Self {
        Deck {
            slide_width: SLIDE_WIDTH,
            slide_height: SLIDE_HEIGHT,
            masters: vec![master],
            sections: Vec::new(),
            slides: Vec::new(),
        }
    }

    /// The master new slides inherit from.
    pub fn default_master(&self) -> Master {
        self.masters.first().cloned().unwrap_or_default()
    }

    pub fn slide_index(&self, handle: SlideHandle) -> Option<usize> {
        self.slides.iter().position(|slide| slide.handle == handle)
    }

    /// Inserts at a 0-based index. The slide joins the section of the slide
    /// before it, or the first section when inserted at the front.
    pub fn insert_slide(&mut self, index: usize, slide: DeckSlide) {
        if !self.sections.is_empty() {
            let target = if index == 0 {
                Some(0)
            } else {
                self.section_containing(index - 1)
            };
            let target = target.unwrap_or(self.sections.len() - 1);
            self.sections[target].slide_count += 1;
        }
        self.slides.insert(index, slide);
    }

    /// Removes the slide at a 0-based index.
    pub fn remove_slide(&mut self, index: usize) -> DeckSlide {
        if let Some(section) = self.section_containing(index) {
            self.sections[section].slide_count -= 1;
        }
        self.slides.remove(index)
    }

    /// Starts a new section at the 1-based `first_position`. The section that
    /// contained that slide is split; slides before it stay where they were.
    pub fn add_section(&mut self, name: &str, first_position: usize) {
        let index = first_position.saturating_sub(1).min(self.slides.len());
        if self.sections.is_empty() {
            if index > 0 {
                self.sections.push(DeckSection {
                    name: "Default Section".to_string(),
                    slide_count: index,
                });
            }
            self.sections.push(DeckSection {
                name: name.to_string(),
                slide_count: self.slides.len() - index,
            });
            return;
        }

        let (split, start) = match self.section_containing(index) {
            Some(split) => (split, self.section_start(split)),
            // Past the last slide: append an empty section.
            None => {
                self.sections.push(DeckSection {
                    name: name.to_string(),
                    slide_count: 0,
                });
                return;
            }
        };
        let offset = index - start;
        let remainder = self.sections[split].slide_count - offset;
        self.sections[split].slide_count = offset;
        self.sections.insert(
            split + 1,
            DeckSection {
                name: name.to_string(),
                slide_count: remainder,
            },
        );
    }

    /// Sections with their 1-based first slide positions.
    pub fn section_ranges(&self) -> Vec<SectionInfo> {
        let mut start = 0;
        self.sections
            .iter()
            .map(|section| {
                let info = SectionInfo {
                    name: section.name.clone(),
                    first_slide: start + 1,
                    slide_count: section.slide_count,
                };
                start += section.slide_count;
                info
            })
            .collect()
    }

    fn section_start(&self, section: usize) -> usize {
        self.sections[..section]
            .iter()
            .map(|s| s.slide_count)
            .sum()
    }

    /// Section holding the slide at a 0-based index.
    fn section_containing(&self, index: usize) -> Option<usize> {
        let mut start = 0;
        for (i, section) in self.sections.iter().enumerate() {
            if index < start + section.slide_count {
                return Some(i);
            }
            start += section.slide_count;
        }
        None
    }
}
