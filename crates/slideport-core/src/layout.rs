//! Slide layouts and the placeholders each layout provides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Placeholder role a shape inherits from its slide layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderRole {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    Picture,
}

impl PlaceholderRole {
    /// Whether the placeholder holds the slide title.
    pub fn is_title(self) -> bool {
        matches!(self, PlaceholderRole::Title | PlaceholderRole::CenterTitle)
    }

    /// `PpPlaceholderType` code.
    pub fn pp_code(self) -> i32 {
        match self {
            PlaceholderRole::Title => 1,
            PlaceholderRole::Body => 2,
            PlaceholderRole::CenterTitle => 3,
            PlaceholderRole::Subtitle => 4,
            PlaceholderRole::Picture => 18,
        }
    }
}

/// The fixed set of layouts a new slide can be created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutType {
    Title,
    TitleAndContent,
    TwoContent,
    SectionHeader,
    TitleOnly,
    Blank,
    Comparison,
    ContentWithCaption,
    PictureWithCaption,
}

impl LayoutType {
    /// Every supported layout, in menu order.
    pub const ALL: [LayoutType; 9] = [
        LayoutType::Title,
        LayoutType::TitleAndContent,
        LayoutType::TwoContent,
        LayoutType::SectionHeader,
        LayoutType::TitleOnly,
        LayoutType::Blank,
        LayoutType::Comparison,
        LayoutType::ContentWithCaption,
        LayoutType::PictureWithCaption,
    ];

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            LayoutType::Title => "title",
            LayoutType::TitleAndContent => "title_and_content",
            LayoutType::TwoContent => "two_content",
            LayoutType::SectionHeader => "section_header",
            LayoutType::TitleOnly => "title_only",
            LayoutType::Blank => "blank",
            LayoutType::Comparison => "comparison",
            LayoutType::ContentWithCaption => "content_with_caption",
            LayoutType::PictureWithCaption => "picture_with_caption",
        }
    }

    /// `PpSlideLayout` code used by COM hosts.
    pub fn pp_code(self) -> i32 {
        match self {
            LayoutType::Title => 1,
            LayoutType::TitleAndContent => 2,
            LayoutType::TwoContent => 3,
            LayoutType::TitleOnly => 11,
            LayoutType::Blank => 12,
            LayoutType::SectionHeader => 33,
            LayoutType::Comparison => 34,
            LayoutType::ContentWithCaption => 35,
            LayoutType::PictureWithCaption => 36,
        }
    }

    /// Placeholders a fresh slide of this layout carries, in z-order.
    pub fn placeholders(self) -> &'static [PlaceholderRole] {
        use PlaceholderRole::*;
        match self {
            LayoutType::Title => &[CenterTitle, Subtitle],
            LayoutType::TitleAndContent | LayoutType::SectionHeader => &[Title, Body],
            LayoutType::TwoContent | LayoutType::ContentWithCaption => &[Title, Body, Body],
            LayoutType::TitleOnly => &[Title],
            LayoutType::Blank => &[],
            LayoutType::Comparison => &[Title, Body, Body, Body, Body],
            LayoutType::PictureWithCaption => &[Title, Picture, Body],
        }
    }

    fn expected_names() -> String {
        Self::ALL
            .iter()
            .map(|layout| layout.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        let layout = match normalized.as_str() {
            "title" => LayoutType::Title,
            "title_and_content" | "title+content" | "text" | "content" => {
                LayoutType::TitleAndContent
            }
            "two_content" | "two_column" | "two_columns" => LayoutType::TwoContent,
            "section_header" | "section" => LayoutType::SectionHeader,
            "title_only" => LayoutType::TitleOnly,
            "blank" => LayoutType::Blank,
            "comparison" => LayoutType::Comparison,
            "content_with_caption" => LayoutType::ContentWithCaption,
            "picture_with_caption" => LayoutType::PictureWithCaption,
            _ => {
                return Err(CoreError::UnknownLayout {
                    name: s.to_string(),
                    expected: Self::expected_names(),
                })
            }
        };
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_parse_back() {
        for layout in LayoutType::ALL {
            assert_eq!(layout.name().parse::<LayoutType>().unwrap(), layout);
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert_eq!("Title+Content".parse::<LayoutType>().unwrap(), LayoutType::TitleAndContent);
        assert_eq!("section-header".parse::<LayoutType>().unwrap(), LayoutType::SectionHeader);
        assert_eq!("Two Columns".parse::<LayoutType>().unwrap(), LayoutType::TwoContent);
    }

    #[test]
    fn unknown_layout_lists_expected_names() {
        let err = "hero".parse::<LayoutType>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("hero"));
        assert!(message.contains("title_and_content"));
    }

    #[test]
    fn blank_has_no_title() {
        let titled = |layout: LayoutType| layout.placeholders().iter().any(|role| role.is_title());
        assert!(!titled(LayoutType::Blank));
        assert!(titled(LayoutType::Title));
        assert!(titled(LayoutType::TitleOnly));
        assert!(LayoutType::Blank.placeholders().is_empty());
    }
}
