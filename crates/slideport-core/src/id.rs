//! Opaque identifier newtypes handed out to callers.
//!
//! Each namespace is a distinct newtype over `u64` with its own textual
//! prefix, so a `SlideId` cannot be used where a `ShapeId` is expected and
//! `slide-4` never parses as a shape. On the wire every id is a string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_prefixed(s, $prefix).map($name)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

opaque_id!(
    /// Identity of an open presentation for the lifetime of the process.
    PresentationId,
    "pres"
);

opaque_id!(
    /// Identity of a slide. Stable across reordering; its position is not.
    SlideId,
    "slide"
);

opaque_id!(
    /// Identity of a shape on one slide. Never shared between slides.
    ShapeId,
    "shape"
);

/// Parses `<prefix>-<n>` with `n >= 1`.
///
/// Agents regularly wrap ids in stray quotes or backticks, so those are
/// stripped along with surrounding whitespace.
fn parse_prefixed(raw: &str, prefix: &'static str) -> Result<u64, CoreError> {
    let invalid = || CoreError::InvalidId {
        raw: raw.to_string(),
        expected: prefix,
    };

    let cleaned = raw
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`'));
    let number = cleaned
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(invalid)?;

    match number.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_namespace_prefix() {
        assert_eq!(PresentationId(3).to_string(), "pres-3");
        assert_eq!(SlideId(12).to_string(), "slide-12");
        assert_eq!(ShapeId(1).to_string(), "shape-1");
    }

    #[test]
    fn parses_own_namespace() {
        assert_eq!("slide-42".parse::<SlideId>().unwrap(), SlideId(42));
        assert_eq!(" pres-7 ".parse::<PresentationId>().unwrap(), PresentationId(7));
    }

    #[test]
    fn strips_stray_quotes() {
        assert_eq!("\"shape-5\"".parse::<ShapeId>().unwrap(), ShapeId(5));
        assert_eq!("`slide-2`".parse::<SlideId>().unwrap(), SlideId(2));
    }

    #[test]
    fn rejects_foreign_namespace() {
        let err = "slide-4".parse::<ShapeId>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidId { expected: "shape", .. }));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!("slide-0".parse::<SlideId>().is_err());
        assert!("slide-".parse::<SlideId>().is_err());
        assert!("slide-x".parse::<SlideId>().is_err());
        assert!("2".parse::<SlideId>().is_err());
        assert!("".parse::<SlideId>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&SlideId(9)).unwrap();
        assert_eq!(json, "\"slide-9\"");
        let back: SlideId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SlideId(9));
        assert!(serde_json::from_str::<SlideId>("\"pres-9\"").is_err());
    }
}
