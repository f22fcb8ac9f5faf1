use std::str::FromStr;

use crate::coords::Axis;

use super::error::KeywordError;

// ── FlexDirection ─────────────────────────────────────────────────────────

/// Main axis of a flex container. Reversal is a separate container flag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

impl FlexDirection {
    #[inline]
    pub const fn main_axis(self) -> Axis {
        match self {
            FlexDirection::Row => Axis::Horizontal,
            FlexDirection::Column => Axis::Vertical,
        }
    }

    #[inline]
    pub const fn cross_axis(self) -> Axis {
        self.main_axis().orthogonal()
    }
}

const DIRECTION_KEYWORDS: &[&str] = &["row", "column"];

impl FromStr for FlexDirection {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row" => Ok(FlexDirection::Row),
            "column" => Ok(FlexDirection::Column),
            other => Err(KeywordError::new(other, DIRECTION_KEYWORDS)),
        }
    }
}

// ── JustifyContent ────────────────────────────────────────────────────────

/// Main-axis distribution of items within a line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

const JUSTIFY_KEYWORDS: &[&str] = &[
    "flex-start",
    "flex-end",
    "center",
    "space-between",
    "space-around",
    "space-evenly",
];

impl FromStr for JustifyContent {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flex-start" => Ok(JustifyContent::FlexStart),
            "flex-end" => Ok(JustifyContent::FlexEnd),
            "center" => Ok(JustifyContent::Center),
            "space-between" => Ok(JustifyContent::SpaceBetween),
            "space-around" => Ok(JustifyContent::SpaceAround),
            "space-evenly" => Ok(JustifyContent::SpaceEvenly),
            other => Err(KeywordError::new(other, JUSTIFY_KEYWORDS)),
        }
    }
}

// ── ItemAlign ─────────────────────────────────────────────────────────────

/// Cross-axis alignment of a single item (`align-items` / `align-self`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ItemAlign {
    FlexStart,
    FlexEnd,
    Center,
    #[default]
    Stretch,
}

const ITEM_ALIGN_KEYWORDS: &[&str] = &["flex-start", "flex-end", "center", "stretch"];

impl FromStr for ItemAlign {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flex-start" => Ok(ItemAlign::FlexStart),
            "flex-end" => Ok(ItemAlign::FlexEnd),
            "center" => Ok(ItemAlign::Center),
            "stretch" => Ok(ItemAlign::Stretch),
            other => Err(KeywordError::new(other, ITEM_ALIGN_KEYWORDS)),
        }
    }
}

// ── ContentAlign ──────────────────────────────────────────────────────────

/// Cross-axis distribution of wrapped lines (`align-content`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ContentAlign {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    Stretch,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

const CONTENT_ALIGN_KEYWORDS: &[&str] = &[
    "flex-start",
    "flex-end",
    "center",
    "stretch",
    "space-between",
    "space-around",
    "space-evenly",
];

impl FromStr for ContentAlign {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flex-start" => Ok(ContentAlign::FlexStart),
            "flex-end" => Ok(ContentAlign::FlexEnd),
            "center" => Ok(ContentAlign::Center),
            "stretch" => Ok(ContentAlign::Stretch),
            "space-between" => Ok(ContentAlign::SpaceBetween),
            "space-around" => Ok(ContentAlign::SpaceAround),
            "space-evenly" => Ok(ContentAlign::SpaceEvenly),
            other => Err(KeywordError::new(other, CONTENT_ALIGN_KEYWORDS)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_keywords() {
        assert_eq!("row".parse::<FlexDirection>().unwrap(), FlexDirection::Row);
        assert_eq!(
            "space-evenly".parse::<JustifyContent>().unwrap(),
            JustifyContent::SpaceEvenly
        );
        assert_eq!("stretch".parse::<ItemAlign>().unwrap(), ItemAlign::Stretch);
        assert_eq!(
            "space-around".parse::<ContentAlign>().unwrap(),
            ContentAlign::SpaceAround
        );
    }

    #[test]
    fn unknown_keyword_lists_valid_options() {
        let err = "space-about".parse::<JustifyContent>().unwrap_err();
        assert_eq!(err.value, "space-about");
        let msg = err.to_string();
        assert!(msg.contains("space-between"));
        assert!(msg.contains("space-evenly"));
    }

    #[test]
    fn item_align_rejects_content_only_keywords() {
        // space-between is valid for align-content but not align-items.
        assert!("space-between".parse::<ItemAlign>().is_err());
        assert!("space-between".parse::<ContentAlign>().is_ok());
    }
}
