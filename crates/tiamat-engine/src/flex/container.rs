use crate::coords::{Axis, Edges};

use super::config::{ContentAlign, FlexDirection, ItemAlign, JustifyContent};

/// Arranger-side flex configuration, attached 1:1 to a scene node.
///
/// A node with an enabled container lays out its children as flex items;
/// the children's [`super::FlexItem`] facets are (re)associated whenever the
/// parent link changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexContainer {
    pub direction: FlexDirection,
    /// Mirrors item positions about the main-axis extent.
    pub reverse: bool,
    pub wrap: bool,
    pub justify_content: JustifyContent,
    pub align_items: ItemAlign,
    pub align_content: ContentAlign,
    pub padding: Edges,
}

impl Default for FlexContainer {
    fn default() -> Self {
        Self {
            direction: FlexDirection::Row,
            reverse: false,
            wrap: false,
            justify_content: JustifyContent::FlexStart,
            align_items: ItemAlign::Stretch,
            align_content: ContentAlign::FlexStart,
            padding: Edges::default(),
        }
    }
}

impl FlexContainer {
    #[inline]
    pub fn main_axis(&self) -> Axis {
        self.direction.main_axis()
    }

    #[inline]
    pub fn cross_axis(&self) -> Axis {
        self.direction.cross_axis()
    }
}
