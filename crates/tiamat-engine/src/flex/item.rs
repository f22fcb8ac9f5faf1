use crate::coords::{Axis, Edges};
use crate::scene::NodeId;

use super::config::ItemAlign;

/// Arranged-side flex configuration, attached 1:1 to a scene node.
///
/// `container` is the node currently arranging this item; `None` whenever the
/// parent is not an enabled flex container. Minimum sizes default to zero and
/// a zero maximum means unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexItem {
    pub grow: f32,
    /// `None` = default: 1 when the owning node is itself a flex container
    /// (nested content can usually give up space), 0 otherwise.
    pub shrink: Option<f32>,
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub margin: Edges,
    pub align_self: Option<ItemAlign>,

    pub(crate) container: Option<NodeId>,

    // Solver output: position of the item's margin box relative to the
    // arranging container's content origin. Converted to node coordinates by
    // the coordinate finalization walk.
    pub(crate) layout_x: f32,
    pub(crate) layout_y: f32,
}

impl FlexItem {
    pub(crate) fn new() -> Self {
        Self {
            grow: 0.0,
            shrink: None,
            min_width: 0.0,
            max_width: 0.0,
            min_height: 0.0,
            max_height: 0.0,
            margin: Edges::default(),
            align_self: None,
            container: None,
            layout_x: 0.0,
            layout_y: 0.0,
        }
    }

    #[inline]
    pub(crate) fn effective_shrink(&self, owner_is_container: bool) -> f32 {
        self.shrink
            .unwrap_or(if owner_is_container { 1.0 } else { 0.0 })
    }

    #[inline]
    pub(crate) fn min_along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    /// Maximum size along `axis`; zero is treated as unbounded.
    #[inline]
    pub(crate) fn max_along(&self, axis: Axis) -> f32 {
        let max = match axis {
            Axis::Horizontal => self.max_width,
            Axis::Vertical => self.max_height,
        };
        if max <= 0.0 { f32::INFINITY } else { max }
    }

    /// Clamps `size` into the item's `[min, max]` range along `axis`.
    #[inline]
    pub(crate) fn clamp_along(&self, axis: Axis, size: f32) -> f32 {
        size.clamp(self.min_along(axis), self.max_along(axis))
    }

    #[inline]
    pub(crate) fn layout_pos(&self, axis: Axis) -> f32 {
        axis.pick(self.layout_x, self.layout_y)
    }

    #[inline]
    pub(crate) fn set_layout_pos(&mut self, axis: Axis, v: f32) {
        match axis {
            Axis::Horizontal => self.layout_x = v,
            Axis::Vertical => self.layout_y = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrink_defaults_follow_owner_kind() {
        let item = FlexItem::new();
        assert_eq!(item.effective_shrink(true), 1.0);
        assert_eq!(item.effective_shrink(false), 0.0);

        let mut item = FlexItem::new();
        item.shrink = Some(0.0);
        assert_eq!(item.effective_shrink(true), 0.0);
    }

    #[test]
    fn zero_max_is_unbounded() {
        let item = FlexItem::new();
        assert_eq!(item.max_along(Axis::Horizontal), f32::INFINITY);
        assert_eq!(item.clamp_along(Axis::Horizontal, 1e9), 1e9);
    }

    #[test]
    fn clamp_respects_min_and_max() {
        let mut item = FlexItem::new();
        item.min_width = 10.0;
        item.max_width = 50.0;
        assert_eq!(item.clamp_along(Axis::Horizontal, 5.0), 10.0);
        assert_eq!(item.clamp_along(Axis::Horizontal, 30.0), 30.0);
        assert_eq!(item.clamp_along(Axis::Horizontal, 80.0), 50.0);
    }
}
