use super::Axis;

/// Insets on all four sides (padding or margin).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    #[inline]
    pub fn all(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    #[inline]
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self { top: vertical, bottom: vertical, left: horizontal, right: horizontal }
    }

    /// Inset on the leading side of `axis` (left or top).
    #[inline]
    pub fn before(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Inset on the trailing side of `axis` (right or bottom).
    #[inline]
    pub fn after(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    /// Total inset along `axis`.
    #[inline]
    pub fn along(self, axis: Axis) -> f32 {
        self.before(axis) + self.after(axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_accessors() {
        let e = Edges { top: 1.0, right: 2.0, bottom: 3.0, left: 4.0 };
        assert_eq!(e.before(Axis::Horizontal), 4.0);
        assert_eq!(e.after(Axis::Horizontal), 2.0);
        assert_eq!(e.along(Axis::Horizontal), 6.0);
        assert_eq!(e.before(Axis::Vertical), 1.0);
        assert_eq!(e.along(Axis::Vertical), 4.0);
    }

    #[test]
    fn all_is_uniform() {
        let e = Edges::all(5.0);
        assert_eq!(e.along(Axis::Horizontal), 10.0);
        assert_eq!(e.along(Axis::Vertical), 10.0);
    }
}
