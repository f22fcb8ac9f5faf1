/// One of the two 2D axes.
///
/// Flex layout works in main/cross terms; both resolve to one of these and
/// every size/position accessor is parameterized on it, so the solver is
/// written once for both row and column containers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    pub const fn orthogonal(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Selects the component of an `(x, y)` pair along this axis.
    #[inline]
    pub fn pick(self, x: f32, y: f32) -> f32 {
        match self {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_flips() {
        assert_eq!(Axis::Horizontal.orthogonal(), Axis::Vertical);
        assert_eq!(Axis::Vertical.orthogonal(), Axis::Horizontal);
        assert_eq!(Axis::Vertical.orthogonal().orthogonal(), Axis::Vertical);
    }

    #[test]
    fn pick_selects_component() {
        assert_eq!(Axis::Horizontal.pick(3.0, 7.0), 3.0);
        assert_eq!(Axis::Vertical.pick(3.0, 7.0), 7.0);
    }
}
