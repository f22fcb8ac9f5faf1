/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a rect from two corner points (any order).
    #[inline]
    pub fn from_extents(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let (xa, xb) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (ya, yb) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self::new(xa, ya, xb - xa, yb - ya)
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Grows the rect by `m` on every side. Negative `m` shrinks it.
    #[inline]
    pub fn inflate(self, m: f32) -> Self {
        Self::new(self.x - m, self.y - m, self.w + 2.0 * m, self.h + 2.0 * m)
    }

    /// Overlap test. Edge-touching rects do not overlap.
    #[inline]
    pub fn intersects(self, other: Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── from_extents ──────────────────────────────────────────────────────

    #[test]
    fn from_extents_ordered() {
        assert_eq!(Rect::from_extents(1.0, 2.0, 4.0, 6.0), r(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn from_extents_swapped() {
        assert_eq!(Rect::from_extents(4.0, 6.0, 1.0, 2.0), r(1.0, 2.0, 3.0, 4.0));
    }

    // ── inflate ───────────────────────────────────────────────────────────

    #[test]
    fn inflate_grows_all_sides() {
        let g = r(10.0, 10.0, 20.0, 20.0).inflate(5.0);
        assert_eq!(g, r(5.0, 5.0, 30.0, 30.0));
    }

    // ── intersects / intersect ────────────────────────────────────────────

    #[test]
    fn intersects_overlapping() {
        assert!(r(0.0, 0.0, 10.0, 10.0).intersects(r(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn intersects_touching_edge_is_false() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).intersects(r(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn intersect_contained() {
        let outer = r(0.0, 0.0, 100.0, 100.0);
        let inner = r(10.0, 10.0, 20.0, 20.0);
        assert_eq!(outer.intersect(inner), Some(inner));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        assert!(r(0.0, 0.0, 5.0, 5.0).intersect(r(20.0, 0.0, 5.0, 5.0)).is_none());
    }

    #[test]
    fn is_empty_zero_sized() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
