use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// Invalidation reasons for a scene node.
///
/// A small closed set of named bits instead of ad-hoc flag values. The
/// propagation rule everywhere is "forward only the reasons not already
/// present upstream", which keeps repeated mutations idempotent and lets
/// walks terminate early.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct Recalc(u8);

impl Recalc {
    pub const NONE: Recalc = Recalc(0);
    /// x/y (or mount point) moved.
    pub const POSITION: Recalc = Recalc(1 << 0);
    /// w/h changed.
    pub const SIZE: Recalc = Recalc(1 << 1);
    /// scale/rotation/pivot/alpha changed; world context must recompose.
    pub const TRANSFORM: Recalc = Recalc(1 << 2);
    /// Node re-entered visibility (explicit show, or margin-triggered wake).
    pub const BECAME_VISIBLE: Recalc = Recalc(1 << 3);
    /// Node is queued as a frame-level layout root.
    pub const LAYOUT_REQUESTED: Recalc = Recalc(1 << 4);

    /// Full scene refresh: everything except the layout-queue marker, which
    /// only [`super::SceneGraph::request_layout_root`] may set (it doubles as
    /// the queue-membership dedup).
    pub const REFRESH: Recalc = Recalc(0b0_1111);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is already set.
    #[inline]
    pub fn contains(self, other: Recalc) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set.
    #[inline]
    pub fn intersects(self, other: Recalc) -> bool {
        self.0 & other.0 != 0
    }

    /// Bits of `self` that are not yet present in `upstream`.
    #[inline]
    pub fn missing_from(self, upstream: Recalc) -> Recalc {
        Recalc(self.0 & !upstream.0)
    }

    #[inline]
    pub fn insert(&mut self, other: Recalc) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    #[inline]
    pub fn remove(&mut self, other: Recalc) {
        self.0 &= !other.0;
    }
}

impl BitOr for Recalc {
    type Output = Recalc;
    #[inline]
    fn bitor(self, rhs: Recalc) -> Recalc {
        Recalc(self.0 | rhs.0)
    }
}

impl BitOrAssign for Recalc {
    #[inline]
    fn bitor_assign(&mut self, rhs: Recalc) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Recalc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Recalc(none)");
        }
        let mut first = true;
        let mut put = |f: &mut fmt::Formatter<'_>, name: &str| -> fmt::Result {
            if !first {
                write!(f, "|")?;
            }
            first = false;
            write!(f, "{name}")
        };
        write!(f, "Recalc(")?;
        if self.contains(Recalc::POSITION) {
            put(f, "position")?;
        }
        if self.contains(Recalc::SIZE) {
            put(f, "size")?;
        }
        if self.contains(Recalc::TRANSFORM) {
            put(f, "transform")?;
        }
        if self.contains(Recalc::BECAME_VISIBLE) {
            put(f, "became-visible")?;
        }
        if self.contains(Recalc::LAYOUT_REQUESTED) {
            put(f, "layout-requested")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_requires_all_bits() {
        let m = Recalc::POSITION | Recalc::SIZE;
        assert!(m.contains(Recalc::POSITION));
        assert!(m.contains(Recalc::POSITION | Recalc::SIZE));
        assert!(!m.contains(Recalc::POSITION | Recalc::TRANSFORM));
        assert!(m.intersects(Recalc::POSITION | Recalc::TRANSFORM));
    }

    #[test]
    fn missing_from_drops_present_bits() {
        let new = Recalc::SIZE | Recalc::TRANSFORM;
        let upstream = Recalc::SIZE;
        assert_eq!(new.missing_from(upstream), Recalc::TRANSFORM);
        // Fully present upstream; nothing left to propagate.
        assert!(Recalc::SIZE.missing_from(new).is_empty());
    }

    #[test]
    fn debug_names_bits() {
        let m = Recalc::SIZE | Recalc::BECAME_VISIBLE;
        let s = format!("{m:?}");
        assert!(s.contains("size"));
        assert!(s.contains("became-visible"));
    }
}
