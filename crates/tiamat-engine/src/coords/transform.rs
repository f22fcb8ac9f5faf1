use bytemuck::{Pod, Zeroable};

/// 2D affine transform.
///
/// Column-vector convention:
///
/// ```text
/// | a  c  px |   | x |
/// | b  d  py | · | y |
///               | 1 |
/// ```
///
/// `Pod` so renderers can upload finalized transforms without repacking.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub px: f32,
    pub py: f32,
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        px: 0.0,
        py: 0.0,
    };

    #[inline]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self { px: x, py: y, ..Self::IDENTITY }
    }

    /// Rotation followed by non-uniform scale, no translation.
    #[inline]
    pub fn rotation_scale(radians: f32, sx: f32, sy: f32) -> Self {
        if radians == 0.0 {
            return Self { a: sx, d: sy, ..Self::IDENTITY };
        }
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos * sx,
            b: sin * sx,
            c: -sin * sy,
            d: cos * sy,
            px: 0.0,
            py: 0.0,
        }
    }

    /// True when the linear part is the identity (pure translation).
    #[inline]
    pub fn is_translation(self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }

    /// Applies the full transform to a point.
    #[inline]
    pub fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.px,
            self.b * x + self.d * y + self.py,
        )
    }

    /// Applies only the linear 2×2 part (for direction vectors).
    #[inline]
    pub fn apply_vector(self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y, self.b * x + self.d * y)
    }

    /// `self ∘ local`: `local` is applied first, then `self`.
    #[inline]
    pub fn concat(self, local: Transform2D) -> Self {
        let (px, py) = self.apply(local.px, local.py);
        Self {
            a: self.a * local.a + self.c * local.b,
            b: self.b * local.a + self.d * local.b,
            c: self.a * local.c + self.c * local.d,
            d: self.b * local.c + self.d * local.d,
            px,
            py,
        }
    }

    /// Replaces only the translation, keeping the linear part.
    #[inline]
    pub fn with_translation(self, x: f32, y: f32) -> Self {
        Self { px: x, py: y, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_apply_is_noop() {
        assert_eq!(Transform2D::IDENTITY.apply(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn translation_applies_offset() {
        let t = Transform2D::translation(10.0, -2.0);
        assert_eq!(t.apply(1.0, 1.0), (11.0, -1.0));
        assert!(t.is_translation());
    }

    #[test]
    fn quarter_turn_rotates_x_to_y() {
        let t = Transform2D::rotation_scale(core::f32::consts::FRAC_PI_2, 1.0, 1.0);
        let (x, y) = t.apply(1.0, 0.0);
        assert!(close(x, 0.0) && close(y, 1.0));
        assert!(!t.is_translation());
    }

    #[test]
    fn concat_applies_local_first() {
        let scale = Transform2D::rotation_scale(0.0, 2.0, 2.0);
        let shift = Transform2D::translation(5.0, 0.0);
        // shift ∘ scale: scale first, then shift.
        let t = shift.concat(scale);
        assert_eq!(t.apply(1.0, 1.0), (7.0, 2.0));
        // scale ∘ shift: shift first, then scale.
        let t = scale.concat(shift);
        assert_eq!(t.apply(1.0, 1.0), (12.0, 2.0));
    }

    #[test]
    fn apply_vector_ignores_translation() {
        let t = Transform2D::translation(100.0, 100.0);
        assert_eq!(t.apply_vector(1.0, 2.0), (1.0, 2.0));
    }
}
