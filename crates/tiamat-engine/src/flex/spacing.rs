//! Spacing distribution shared by justify-content and align-content.

use super::config::{ContentAlign, JustifyContent};

/// Distribution mode for leftover space along one axis.
///
/// `ContentAlign::Stretch` has no spacing equivalent; the content aligner
/// consumes it before asking for spacing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum SpacingMode {
    Start,
    End,
    Center,
    Between,
    Around,
    Evenly,
}

impl From<JustifyContent> for SpacingMode {
    fn from(j: JustifyContent) -> Self {
        match j {
            JustifyContent::FlexStart => SpacingMode::Start,
            JustifyContent::FlexEnd => SpacingMode::End,
            JustifyContent::Center => SpacingMode::Center,
            JustifyContent::SpaceBetween => SpacingMode::Between,
            JustifyContent::SpaceAround => SpacingMode::Around,
            JustifyContent::SpaceEvenly => SpacingMode::Evenly,
        }
    }
}

impl ContentAlign {
    /// Spacing equivalent; `Stretch` maps to `Start` (the stretch itself has
    /// already absorbed the leftover space by the time spacing runs).
    pub(crate) fn spacing_mode(self) -> SpacingMode {
        match self {
            ContentAlign::FlexStart | ContentAlign::Stretch => SpacingMode::Start,
            ContentAlign::FlexEnd => SpacingMode::End,
            ContentAlign::Center => SpacingMode::Center,
            ContentAlign::SpaceBetween => SpacingMode::Between,
            ContentAlign::SpaceAround => SpacingMode::Around,
            ContentAlign::SpaceEvenly => SpacingMode::Evenly,
        }
    }
}

/// Returns `(before, between)`: space before the first item and between
/// consecutive items, for `count` items and `remaining` leftover space.
///
/// The space-* modes fall back to centering when `remaining` is negative;
/// distributing negative gaps would interleave overlaps between items.
pub(crate) fn spacing(mode: SpacingMode, count: usize, remaining: f32) -> (f32, f32) {
    match mode {
        SpacingMode::Start => (0.0, 0.0),
        SpacingMode::End => (remaining, 0.0),
        SpacingMode::Center => (remaining / 2.0, 0.0),
        SpacingMode::Between => {
            if count > 1 && remaining > 0.0 {
                (0.0, remaining / (count - 1) as f32)
            } else {
                (0.0, 0.0)
            }
        }
        SpacingMode::Around => {
            if count == 0 {
                (0.0, 0.0)
            } else if remaining < 0.0 {
                (remaining / 2.0, 0.0)
            } else {
                let between = remaining / count as f32;
                (between / 2.0, between)
            }
        }
        SpacingMode::Evenly => {
            if count == 0 {
                (0.0, 0.0)
            } else if remaining < 0.0 {
                (remaining / 2.0, 0.0)
            } else {
                let between = remaining / (count + 1) as f32;
                (between, between)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3 items of footprint 10 in a 100-wide container: remaining = 70.

    #[test]
    fn space_between_three_items() {
        let (before, between) = spacing(SpacingMode::Between, 3, 70.0);
        assert_eq!((before, between), (0.0, 35.0));
        // Positions: 0, 45, 90.
        assert_eq!(before, 0.0);
        assert_eq!(before + 10.0 + between, 45.0);
        assert_eq!(before + 2.0 * (10.0 + between), 90.0);
    }

    #[test]
    fn center_three_items() {
        let (before, between) = spacing(SpacingMode::Center, 3, 70.0);
        assert_eq!((before, between), (35.0, 0.0));
        // Positions: 35, 45, 55.
        assert_eq!(before + 10.0, 45.0);
        assert_eq!(before + 20.0, 55.0);
    }

    #[test]
    fn space_evenly_three_items() {
        let (before, between) = spacing(SpacingMode::Evenly, 3, 70.0);
        assert_eq!((before, between), (17.5, 17.5));
    }

    #[test]
    fn space_around_half_gap_at_edges() {
        let (before, between) = spacing(SpacingMode::Around, 2, 60.0);
        assert_eq!(between, 30.0);
        assert_eq!(before, 15.0);
    }

    #[test]
    fn negative_space_falls_back_to_center() {
        assert_eq!(spacing(SpacingMode::Around, 3, -30.0), (-15.0, 0.0));
        assert_eq!(spacing(SpacingMode::Evenly, 3, -30.0), (-15.0, 0.0));
        // space-between overflows from the start instead.
        assert_eq!(spacing(SpacingMode::Between, 3, -30.0), (0.0, 0.0));
    }

    #[test]
    fn degenerate_counts_do_not_divide_by_zero() {
        assert_eq!(spacing(SpacingMode::Between, 1, 50.0), (0.0, 0.0));
        assert_eq!(spacing(SpacingMode::Around, 0, 50.0), (0.0, 0.0));
        assert_eq!(spacing(SpacingMode::Evenly, 0, 50.0), (0.0, 0.0));
    }
}
