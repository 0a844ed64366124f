//! Primary and secondary drawing colors.

use crate::color::Rgba;
use std::collections::VecDeque;

/// How many recently used colors are remembered.
pub const RECENT_COLORS: usize = 10;

/// The active pair of colors plus a short history of past picks.
///
/// Tools draw with `primary` on the left button and `secondary` on the
/// right. Shapes fill with `primary` and outline with `secondary`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    primary: Rgba,
    secondary: Rgba,
    recent: VecDeque<Rgba>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(Rgba::black(), Rgba::white())
    }
}

impl ColorPalette {
    pub fn new(primary: Rgba, secondary: Rgba) -> Self {
        Self {
            primary,
            secondary,
            recent: VecDeque::with_capacity(RECENT_COLORS),
        }
    }

    pub fn primary(&self) -> Rgba {
        self.primary
    }

    pub fn secondary(&self) -> Rgba {
        self.secondary
    }

    pub fn set_primary(&mut self, color: Rgba) {
        self.primary = color;
        self.remember(color);
    }

    pub fn set_secondary(&mut self, color: Rgba) {
        self.secondary = color;
        self.remember(color);
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.primary, &mut self.secondary);
    }

    /// Most recent first.
    pub fn recent(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.recent.iter().copied()
    }

    fn remember(&mut self, color: Rgba) {
        self.recent.retain(|c| *c != color);
        self.recent.push_front(color);
        self.recent.truncate(RECENT_COLORS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap() {
        let mut palette = ColorPalette::default();
        palette.swap();
        assert_eq!(palette.primary(), Rgba::white());
        assert_eq!(palette.secondary(), Rgba::black());
    }

    #[test]
    fn test_recent_is_bounded_and_distinct() {
        let mut palette = ColorPalette::default();
        for i in 0..15u8 {
            palette.set_primary(Rgba::new(i, 0, 0, 255));
        }
        palette.set_secondary(Rgba::new(12, 0, 0, 255));
        let recent: Vec<_> = palette.recent().collect();
        assert_eq!(recent.len(), RECENT_COLORS);
        assert_eq!(recent[0], Rgba::new(12, 0, 0, 255));
        assert_eq!(recent[1], Rgba::new(14, 0, 0, 255));
        assert_eq!(recent.iter().filter(|c| c.r == 12).count(), 1);
    }
}
