//! Display mode counter driven by pointer presses.

/// Top-level screen selected by the display mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Title only (mode 0)
    Welcome0,
    /// Title and attribution (mode 1)
    Welcome1,
    /// 4x4 cell grid (mode 2 and above)
    Grid,
}

/// Unbounded click counter; never wraps back to the welcome screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayMode(u64);

impl DisplayMode {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Advance by exactly one (pointer press)
    pub fn advance(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    pub fn screen(&self) -> Screen {
        match self.0 {
            0 => Screen::Welcome0,
            1 => Screen::Welcome1,
            _ => Screen::Grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_presses_from_zero() {
        let mut mode = DisplayMode::default();
        for _ in 0..3 {
            mode.advance();
        }
        assert_eq!(mode.value(), 3);
    }

    #[test]
    fn test_screen_selection() {
        assert_eq!(DisplayMode::new(0).screen(), Screen::Welcome0);
        assert_eq!(DisplayMode::new(1).screen(), Screen::Welcome1);
        assert_eq!(DisplayMode::new(2).screen(), Screen::Grid);
        assert_eq!(DisplayMode::new(1_000).screen(), Screen::Grid);
    }

    #[test]
    fn test_grid_is_absorbing() {
        let mut mode = DisplayMode::new(2);
        for _ in 0..50 {
            mode.advance();
            assert_eq!(mode.screen(), Screen::Grid);
        }
    }

    #[test]
    fn test_advance_saturates() {
        let mut mode = DisplayMode::new(u64::MAX);
        mode.advance();
        assert_eq!(mode.value(), u64::MAX);
    }
}
