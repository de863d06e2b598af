//! Keyboard visibility reporting
//!
//! Every layout pass yields a keyboard height; only changes are reported,
//! and the first measurement always is.

use std::sync::Mutex;

/// Keyboard height derived from a layout pass: the part of the screen below
/// the visible display frame. Never negative.
pub fn keyboard_height(screen_height: i32, visible_bottom: i32) -> i32 {
    screen_height.saturating_sub(visible_bottom).max(0)
}

#[derive(Debug, Default)]
pub struct KeyboardHeightTracker {
    last: Mutex<Option<i32>>,
}

impl KeyboardHeightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement; returns the height when it should be reported
    pub fn observe(&self, height: i32) -> Option<i32> {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *last == Some(height) {
            return None;
        }
        *last = Some(height);
        Some(height)
    }

    pub fn last_reported(&self) -> Option<i32> {
        *self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_measurement_always_reported() {
        let tracker = KeyboardHeightTracker::new();
        assert_eq!(tracker.observe(0), Some(0));
        assert_eq!(tracker.observe(0), None);
        assert_eq!(tracker.observe(250), Some(250));
        assert_eq!(tracker.observe(250), None);
        assert_eq!(tracker.observe(0), Some(0));
        assert_eq!(tracker.last_reported(), Some(0));
    }

    #[test]
    fn test_keyboard_height_clamped() {
        assert_eq!(keyboard_height(1920, 1670), 250);
        assert_eq!(keyboard_height(1920, 1920), 0);
        // 可见区域超出屏幕（如导航栏隐藏）
        assert_eq!(keyboard_height(1920, 2000), 0);
    }
}
