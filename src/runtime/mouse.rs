//! Mouse helpers: click counting, wheel deltas and cursor shapes

use std::time::{Duration, Instant};

use winit::event::MouseScrollDelta;
use winit::window::CursorIcon;

use gridview::grid::CursorHint;

const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(400);

/// Maximum pointer travel between the clicks of a double-click
const DOUBLE_CLICK_SLOP: f64 = 4.0;

/// Pixels scrolled per wheel line
pub const WHEEL_LINE_PX: f64 = 48.0;

/// Click tracking state for double-click detection
pub struct ClickTracker {
    last_click_time: Instant,
    last_click_position: Option<(f64, f64)>,
    click_count: u32,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self {
            last_click_time: Instant::now() - Duration::from_secs(10),
            last_click_position: None,
            click_count: 0,
        }
    }
}

impl ClickTracker {
    /// Record a press and return the click count (1 or 2)
    pub fn track_click(&mut self, x: f64, y: f64) -> u32 {
        self.track_click_at(Instant::now(), x, y)
    }

    pub fn track_click_at(&mut self, now: Instant, x: f64, y: f64) -> u32 {
        let is_rapid = now.duration_since(self.last_click_time) < DOUBLE_CLICK_TIME;
        let is_near = self.last_click_position.is_some_and(|(px, py)| {
            (px - x).abs() <= DOUBLE_CLICK_SLOP && (py - y).abs() <= DOUBLE_CLICK_SLOP
        });

        self.click_count = if is_rapid && is_near && self.click_count == 1 {
            2
        } else {
            1
        };
        self.last_click_time = now;
        self.last_click_position = Some((x, y));
        self.click_count
    }
}

/// Convert a wheel event to a logical pixel scroll (positive = right/down)
pub fn wheel_delta(delta: &MouseScrollDelta, scale_factor: f64) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => {
            (-*x as f64 * WHEEL_LINE_PX, -*y as f64 * WHEEL_LINE_PX)
        }
        MouseScrollDelta::PixelDelta(pos) => (-pos.x / scale_factor, -pos.y / scale_factor),
    }
}

pub fn cursor_icon(hint: CursorHint) -> CursorIcon {
    match hint {
        CursorHint::Default => CursorIcon::Default,
        CursorHint::ResizeColumn => CursorIcon::ColResize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_needs_same_spot_and_speed() {
        let mut tracker = ClickTracker::default();
        let t0 = Instant::now();
        assert_eq!(tracker.track_click_at(t0, 10.0, 10.0), 1);
        assert_eq!(
            tracker.track_click_at(t0 + Duration::from_millis(100), 11.0, 10.0),
            2
        );
        // A third quick click starts over
        assert_eq!(
            tracker.track_click_at(t0 + Duration::from_millis(200), 11.0, 10.0),
            1
        );
        assert_eq!(
            tracker.track_click_at(t0 + Duration::from_millis(300), 40.0, 10.0),
            1
        );
        assert_eq!(tracker.track_click_at(t0 + Duration::from_secs(2), 40.0, 10.0), 1);
    }

    #[test]
    fn test_wheel_lines_scroll_down() {
        let (dx, dy) = wheel_delta(&MouseScrollDelta::LineDelta(0.0, -1.0), 1.0);
        assert_eq!(dx, 0.0);
        assert_eq!(dy, WHEEL_LINE_PX);
    }
}
