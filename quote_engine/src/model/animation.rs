//! Continuous-loop timing for the scrolling marquee.
//!
//! The offset is a pure function of the time elapsed since the loop started:
//! it moves linearly from `0` to `-content_width` over
//! `content_width / speed` seconds and then wraps back to `0` with no pause.
//!
//! Design notes:
//! - Time is measured with `std::time::Instant`, which is monotonic and immune to system
//!   clock changes.
//! - Any change of width, speed or style restarts the loop from offset `0`; there is no
//!   attempt at visual continuity across a parameter change.
//! - An empty line (width `0`) suspends the loop and asks for a placeholder, whatever
//!   the style.

use std::time::{Duration, Instant};

use quote_common::DisplayStyle;

/// What the presentation layer should draw right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarqueeFrame {
    /// Nothing to show; draw the empty-list placeholder.
    Placeholder,
    /// Draw the line without animation.
    Stationary,
    /// Draw the line shifted horizontally by `offset` pixels (always `<= 0`).
    Scrolling {
        /// Horizontal shift in pixels.
        offset: f64,
    },
}

/// Loop timer state.
#[derive(Debug, Clone)]
pub struct AnimationTimer {
    content_width: f64,
    speed: f64,
    style: DisplayStyle,
    started: Instant,
}

impl AnimationTimer {
    /// Create a suspended timer (no content yet).
    pub fn new(speed: f64, style: DisplayStyle, now: Instant) -> Self {
        Self {
            content_width: 0.0,
            speed,
            style,
            started: now,
        }
    }

    /// Feed the current parameters. Restarts the loop at `now` and returns `true`
    /// when any of them changed.
    pub fn update(&mut self, content_width: f64, speed: f64, style: DisplayStyle, now: Instant) -> bool {
        if self.content_width == content_width && self.speed == speed && self.style == style {
            return false;
        }
        self.content_width = content_width;
        self.speed = speed;
        self.style = style;
        self.started = now;
        true
    }

    /// Time for one full pass of the content, or `None` while suspended.
    pub fn loop_duration(&self) -> Option<Duration> {
        if self.is_suspended() {
            return None;
        }
        Some(Duration::from_secs_f64(self.content_width / self.speed))
    }

    /// Horizontal offset at `now`; `0` unless scrolling.
    pub fn offset_at(&self, now: Instant) -> f64 {
        if self.is_suspended() || self.style == DisplayStyle::Stationary {
            return 0.0;
        }
        let period = self.content_width / self.speed;
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let phase = elapsed % period;
        -(phase * self.speed)
    }

    /// Presentation state at `now`.
    pub fn frame_at(&self, now: Instant) -> MarqueeFrame {
        if self.is_suspended() {
            MarqueeFrame::Placeholder
        } else if self.style == DisplayStyle::Stationary {
            MarqueeFrame::Stationary
        } else {
            MarqueeFrame::Scrolling {
                offset: self.offset_at(now),
            }
        }
    }

    /// Measured content width in pixels.
    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    /// Active speed in pixels per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Instant the current loop started.
    pub fn started(&self) -> Instant {
        self.started
    }

    fn is_suspended(&self) -> bool {
        !(self.content_width > 0.0 && self.speed > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn scrolling(width: f64, speed: f64) -> (AnimationTimer, Instant) {
        let start = Instant::now();
        let mut timer = AnimationTimer::new(speed, DisplayStyle::Scrolling, start);
        timer.update(width, speed, DisplayStyle::Scrolling, start);
        (timer, start)
    }

    #[test]
    fn loop_duration_is_width_over_speed() {
        let (timer, _) = scrolling(300.0, 50.0);
        assert_eq!(timer.loop_duration(), Some(Duration::from_secs(6)));
    }

    #[test]
    fn offset_moves_linearly_and_wraps() {
        let (timer, start) = scrolling(300.0, 50.0);
        let at = |secs: f64| timer.offset_at(start + Duration::from_secs_f64(secs));

        assert!(at(0.0).abs() < EPS);
        assert!((at(1.0) + 50.0).abs() < EPS);
        assert!((at(3.0) + 150.0).abs() < EPS);
        assert!((at(5.9) + 295.0).abs() < 1e-3);
        assert!(at(6.0).abs() < EPS);
        assert!((at(7.5) + 75.0).abs() < EPS);
    }

    #[test]
    fn zero_width_shows_placeholder_regardless_of_style() {
        let now = Instant::now();
        for style in [DisplayStyle::Scrolling, DisplayStyle::Stationary] {
            let mut timer = AnimationTimer::new(50.0, style, now);
            timer.update(0.0, 50.0, style, now);
            assert_eq!(timer.frame_at(now + Duration::from_secs(2)), MarqueeFrame::Placeholder);
            assert_eq!(timer.loop_duration(), None);
            assert_eq!(timer.offset_at(now + Duration::from_secs(2)), 0.0);
        }
    }

    #[test]
    fn stationary_style_does_not_move() {
        let now = Instant::now();
        let mut timer = AnimationTimer::new(50.0, DisplayStyle::Stationary, now);
        timer.update(300.0, 50.0, DisplayStyle::Stationary, now);
        let later = now + Duration::from_secs(4);
        assert_eq!(timer.frame_at(later), MarqueeFrame::Stationary);
        assert_eq!(timer.offset_at(later), 0.0);
    }

    #[test]
    fn parameter_change_restarts_the_loop() {
        let (mut timer, start) = scrolling(300.0, 50.0);
        let mid = start + Duration::from_secs(2);

        assert!(timer.update(400.0, 50.0, DisplayStyle::Scrolling, mid));
        assert_eq!(timer.started(), mid);
        assert_eq!(timer.content_width(), 400.0);
        assert_eq!(timer.speed(), 50.0);
        assert!(timer.offset_at(mid).abs() < EPS);
        assert_eq!(timer.loop_duration(), Some(Duration::from_secs(8)));

        let later = mid + Duration::from_secs(1);
        assert!(timer.update(400.0, 100.0, DisplayStyle::Scrolling, later));
        assert_eq!(timer.loop_duration(), Some(Duration::from_secs(4)));
        assert!((timer.offset_at(later + Duration::from_secs(1)) + 100.0).abs() < EPS);
    }

    #[test]
    fn unchanged_parameters_keep_running() {
        let (mut timer, start) = scrolling(300.0, 50.0);
        let mid = start + Duration::from_secs(2);
        assert!(!timer.update(300.0, 50.0, DisplayStyle::Scrolling, mid));
        assert_eq!(timer.started(), start);
        assert!((timer.offset_at(mid) + 100.0).abs() < EPS);
    }
}
