//! User settings and their normalizer.
//!
//! Raw values coming from storage or from the user are never rejected: the
//! normalizer clamps them into range and quantizes them onto the allowed steps.
//! `Settings` can only be built through it, so an accepted value is always safe.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Displayed refresh interval used when the raw value is unset.
pub const DEFAULT_REFRESH_INTERVAL: u32 = 300;
/// Scroll speed in pixels per second used when the raw value is unset.
pub const DEFAULT_SCROLL_SPEED: u32 = 50;

const REFRESH_INTERVAL_RANGE: (f64, f64) = (20.0, 300.0);
const REFRESH_INTERVAL_STEP: f64 = 30.0;
const SCROLL_SPEED_RANGE: (f64, f64) = (10.0, 100.0);
const SCROLL_SPEED_STEP: f64 = 5.0;

/// How the marquee presents the quote line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display, EnumString,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum DisplayStyle {
    /// Static line, no animation.
    #[default]
    Stationary,
    /// Continuous seamless loop.
    Scrolling,
}

/// Unvalidated settings as read from storage or typed by the user.
///
/// A value of `0.0` means "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSettings {
    /// Displayed refresh interval in seconds.
    pub refresh_interval: f64,
    /// Scroll speed in pixels per second.
    pub scroll_speed: f64,
    /// Presentation style.
    pub display_style: DisplayStyle,
}

/// Normalized settings. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    refresh_interval_display: u32,
    scroll_speed: u32,
    display_style: DisplayStyle,
}

impl Settings {
    /// Builds settings from raw input, coercing every field into its domain.
    pub fn normalize(raw: RawSettings) -> Self {
        Settings {
            refresh_interval_display: normalize_refresh_interval(raw.refresh_interval),
            scroll_speed: normalize_scroll_speed(raw.scroll_speed),
            display_style: raw.display_style,
        }
    }

    /// Refresh interval shown to the user, in seconds.
    ///
    /// Informational only: the real fetch cadence is fixed by the scheduler.
    pub fn refresh_interval_display(&self) -> u32 {
        self.refresh_interval_display
    }

    /// Scroll speed in pixels per second.
    pub fn scroll_speed(&self) -> u32 {
        self.scroll_speed
    }

    /// Presentation style.
    pub fn display_style(&self) -> DisplayStyle {
        self.display_style
    }

    /// Raw form of these settings, as a starting point for an edit.
    pub fn to_raw(&self) -> RawSettings {
        RawSettings {
            refresh_interval: f64::from(self.refresh_interval_display),
            scroll_speed: f64::from(self.scroll_speed),
            display_style: self.display_style,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::normalize(RawSettings::default())
    }
}

/// Maps a raw refresh interval onto a multiple of 30 within `[20, 300]`; `0` becomes 300.
pub fn normalize_refresh_interval(raw: f64) -> u32 {
    quantize(
        raw,
        f64::from(DEFAULT_REFRESH_INTERVAL),
        REFRESH_INTERVAL_RANGE,
        REFRESH_INTERVAL_STEP,
    )
}

/// Maps a raw scroll speed onto a multiple of 5 within `[10, 100]`; `0` becomes 50.
pub fn normalize_scroll_speed(raw: f64) -> u32 {
    quantize(
        raw,
        f64::from(DEFAULT_SCROLL_SPEED),
        SCROLL_SPEED_RANGE,
        SCROLL_SPEED_STEP,
    )
}

fn quantize(raw: f64, default: f64, (min, max): (f64, f64), step: f64) -> u32 {
    let value = if raw == 0.0 || raw.is_nan() { default } else { raw };
    let clamped = value.clamp(min, max);
    // rounding a clamped bound never leaves the range
    ((clamped / step).round() * step) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_defaults_when_unset() {
        assert_eq!(normalize_refresh_interval(0.0), 300);
        assert_eq!(normalize_refresh_interval(f64::NAN), 300);
    }

    #[test]
    fn refresh_interval_clamps_and_quantizes() {
        assert_eq!(normalize_refresh_interval(1.0), 30);
        assert_eq!(normalize_refresh_interval(20.0), 30);
        assert_eq!(normalize_refresh_interval(44.0), 30);
        assert_eq!(normalize_refresh_interval(45.0), 60);
        assert_eq!(normalize_refresh_interval(100.0), 90);
        assert_eq!(normalize_refresh_interval(299.0), 300);
        assert_eq!(normalize_refresh_interval(10_000.0), 300);
        assert_eq!(normalize_refresh_interval(-50.0), 30);
        assert_eq!(normalize_refresh_interval(f64::INFINITY), 300);
    }

    #[test]
    fn refresh_interval_always_lands_on_a_step() {
        for raw in -100..2_000 {
            let value = normalize_refresh_interval(raw as f64 * 0.37);
            assert_eq!(value % 30, 0, "raw {raw}");
            assert!((20..=300).contains(&value), "raw {raw}");
        }
    }

    #[test]
    fn scroll_speed_defaults_when_unset() {
        assert_eq!(normalize_scroll_speed(0.0), 50);
    }

    #[test]
    fn scroll_speed_clamps_and_quantizes() {
        assert_eq!(normalize_scroll_speed(1.0), 10);
        assert_eq!(normalize_scroll_speed(12.4), 10);
        assert_eq!(normalize_scroll_speed(12.5), 15);
        assert_eq!(normalize_scroll_speed(73.0), 75);
        assert_eq!(normalize_scroll_speed(1e9), 100);
        assert_eq!(normalize_scroll_speed(f64::NEG_INFINITY), 10);
    }

    #[test]
    fn scroll_speed_always_lands_on_a_step() {
        for raw in -100..500 {
            let value = normalize_scroll_speed(raw as f64 * 0.61);
            assert_eq!(value % 5, 0, "raw {raw}");
            assert!((10..=100).contains(&value), "raw {raw}");
        }
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.refresh_interval_display(), 300);
        assert_eq!(settings.scroll_speed(), 50);
        assert_eq!(settings.display_style(), DisplayStyle::Stationary);
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = RawSettings {
            refresh_interval: 77.0,
            scroll_speed: 33.0,
            display_style: DisplayStyle::Scrolling,
        };
        let once = Settings::normalize(raw);
        assert_eq!(Settings::normalize(once.to_raw()), once);
    }

    #[test]
    fn display_style_parses_case_insensitively() {
        assert_eq!("scrolling".parse::<DisplayStyle>().unwrap(), DisplayStyle::Scrolling);
        assert_eq!("Stationary".parse::<DisplayStyle>().unwrap(), DisplayStyle::Stationary);
        assert!("bouncing".parse::<DisplayStyle>().is_err());
    }
}
