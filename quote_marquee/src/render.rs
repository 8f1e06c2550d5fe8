//! Terminal rendering of the marquee line.
//!
//! The engine reports offsets in pixels; one terminal cell stands for
//! `CELL_WIDTH` pixels. Scrolling walks a window over the text followed by a
//! separator, repeated, so the end of the line flows straight into its start.
use quote_common::Quote;
use quote_common::net::CELL_WIDTH;
use quote_common::quote::{MARQUEE_SEPARATOR, marquee_text};
use quote_engine::MarqueeFrame;

/// Shown instead of the line while nothing is tracked.
pub const PLACEHOLDER: &str = "No symbols tracked. Type `add <TICKER>` to start.";

const LOADING_MARK: &str = "⟳ ";
const IDLE_MARK: &str = "  ";

/// One terminal line, exactly `columns` cells wide plus the loading marker.
pub fn render_line(quotes: &[Quote], frame: MarqueeFrame, loading: bool, columns: usize) -> String {
    let body = match frame {
        MarqueeFrame::Placeholder => fit(PLACEHOLDER.chars(), columns),
        MarqueeFrame::Stationary => fit(marquee_text(quotes).chars(), columns),
        MarqueeFrame::Scrolling { offset } => {
            let cycle: Vec<char> = marquee_text(quotes)
                .chars()
                .chain(MARQUEE_SEPARATOR.chars())
                .collect();
            let shift = cells_for(offset) % cycle.len().max(1);
            fit(cycle.iter().copied().cycle().skip(shift), columns)
        }
    };
    let mark = if loading { LOADING_MARK } else { IDLE_MARK };
    format!("{mark}{body}")
}

/// Whole cells scrolled past for a (non-positive) pixel offset.
fn cells_for(offset: f64) -> usize {
    (-offset / CELL_WIDTH).max(0.0).floor() as usize
}

/// Takes at most `columns` chars and pads with spaces up to `columns`.
fn fit(chars: impl Iterator<Item = char>, columns: usize) -> String {
    let mut line: String = chars.take(columns).collect();
    let used = line.chars().count();
    line.extend(std::iter::repeat_n(' ', columns - used));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::Ticker;

    fn quotes() -> Vec<Quote> {
        let ticker: Ticker = "AAPL".parse().unwrap();
        vec![Quote::fetched(ticker, "Apple Inc", 105.0, 0.02)]
    }

    #[test]
    fn placeholder_when_empty() {
        let line = render_line(&[], MarqueeFrame::Placeholder, false, 60);
        assert!(line.starts_with("  No symbols tracked"));
        assert_eq!(line.chars().count(), 62);
    }

    #[test]
    fn stationary_is_truncated_and_padded() {
        let short = render_line(&quotes(), MarqueeFrame::Stationary, false, 30);
        assert_eq!(short.trim_end(), "  AAPL 105.00 ▲ +2.00%");
        assert_eq!(short.chars().count(), 32);

        let narrow = render_line(&quotes(), MarqueeFrame::Stationary, true, 4);
        assert_eq!(narrow, "⟳ AAPL");
    }

    #[test]
    fn scrolling_shifts_by_whole_cells() {
        let at = |offset| render_line(&quotes(), MarqueeFrame::Scrolling { offset }, false, 6);
        assert_eq!(at(0.0), "  AAPL 1");
        assert_eq!(at(-CELL_WIDTH * 2.0), "  PL 105");
        assert_eq!(at(-CELL_WIDTH * 2.5), "  PL 105");
    }

    #[test]
    fn scrolling_wraps_seamlessly() {
        let text_len = marquee_text(&quotes()).chars().count();
        let cycle_len = text_len + MARQUEE_SEPARATOR.chars().count();
        let offset = -(cycle_len as f64) * CELL_WIDTH;
        let wrapped = render_line(&quotes(), MarqueeFrame::Scrolling { offset }, false, 10);
        let start = render_line(&quotes(), MarqueeFrame::Scrolling { offset: 0.0 }, false, 10);
        assert_eq!(wrapped, start);

        // the tail of the text runs into the separator and then the head again
        let tail = -((text_len - 2) as f64) * CELL_WIDTH;
        let line = render_line(&quotes(), MarqueeFrame::Scrolling { offset: tail }, false, 12);
        assert!(line.starts_with("  0%"));
        assert!(line.ends_with("•   AAP"));
    }
}
