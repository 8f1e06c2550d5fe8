//! Reading user commands from stdin and forwarding them to the engine.
//!
//! This module parses one command per line and runs a background thread that
//! turns them into engine commands through an `EngineHandle`. Settings edits
//! are sent whole: the console keeps the last accepted raw settings and
//! changes one field at a time on top of them.
use std::io::BufRead;
use std::str::FromStr;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};
use quote_common::{DisplayStyle, QuoteError, RawSettings, Result, Settings, Ticker};
use quote_engine::EngineHandle;
use strum::{Display, EnumString};

/// Help text printed for `help` and unknown input.
pub const USAGE: &str = "commands: add <TICKER> | remove <TICKER> | refresh | speed <px/s> | \
interval <seconds> | style <stationary|scrolling> | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Add,
    #[strum(serialize = "remove", serialize = "rm")]
    Remove,
    Refresh,
    Speed,
    Interval,
    Style,
    Help,
    #[strum(serialize = "quit", serialize = "exit")]
    Quit,
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Track a ticker.
    Add(Ticker),
    /// Stop tracking a ticker.
    Remove(Ticker),
    /// Refresh now.
    Refresh,
    /// New scroll speed.
    Speed(f64),
    /// New displayed refresh interval.
    Interval(f64),
    /// New display style.
    Style(DisplayStyle),
    /// Print usage.
    Help,
    /// Leave the program.
    Quit,
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Input>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let verb = Verb::from_str(verb).map_err(|_| QuoteError::Format(format!("unknown command `{verb}`")))?;
    let argument = words.next();
    if words.next().is_some() {
        return Err(QuoteError::Format(format!("`{verb}` takes at most one argument")));
    }

    let required = |what: &str| {
        argument.ok_or_else(|| QuoteError::Format(format!("`{verb}` needs {what}")))
    };
    let number = |what: &str| -> Result<f64> {
        let raw = required(what)?;
        raw.parse::<f64>()
            .map_err(|_| QuoteError::Format(format!("`{raw}` is not a number")))
    };

    let input = match verb {
        Verb::Add => Input::Add(required("a ticker")?.parse()?),
        Verb::Remove => Input::Remove(required("a ticker")?.parse()?),
        Verb::Refresh => Input::Refresh,
        Verb::Speed => Input::Speed(number("a speed")?),
        Verb::Interval => Input::Interval(number("an interval")?),
        Verb::Style => {
            let raw = required("a style")?;
            Input::Style(
                raw.parse::<DisplayStyle>()
                    .map_err(|_| QuoteError::Format(format!("unknown style `{raw}`")))?,
            )
        }
        Verb::Help => Input::Help,
        Verb::Quit => Input::Quit,
    };
    Ok(Some(input))
}

/// Stdin command loop bound to one engine.
pub struct Console {
    handle: EngineHandle,
    settings: RawSettings,
}

impl Console {
    /// Console starting from the engine's current `settings`.
    pub fn new(handle: EngineHandle, settings: Settings) -> Self {
        Self {
            handle,
            settings: settings.to_raw(),
        }
    }

    /// Apply one parsed input. Returns `false` when the user asked to quit.
    pub fn apply(&mut self, input: Input) -> Result<bool> {
        match input {
            Input::Add(ticker) => self.handle.add_ticker(ticker)?,
            Input::Remove(ticker) => self.handle.remove_symbol(ticker)?,
            Input::Refresh => self.handle.manual_refresh()?,
            Input::Speed(speed) => self.edit(|s| s.scroll_speed = speed)?,
            Input::Interval(seconds) => self.edit(|s| s.refresh_interval = seconds)?,
            Input::Style(style) => self.edit(|s| s.display_style = style)?,
            Input::Help => info!("{}", USAGE),
            Input::Quit => {
                self.handle.shutdown()?;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn edit(&mut self, change: impl FnOnce(&mut RawSettings)) -> Result<()> {
        change(&mut self.settings);
        // keep the mirror in step with what the engine will accept
        self.settings = Settings::normalize(self.settings).to_raw();
        self.handle.set_settings(self.settings)
    }

    /// Spawn a thread reading `reader` line by line until EOF, `quit` or shutdown.
    pub fn start<R>(mut self, reader: R, shutdown: Arc<AtomicBool>) -> JoinHandle<()>
    where
        R: BufRead + Send + 'static,
    {
        thread::spawn(move || {
            for line in reader.lines() {
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Console read error: {}", e);
                        break;
                    }
                };
                match parse_line(&line) {
                    Ok(Some(input)) => {
                        debug!("Console input: {:?}", input);
                        match self.apply(input) {
                            Ok(true) => {}
                            Ok(false) => break,
                            Err(e) => {
                                error!("Engine is gone: {}", e);
                                break;
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("{}. {}", e, USAGE),
                }
            }
            info!("Console thread stopping...");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_engine::{MemoryStorage, QuoteEngine, SimulatedProvider};
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn parses_every_verb() {
        let aapl: Ticker = "AAPL".parse().unwrap();
        assert_eq!(parse_line("add aapl").unwrap(), Some(Input::Add(aapl.clone())));
        assert_eq!(parse_line("RM aapl").unwrap(), Some(Input::Remove(aapl)));
        assert_eq!(parse_line("refresh").unwrap(), Some(Input::Refresh));
        assert_eq!(parse_line("speed 42.5").unwrap(), Some(Input::Speed(42.5)));
        assert_eq!(parse_line("interval 90").unwrap(), Some(Input::Interval(90.0)));
        assert_eq!(
            parse_line("style Scrolling").unwrap(),
            Some(Input::Style(DisplayStyle::Scrolling))
        );
        assert_eq!(parse_line("exit").unwrap(), Some(Input::Quit));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["dance", "add", "add A B", "speed fast", "style wobbly", "add $$$"] {
            assert!(parse_line(line).is_err(), "{line}");
        }
    }

    fn engine() -> QuoteEngine<SimulatedProvider> {
        QuoteEngine::new(
            Arc::new(SimulatedProvider::new()),
            Box::new(MemoryStorage::new()),
        )
        .unwrap()
    }

    #[test]
    fn settings_edits_are_sent_whole_and_normalized() {
        let mut engine = engine();
        let mut console = Console::new(engine.handle(), engine.settings());

        assert!(console.apply(Input::Speed(33.0)).unwrap());
        assert!(console.apply(Input::Style(DisplayStyle::Scrolling)).unwrap());

        engine.pump(Duration::from_secs(1)).unwrap();
        assert_eq!(engine.settings().scroll_speed(), 35);
        assert_eq!(engine.settings().display_style(), DisplayStyle::Stationary);

        engine.pump(Duration::from_secs(1)).unwrap();
        assert_eq!(engine.settings().scroll_speed(), 35);
        assert_eq!(engine.settings().display_style(), DisplayStyle::Scrolling);
        assert_eq!(engine.settings().refresh_interval_display(), 300);
    }

    #[test]
    fn console_thread_forwards_until_quit() {
        let mut engine = engine();
        let console = Console::new(engine.handle(), engine.settings());
        let shutdown = Arc::new(AtomicBool::new(false));
        let input = Cursor::new("add msft\nbogus\nquit\nadd tsla\n");

        console.start(input, shutdown).join().unwrap();

        assert!(engine.pump(Duration::from_secs(1)).unwrap());
        assert_eq!(engine.current_quotes()[0].ticker.as_str(), "MSFT");
        assert!(!engine.pump(Duration::from_secs(1)).unwrap());
        while engine.is_loading() {
            engine.pump(Duration::from_secs(5)).unwrap();
        }
        assert_eq!(engine.current_quotes().len(), 1);
    }
}
