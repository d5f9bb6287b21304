//! Browser console sink for `tracing` events
//!
//! The start hook installs `ConsoleLayer` as the global subscriber when the
//! `console_log` feature is on. Each event at or below the current level
//! becomes one console line: errors go to `console.error`, warnings to
//! `console.warn`, everything else to `console.info`/`console.debug`.
//!
//! The level starts at WARN and can be changed at runtime with
//! `set_max_level` (`setLogLevel` from JS).

use std::fmt::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Verbosity rank of WARN, the default
const DEFAULT_RANK: u8 = 1;

static MAX_RANK: AtomicU8 = AtomicU8::new(DEFAULT_RANK);

fn rank(level: &Level) -> u8 {
    if *level == Level::ERROR {
        0
    } else if *level == Level::WARN {
        1
    } else if *level == Level::INFO {
        2
    } else if *level == Level::DEBUG {
        3
    } else {
        4
    }
}

/// Most verbose level forwarded to the console
pub fn set_max_level(level: Level) {
    MAX_RANK.store(rank(&level), Ordering::Relaxed);
}

pub fn max_level_enabled(level: &Level) -> bool {
    rank(level) <= MAX_RANK.load(Ordering::Relaxed)
}

/// Install the console layer as the global subscriber.
/// Returns false if a subscriber was already installed.
pub fn init() -> bool {
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new());
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

// =============================================================================
// Layer
// =============================================================================

/// Receives one formatted line per event
pub type Sink = fn(&Level, &str);

pub struct ConsoleLayer {
    sink: Sink,
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLayer {
    pub fn new() -> Self {
        Self { sink: console_sink }
    }

    pub fn with_sink(sink: Sink) -> Self {
        Self { sink }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if !max_level_enabled(meta.level()) {
            return;
        }
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let line = format!("[{}] {} {}{}", meta.target(), meta.level(), visitor.message, visitor.fields);
        (self.sink)(meta.level(), &line);
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn console_sink(level: &Level, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    if *level == Level::ERROR {
        web_sys::console::error_1(&line);
    } else if *level == Level::WARN {
        web_sys::console::warn_1(&line);
    } else if *level == Level::INFO {
        web_sys::console::info_1(&line);
    } else {
        web_sys::console::debug_1(&line);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn console_sink(_level: &Level, line: &str) {
    eprintln!("{}", line);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::core::Label;
    use std::cell::RefCell;

    thread_local! {
        static LINES: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: &Level, line: &str) {
        LINES.with(|lines| lines.borrow_mut().push((*level, line.to_string())));
    }

    fn take_lines() -> Vec<(Level, String)> {
        LINES.with(|lines| std::mem::take(&mut *lines.borrow_mut()))
    }

    // one test touches the global level so nothing races on it
    #[test]
    fn test_events_reach_sink_by_level() {
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer::with_sink(capture));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(error = %"bad pattern", "restyle failed");
            tracing::debug!("hidden at the default level");

            let lines = take_lines();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].0, Level::WARN);
            assert!(lines[0].1.contains("restyle failed"));
            assert!(lines[0].1.contains("error=bad pattern"));

            set_max_level(Level::DEBUG);
            let mut label = Label::new();
            label.set_text("hi").unwrap();
            label.set_text("hi").unwrap();
            set_max_level(Level::WARN);

            let lines = take_lines();
            assert!(lines
                .iter()
                .any(|(level, line)| *level == Level::DEBUG && line.contains("text unchanged")));
        });
    }

    #[test]
    fn test_rank_ordering() {
        assert!(rank(&Level::ERROR) < rank(&Level::WARN));
        assert!(rank(&Level::DEBUG) < rank(&Level::TRACE));
        assert_eq!(rank(&Level::WARN), DEFAULT_RANK);
    }
}
