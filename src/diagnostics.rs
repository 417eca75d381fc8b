use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;
use crate::poll::PollOutcome;
use crate::utils::{log_error, log_fail, log_info, log_pass, log_warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Info(String),
    Warn(String),
    Error(String),
    SelectorLookup { region: String, matched: Option<String> },
    PollTick { iteration: usize, url: String },
    PollFinished(PollOutcome),
    ScreenshotSaved(PathBuf),
    CaseFinished { suite: String, name: String, passed: bool, detail: Option<String> },
}

/// Where core logic reports what it observed.
pub trait Diagnostics: Send + Sync {
    fn record(&self, event: Event);
}

pub fn info(sink: &dyn Diagnostics, msg: impl Into<String>) {
    sink.record(Event::Info(msg.into()));
}

pub fn warn(sink: &dyn Diagnostics, msg: impl Into<String>) {
    sink.record(Event::Warn(msg.into()));
}

pub fn error(sink: &dyn Diagnostics, msg: impl Into<String>) {
    sink.record(Event::Error(msg.into()));
}

pub struct ConsoleSink {
    /// Poll ticks are noisy; only printed when set.
    pub verbose: bool,
}

impl Diagnostics for ConsoleSink {
    fn record(&self, event: Event) {
        match event {
            Event::Info(msg) => log_info(&msg),
            Event::Warn(msg) => log_warn(&msg),
            Event::Error(msg) => log_error(&msg),
            Event::SelectorLookup { region, matched } => match matched {
                Some(sel) => log_info(&format!("{} found via '{}'", region, sel)),
                None => log_info(&format!("{} not found", region)),
            },
            Event::PollTick { iteration, url } => {
                if self.verbose {
                    log_info(&format!("poll #{} -> {}", iteration, url));
                }
            }
            Event::PollFinished(outcome) => log_info(&format!("Login outcome: {}", outcome)),
            Event::ScreenshotSaved(path) => log_info(&format!("Screenshot saved: {}", path.display())),
            Event::CaseFinished { suite, name, passed, detail } => {
                let line = format!("• [{}] {} => {}", suite, name, if passed { "Passed" } else { "Failed" });
                if passed {
                    log_pass(&line);
                } else {
                    log_fail(&line);
                    if let Some(reason) = detail {
                        log_error(&format!("  {}", reason));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
impl Diagnostics for MemorySink {
    fn record(&self, event: Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
