//! Advisory progress reporting for long-running operations.
//!
//! Quantization and speck removal can take a while on production-size
//! rasters; they report coarse percentage updates through this one-way
//! channel. Reporting is advisory only - callers may ignore it, and no
//! correctness contract depends on which updates arrive.

use std::sync::Mutex;

/// Receiver for progress updates.
///
/// `percent` is in `[0, 100]`; `message` names the stage being worked.
pub trait ProgressReporter {
    fn report(&self, percent: u8, message: &str);
}

/// Reporter that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn report(&self, _percent: u8, _message: &str) {}
}

/// Reporter that writes a single rewriting line to stderr.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ConsoleProgress {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&self, percent: u8, message: &str) {
        eprint!("\r{:>3}% {}", percent.min(100), message);
        if percent >= 100 {
            eprintln!();
        }
    }
}

/// Reporter that collects updates in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingProgress {
    updates: Mutex<Vec<(u8, String)>>,
}

impl CollectingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates received so far, in arrival order.
    pub fn updates(&self) -> Vec<(u8, String)> {
        self.updates.lock().expect("progress lock poisoned").clone()
    }
}

impl ProgressReporter for CollectingProgress {
    fn report(&self, percent: u8, message: &str) {
        self.updates
            .lock()
            .expect("progress lock poisoned")
            .push((percent, message.to_string()));
    }
}
