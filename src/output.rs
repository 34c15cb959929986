// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON-lines output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.start_time.map(|t| t.elapsed().as_secs_f64())
    }

    /// Print a progress message (suppressed in quiet mode).
    pub fn progress(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("  → {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => self.emit("progress", message, None::<()>),
        }
    }

    /// Print a warning that does not fail the command.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit("warning", message, None::<()>),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => match self.elapsed_secs() {
                Some(elapsed) => println!("✓ {message} ({elapsed:.1}s)"),
                None => println!("✓ {message}"),
            },
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.emit("success", message, None::<()>),
        }
    }

    /// Print a success message carrying a structured payload in JSON mode.
    pub fn success_with<T: Serialize>(&self, message: &str, data: &T) {
        match self.mode {
            OutputMode::Json => self.emit("success", message, Some(data)),
            _ => self.success(message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                if let Some(json) = self.encode("error", message, None::<()>) {
                    eprintln!("{json}");
                }
            }
        }
    }

    fn emit<T: Serialize>(&self, event: &str, message: &str, data: Option<T>) {
        if let Some(json) = self.encode(event, message, data) {
            println!("{json}");
        }
    }

    fn encode<T: Serialize>(&self, event: &str, message: &str, data: Option<T>) -> Option<String> {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.elapsed_secs(),
            data,
        };
        serde_json::to_string(&event).ok()
    }
}

#[derive(Serialize)]
struct JsonEvent<'a, T> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}
