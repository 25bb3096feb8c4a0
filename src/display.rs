//! Terminal display collaborator
//!
//! Fire-and-forget output; nothing in the core relies on a return value
//! from either operation.

use crate::models::GameState;

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    fn prefix(self) -> &'static str {
        match self {
            StatusLevel::Info => "ℹ",
            StatusLevel::Success => "✓",
            StatusLevel::Warning => "⚠",
            StatusLevel::Error => "✗",
        }
    }
}

/// Plain terminal renderer for advice and status messages
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    /// Print advice for the given snapshot
    pub fn show_advice(&self, state: &GameState, advice: &str) {
        println!("\n[Turn {}] AI Advice:", state.turn);
        println!("{advice}");
    }

    /// Print a status message at the given level
    pub fn show_status(&self, message: &str, level: StatusLevel) {
        println!("{} {message}", level.prefix());
    }
}
