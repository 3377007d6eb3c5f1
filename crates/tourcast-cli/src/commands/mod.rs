//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared input loading (shows, agencies, config, reference instant)
//! - `reports` - Report commands (summary, health, alerts, predict, commissions, report)
//! - `settings` - Engine configuration command

pub mod core;
pub mod reports;
pub mod settings;

// Re-export command functions for main.rs
pub use core::*;
pub use reports::*;
pub use settings::*;

/// Pretty-print any serializable result as JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
