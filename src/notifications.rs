/// Cross-platform notification support
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

use crate::domain::{DueAlert, PhaseComplete};

/// Show a desktop notification with the given title and body
fn send(title: &str, body: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Todo Timer - {}""#,
            body.replace('"', "\\\""),
            title.replace('"', "\\\"")
        );

        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            log::warn!("notification failed: {}", e);
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        log::debug!("notification ({}): {}", title, body);
    }
}

/// Notify that a work or rest interval has ended
pub fn notify_phase_complete(event: &PhaseComplete) {
    let (title, body) = event.message();
    send(title, &body);
}

/// Notify about a task due today or tomorrow
pub fn notify_due(alert: &DueAlert) {
    send("Deadline", &alert.message());
}
