//! Desktop notifications through the macOS notification center.
//!
//! Notifications are fire-and-forget feedback; a failure here is logged and
//! never fails the command that triggered it.

use std::process::Command;

use tracing::{debug, warn};

/// Post a notification, optionally under a title.
pub fn notify(message: &str, title: Option<&str>) {
    let mut script = format!("display notification \"{}\"", escape(message));
    if let Some(title) = title {
        script.push_str(&format!(" with title \"{}\"", escape(title)));
    }
    match Command::new("osascript").arg("-e").arg(&script).output() {
        Ok(output) if output.status.success() => {}
        Ok(output) => warn!(
            "notification failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ),
        Err(e) => warn!("could not run osascript: {e}"),
    }
}

/// Nudge the status bar to re-read window/space assignments.
pub fn trigger_statusbar() {
    let result = Command::new("sketchybar")
        .args(["--trigger", "windows_on_spaces"])
        .output();
    if let Err(e) = result {
        debug!("sketchybar trigger skipped: {e}");
    }
}

/// Escape text for embedding in an AppleScript string literal.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
