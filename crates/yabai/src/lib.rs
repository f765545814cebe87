//! Subprocess transport to the yabai window manager.
//!
//! Every request spawns the `yabai` binary with `-m` plus the request
//! tokens and blocks until it exits. Queries parse stdout as JSON;
//! mutations only look at the exit status. A nonzero exit with a
//! diagnostic on stderr means yabai understood and declined the command
//! ([`Rejected`]); failing to spawn, or stdout that is not valid JSON,
//! means the transport itself is broken ([`Transport`]).
//!
//! [`Rejected`]: yabactl_core::Error::Rejected
//! [`Transport`]: yabactl_core::Error::Transport

use std::process::Command;

use serde_json::Value;
use tracing::trace;
use yabactl_core::{Error, Gateway, Result};

/// Gateway that shells out to the yabai message interface.
#[derive(Debug, Clone)]
pub struct YabaiGateway {
    program: String,
}

impl YabaiGateway {
    /// Gateway talking to `yabai` on the PATH.
    pub fn new() -> Self {
        Self::with_program("yabai")
    }

    /// Gateway talking to a specific binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        trace!(program = %self.program, args = %args.join(" "), "sending command");
        let output = Command::new(&self.program)
            .arg("-m")
            .args(args)
            .output()
            .map_err(|e| Error::Transport(format!("failed to run {}: {e}", self.program)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(Error::Rejected(message));
        }
        Ok(output.stdout)
    }
}

impl Default for YabaiGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for YabaiGateway {
    fn query(&self, args: &[&str]) -> Result<Value> {
        let stdout = self.run(args)?;
        serde_json::from_slice(&stdout)
            .map_err(|e| Error::Transport(format!("malformed reply from {}: {e}", self.program)))
    }

    fn execute(&self, args: &[&str]) -> Result<()> {
        // Acknowledgment payloads, if any, are not interesting.
        self.run(args).map(|_| ())
    }
}
