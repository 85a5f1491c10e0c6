//! Clipboard support for proofread mode.
//!
//! The clipboard is an external program that reads the text on stdin
//! (`pbcopy`, `wl-copy`, `xclip`, `clip`).

use crate::config::ClipboardSettings;
use crate::error::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Something that can take text and put it on the clipboard.
pub trait ClipboardWriter {
    fn write(&self, bytes: &[u8]) -> Result<()>;
}

/// Clipboard backed by a command that reads from stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The usual clipboard command for this platform.
    pub fn platform_default() -> Self {
        #[cfg(target_os = "macos")]
        let (program, args): (&str, &[&str]) = ("pbcopy", &[]);

        #[cfg(windows)]
        let (program, args): (&str, &[&str]) = ("clip", &[]);

        #[cfg(not(any(target_os = "macos", windows)))]
        let (program, args): (&str, &[&str]) = if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            ("wl-copy", &[])
        } else {
            ("xclip", &["-selection", "clipboard"])
        };

        Self::new(program, args.iter().map(|a| a.to_string()).collect())
    }

    /// Build the clipboard described by `settings`, or `None` if copying is disabled.
    pub fn from_settings(settings: &ClipboardSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        match settings.command.as_deref() {
            Some([program, args @ ..]) => Some(Self::new(program.clone(), args.to_vec())),
            _ => Some(Self::platform_default()),
        }
    }

    /// Command line for messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn error(&self, reason: impl ToString) -> Error {
        Error::Clipboard {
            command: self.display(),
            reason: reason.to_string(),
        }
    }
}

impl ClipboardWriter for CommandClipboard {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.error(e))?;

        // stdin is dropped before waiting so the child sees EOF, and the child
        // is reaped even if the write failed.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(bytes),
            None => Ok(()),
        };
        let status = child.wait().map_err(|e| self.error(e))?;

        if !status.success() {
            return Err(self.error(format!("exited with {}", status)));
        }
        written.map_err(|e| self.error(e))
    }
}
