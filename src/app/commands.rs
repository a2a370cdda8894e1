//! Inbound host commands.
//!
//! The lines a display (or host) sends that this core acts on. Anything
//! else belongs to the main G-code dispatcher.

use log::warn;

use crate::report::ReportRequest;
use crate::serial::Origin;

/// Commands the reporting core handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand<'a> {
    /// `M408 [S<style>]`: send a status record.
    ReportStatus(ReportRequest),
    /// `M117 <text>`: show `text` on the display.
    SetMessage(&'a str),
    /// `M117` with no text: clear the display message.
    ClearMessage,
}

impl<'a> HostCommand<'a> {
    /// Recognise one command line received from `origin`.
    ///
    /// Strips a leading `N<line>` number and any `;` comment. The command
    /// letter is case-insensitive.
    pub fn parse(line: &'a str, origin: Origin) -> Option<Self> {
        let line = line.split(';').next().unwrap_or_default().trim();
        let line = strip_line_number(line);

        let (word, args) = match line.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((word, args)) => (word, args.trim_start()),
            None => (line, ""),
        };

        if word.eq_ignore_ascii_case("M408") {
            Some(Self::ReportStatus(ReportRequest::from_args(args, origin)))
        } else if word.eq_ignore_ascii_case("M117") {
            let text = args.trim_end();
            Some(if text.is_empty() {
                Self::ClearMessage
            } else {
                Self::SetMessage(text)
            })
        } else {
            None
        }
    }
}

fn strip_line_number(line: &str) -> &str {
    let Some(rest) = line.strip_prefix(['N', 'n']) else {
        return line;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }
    rest[digits..].trim_start()
}

// ───────────────────────────────────────────────────────────────
// Line assembly
// ───────────────────────────────────────────────────────────────

/// Collects received bytes into one command line of at most `N` bytes.
///
/// Bytes are kept raw and decoded as UTF-8 only once the line is complete.
pub struct LineBuffer<const N: usize> {
    bytes: heapless::Vec<u8, N>,
    overflow: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
            overflow: false,
        }
    }

    /// Take one received byte. Returns `true` when it ends a line.
    pub fn push(&mut self, byte: u8) -> bool {
        if matches!(byte, b'\n' | b'\r') {
            return true;
        }
        if self.bytes.push(byte).is_err() {
            self.overflow = true;
        }
        false
    }

    /// The completed line, if it is non-empty, fits and is valid UTF-8.
    pub fn line(&self) -> Option<&str> {
        if self.overflow {
            warn!("command line longer than {} bytes dropped", N);
            return None;
        }
        if self.bytes.is_empty() {
            return None;
        }
        match core::str::from_utf8(&self.bytes) {
            Ok(text) => Some(text),
            Err(_) => {
                warn!("command line is not UTF-8, dropped");
                None
            }
        }
    }

    /// Start the next line.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.overflow = false;
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
