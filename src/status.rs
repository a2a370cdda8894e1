//! Status message latch.
//!
//! Holds the last human-readable message any subsystem asked the display to
//! show ("Heating...", a pause reason, an error). Every set replaces the
//! whole message; anything past [`MESSAGE_CAPACITY`] bytes is dropped
//! without telling the caller.
//!
//! The process-wide instance lives behind a critical-section mutex. Writers
//! swap the string inside one critical section and the report path takes a
//! stack copy before touching a serial port, so a reader never sees half a
//! message and no serial write ever happens with interrupts masked.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::trace;

/// Bytes kept from a status message.
pub const MESSAGE_CAPACITY: usize = 80;

/// Fixed-capacity status message buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLatch<const N: usize> {
    text: heapless::String<N>,
}

impl<const N: usize> StatusLatch<N> {
    /// An empty latch.
    pub const fn new() -> Self {
        Self {
            text: heapless::String::new(),
        }
    }

    /// Replace the message with text held in RAM.
    pub fn set(&mut self, text: &str) {
        self.copy_truncated(text);
    }

    /// Replace the message with a string baked into the firmware image.
    ///
    /// Targets with a separate program-memory address space need a distinct
    /// copy routine here; on ESP32 flash strings are memory-mapped, so both
    /// setters share one path.
    pub fn set_const(&mut self, text: &'static str) {
        self.copy_truncated(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    fn copy_truncated(&mut self, text: &str) {
        // C-string semantics: nothing after an embedded NUL survives.
        let text = text.split('\0').next().unwrap_or_default();
        let mut end = text.len().min(N);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if end < text.len() {
            trace!("status message truncated from {} to {} bytes", text.len(), end);
        }
        self.text.clear();
        // Cannot fail: `end <= N`.
        let _ = self.text.push_str(&text[..end]);
    }
}

// ── Process-wide instance ─────────────────────────────────────

static STATUS: Mutex<CriticalSectionRawMutex, RefCell<StatusLatch<MESSAGE_CAPACITY>>> =
    Mutex::new(RefCell::new(StatusLatch::new()));

/// Set the display message from RAM text.
pub fn set_status(text: &str) {
    STATUS.lock(|latch| latch.borrow_mut().set(text));
}

/// Set the display message from a firmware-image constant.
pub fn set_status_const(text: &'static str) {
    STATUS.lock(|latch| latch.borrow_mut().set_const(text));
}

/// Remove the display message.
pub fn clear_status() {
    STATUS.lock(|latch| latch.borrow_mut().clear());
}

/// Copy of the current message, taken atomically.
pub fn status_snapshot() -> StatusLatch<MESSAGE_CAPACITY> {
    STATUS.lock(|latch| latch.borrow().clone())
}
