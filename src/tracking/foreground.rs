//! Foreground execution reservation.
//!
//! While a tracking run is active it must hold a foreground reservation:
//! the host's guarantee that the routine will not be terminated while it
//! is showing status to the user. Reserving yields a status handle whose
//! text the runner updates every tick and releases when the run ends.
//!
//! Reservation cannot fail by contract; there is no handling for a host
//! that refuses it.

use crate::{sclog, sclog_debug};

/// Host adapter that grants foreground reservations.
pub trait ForegroundHost: Send + Sync {
    /// Reserve uninterruptible execution, showing `initial` as the status.
    fn reserve(&self, initial: &str) -> Box<dyn StatusHandle>;
}

/// Mutable status display owned by one tracking run.
pub trait StatusHandle: Send {
    /// Replace the displayed status text.
    fn update(&mut self, text: &str);

    /// Give up the reservation and clear the display.
    fn release(self: Box<Self>);
}

/// Foreground host that mirrors status to the crate log.
///
/// Stands in for the host's notification surface: every reservation,
/// update, and release is visible in `~/.scatrack/scatrack.log`.
pub struct LogForeground;

impl ForegroundHost for LogForeground {
    fn reserve(&self, initial: &str) -> Box<dyn StatusHandle> {
        sclog!("foreground reserved: {}", initial);
        Box::new(LogStatusHandle)
    }
}

struct LogStatusHandle;

impl StatusHandle for LogStatusHandle {
    fn update(&mut self, text: &str) {
        sclog!("status: {}", text);
    }

    fn release(self: Box<Self>) {
        sclog_debug!("foreground released");
    }
}
