//! Severity bookkeeping shared by all passes.
//!
//! Unexpected conditions carry a declared level. Whether they abort the
//! conversion depends on the configured run level; either way the highest
//! level seen is kept so callers can tell a clean run from a degraded one.

use super::error::{RtfError, RtfResult};

/// Level used by most internal state-machine checks.
pub const INTERNAL_LEVEL: u8 = 3;

/// Level recorded for recoverable input problems (unknown references, unmapped bytes).
pub const DEGRADED_LEVEL: u8 = 1;

/// Collects severities for one conversion.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    run_level: u8,
    exit_level: u8,
}

impl Diagnostics {
    /// Create diagnostics for the given run level (clamped to 1..=6).
    pub fn new(run_level: u8) -> Self {
        Self {
            run_level: run_level.clamp(1, 6),
            exit_level: 0,
        }
    }

    /// Report an internal error of `level`.
    ///
    /// Aborts with [`RtfError::InvalidCode`] when the run level exceeds
    /// `level`; otherwise the message is logged and recorded.
    pub fn report(&mut self, level: u8, message: &str, line: Option<usize>) -> RtfResult<()> {
        if self.run_level > level {
            return Err(RtfError::invalid_code(message, line));
        }
        log::warn!("{}", message);
        self.raise(level);
        Ok(())
    }

    /// Record a recoverable problem without ever aborting.
    pub fn degrade(&mut self, message: &str) {
        log::debug!("{}", message);
        self.raise(DEGRADED_LEVEL);
    }

    /// Highest level encountered so far.
    #[inline]
    pub fn exit_level(&self) -> u8 {
        self.exit_level
    }

    #[inline]
    pub fn run_level(&self) -> u8 {
        self.run_level
    }

    fn raise(&mut self, level: u8) {
        if level > self.exit_level {
            self.exit_level = level;
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(1)
    }
}
