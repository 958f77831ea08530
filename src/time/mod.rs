pub mod error;
pub mod timeunit;

use std::fmt;

/// Whole seconds spent on a case, rendered the way TestRail reads `elapsed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(u64);

impl Elapsed {
    /// Rounds half up to whole seconds. TestRail rejects `0s`, so anything
    /// shorter than half a second, or unknown, counts as one second.
    pub fn from_millis(millis: Option<f64>) -> Self {
        let seconds = match millis {
            Some(ms) if ms.is_finite() && ms > 0.0 => (ms / 1000.0 + 0.5).floor() as u64,
            _ => 0,
        };
        Elapsed(seconds.max(1))
    }

    pub fn seconds(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}
