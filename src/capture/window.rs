//! Capture window duration policy.

use std::time::Duration;

/// Capture length used when none (or a non-positive one) is requested.
pub const DEFAULT_CAPTURE_SECS: u64 = 10;

/// The wall-clock interval a session accepts frames for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureWindow {
    duration: Duration,
    defaulted: bool,
}

impl CaptureWindow {
    /// Window from a user-supplied number of seconds.
    ///
    /// Absent, zero and negative values all fall back to the default.
    pub fn from_secs(requested: Option<i64>) -> Self {
        match requested {
            Some(secs) if secs > 0 => Self {
                duration: Duration::from_secs(secs as u64),
                defaulted: false,
            },
            Some(secs) => {
                if secs < 0 {
                    tracing::warn!(
                        "Negative capture time {} treated as unset, using {}s default",
                        secs,
                        DEFAULT_CAPTURE_SECS
                    );
                }
                Self::default_window()
            }
            None => Self::default_window(),
        }
    }

    /// Window of an exact duration; a zero duration falls back to the default.
    pub fn from_duration(duration: Duration) -> Self {
        if duration.is_zero() {
            return Self::default_window();
        }
        Self {
            duration,
            defaulted: false,
        }
    }

    fn default_window() -> Self {
        Self {
            duration: Duration::from_secs(DEFAULT_CAPTURE_SECS),
            defaulted: true,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the default length was substituted for the request.
    pub fn is_default(&self) -> bool {
        self.defaulted
    }

    /// The line announced before capture starts.
    pub fn announcement(&self, target: &str) -> String {
        let secs = self.duration.as_secs();
        if self.defaulted {
            format!("Running a {} second capture (default length) on {}", secs, target)
        } else {
            format!("Running a {} second capture on {}", secs, target)
        }
    }
}

impl Default for CaptureWindow {
    fn default() -> Self {
        Self::default_window()
    }
}
