//! Configuration errors
//!
//! Runtime control paths never fail; only a configuration can be rejected,
//! once, before the drive is started.

use thiserror::Error;

/// Reasons a drive configuration is refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A Hall table entry uses bits outside the three sensor lines.
    #[error("hall code {code:#05b} does not fit in three sensor bits")]
    HallCodeOutOfRange { code: u8 },

    /// All-low or all-high sensor codes only appear as glitches.
    #[error("hall code {code:#05b} is a glitch code and cannot name a sector")]
    HallGlitchCode { code: u8 },

    /// Two sectors share the same Hall code.
    #[error("hall code {code:#05b} is used by more than one sector")]
    DuplicateHallCode { code: u8 },

    /// A current ceiling is zero, negative or not a number.
    #[error("current ceiling must be a positive finite value")]
    InvalidCurrentCeiling,

    /// A timed stage was given no time to run.
    #[error("stage duration must be at least one tick")]
    ZeroDuration,

    /// The duty ceiling leaves no room to ramp.
    #[error("duty ceiling must be non-zero")]
    ZeroDutyCeiling,
}
