//! Drive configuration
//!
//! Compile-time defaults live in [`params`]; [`DriveConfig`] gathers them
//! into one value that is validated once before the motor is started.

pub mod params;

pub use params::*;

use crate::commutation::HallTable;
use crate::error::ConfigError;

/// Rotor alignment settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlignConfig {
    /// Length of each stage [ticks]
    pub stage_ticks: u32,
    /// Bang-bang current ceiling [A]
    pub current_ceiling: f32,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            stage_ticks: align::DEFAULT_STAGE_TICKS,
            current_ceiling: align::DEFAULT_CURRENT_MAX,
        }
    }
}

/// Current-limited ramp settings.
///
/// Both ceilings are independent of [`AlignConfig::current_ceiling`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampConfig {
    /// Duty clamp (drive units)
    pub duty_max: u16,
    /// Startup ramp length [ticks]
    pub duration_ticks: u32,
    /// Startup ramp current ceiling [A]
    pub current_ceiling: f32,
    /// Run-state limiter window [ticks]
    pub run_window_ticks: u32,
    /// Run-state current ceiling [A]
    pub run_current_ceiling: f32,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            duty_max: DUTY_CYCLE_MAX,
            duration_ticks: ramp::DEFAULT_DURATION_TICKS,
            current_ceiling: ramp::DEFAULT_CURRENT_MAX,
            run_window_ticks: ramp::DEFAULT_RUN_WINDOW_TICKS,
            run_current_ceiling: ramp::DEFAULT_RUN_CURRENT_MAX,
        }
    }
}

/// Everything the drive needs to start.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveConfig {
    pub hall_table: HallTable,
    pub align: AlignConfig,
    pub ramp: RampConfig,
}

impl DriveConfig {
    /// Check the configuration before any gate is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        HallTable::new(*self.hall_table.codes())?;

        check_ceiling(self.align.current_ceiling)?;
        check_ceiling(self.ramp.current_ceiling)?;
        check_ceiling(self.ramp.run_current_ceiling)?;

        if self.align.stage_ticks == 0
            || self.ramp.duration_ticks == 0
            || self.ramp.run_window_ticks == 0
        {
            return Err(ConfigError::ZeroDuration);
        }

        if self.ramp.duty_max == 0 {
            return Err(ConfigError::ZeroDutyCeiling);
        }

        Ok(())
    }
}

fn check_ceiling(ceiling: f32) -> Result<(), ConfigError> {
    if ceiling.is_finite() && ceiling > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidCurrentCeiling)
    }
}
