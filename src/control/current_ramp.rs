// Current-limited duty ramp

use crate::config::DUTY_CYCLE_MAX;
use crate::motor_driver::{CurrentSense, DutyActuator, TickTimer};

/// Duty ramp that climbs one unit per iteration while the winding current
/// stays under a ceiling, and backs off in tiers when it goes over.
///
/// The controller owns the duty value. It persists across [`run`] calls, so
/// consecutive windows continue from the last commanded duty.
///
/// [`run`]: CurrentLimitedRamp::run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentLimitedRamp {
    duty: u16,
    duty_max: u16,
}

impl CurrentLimitedRamp {
    /// Controller starting from zero duty.
    pub const fn new(duty_max: u16) -> Self {
        Self { duty: 0, duty_max }
    }

    /// Controller resuming from `duty`, clamped to `duty_max`.
    pub fn with_duty(duty_max: u16, duty: u16) -> Self {
        Self {
            duty: duty.min(duty_max),
            duty_max,
        }
    }

    /// Last commanded duty.
    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Duty clamp.
    pub fn duty_max(&self) -> u16 {
        self.duty_max
    }

    /// Back to zero duty.
    pub fn reset(&mut self) {
        self.duty = 0;
    }

    /// One control iteration.
    ///
    /// # Arguments
    /// * `current` - Latest current sample [A]
    /// * `ceiling` - Current limit [A]
    ///
    /// # Returns
    /// New duty in `[0, duty_max]`
    pub fn update(&mut self, current: f32, ceiling: f32) -> u16 {
        if current < ceiling {
            self.duty = self.duty.saturating_add(1).min(self.duty_max);
        } else if current > ceiling {
            // Tiered step-down; 0 and 1 are left as is.
            self.duty = match self.duty {
                d if d > 10 => d - 10,
                d if d > 5 => d - 5,
                d if d > 1 => d - 1,
                d => d,
            };
        }
        self.duty
    }

    /// Run the limiter for `duration_ticks`.
    ///
    /// Resets the timer, then samples, updates and writes the duty once per
    /// iteration until the timer reaches the duration. Blocks until done.
    ///
    /// Starts from the current [`duty`](Self::duty), not from zero. Call
    /// [`reset`](Self::reset) first for a fresh ramp.
    ///
    /// # Returns
    /// Last sampled current [A], `0.0` if the loop never ran
    pub fn run<H>(&mut self, hw: &mut H, duration_ticks: u32, ceiling: f32) -> f32
    where
        H: TickTimer + CurrentSense + DutyActuator,
    {
        trace!("ramp: {} ticks from duty {}", duration_ticks, self.duty);

        let mut current = 0.0;
        hw.reset_ticks();
        while hw.elapsed_ticks() < duration_ticks {
            current = hw.read_current();
            let duty = self.update(current, ceiling);
            hw.write_duty_cycle(duty);
        }

        debug!("ramp: done, duty {} current {}A", self.duty, current);
        current
    }
}

impl Default for CurrentLimitedRamp {
    fn default() -> Self {
        Self::new(DUTY_CYCLE_MAX)
    }
}
