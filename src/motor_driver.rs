//! Hardware seam for the drive
//!
//! The control code never touches registers. Everything it needs from the
//! power stage, the Hall lines, the tick timer and the current sensor goes
//! through the traits below, so the firmware can bind them to real
//! peripherals and the tests can bind them to a simulated bench.

/// One of the three motor phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    A,
    B,
    C,
}

impl Phase {
    /// Phases in wiring order.
    pub const ALL: [Phase; 3] = [Phase::A, Phase::B, Phase::C];

    /// Zero-based index (A=0, B=1, C=2).
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Instantaneous read of the three Hall sensor lines.
pub trait HallInputs {
    /// Raw sensor code. Only the low three bits carry sensor state.
    fn hall_lines(&mut self) -> u8;
}

/// Gate control for the six power switches.
///
/// Each call is individually idempotent. Implementations must not add
/// interlocking of their own: ordering is the caller's job.
pub trait PhaseDriver {
    /// Close the high-side switch of `phase`.
    fn phase_high_enable(&mut self, phase: Phase);

    /// Open the high-side switch of `phase`.
    fn phase_high_disable(&mut self, phase: Phase);

    /// Hand the low-side switch of `phase` to the PWM chopper.
    fn phase_low_pwm_enable(&mut self, phase: Phase);

    /// Open the low-side switch of `phase`, whether it was chopped or held.
    fn phase_low_pwm_disable(&mut self, phase: Phase);

    /// Hold the low-side switch of `phase` at a steady on level, bypassing
    /// the PWM chopper. Only used during alignment.
    fn phase_low_hard_enable(&mut self, phase: Phase);

    /// All six switches open.
    fn disable_all(&mut self) {
        for phase in Phase::ALL {
            self.phase_high_disable(phase);
            self.phase_low_pwm_disable(phase);
        }
    }
}

/// Monotonic tick counter with a reset primitive.
///
/// One tick is 10 µs on the reference board.
pub trait TickTimer {
    /// Ticks since the last reset.
    fn elapsed_ticks(&mut self) -> u32;

    /// Restart counting from zero.
    fn reset_ticks(&mut self);
}

/// Latest filtered winding-current measurement.
pub trait CurrentSense {
    /// Current in amperes.
    fn read_current(&mut self) -> f32;
}

/// PWM compare value for the low-side chopper.
pub trait DutyActuator {
    /// Commit a duty value in `[0, duty_max]` drive units.
    fn write_duty_cycle(&mut self, duty: u16);
}
