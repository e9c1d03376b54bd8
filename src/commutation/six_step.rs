//! Six-step commutation table
//!
//! Each step drives two of the three phases:
//! - one phase sourcing through its high-side switch
//! - one phase sinking through its PWM-chopped low-side switch
//! - one phase floating (both switches open)

use super::{Direction, Sector};
use crate::motor_driver::{Phase, PhaseDriver};

/// Drive state of one phase leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Leg {
    /// Both switches open (floating)
    Off,
    /// High-side switch closed
    HighOn,
    /// Low-side switch chopped by the PWM peripheral
    LowPwm,
}

/// Leg states for phases A, B and C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommutationPattern(pub [Leg; 3]);

impl CommutationPattern {
    pub const OFF: CommutationPattern = CommutationPattern([Leg::Off, Leg::Off, Leg::Off]);

    /// Pattern realizing `sector`; all-off for `Invalid` and `Disabled`.
    pub const fn for_sector(sector: Sector) -> Self {
        use Leg::*;
        match sector {
            //                              A       B       C
            Sector::S1 => CommutationPattern([LowPwm, Off, HighOn]),
            Sector::S2 => CommutationPattern([Off, LowPwm, HighOn]),
            Sector::S3 => CommutationPattern([HighOn, LowPwm, Off]),
            Sector::S4 => CommutationPattern([HighOn, Off, LowPwm]),
            Sector::S5 => CommutationPattern([Off, HighOn, LowPwm]),
            Sector::S6 => CommutationPattern([LowPwm, HighOn, Off]),
            Sector::Invalid | Sector::Disabled => Self::OFF,
        }
    }

    /// `phase` high-on, the other two chopped low.
    pub const fn energize(phase: Phase) -> Self {
        use Leg::*;
        match phase {
            Phase::A => CommutationPattern([HighOn, LowPwm, LowPwm]),
            Phase::B => CommutationPattern([LowPwm, HighOn, LowPwm]),
            Phase::C => CommutationPattern([LowPwm, LowPwm, HighOn]),
        }
    }

    pub const fn leg(&self, phase: Phase) -> Leg {
        self.0[phase.index()]
    }

    /// Drive the pattern onto the gates.
    ///
    /// Exactly one call per gate (six in total). Every disable is issued
    /// before the first enable, so no phase ever has both of its switches
    /// closed, whatever the previous pattern was.
    pub fn apply<D: PhaseDriver>(&self, driver: &mut D) {
        for phase in Phase::ALL {
            match self.leg(phase) {
                Leg::Off => {
                    driver.phase_high_disable(phase);
                    driver.phase_low_pwm_disable(phase);
                }
                Leg::HighOn => driver.phase_low_pwm_disable(phase),
                Leg::LowPwm => driver.phase_high_disable(phase),
            }
        }

        for phase in Phase::ALL {
            match self.leg(phase) {
                Leg::Off => {}
                Leg::HighOn => driver.phase_high_enable(phase),
                Leg::LowPwm => driver.phase_low_pwm_enable(phase),
            }
        }
    }
}

/// Commutate to `sector`. `Invalid` and `Disabled` open every switch.
#[inline]
pub fn apply<D: PhaseDriver>(driver: &mut D, sector: Sector) {
    CommutationPattern::for_sector(sector).apply(driver);
}

/// Open every switch.
#[inline]
pub fn disable<D: PhaseDriver>(driver: &mut D) {
    CommutationPattern::OFF.apply(driver);
}

/// Hold the rotor on one phase axis with the chopper active.
pub fn energize_phase<D: PhaseDriver>(driver: &mut D, phase: Phase) {
    CommutationPattern::energize(phase).apply(driver);
}

/// Open-loop step: advance one sector in `direction` and commutate to it.
pub fn force_step<D: PhaseDriver>(driver: &mut D, sector: Sector, direction: Direction) -> Sector {
    let next = sector.step(direction);
    apply(driver, next);
    next
}
