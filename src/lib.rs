//! Hall-sensored six-step BLDC drive
//!
//! Hardware-independent control core: Hall decoding, the six-step
//! commutation table, the current-limited duty ramp and the three-stage
//! rotor alignment. Hardware is reached only through the traits in
//! [`motor_driver`].

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod commutation;
pub mod config;
pub mod control;
pub mod current_sense;
pub mod error;
pub mod motor_driver;

#[cfg(test)]
mod sim;

pub use commutation::{commutate, decode_sector, Direction, HallTable, Sector};
pub use config::{AlignConfig, DriveConfig, RampConfig};
pub use control::{align, AlignStage, CurrentLimitedRamp};
pub use current_sense::{CurrentMonitor, CurrentMonitorConfig};
pub use error::ConfigError;
pub use motor_driver::{CurrentSense, DutyActuator, HallInputs, Phase, PhaseDriver, TickTimer};
