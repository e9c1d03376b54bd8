//! Drive parameters (defaults)

/// Timer ticks per millisecond (one tick = 10 µs).
pub const TICKS_PER_MS: u32 = 100;

/// Upper bound of the duty value, in drive units (not percent).
pub const DUTY_CYCLE_MAX: u16 = 800;

/// Hall codes for sectors 1..6, code = (C << 2) | (B << 1) | A.
pub const DEFAULT_HALL_CODES: [u8; 6] = [0b110, 0b100, 0b101, 0b001, 0b011, 0b010];

/// Rotor alignment (startup)
pub mod align {
    /// Length of each of the three stages [ticks] (650 ms)
    pub const DEFAULT_STAGE_TICKS: u32 = 65_000;

    /// Bang-bang current ceiling while parking the rotor [A]
    pub const DEFAULT_CURRENT_MAX: f32 = 4.0;
}

/// Current-limited duty ramp
pub mod ramp {
    /// Startup ramp length after alignment [ticks] (2 s)
    pub const DEFAULT_DURATION_TICKS: u32 = 200_000;

    /// Startup ramp current ceiling [A]
    pub const DEFAULT_CURRENT_MAX: f32 = 6.0;

    /// Length of one run-state limiter window [ticks] (100 ms)
    pub const DEFAULT_RUN_WINDOW_TICKS: u32 = 10_000;

    /// Run-state current ceiling [A]
    pub const DEFAULT_RUN_CURRENT_MAX: f32 = 8.0;
}

/// Shunt current sense front end
pub mod current_sense {
    /// Shunt resistance [Ω]
    pub const DEFAULT_SHUNT_OHMS: f32 = 0.003;

    /// Amplifier gain
    pub const DEFAULT_AMP_GAIN: f32 = 20.0;

    /// Amplifier output at zero current [V]
    pub const DEFAULT_OFFSET_VOLTS: f32 = 1.65;

    /// ADC full scale (12 bit)
    pub const DEFAULT_ADC_MAX: u16 = 4096;

    /// ADC reference [V]
    pub const DEFAULT_VREF: f32 = 3.3;

    /// Low-pass coefficient (0.0-1.0, larger reacts faster)
    pub const DEFAULT_FILTER_ALPHA: f32 = 0.2;

    /// Overcurrent flag threshold [A]
    pub const DEFAULT_OVERCURRENT_THRESHOLD: f32 = 15.0;
}
