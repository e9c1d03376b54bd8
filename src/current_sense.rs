//! Shunt current sensing
//!
//! Converts raw ADC samples of the shunt amplifier into winding current and
//! low-pass filters them. The filtered value is what the control loops see.

use crate::config::current_sense::*;

/// Shunt front-end parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentMonitorConfig {
    /// Shunt resistance [Ω]
    pub shunt_ohms: f32,
    /// Amplifier gain
    pub amp_gain: f32,
    /// Amplifier output at zero current [V]
    pub offset_volts: f32,
    /// ADC full scale (12 bit = 4096)
    pub adc_max: u16,
    /// ADC reference [V]
    pub vref: f32,
    /// Low-pass coefficient (0.0-1.0, larger reacts faster)
    pub filter_alpha: f32,
    /// Overcurrent threshold [A]
    pub overcurrent_threshold: f32,
}

impl Default for CurrentMonitorConfig {
    fn default() -> Self {
        Self {
            // 3 mΩ shunt, x20 amplifier biased at mid-rail:
            // I = (V_adc - 1.65) / 0.06, about ±27 A full scale
            shunt_ohms: DEFAULT_SHUNT_OHMS,
            amp_gain: DEFAULT_AMP_GAIN,
            offset_volts: DEFAULT_OFFSET_VOLTS,
            adc_max: DEFAULT_ADC_MAX,
            vref: DEFAULT_VREF,
            filter_alpha: DEFAULT_FILTER_ALPHA,
            overcurrent_threshold: DEFAULT_OVERCURRENT_THRESHOLD,
        }
    }
}

/// Filtered current and its flag.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentMonitorState {
    /// Filtered current [A]
    pub current: f32,
    pub overcurrent: bool,
}

impl CurrentMonitorState {
    pub const fn new() -> Self {
        Self {
            current: 0.0,
            overcurrent: false,
        }
    }
}

impl Default for CurrentMonitorState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CurrentMonitor {
    config: CurrentMonitorConfig,
    state: CurrentMonitorState,
}

impl CurrentMonitor {
    pub fn new(mut config: CurrentMonitorConfig) -> Self {
        config.filter_alpha = config.filter_alpha.clamp(0.0, 1.0);
        Self {
            config,
            state: CurrentMonitorState::new(),
        }
    }

    /// Raw ADC value to current [A], unfiltered.
    pub fn adc_to_current(&self, adc_raw: u16) -> f32 {
        // V_adc = (adc_raw / adc_max) * Vref
        let v_adc = (adc_raw as f32 / self.config.adc_max as f32) * self.config.vref;

        // I = (V_adc - V_offset) / (gain * R_shunt)
        (v_adc - self.config.offset_volts) / (self.config.amp_gain * self.config.shunt_ohms)
    }

    /// Feed one ADC sample.
    ///
    /// # Arguments
    /// * `adc_raw` - ADC sample (0-4095)
    ///
    /// # Returns
    /// Updated state
    pub fn update(&mut self, adc_raw: u16) -> CurrentMonitorState {
        let current_raw = self.adc_to_current(adc_raw);

        // filtered = alpha * raw + (1 - alpha) * filtered_prev
        self.state.current = self.config.filter_alpha * current_raw
            + (1.0 - self.config.filter_alpha) * self.state.current;

        let was_overcurrent = self.state.overcurrent;
        self.state.overcurrent = self.state.current > self.config.overcurrent_threshold;

        if self.state.overcurrent && !was_overcurrent {
            error!(
                "OVERCURRENT detected! Current: {}A (threshold: {}A)",
                self.state.current, self.config.overcurrent_threshold
            );
        }

        self.state
    }

    pub fn state(&self) -> CurrentMonitorState {
        self.state
    }

    /// Filtered current [A]
    pub fn current(&self) -> f32 {
        self.state.current
    }

    pub fn set_filter_alpha(&mut self, alpha: f32) {
        self.config.filter_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.state = CurrentMonitorState::new();
    }

    /// Seed the filter with a first sample so startup does not ramp in from
    /// zero.
    pub fn initialize_with_adc(&mut self, adc_raw: u16) {
        let current = self.adc_to_current(adc_raw);
        self.state.current = current;
        self.state.overcurrent = current > self.config.overcurrent_threshold;
    }
}

impl Default for CurrentMonitor {
    fn default() -> Self {
        Self::new(CurrentMonitorConfig::default())
    }
}
