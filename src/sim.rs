// Simulated bench for host tests: gates, Hall lines, timer, shunt, PWM

use std::collections::VecDeque;

use crate::commutation::{CommutationPattern, Leg};
use crate::motor_driver::{
    CurrentSense, DutyActuator, HallInputs, Phase, PhaseDriver, TickTimer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowGate {
    Off,
    Pwm,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateState {
    pub high: bool,
    pub low: LowGate,
}

impl GateState {
    const OFF: GateState = GateState {
        high: false,
        low: LowGate::Off,
    };

    fn overlaps(&self) -> bool {
        self.high && self.low != LowGate::Off
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCall {
    HighEnable(Phase),
    HighDisable(Phase),
    LowPwmEnable(Phase),
    LowPwmDisable(Phase),
    LowHardEnable(Phase),
}

impl GateCall {
    pub fn is_enable(&self) -> bool {
        matches!(
            self,
            GateCall::HighEnable(_) | GateCall::LowPwmEnable(_) | GateCall::LowHardEnable(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Gate(GateCall),
    TimerReset,
    /// Gate states at the moment the current was sampled.
    CurrentRead { gates: [GateState; 3], amps: f32 },
    Duty(u16),
}

pub struct SimBench {
    gates: [GateState; 3],
    calls: Vec<GateCall>,
    events: Vec<Event>,
    shoot_through: usize,
    hall_code: u8,
    currents: VecDeque<f32>,
    default_current: f32,
    ticks: u32,
    tick_step: u32,
    duty_writes: Vec<u16>,
}

impl SimBench {
    pub fn new() -> Self {
        Self {
            gates: [GateState::OFF; 3],
            calls: Vec::new(),
            events: Vec::new(),
            shoot_through: 0,
            hall_code: 0,
            currents: VecDeque::new(),
            default_current: 0.0,
            ticks: 0,
            tick_step: 1,
            duty_writes: Vec::new(),
        }
    }

    /// Ticks added after every `elapsed_ticks` read.
    pub fn with_tick_step(mut self, step: u32) -> Self {
        self.tick_step = step;
        self
    }

    /// Current returned once the scripted samples run out.
    pub fn with_default_current(mut self, amps: f32) -> Self {
        self.default_current = amps;
        self
    }

    pub fn script_currents(&mut self, samples: impl IntoIterator<Item = f32>) {
        self.currents.extend(samples);
    }

    pub fn set_hall_code(&mut self, code: u8) {
        self.hall_code = code;
    }

    pub fn gate(&self, phase: Phase) -> GateState {
        self.gates[phase.index()]
    }

    pub fn all_gates_off(&self) -> bool {
        self.gates.iter().all(|g| *g == GateState::OFF)
    }

    /// Gate states as a commutation pattern. Panics on states a pattern
    /// cannot express (hard-on or overlap).
    pub fn pattern(&self) -> CommutationPattern {
        let mut legs = [Leg::Off; 3];
        for (leg, gate) in legs.iter_mut().zip(self.gates.iter()) {
            *leg = match (gate.high, gate.low) {
                (false, LowGate::Off) => Leg::Off,
                (true, LowGate::Off) => Leg::HighOn,
                (false, LowGate::Pwm) => Leg::LowPwm,
                other => panic!("gate state {:?} is not a commutation leg", other),
            };
        }
        CommutationPattern(legs)
    }

    pub fn gate_calls(&self) -> &[GateCall] {
        &self.calls
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of gate calls after which some phase had both switches closed.
    pub fn shoot_through_events(&self) -> usize {
        self.shoot_through
    }

    pub fn duty_writes(&self) -> &[u16] {
        &self.duty_writes
    }

    pub fn current_reads(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::CurrentRead { .. }))
            .count()
    }

    fn gate_call(&mut self, call: GateCall) {
        let (phase, gate) = match call {
            GateCall::HighEnable(p) => (p, GateState { high: true, ..self.gate(p) }),
            GateCall::HighDisable(p) => (p, GateState { high: false, ..self.gate(p) }),
            GateCall::LowPwmEnable(p) => (p, GateState { low: LowGate::Pwm, ..self.gate(p) }),
            GateCall::LowPwmDisable(p) => (p, GateState { low: LowGate::Off, ..self.gate(p) }),
            GateCall::LowHardEnable(p) => (p, GateState { low: LowGate::Hard, ..self.gate(p) }),
        };
        self.gates[phase.index()] = gate;
        if gate.overlaps() {
            self.shoot_through += 1;
        }
        self.calls.push(call);
        self.events.push(Event::Gate(call));
    }
}

impl HallInputs for SimBench {
    fn hall_lines(&mut self) -> u8 {
        self.hall_code
    }
}

impl PhaseDriver for SimBench {
    fn phase_high_enable(&mut self, phase: Phase) {
        self.gate_call(GateCall::HighEnable(phase));
    }

    fn phase_high_disable(&mut self, phase: Phase) {
        self.gate_call(GateCall::HighDisable(phase));
    }

    fn phase_low_pwm_enable(&mut self, phase: Phase) {
        self.gate_call(GateCall::LowPwmEnable(phase));
    }

    fn phase_low_pwm_disable(&mut self, phase: Phase) {
        self.gate_call(GateCall::LowPwmDisable(phase));
    }

    fn phase_low_hard_enable(&mut self, phase: Phase) {
        self.gate_call(GateCall::LowHardEnable(phase));
    }
}

impl TickTimer for SimBench {
    fn elapsed_ticks(&mut self) -> u32 {
        let now = self.ticks;
        self.ticks = self.ticks.saturating_add(self.tick_step);
        now
    }

    fn reset_ticks(&mut self) {
        self.ticks = 0;
        self.events.push(Event::TimerReset);
    }
}

impl CurrentSense for SimBench {
    fn read_current(&mut self) -> f32 {
        let amps = self.currents.pop_front().unwrap_or(self.default_current);
        self.events.push(Event::CurrentRead {
            gates: self.gates,
            amps,
        });
        amps
    }
}

impl DutyActuator for SimBench {
    fn write_duty_cycle(&mut self, duty: u16) {
        self.duty_writes.push(duty);
        self.events.push(Event::Duty(duty));
    }
}
