//! Rotor alignment
//!
//! Parks the rotor on each phase axis in turn before Hall commutation takes
//! over. In every stage the two other phases are held on their low sides at
//! a steady level and the driven phase's high side is switched bang-bang
//! against a current ceiling. There is no position check: the sequence
//! always runs to completion.

use crate::config::AlignConfig;
use crate::motor_driver::{CurrentSense, Phase, PhaseDriver, TickTimer};

/// One alignment stage, named after the phase whose high side is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlignStage {
    PhaseA,
    PhaseB,
    PhaseC,
}

impl AlignStage {
    /// Stages in execution order.
    pub const ALL: [AlignStage; 3] = [AlignStage::PhaseA, AlignStage::PhaseB, AlignStage::PhaseC];

    /// Phase whose high side is switched.
    pub const fn driven(self) -> Phase {
        match self {
            AlignStage::PhaseA => Phase::A,
            AlignStage::PhaseB => Phase::B,
            AlignStage::PhaseC => Phase::C,
        }
    }

    /// Phases held low for the whole stage.
    pub const fn grounded(self) -> [Phase; 2] {
        match self {
            AlignStage::PhaseA => [Phase::B, Phase::C],
            AlignStage::PhaseB => [Phase::A, Phase::C],
            AlignStage::PhaseC => [Phase::A, Phase::B],
        }
    }
}

/// Run all three stages, A then B then C. Every gate is off on return.
pub fn align<H>(hw: &mut H, config: &AlignConfig)
where
    H: PhaseDriver + TickTimer + CurrentSense,
{
    info!(
        "align: start ({} ticks/stage, ceiling {}A)",
        config.stage_ticks, config.current_ceiling
    );
    for stage in AlignStage::ALL {
        align_stage(hw, stage, config);
    }
    info!("align: complete");
}

/// Run one stage for `config.stage_ticks`.
///
/// # Returns
/// Last sampled current [A], `0.0` if the stage had no time to run
pub fn align_stage<H>(hw: &mut H, stage: AlignStage, config: &AlignConfig) -> f32
where
    H: PhaseDriver + TickTimer + CurrentSense,
{
    let driven = stage.driven();
    let ceiling = config.current_ceiling;

    hw.disable_all();
    for phase in stage.grounded() {
        hw.phase_low_hard_enable(phase);
    }

    let mut current = 0.0;
    hw.reset_ticks();
    while hw.elapsed_ticks() < config.stage_ticks {
        current = hw.read_current();
        if current < ceiling {
            hw.phase_high_enable(driven);
        } else if current > ceiling {
            hw.phase_high_disable(driven);
        }
    }

    hw.disable_all();
    debug!("align: stage {:?} done, last current {}A", stage, current);
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Event, GateCall, GateState, LowGate, SimBench};

    fn config(stage_ticks: u32) -> AlignConfig {
        AlignConfig {
            stage_ticks,
            current_ceiling: 4.0,
        }
    }

    /// Gate snapshots taken at each current read, split per stage.
    fn reads_per_stage(bench: &SimBench) -> Vec<Vec<[GateState; 3]>> {
        let mut stages: Vec<Vec<[GateState; 3]>> = Vec::new();
        for event in bench.events() {
            match event {
                Event::TimerReset => stages.push(Vec::new()),
                Event::CurrentRead { gates, .. } => {
                    if let Some(stage) = stages.last_mut() {
                        stage.push(*gates);
                    }
                }
                _ => {}
            }
        }
        stages
    }

    #[test]
    fn test_stage_roles() {
        for stage in AlignStage::ALL {
            let grounded = stage.grounded();
            assert!(!grounded.contains(&stage.driven()));
            assert_ne!(grounded[0], grounded[1]);
        }
        assert_eq!(
            AlignStage::ALL.map(AlignStage::driven),
            [Phase::A, Phase::B, Phase::C]
        );
    }

    #[test]
    fn test_low_current_holds_each_high_side_for_the_whole_stage() {
        let mut bench = SimBench::new().with_default_current(1.0);
        align(&mut bench, &config(50));

        let stages = reads_per_stage(&bench);
        assert_eq!(stages.len(), 3);
        for (stage, reads) in AlignStage::ALL.iter().zip(stages.iter()) {
            assert_eq!(reads.len(), 50);
            let driven = stage.driven().index();
            // The first read happens before the first decision.
            assert!(!reads[0][driven].high);
            for gates in &reads[1..] {
                assert!(gates[driven].high, "stage {:?}", stage);
                assert_eq!(gates[driven].low, LowGate::Off);
            }
            for gates in reads {
                for grounded in stage.grounded() {
                    assert_eq!(gates[grounded.index()], GateState { high: false, low: LowGate::Hard });
                }
            }
        }

        assert!(bench.all_gates_off());
        assert_eq!(bench.shoot_through_events(), 0);
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut bench = SimBench::new();
        align(&mut bench, &config(3));

        let driven: Vec<Phase> = bench
            .gate_calls()
            .iter()
            .filter_map(|call| match call {
                GateCall::HighEnable(phase) => Some(*phase),
                _ => None,
            })
            .collect();
        let mut order = driven.clone();
        order.dedup();
        assert_eq!(order, [Phase::A, Phase::B, Phase::C]);
        assert_eq!(driven.len(), 9);
    }

    #[test]
    fn test_bang_bang_against_ceiling() {
        let mut bench = SimBench::new();
        bench.script_currents([1.0, 9.0, 4.0, 2.0, 4.5]);

        let last = align_stage(&mut bench, AlignStage::PhaseB, &config(5));
        assert_eq!(last, 4.5);

        let highs: Vec<bool> = reads_per_stage(&bench)[0]
            .iter()
            .map(|gates| gates[Phase::B.index()].high)
            .collect();
        // below -> on, above -> off, equal -> unchanged, below -> on
        assert_eq!(highs, [false, true, false, false, true]);
        assert!(bench.all_gates_off());
    }

    #[test]
    fn test_stage_starts_and_ends_all_off() {
        let mut bench = SimBench::new();
        bench.set_hall_code(0b110);
        crate::commutation::commutate(&mut bench, &Default::default());
        assert!(!bench.all_gates_off());

        align_stage(&mut bench, AlignStage::PhaseC, &config(2));
        let calls = bench.gate_calls();
        // commutation (6), disable_all (6), two hard-ons, two high enables,
        // disable_all (6)
        assert_eq!(calls.len(), 22);
        assert!(calls[6..12].iter().all(|c| !c.is_enable()));
        assert_eq!(calls[12], GateCall::LowHardEnable(Phase::A));
        assert_eq!(calls[13], GateCall::LowHardEnable(Phase::B));
        assert!(calls[16..].iter().all(|c| !c.is_enable()));
        assert!(bench.all_gates_off());
        assert_eq!(bench.shoot_through_events(), 0);
    }

    #[test]
    fn test_zero_length_stage() {
        let mut bench = SimBench::new();
        assert_eq!(align_stage(&mut bench, AlignStage::PhaseA, &config(0)), 0.0);
        assert_eq!(bench.current_reads(), 0);
        assert!(bench.all_gates_off());
    }
}
