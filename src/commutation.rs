//! Hall-sensored six-step commutation
//!
//! - [`sector`]: electrical sectors and open-loop stepping
//! - [`hall_decoder`]: raw Hall code to sector
//! - [`six_step`]: sector to gate states

pub mod hall_decoder;
pub mod sector;
pub mod six_step;

pub use hall_decoder::{decode_sector, HallTable, HALL_CODE_MASK};
pub use sector::{Direction, Sector};
pub use six_step::{apply, disable, energize_phase, force_step, CommutationPattern, Leg};

use crate::motor_driver::{HallInputs, PhaseDriver};

/// Periodic commutation update: read the Hall lines and drive the matching
/// pattern.
///
/// Lock-free and allocation-free, meant to run from the Hall-edge or
/// fixed-rate interrupt. An invalid code opens every switch; the next valid
/// read restores drive without any latched state.
#[inline]
pub fn commutate<H>(hw: &mut H, table: &HallTable) -> Sector
where
    H: HallInputs + PhaseDriver,
{
    let sector = decode_sector(hw, table);
    apply(hw, sector);
    sector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBench;

    #[test]
    fn test_commutate_follows_hall_code() {
        let mut bench = SimBench::new();
        let table = HallTable::DEFAULT;
        for sector in Sector::VALID {
            bench.set_hall_code(table.code_for(sector).unwrap());
            assert_eq!(commutate(&mut bench, &table), sector);
            assert_eq!(bench.pattern(), CommutationPattern::for_sector(sector));
        }
        assert_eq!(bench.shoot_through_events(), 0);
    }

    #[test]
    fn test_glitch_opens_all_switches_then_recovers() {
        let mut bench = SimBench::new();
        let table = HallTable::DEFAULT;

        bench.set_hall_code(0b110);
        assert_eq!(commutate(&mut bench, &table), Sector::S1);

        bench.set_hall_code(0b111);
        assert_eq!(commutate(&mut bench, &table), Sector::Invalid);
        assert!(bench.all_gates_off());

        bench.set_hall_code(0b100);
        assert_eq!(commutate(&mut bench, &table), Sector::S2);
        assert_eq!(bench.pattern(), CommutationPattern::for_sector(Sector::S2));
    }

    #[test]
    fn test_custom_wiring() {
        // Sensors B and C swapped relative to the reference harness.
        let table = HallTable::new([0b101, 0b100, 0b110, 0b010, 0b011, 0b001]).unwrap();
        let mut bench = SimBench::new();
        bench.set_hall_code(0b110);
        assert_eq!(commutate(&mut bench, &table), Sector::S3);
    }
}
