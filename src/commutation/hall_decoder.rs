// Hall sensor decoding: raw 3-bit code -> electrical sector

use super::Sector;
use crate::config::DEFAULT_HALL_CODES;
use crate::error::ConfigError;
use crate::motor_driver::HallInputs;

/// Bits of the raw code that carry sensor state.
pub const HALL_CODE_MASK: u8 = 0b111;

/// Hall code for each sector, index 0 is sector 1.
///
/// Built for one specific sensor wiring. Lookup is by exact equality: a
/// glitched or miswired code decodes to [`Sector::Invalid`], never to a
/// neighbouring sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HallTable {
    codes: [u8; 6],
}

impl HallTable {
    /// Table for the reference wiring (code = C<<2 | B<<1 | A).
    pub const DEFAULT: HallTable = HallTable {
        codes: DEFAULT_HALL_CODES,
    };

    /// Validated table for a custom wiring.
    ///
    /// Each code must fit the three sensor bits, must not be one of the two
    /// glitch codes (all low / all high) and must be unique.
    pub fn new(codes: [u8; 6]) -> Result<Self, ConfigError> {
        for (i, &code) in codes.iter().enumerate() {
            if code & !HALL_CODE_MASK != 0 {
                return Err(ConfigError::HallCodeOutOfRange { code });
            }
            if code == 0 || code == HALL_CODE_MASK {
                return Err(ConfigError::HallGlitchCode { code });
            }
            if codes[..i].contains(&code) {
                return Err(ConfigError::DuplicateHallCode { code });
            }
        }
        Ok(Self { codes })
    }

    pub fn codes(&self) -> &[u8; 6] {
        &self.codes
    }

    /// Sector for a raw code. Bits above the sensor lines are ignored.
    pub fn decode(&self, raw: u8) -> Sector {
        let code = raw & HALL_CODE_MASK;
        self.codes
            .iter()
            .position(|&entry| entry == code)
            .map_or(Sector::Invalid, |i| Sector::from_number(i as u8 + 1))
    }

    /// Hall code a healthy sensor reports inside `sector`.
    pub fn code_for(&self, sector: Sector) -> Option<u8> {
        sector.number().map(|n| self.codes[n as usize - 1])
    }
}

impl Default for HallTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Read the Hall lines and decode the current sector.
///
/// No side effects, no blocking; safe from interrupt context.
#[inline]
pub fn decode_sector<H: HallInputs>(hall: &mut H, table: &HallTable) -> Sector {
    table.decode(hall.hall_lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert_eq!(HallTable::new(DEFAULT_HALL_CODES), Ok(HallTable::DEFAULT));
    }

    #[test]
    fn test_table_is_a_bijection() {
        let table = HallTable::DEFAULT;
        let mut hits = [0u8; 6];
        for code in 0u8..8 {
            if let Some(n) = table.decode(code).number() {
                hits[n as usize - 1] += 1;
            }
        }
        assert_eq!(hits, [1; 6]);
    }

    #[test]
    fn test_reference_wiring() {
        let table = HallTable::DEFAULT;
        assert_eq!(table.decode(0b110), Sector::S1);
        assert_eq!(table.decode(0b100), Sector::S2);
        assert_eq!(table.decode(0b101), Sector::S3);
        assert_eq!(table.decode(0b001), Sector::S4);
        assert_eq!(table.decode(0b011), Sector::S5);
        assert_eq!(table.decode(0b010), Sector::S6);
    }

    #[test]
    fn test_glitch_codes_are_invalid() {
        let table = HallTable::DEFAULT;
        assert_eq!(table.decode(0b000), Sector::Invalid);
        assert_eq!(table.decode(0b111), Sector::Invalid);
    }

    #[test]
    fn test_unrelated_bits_are_masked() {
        let table = HallTable::DEFAULT;
        assert_eq!(table.decode(0b1111_0110), Sector::S1);
        assert_eq!(table.decode(0b1000_0000), Sector::Invalid);
    }

    #[test]
    fn test_code_for_inverts_decode() {
        let table = HallTable::DEFAULT;
        for sector in Sector::VALID {
            let code = table.code_for(sector).unwrap();
            assert_eq!(table.decode(code), sector);
        }
        assert_eq!(table.code_for(Sector::Invalid), None);
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(
            HallTable::new([1, 2, 3, 4, 5, 5]),
            Err(ConfigError::DuplicateHallCode { code: 5 })
        );
        assert_eq!(
            HallTable::new([1, 2, 3, 4, 5, 7]),
            Err(ConfigError::HallGlitchCode { code: 7 })
        );
        assert_eq!(
            HallTable::new([0, 2, 3, 4, 5, 6]),
            Err(ConfigError::HallGlitchCode { code: 0 })
        );
        assert_eq!(
            HallTable::new([1, 2, 3, 4, 5, 0b1001]),
            Err(ConfigError::HallCodeOutOfRange { code: 0b1001 })
        );
    }
}
