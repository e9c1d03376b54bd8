// Electrical sector and open-loop sector stepping

/// Electrical sector (60° interval) selected from the Hall lines.
///
/// `Invalid` is what the decoder returns for a code that is not in the
/// table; `Disabled` is an explicit request for all-off. Both commutate to
/// the all-off pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sector {
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    Invalid,
    Disabled,
}

/// Rotation direction for forced stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}

impl Sector {
    /// The six valid sectors in commutation order.
    pub const VALID: [Sector; 6] = [
        Sector::S1,
        Sector::S2,
        Sector::S3,
        Sector::S4,
        Sector::S5,
        Sector::S6,
    ];

    /// Sector from its number. Anything outside 1..=6 is an all-off request.
    pub const fn from_number(number: u8) -> Self {
        match number {
            1 => Sector::S1,
            2 => Sector::S2,
            3 => Sector::S3,
            4 => Sector::S4,
            5 => Sector::S5,
            6 => Sector::S6,
            _ => Sector::Disabled,
        }
    }

    /// Sector number (1-6), `None` for `Invalid` and `Disabled`.
    pub const fn number(self) -> Option<u8> {
        match self {
            Sector::S1 => Some(1),
            Sector::S2 => Some(2),
            Sector::S3 => Some(3),
            Sector::S4 => Some(4),
            Sector::S5 => Some(5),
            Sector::S6 => Some(6),
            Sector::Invalid | Sector::Disabled => None,
        }
    }

    pub const fn is_valid(self) -> bool {
        self.number().is_some()
    }

    /// Next sector, 6 wraps to 1. `Invalid` and `Disabled` are returned as is.
    pub const fn increment(self) -> Self {
        match self {
            Sector::S1 => Sector::S2,
            Sector::S2 => Sector::S3,
            Sector::S3 => Sector::S4,
            Sector::S4 => Sector::S5,
            Sector::S5 => Sector::S6,
            Sector::S6 => Sector::S1,
            other => other,
        }
    }

    /// Previous sector, 1 wraps to 6. `Invalid` and `Disabled` are returned as is.
    pub const fn decrement(self) -> Self {
        match self {
            Sector::S1 => Sector::S6,
            Sector::S2 => Sector::S1,
            Sector::S3 => Sector::S2,
            Sector::S4 => Sector::S3,
            Sector::S5 => Sector::S4,
            Sector::S6 => Sector::S5,
            other => other,
        }
    }

    pub const fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Forward => self.increment(),
            Direction::Reverse => self.decrement(),
        }
    }
}
