//! Snapshot of the MA730 configuration registers.

use crate::{
    codec,
    config::{IndexLength, IndexPosition, OutputMode},
    register::{Ppt0Register, REGISTER_DUMP_ORDER, Register},
};

/// Values of the nine dumped registers, in [`REGISTER_DUMP_ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDump {
    values: [u8; REGISTER_DUMP_ORDER.len()],
}

/// Meaning of register 0x4 under a given output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ppt0Contents {
    Absolute {
        /// Two least significant bits of `PPR - 1`
        ppt_low: u8,
    },
    Incremental {
        ppt_low: u8,
        index_length: IndexLength,
        index_position: IndexPosition,
    },
}

impl Ppt0Contents {
    /// Interpret a raw register 0x4 byte for `mode`
    #[must_use]
    pub fn decode(mode: OutputMode, raw: u8) -> Self {
        let reg = Ppt0Register(raw);
        match mode {
            OutputMode::Absolute => Ppt0Contents::Absolute {
                ppt_low: reg.ppt_low(),
            },
            OutputMode::Incremental => Ppt0Contents::Incremental {
                ppt_low: reg.ppt_low(),
                index_length: IndexLength::from_code(reg.index_length()),
                index_position: IndexPosition::from_offset(codec::decode_index_position(
                    reg.index_length(),
                    reg.index_position(),
                )),
            },
        }
    }
}

impl RegisterDump {
    /// Dump from values listed in [`REGISTER_DUMP_ORDER`]
    #[must_use]
    pub const fn new(values: [u8; REGISTER_DUMP_ORDER.len()]) -> Self {
        Self { values }
    }

    /// Raw values in dump order
    #[must_use]
    pub const fn values(&self) -> &[u8; REGISTER_DUMP_ORDER.len()] {
        &self.values
    }

    /// Value of `register`, or `None` if it is not part of the dump
    #[must_use]
    pub fn get(&self, register: Register) -> Option<u8> {
        REGISTER_DUMP_ORDER
            .iter()
            .position(|&r| r == register)
            .map(|i| self.values[i])
    }

    /// `(register, value)` pairs in dump order
    pub fn iter(&self) -> impl Iterator<Item = (Register, u8)> + '_ {
        REGISTER_DUMP_ORDER.iter().copied().zip(self.values.iter().copied())
    }

    /// Register 0x4 interpreted for the output mode the caller is using
    #[must_use]
    pub fn ppt0(&self, mode: OutputMode) -> Ppt0Contents {
        Ppt0Contents::decode(mode, self.values[4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_register() {
        let dump = RegisterDump::new([0, 1, 2, 3, 4, 5, 6, 9, 0x1B]);
        assert_eq!(dump.get(Register::RotationDirection), Some(9));
        assert_eq!(dump.get(Register::MagneticFieldLevel), Some(0x1B));
        assert_eq!(dump.get(Register::FilterWindow), None);
    }

    #[test]
    fn iter_follows_dump_order() {
        let dump = RegisterDump::new([0xAA; 9]);
        let mut registers = dump.iter().map(|(r, _)| r);
        assert_eq!(registers.next(), Some(Register::ZeroSetting0));
        assert_eq!(registers.last(), Some(Register::MagneticFieldLevel));
    }

    #[test]
    fn ppt0_depends_on_mode() {
        // ppt_low 3, length code 2, stored position code 1
        let raw = 0b1110_0100;

        assert_eq!(
            Ppt0Contents::decode(OutputMode::Absolute, raw),
            Ppt0Contents::Absolute { ppt_low: 3 }
        );
        assert_eq!(
            Ppt0Contents::decode(OutputMode::Incremental, raw),
            Ppt0Contents::Incremental {
                ppt_low: 3,
                index_length: IndexLength::OneAndHalf,
                index_position: IndexPosition::AFalling,
            }
        );
    }
}
