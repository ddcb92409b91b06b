//! Register addresses and bit layouts for the MA730 sensor.

/// Register addresses for MA730
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Zero setting, low byte
    ZeroSetting0 = 0x00,
    /// Zero setting, high byte
    ZeroSetting1 = 0x01,
    /// Bias current trimming
    Bct = 0x02,
    /// Enable trimming of the X/Y axis
    Trimming = 0x03,
    /// Pulses per turn (bits 6-7) shared with index length/position (bits 2-5)
    Ppt0 = 0x04,
    /// Pulses per turn, high byte
    Ppt1 = 0x05,
    /// Magnetic field low/high thresholds
    MagneticFieldThreshold = 0x06,
    /// Rotation direction
    RotationDirection = 0x09,
    /// Filter window
    FilterWindow = 0x0E,
    /// Magnetic field level flags (read-only)
    MagneticFieldLevel = 0x1B,
}

/// Registers read by a register dump, in dump order
pub const REGISTER_DUMP_ORDER: [Register; 9] = [
    Register::ZeroSetting0,
    Register::ZeroSetting1,
    Register::Bct,
    Register::Trimming,
    Register::Ppt0,
    Register::Ppt1,
    Register::MagneticFieldThreshold,
    Register::RotationDirection,
    Register::MagneticFieldLevel,
];

/// Whether a register is backed by nonvolatile memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Volatility {
    /// Sampled live by the chip, no settle time after access
    Volatile,
    /// Stored in NVM, needs the settle delay after a write
    Nonvolatile,
}

impl Register {
    /// 5-bit register address
    #[must_use]
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// Whether writes to this register need the settle delay
    #[must_use]
    pub const fn volatility(self) -> Volatility {
        match self {
            Register::MagneticFieldLevel => Volatility::Volatile,
            _ => Volatility::Nonvolatile,
        }
    }

    /// Look up a register by its address
    #[must_use]
    pub const fn from_address(address: u8) -> Option<Self> {
        match address & 0x1F {
            0x00 => Some(Register::ZeroSetting0),
            0x01 => Some(Register::ZeroSetting1),
            0x02 => Some(Register::Bct),
            0x03 => Some(Register::Trimming),
            0x04 => Some(Register::Ppt0),
            0x05 => Some(Register::Ppt1),
            0x06 => Some(Register::MagneticFieldThreshold),
            0x09 => Some(Register::RotationDirection),
            0x0E => Some(Register::FilterWindow),
            0x1B => Some(Register::MagneticFieldLevel),
            _ => None,
        }
    }
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

bitfield::bitfield! {
    /// TRIMMING (0x3)
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct TrimmingRegister(u8);
    impl Debug;
    /// Enable trimming of the Y axis
    pub ety, set_ety: 1;
    /// Enable trimming of the X axis
    pub etx, set_etx: 0;
}

bitfield::bitfield! {
    /// PPT0 / ILIP (0x4)
    ///
    /// In incremental mode bits 2-5 carry the index pulse shape; bits 6-7 are
    /// always the two least significant bits of the pulses-per-turn code.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Ppt0Register(u8);
    impl Debug;
    u8;
    /// Two least significant bits of `PPR - 1`
    pub ppt_low, set_ppt_low: 7, 6;
    /// Index length code
    pub index_length, set_index_length: 5, 4;
    /// Index position code, stored relative to the index length code
    pub index_position, set_index_position: 3, 2;
}

bitfield::bitfield! {
    /// MGLT / MGHT (0x6)
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct MagneticFieldThresholdRegister(u8);
    impl Debug;
    u8;
    /// Magnetic field low threshold code
    pub mglt, set_mglt: 7, 5;
    /// Magnetic field high threshold code
    pub mght, set_mght: 4, 2;
}

bitfield::bitfield! {
    /// RD (0x9)
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct RotationDirectionRegister(u8);
    impl Debug;
    /// Rotation direction
    ///
    /// - `0` = clockwise increases the angle
    /// - `1` = counter-clockwise increases the angle
    pub rd, set_rd: 7;
}

bitfield::bitfield! {
    /// MGL / MGH (0x1B)
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct MagneticFieldLevelRegister(u8);
    impl Debug;
    /// Field is above the high threshold
    pub mgh, _: 7;
    /// Field is below the low threshold
    pub mgl, _: 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_order_is_fixed() {
        let addresses = REGISTER_DUMP_ORDER.map(Register::address);
        assert_eq!(addresses, [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x09, 0x1B]);
    }

    #[test]
    fn only_level_register_is_volatile() {
        assert_eq!(Register::MagneticFieldLevel.volatility(), Volatility::Volatile);
        assert_eq!(Register::FilterWindow.volatility(), Volatility::Nonvolatile);
        assert_eq!(Register::ZeroSetting0.volatility(), Volatility::Nonvolatile);
    }

    #[test]
    fn address_lookup_masks_to_five_bits() {
        assert_eq!(Register::from_address(0x1B), Some(Register::MagneticFieldLevel));
        assert_eq!(Register::from_address(0x20 | 0x09), Some(Register::RotationDirection));
        assert_eq!(Register::from_address(0x07), None);
    }

    #[test]
    fn threshold_fields_decode_from_byte() {
        let reg = MagneticFieldThresholdRegister(0b1010_0100);
        assert_eq!(reg.mglt(), 5);
        assert_eq!(reg.mght(), 1);
    }

    #[test]
    fn threshold_fields_leave_other_bits_alone() {
        let mut reg = MagneticFieldThresholdRegister(0b0000_0011);
        reg.set_mglt(5);
        reg.set_mght(1);
        assert_eq!(reg.0, 0b1010_0111);

        reg.set_mght(0);
        assert_eq!(reg.0, 0b1010_0011);
    }

    #[test]
    fn ppt0_fields_are_independent() {
        let mut reg = Ppt0Register(0);
        reg.set_index_length(2);
        reg.set_index_position(1);
        reg.set_ppt_low(3);
        assert_eq!(reg.0, 0b1110_0100);

        reg.set_ppt_low(0);
        assert_eq!(reg.index_length(), 2);
        assert_eq!(reg.index_position(), 1);
    }

    #[test]
    fn trimming_bits() {
        let mut reg = TrimmingRegister(0);
        reg.set_ety(true);
        assert!(!reg.etx());
        reg.set_etx(true);
        reg.set_ety(false);
        assert_eq!(reg.0, 0b01);
    }
}
