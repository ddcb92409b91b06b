//! Magnetic field level flags for MA730

use crate::register::MagneticFieldLevelRegister;

/// Magnetic field level flags from the `MGL/MGH` register (0x1B)
///
/// The flags compare the live field strength against the thresholds
/// configured in register 0x6 and are sampled fresh on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagneticFieldStatus {
    raw: u8,
}

impl MagneticFieldStatus {
    /// Create status flags from raw register value
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Get the raw register value
    #[must_use]
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// `MGH`: field strength above the high threshold
    ///
    /// The magnet may be too close to the sensor
    #[must_use]
    pub fn field_too_high(&self) -> bool {
        MagneticFieldLevelRegister(self.raw).mgh()
    }

    /// `MGL`: field strength below the low threshold
    ///
    /// The magnet may be too far from the sensor or missing
    #[must_use]
    pub fn field_too_low(&self) -> bool {
        MagneticFieldLevelRegister(self.raw).mgl()
    }

    /// Check if the magnetic field strength is within the configured window
    #[must_use]
    pub fn magnetic_field_ok(&self) -> bool {
        !self.field_too_high() && !self.field_too_low()
    }
}

impl From<u8> for MagneticFieldStatus {
    fn from(raw: u8) -> Self {
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_come_from_top_two_bits() {
        let status = MagneticFieldStatus::new(0b1000_0000);
        assert!(status.field_too_high());
        assert!(!status.field_too_low());

        let status = MagneticFieldStatus::new(0b0100_0000);
        assert!(!status.field_too_high());
        assert!(status.field_too_low());
    }

    #[test]
    fn low_bits_do_not_affect_status() {
        let status = MagneticFieldStatus::from(0b0011_1111);
        assert!(status.magnetic_field_ok());
        assert_eq!(status.raw(), 0x3F);
    }
}
