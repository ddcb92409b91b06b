//! Absolute angle samples and their conversion to degrees.

/// Full scale of a 16-bit angle reading (one turn)
pub const ANGLE_MAX_16: u32 = 1 << 16;
/// Full scale of an 8-bit angle reading (one turn)
pub const ANGLE_MAX_8: u32 = 1 << 8;

/// Bit width an angle was read at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AngleResolution {
    /// One byte, ~1.4° per step
    Bits8,
    /// Two bytes, ~0.0055° per step
    Bits16,
}

impl AngleResolution {
    /// Number of bits in a raw reading
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            AngleResolution::Bits8 => 8,
            AngleResolution::Bits16 => 16,
        }
    }
}

/// One raw angle reading, tagged with the width it was read at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AngleSample {
    raw: u16,
    resolution: AngleResolution,
}

impl AngleSample {
    /// Sample from a full-resolution 16-bit reading
    #[must_use]
    pub const fn from_raw16(raw: u16) -> Self {
        Self {
            raw,
            resolution: AngleResolution::Bits16,
        }
    }

    /// Sample from a coarse 8-bit reading
    #[must_use]
    pub const fn from_raw8(raw: u8) -> Self {
        Self {
            raw: raw as u16,
            resolution: AngleResolution::Bits8,
        }
    }

    /// Raw angle code as read
    #[must_use]
    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Width the sample was read at
    #[must_use]
    pub const fn resolution(&self) -> AngleResolution {
        self.resolution
    }

    /// Angle in degrees, `0.0..360.0`
    #[must_use]
    pub fn degrees(&self) -> f32 {
        raw_angle_to_degrees(self.raw, self.resolution.bits())
    }
}

/// Convert a raw angle code of `bits` width to degrees.
///
/// `raw` must have been read at that width; a 16-bit code converted as an
/// 8-bit one gives a meaningless result.
#[must_use]
pub fn raw_angle_to_degrees(raw: u16, bits: u8) -> f32 {
    debug_assert!((1..=16).contains(&bits));
    #[allow(clippy::cast_precision_loss)]
    let full_scale = (1u32 << bits) as f32;
    f32::from(raw) * 360.0 / full_scale
}
