//! Typed values for the MA730 configuration fields.

/// Highest pulses-per-turn value the 10-bit PPT field can hold
pub const PPR_MAX: u16 = 1024;

/// Incremental output pulses per revolution (1..=1024)
///
/// Counts per revolution are four times this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulsesPerTurn(u16);

impl PulsesPerTurn {
    /// Returns `None` when `ppr` is outside `1..=1024`
    #[must_use]
    pub const fn new(ppr: u16) -> Option<Self> {
        if ppr >= 1 && ppr <= PPR_MAX {
            Some(Self(ppr))
        } else {
            None
        }
    }

    /// Pulses per revolution
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Length of the index pulse, in multiples of an A/B pulse width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IndexLength {
    Half = 0,
    One = 1,
    OneAndHalf = 2,
    Two = 3,
}

impl IndexLength {
    /// Map a pulse-width multiple (0.5, 1.0, 1.5 or 2.0) to an index length.
    ///
    /// The code is `round(length * 2) - 1`; a code outside 0..=3 or a
    /// non-finite length falls back to [`IndexLength::Half`].
    #[must_use]
    pub fn from_pulse_widths(length: f32) -> Self {
        let doubled = length * 2.0;
        // round half away from zero; casts saturate for huge values
        #[allow(clippy::cast_possible_truncation)]
        let rounded = if doubled >= 0.0 {
            (doubled + 0.5) as i32
        } else {
            -((0.5 - doubled) as i32)
        };
        match rounded.checked_sub(1) {
            Some(code @ 0..=3) if doubled.is_finite() => {
                #[allow(clippy::cast_sign_loss)]
                let code = code as u8;
                Self::from_code(code)
            }
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Index length {} out of range, using 0.5", length);
                IndexLength::Half
            }
        }
    }

    /// Decode a 2-bit length code; only the low two bits are used
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code & 0x3 {
            0 => IndexLength::Half,
            1 => IndexLength::One,
            2 => IndexLength::OneAndHalf,
            _ => IndexLength::Two,
        }
    }

    /// 2-bit length code as stored in register 0x4
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Length as a multiple of the A/B pulse width
    #[must_use]
    pub fn pulse_widths(self) -> f32 {
        f32::from(self.code() + 1) * 0.5
    }
}

/// Edge of the A/B channels the index pulse rising edge is aligned with
///
/// The discriminants are the relative offsets accepted by the position codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IndexPosition {
    /// Aligned with the channel B falling edge
    BFalling = 0,
    /// Aligned with the channel A rising edge
    ARising = 1,
    /// Aligned with the channel B rising edge
    BRising = 2,
    /// Aligned with the channel A falling edge
    AFalling = 3,
}

impl IndexPosition {
    /// Position for a relative offset; only the low two bits are used
    #[must_use]
    pub const fn from_offset(offset: u8) -> Self {
        match offset & 0x3 {
            0 => IndexPosition::BFalling,
            1 => IndexPosition::ARising,
            2 => IndexPosition::BRising,
            _ => IndexPosition::AFalling,
        }
    }

    /// Offset from the index length code
    #[must_use]
    pub const fn offset(self) -> u8 {
        self as u8
    }
}

macro_rules! threshold_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $code:literal => $mt:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[repr(u8)]
        pub enum $name {
            $(
                #[doc = concat!(stringify!($mt), " mT")]
                $variant = $code,
            )+
        }

        impl $name {
            /// Decode a 3-bit threshold code; only the low three bits are used
            #[must_use]
            pub const fn from_code(code: u8) -> Self {
                match code & 0x7 {
                    $($code => $name::$variant,)+
                    _ => unreachable!(),
                }
            }

            /// 3-bit threshold code as stored in register 0x6
            #[must_use]
            pub const fn code(self) -> u8 {
                self as u8
            }

            /// Threshold field strength in millitesla
            #[must_use]
            pub const fn millitesla(self) -> u8 {
                match self {
                    $($name::$variant => $mt,)+
                }
            }
        }
    };
}

threshold_enum! {
    /// Field strength below which the MGL flag is raised
    MagneticFieldLowThreshold {
        Mt26 = 0 => 26,
        Mt41 = 1 => 41,
        Mt56 = 2 => 56,
        Mt70 = 3 => 70,
        Mt84 = 4 => 84,
        Mt98 = 5 => 98,
        Mt112 = 6 => 112,
        Mt126 = 7 => 126,
    }
}

threshold_enum! {
    /// Field strength above which the MGH flag is raised
    MagneticFieldHighThreshold {
        Mt20 = 0 => 20,
        Mt35 = 1 => 35,
        Mt50 = 2 => 50,
        Mt64 = 3 => 64,
        Mt78 = 4 => 78,
        Mt92 = 5 => 92,
        Mt106 = 6 => 106,
        Mt120 = 7 => 120,
    }
}

/// Sense of rotation that increases the reported angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Direction for the `RD` bit of register 0x9
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            RotationDirection::CounterClockwise
        } else {
            RotationDirection::Clockwise
        }
    }

    /// Value of the `RD` bit for this direction
    #[must_use]
    pub const fn bit(self) -> bool {
        matches!(self, RotationDirection::CounterClockwise)
    }
}

/// Output mode the caller has configured the encoder for
///
/// The chip does not report this, so it selects how bits 2-5 of register
/// 0x4 are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// Only the absolute angle is used; bits 2-5 of 0x4 carry no meaning
    Absolute,
    /// ABZ incremental output; bits 2-5 of 0x4 shape the index pulse
    Incremental,
}
