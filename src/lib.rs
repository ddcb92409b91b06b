#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod angle;
pub mod codec;
mod config;
mod diagnostics;
mod driver;
mod dump;
mod error;
pub mod register;

pub use angle::{ANGLE_MAX_8, ANGLE_MAX_16, AngleResolution, AngleSample, raw_angle_to_degrees};
pub use config::{
    IndexLength, IndexPosition, MagneticFieldHighThreshold, MagneticFieldLowThreshold,
    OutputMode, PPR_MAX, PulsesPerTurn, RotationDirection,
};
pub use diagnostics::MagneticFieldStatus;
pub use driver::{DEFAULT_CONFIGURATION, MODE, Ma730, SETTLE_DELAY_MS};
pub use dump::{Ppt0Contents, RegisterDump};
pub use error::Error;
pub use register::{REGISTER_DUMP_ORDER, Register, Volatility};
