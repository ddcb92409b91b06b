//! Blocking driver for the MA730 magnetic position sensor

use embedded_hal::{
    delay::DelayNs,
    spi::{MODE_0, Mode, SpiDevice},
};

use crate::{
    angle::{AngleResolution, AngleSample},
    codec::{self, NOP_FRAME},
    config::{
        IndexLength, IndexPosition, MagneticFieldHighThreshold, MagneticFieldLowThreshold,
        PulsesPerTurn, RotationDirection,
    },
    diagnostics::MagneticFieldStatus,
    dump::RegisterDump,
    error::Error,
    register::{
        MagneticFieldThresholdRegister, Ppt0Register, REGISTER_DUMP_ORDER, Register,
        RotationDirectionRegister, TrimmingRegister, Volatility,
    },
};

/// SPI mode expected by the sensor (CPOL=0, CPHA=0)
pub const MODE: Mode = MODE_0;

/// Time the sensor needs after a nonvolatile write before it reads back reliably
pub const SETTLE_DELAY_MS: u32 = 20;

/// Register values written by [`Ma730::write_default_configuration`], in order
pub const DEFAULT_CONFIGURATION: [(Register, u8); 7] = [
    (Register::ZeroSetting0, 0x00),
    (Register::ZeroSetting1, 0x00),
    (Register::Bct, 0x00),
    (Register::Trimming, 0x00),
    (Register::Ppt0, 0xC0),
    (Register::Ppt1, 0xFF),
    (Register::RotationDirection, 0x00),
];

/// MA730 driver instance
///
/// Every accessor talks to the sensor; nothing is cached. Setters of fields
/// that share a register read the register first and write it back with only
/// their own bits changed. That sequence is not atomic, so a driver must not
/// be shared between contexts without a lock around it.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ma730<SPI, D> {
    spi: SPI,
    delay: D,
}

impl<SPI, D, E> Ma730<SPI, D>
where
    SPI: SpiDevice<u8, Error = E>,
    D: DelayNs,
{
    /// Create a new MA730 driver instance
    ///
    /// `delay` is only used to wait out [`SETTLE_DELAY_MS`] after writes.
    pub fn new(spi: SPI, delay: D) -> Self {
        Self { spi, delay }
    }

    /// Release the SPI device and delay, consuming the driver
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    /// Clock one 16-bit frame out and return the two bytes clocked in
    fn exchange(&mut self, frame: u16) -> Result<[u8; 2], Error<E>> {
        let tx = frame.to_be_bytes();
        let mut rx = [0u8; 2];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(Error::Communication)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Frame 0x{:04X} -> {}", frame, rx);

        Ok(rx)
    }

    /// Read a register from the MA730
    ///
    /// The sensor answers a read command on the following frame:
    /// - Transaction 1: Send read command, ignore response
    /// - Transaction 2: Send NOP, receive register value in the first byte
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn read_register(&mut self, register: Register) -> Result<u8, Error<E>> {
        self.read_register_raw(register.address())
    }

    /// Read a register by address; only the low five bits are used
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn read_register_raw(&mut self, address: u8) -> Result<u8, Error<E>> {
        self.exchange(codec::read_frame(address))?;
        let [value, _] = self.exchange(NOP_FRAME)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Register 0x{:02X} value: 0x{:02X}", address & 0x1F, value);

        Ok(value)
    }

    /// Write a register of the MA730
    ///
    /// This follows the write protocol:
    /// - Transaction 1: Send write command with the new value
    /// - Wait [`SETTLE_DELAY_MS`] if the register is nonvolatile
    /// - Transaction 2: Send NOP, receive the acknowledge byte
    ///
    /// The acknowledge byte is returned as is; it is not compared with
    /// `value`. Read the register back to confirm a write.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<u8, Error<E>> {
        self.write(register.address(), value, register.volatility())
    }

    /// Write a register by address; only the low five bits are used
    ///
    /// Unknown addresses are treated as nonvolatile.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn write_register_raw(&mut self, address: u8, value: u8) -> Result<u8, Error<E>> {
        let volatility =
            Register::from_address(address).map_or(Volatility::Nonvolatile, Register::volatility);
        self.write(address, value, volatility)
    }

    fn write(&mut self, address: u8, value: u8, volatility: Volatility) -> Result<u8, Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Writing 0x{:02X} to register 0x{:02X}", value, address & 0x1F);

        self.exchange(codec::write_frame(address, value))?;

        if volatility == Volatility::Nonvolatile {
            self.delay.delay_ms(SETTLE_DELAY_MS);
        }

        let [ack, _] = self.exchange(NOP_FRAME)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Write to register 0x{:02X} acknowledged with 0x{:02X}", address & 0x1F, ack);

        Ok(ack)
    }

    fn modify_register<R>(
        &mut self,
        register: Register,
        f: impl FnOnce(&mut u8) -> R,
    ) -> Result<R, Error<E>> {
        let mut data = self.read_register(register)?;

        let result = f(&mut data);

        self.write_register(register, data)?;

        Ok(result)
    }

    /// Get the 16-bit absolute angle
    ///
    /// Value ranges from 0 to 65535 (0° to 359.9945°). The angle is streamed
    /// on its own, without a command frame.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn angle(&mut self) -> Result<u16, Error<E>> {
        self.exchange(NOP_FRAME).map(u16::from_be_bytes)
    }

    /// Get the 8 most significant bits of the absolute angle
    ///
    /// Only one byte is clocked, which makes this the fastest read.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn angle8(&mut self) -> Result<u8, Error<E>> {
        let mut rx = [0u8; 1];
        self.spi
            .transfer(&mut rx, &[0x00])
            .map_err(Error::Communication)?;
        Ok(rx[0])
    }

    /// Read the angle at the given resolution
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn angle_sample(&mut self, resolution: AngleResolution) -> Result<AngleSample, Error<E>> {
        match resolution {
            AngleResolution::Bits16 => self.angle().map(AngleSample::from_raw16),
            AngleResolution::Bits8 => self.angle8().map(AngleSample::from_raw8),
        }
    }

    /// Get the absolute angle in degrees from a 16-bit read
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn angle_degrees(&mut self) -> Result<f32, Error<E>> {
        self.angle_sample(AngleResolution::Bits16)
            .map(|sample| sample.degrees())
    }

    /// Get the absolute angle in degrees from an 8-bit read
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn angle_degrees8(&mut self) -> Result<f32, Error<E>> {
        self.angle_sample(AngleResolution::Bits8)
            .map(|sample| sample.degrees())
    }

    /// Get the raw 16-bit zero setting
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn zero_position_raw(&mut self) -> Result<u16, Error<E>> {
        let low = self.read_register(Register::ZeroSetting0)?;
        let high = self.read_register(Register::ZeroSetting1)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Write the raw 16-bit zero setting, low byte first
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_zero_position_raw(&mut self, code: u16) -> Result<(), Error<E>> {
        let [low, high] = code.to_le_bytes();
        self.write_register(Register::ZeroSetting0, low)?;
        self.write_register(Register::ZeroSetting1, high)?;
        Ok(())
    }

    /// Get the mechanical angle, in degrees, that currently reads as zero
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn zero_position(&mut self) -> Result<f32, Error<E>> {
        self.zero_position_raw().map(codec::decode_zero_offset)
    }

    /// Make the mechanical angle `angle` (degrees) read as zero
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `angle` is not finite, or an error
    /// if SPI communication fails
    pub fn set_zero_position(&mut self, angle: f32) -> Result<(), Error<E>> {
        let Some(code) = codec::encode_zero_offset(angle) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejecting non-finite zero position");
            return Err(Error::InvalidValue);
        };
        self.set_zero_position_raw(code)
    }

    /// Get the bias current trimming value
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn bct(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::Bct)
    }

    /// Set the bias current trimming value
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_bct(&mut self, value: u8) -> Result<(), Error<E>> {
        self.write_register(Register::Bct, value).map(|_| ())
    }

    /// Get the trimming register (`ETX` and `ETY`)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn trimming(&mut self) -> Result<TrimmingRegister, Error<E>> {
        self.read_register(Register::Trimming).map(TrimmingRegister)
    }

    /// Whether trimming of the X axis is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn etx(&mut self) -> Result<bool, Error<E>> {
        self.trimming().map(|r| r.etx())
    }

    /// Whether trimming of the Y axis is enabled
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn ety(&mut self) -> Result<bool, Error<E>> {
        self.trimming().map(|r| r.ety())
    }

    /// Enable or disable trimming of the X axis, keeping `ETY`
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_etx(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.modify_register(Register::Trimming, |v| {
            let mut r = TrimmingRegister(*v);
            r.set_etx(enabled);
            *v = r.0;
        })
    }

    /// Enable or disable trimming of the Y axis, keeping `ETX`
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_ety(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.modify_register(Register::Trimming, |v| {
            let mut r = TrimmingRegister(*v);
            r.set_ety(enabled);
            *v = r.0;
        })
    }

    /// Get the incremental output pulses per revolution (1-1024)
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn pulses_per_turn(&mut self) -> Result<u16, Error<E>> {
        let low = self.read_register(Register::Ppt0).map(Ppt0Register)?;
        let high = self.read_register(Register::Ppt1)?;
        Ok(codec::decode_pulses_per_turn(low.ppt_low(), high))
    }

    /// Set the incremental output pulses per revolution
    ///
    /// The index length and position bits sharing register 0x4 are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if `ppr` is outside `1..=1024`, or an
    /// error if SPI communication fails
    pub fn set_pulses_per_turn(&mut self, ppr: u16) -> Result<(), Error<E>> {
        let Some(ppr) = PulsesPerTurn::new(ppr) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("Pulses per turn {} out of range", ppr);
            return Err(Error::InvalidValue);
        };
        let (low, high) = codec::encode_pulses_per_turn(ppr);

        self.modify_register(Register::Ppt0, |v| {
            let mut r = Ppt0Register(*v);
            r.set_ppt_low(low);
            *v = r.0;
        })?;
        self.write_register(Register::Ppt1, high)?;

        Ok(())
    }

    /// Get the index pulse length
    ///
    /// Only meaningful when the encoder is used in incremental mode.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn index_length(&mut self) -> Result<IndexLength, Error<E>> {
        self.read_register(Register::Ppt0)
            .map(|v| IndexLength::from_code(Ppt0Register(v).index_length()))
    }

    /// Set the index pulse length
    ///
    /// Only bits 4-5 change. The position code in bits 2-3 is kept as stored,
    /// and since it counts from the length code, the [`IndexPosition`] read
    /// back afterwards can differ.
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_index_length(&mut self, length: IndexLength) -> Result<(), Error<E>> {
        self.modify_register(Register::Ppt0, |v| {
            let mut r = Ppt0Register(*v);
            r.set_index_length(length.code());
            *v = r.0;
        })
    }

    /// Get the channel edge the index pulse is aligned with
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn index_position(&mut self) -> Result<IndexPosition, Error<E>> {
        let r = self.read_register(Register::Ppt0).map(Ppt0Register)?;
        Ok(IndexPosition::from_offset(codec::decode_index_position(
            r.index_length(),
            r.index_position(),
        )))
    }

    /// Set the channel edge the index pulse is aligned with
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_index_position(&mut self, position: IndexPosition) -> Result<(), Error<E>> {
        self.modify_register(Register::Ppt0, |v| {
            let mut r = Ppt0Register(*v);
            r.set_index_position(codec::encode_index_position(
                r.index_length(),
                position.offset(),
            ));
            *v = r.0;
        })
    }

    /// Get the magnetic field thresholds register
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn magnetic_field_thresholds(
        &mut self,
    ) -> Result<MagneticFieldThresholdRegister, Error<E>> {
        self.read_register(Register::MagneticFieldThreshold)
            .map(MagneticFieldThresholdRegister)
    }

    /// Get the magnetic field low threshold
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn magnetic_field_low_threshold(
        &mut self,
    ) -> Result<MagneticFieldLowThreshold, Error<E>> {
        self.magnetic_field_thresholds()
            .map(|r| MagneticFieldLowThreshold::from_code(r.mglt()))
    }

    /// Get the magnetic field high threshold
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn magnetic_field_high_threshold(
        &mut self,
    ) -> Result<MagneticFieldHighThreshold, Error<E>> {
        self.magnetic_field_thresholds()
            .map(|r| MagneticFieldHighThreshold::from_code(r.mght()))
    }

    /// Set the magnetic field low threshold, keeping the high threshold
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_magnetic_field_low_threshold(
        &mut self,
        threshold: MagneticFieldLowThreshold,
    ) -> Result<(), Error<E>> {
        self.modify_register(Register::MagneticFieldThreshold, |v| {
            let mut r = MagneticFieldThresholdRegister(*v);
            r.set_mglt(threshold.code());
            *v = r.0;
        })
    }

    /// Set the magnetic field high threshold, keeping the low threshold
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_magnetic_field_high_threshold(
        &mut self,
        threshold: MagneticFieldHighThreshold,
    ) -> Result<(), Error<E>> {
        self.modify_register(Register::MagneticFieldThreshold, |v| {
            let mut r = MagneticFieldThresholdRegister(*v);
            r.set_mght(threshold.code());
            *v = r.0;
        })
    }

    /// Get the rotation direction
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn rotation_direction(&mut self) -> Result<RotationDirection, Error<E>> {
        self.read_register(Register::RotationDirection)
            .map(|v| RotationDirection::from_bit(RotationDirectionRegister(v).rd()))
    }

    /// Set the rotation direction
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_rotation_direction(&mut self, direction: RotationDirection) -> Result<(), Error<E>> {
        self.modify_register(Register::RotationDirection, |v| {
            let mut r = RotationDirectionRegister(*v);
            r.set_rd(direction.bit());
            *v = r.0;
        })
    }

    /// Get the filter window setting
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn filter_window(&mut self) -> Result<u8, Error<E>> {
        self.read_register(Register::FilterWindow)
    }

    /// Set the filter window
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn set_filter_window(&mut self, window: u8) -> Result<(), Error<E>> {
        self.write_register(Register::FilterWindow, window)
            .map(|_| ())
    }

    /// Get the magnetic field level flags
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn magnetic_field_status(&mut self) -> Result<MagneticFieldStatus, Error<E>> {
        self.read_register(Register::MagneticFieldLevel)
            .map(MagneticFieldStatus::from)
    }

    /// Whether the field is below the low threshold
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn magnetic_field_low_level(&mut self) -> Result<bool, Error<E>> {
        self.magnetic_field_status().map(|s| s.field_too_low())
    }

    /// Whether the field is above the high threshold
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn magnetic_field_high_level(&mut self) -> Result<bool, Error<E>> {
        self.magnetic_field_status().map(|s| s.field_too_high())
    }

    /// Read the nine configuration and status registers in dump order
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails
    pub fn register_dump(&mut self) -> Result<RegisterDump, Error<E>> {
        let mut values = [0u8; REGISTER_DUMP_ORDER.len()];
        for (value, register) in values.iter_mut().zip(REGISTER_DUMP_ORDER) {
            *value = self.read_register(register)?;
        }
        Ok(RegisterDump::new(values))
    }

    /// Write [`DEFAULT_CONFIGURATION`] to the sensor
    ///
    /// Each write waits out the settle delay, so this blocks for at least
    /// seven times [`SETTLE_DELAY_MS`].
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication fails; registers written before
    /// the failure keep their new values
    pub fn write_default_configuration(&mut self) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::info!("Writing default configuration");

        for (register, value) in DEFAULT_CONFIGURATION {
            self.write_register(register, value)?;
        }
        Ok(())
    }
}
