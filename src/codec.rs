//! Frame construction and field arithmetic for the MA730 command protocol.

use crate::config::PulsesPerTurn;

/// 3-bit command opcodes, placed in the top bits of a frame
pub const OPCODE_NOP: u8 = 0b000;
pub const OPCODE_READ: u8 = 0b010;
pub const OPCODE_WRITE: u8 = 0b100;

const ADDRESS_MASK: u8 = 0x1F;
const ZERO_FULL_SCALE: f32 = 65536.0;

const fn command(opcode: u8, address: u8, data: u8) -> u16 {
    ((opcode as u16) << 13) | (((address & ADDRESS_MASK) as u16) << 8) | data as u16
}

/// Frame clocked out to fetch a pending response or stream the angle
pub const NOP_FRAME: u16 = command(OPCODE_NOP, 0x00, 0x00);

/// Build the command frame that starts a register read
#[must_use]
pub fn read_frame(address: u8) -> u16 {
    command(OPCODE_READ, address, 0x00)
}

/// Build the frame that writes `value` to a register
#[must_use]
pub fn write_frame(address: u8, value: u8) -> u16 {
    command(OPCODE_WRITE, address, value)
}

/// Split a pulses-per-turn value into the PPT0 bits 6-7 code and the PPT1 byte.
///
/// The chip stores `PPR - 1` across both registers.
#[must_use]
pub fn encode_pulses_per_turn(ppr: PulsesPerTurn) -> (u8, u8) {
    let value = ppr.get() - 1;
    #[allow(clippy::cast_possible_truncation)]
    let (low, high) = ((value & 0x3) as u8, (value >> 2) as u8);
    (low, high)
}

/// Join the two PPT pieces back into pulses per turn
#[must_use]
pub fn decode_pulses_per_turn(low: u8, high: u8) -> u16 {
    ((u16::from(high) << 2) | u16::from(low & 0x3)) + 1
}

/// Position code to store for a relative index position.
///
/// The chip counts the index position from the current index length code,
/// wrapping within two bits.
#[must_use]
pub const fn encode_index_position(length_code: u8, offset: u8) -> u8 {
    (length_code.wrapping_add(offset)) & 0x3
}

/// Recover the relative index position from the stored codes
#[must_use]
pub const fn decode_index_position(length_code: u8, position_code: u8) -> u8 {
    let length_code = length_code & 0x3;
    let mut position_code = position_code & 0x3;
    if position_code < length_code {
        position_code |= 0x4;
    }
    (position_code - length_code) & 0x3
}

/// Zero setting code for a mechanical angle in degrees.
///
/// Angles are taken modulo 360. Returns `None` for NaN or infinite input.
#[must_use]
pub fn encode_zero_offset(angle: f32) -> Option<u16> {
    if !angle.is_finite() {
        return None;
    }
    let mut angle = angle % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    let scaled = ZERO_FULL_SCALE * (1.0 - angle / 360.0);
    // scaled lies in (0, 65536]; 65536 wraps to a zero code
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let code = ((scaled + 0.5) as u32 & 0xFFFF) as u16;
    Some(code)
}

/// Zero position in degrees for a stored zero setting code
#[must_use]
pub fn decode_zero_offset(code: u16) -> f32 {
    let remaining = (0x1_0000 - u32::from(code)) & 0xFFFF;
    #[allow(clippy::cast_precision_loss)]
    let degrees = remaining as f32 * 360.0 / ZERO_FULL_SCALE;
    degrees
}
