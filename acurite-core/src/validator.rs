//! Frame Validation
//!
//! ## Design Philosophy
//!
//! OOK receivers hear everything on 433.92 MHz: car keys, doorbells,
//! neighbours' weather stations, and plenty of noise that happens to land in
//! the pulse tolerance bands. The validator is the gate that keeps all of that
//! away from the registry. It is a pure function of the byte buffer.
//!
//! ## Check Order
//!
//! ```text
//! length bounds ──▶ checksum ──▶ layout length ──▶ parity ──▶ ValidFrame
//!   7..=10          sum(0..n-1)    type byte 2      bytes 2..n-2
//!                   == byte n-1    fixes length     even, bit 7 = parity
//! ```
//!
//! The checksum runs before anything that reads the type byte. A single
//! flipped bit anywhere in the frame, including the type byte or the
//! checksum itself, therefore always surfaces as a
//! [`DecodeError::ChecksumMismatch`]; parity and length only speak for frames
//! whose sum already adds up.
//!
//! Frames with an unknown message type pass validation when their sum and
//! parity hold. Naming the variant is the interpreter's job.

use crate::constants::protocol::{HEADER_LEN, MAX_FRAME_LEN, MIN_FRAME_LEN};
use crate::errors::{DecodeError, DecodeResult};
use crate::frame::{layout_for, Frame, ValidFrame};

/// Additive 8-bit checksum over `payload`
#[inline]
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Whether `byte` has an even number of set bits
#[inline]
pub const fn has_even_parity(byte: u8) -> bool {
    byte.count_ones() % 2 == 0
}

/// Validate a received buffer
///
/// # Example
///
/// ```rust
/// use acurite_core::validate_frame;
///
/// let valid = validate_frame(&[0xDA, 0x2B, 0x44, 0xAF, 0x09, 0x53, 0x54]).unwrap();
/// assert_eq!(valid.message_type(), 0x04);
/// ```
pub fn validate_frame(bytes: &[u8]) -> DecodeResult<ValidFrame> {
    Frame::from_slice(bytes)?.validate()
}

impl Frame {
    /// Run the checks in order, consuming the candidate
    pub fn validate(self) -> DecodeResult<ValidFrame> {
        let bytes = self.as_bytes();
        let len = bytes.len();

        if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&len) {
            return Err(DecodeError::UnknownLength { len: len as u8 });
        }

        let (payload, received) = bytes.split_at(len - 1);
        let computed = checksum(payload);
        if computed != received[0] {
            return Err(DecodeError::ChecksumMismatch { computed, received: received[0] });
        }

        let layout = layout_for(bytes[2]);
        if let Some(layout) = layout {
            if layout.len != len {
                return Err(DecodeError::UnknownLength { len: len as u8 });
            }
        }
        let exempt = layout.and_then(|l| l.parity_exempt);

        for (index, byte) in payload.iter().enumerate().skip(HEADER_LEN - 1) {
            if Some(index) == exempt {
                continue;
            }
            if !has_even_parity(*byte) {
                return Err(DecodeError::ParityMismatch { index: index as u8 });
            }
        }

        Ok(ValidFrame::new(self))
    }
}

/// Set parity bits and the checksum of a frame in place
///
/// Bit 7 of each parity-protected byte is overwritten so the byte has even
/// parity, then the last byte is set to the sum of the others. This is what a
/// transmitter does before keying the carrier; test benches and replay tools
/// use it to turn field values into a frame the decoder accepts.
pub fn seal_frame(bytes: &mut [u8]) {
    let len = bytes.len();
    if len == 0 {
        return;
    }
    let exempt = bytes.get(2).and_then(|t| layout_for(*t)).and_then(|l| l.parity_exempt);

    for index in (HEADER_LEN - 1)..len.saturating_sub(1) {
        if Some(index) == exempt {
            continue;
        }
        let data = bytes[index] & 0x7F;
        bytes[index] = if has_even_parity(data) { data } else { data | 0x80 };
    }

    let sum = checksum(&bytes[..len - 1]);
    bytes[len - 1] = sum;
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWER: [u8; 7] = [0xDA, 0x2B, 0x44, 0xAF, 0x09, 0x53, 0x54];

    #[test]
    fn accepts_tower_frame() {
        let valid = validate_frame(&TOWER).unwrap();
        assert_eq!(valid.as_bytes(), &TOWER);
        assert_eq!(valid.layout().map(|l| l.len), Some(7));
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut frame = TOWER;
        frame[6] = 0x55;
        assert_eq!(
            validate_frame(&frame),
            Err(DecodeError::ChecksumMismatch { computed: 0x54, received: 0x55 })
        );
    }

    #[test]
    fn rejects_bad_parity_with_good_sum() {
        let mut frame = TOWER;
        frame[3] = 0x2F;
        frame[6] = 0xD4;
        assert_eq!(validate_frame(&frame), Err(DecodeError::ParityMismatch { index: 3 }));
    }

    #[test]
    fn rejects_out_of_bounds_lengths() {
        assert_eq!(validate_frame(&TOWER[..5]), Err(DecodeError::UnknownLength { len: 5 }));
        assert_eq!(validate_frame(&[]), Err(DecodeError::UnknownLength { len: 0 }));
    }

    #[test]
    fn rejects_length_that_disagrees_with_type() {
        let mut frame = [0xDA, 0x2B, 0x44, 0x2F, 0x09, 0x53, 0x00, 0x00];
        seal_frame(&mut frame);
        assert_eq!(validate_frame(&frame), Err(DecodeError::UnknownLength { len: 8 }));
    }

    #[test]
    fn unknown_type_passes_to_interpreter() {
        let mut frame = [0xDA, 0x2B, 0x7F, 0x00, 0x00, 0x00, 0x00];
        seal_frame(&mut frame);
        assert_eq!(validate_frame(&frame).map(|v| v.message_type()), Ok(0x3F));
    }

    #[test]
    fn exempt_byte_keeps_its_top_bit() {
        // Notos, byte 6 carries an odd data byte
        let mut frame = [0xDA, 0x2B, 0x60, 0x2F, 0x09, 0x53, 0x81, 0x00];
        seal_frame(&mut frame);
        assert_eq!(frame[6], 0x81);
        assert!(validate_frame(&frame).is_ok());
    }

    #[test]
    fn sealing_reproduces_known_frame() {
        let mut frame = TOWER;
        frame[6] = 0;
        seal_frame(&mut frame);
        assert_eq!(frame, TOWER);
    }
}
