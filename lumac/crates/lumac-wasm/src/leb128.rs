//! LEB128 variable-length integer encoding.
//!
//! WASM uses unsigned LEB128 for counts, lengths, and indices, and signed
//! LEB128 for `i32.const`/`i64.const` operands. Both emit seven bits per
//! byte, low bits first, with the high bit set on every byte except the
//! last. The variants differ only in the terminal-byte condition:
//!
//! - unsigned: stop when the remaining value is zero;
//! - signed: stop when the remaining value is 0 with bit 6 clear, or -1
//!   with bit 6 set (bit 6 of the last byte is the sign).

use crate::error::{DecodeError, Result};

/// Append the unsigned LEB128 encoding of `value` to `buf`.
pub fn write_unsigned(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Append the signed LEB128 encoding of `value` to `buf`.
pub fn write_signed(buf: &mut Vec<u8>, mut value: i64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        let done = (value == 0 && byte & 0x40 == 0) || (value == -1 && byte & 0x40 != 0);
        if done {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// The unsigned LEB128 encoding of `value` as a fresh vector.
pub fn unsigned(value: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    write_unsigned(&mut buf, value);
    buf
}

/// The signed LEB128 encoding of `value` as a fresh vector.
pub fn signed(value: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    write_signed(&mut buf, value);
    buf
}

/// Decode an unsigned LEB128 value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_unsigned(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;
    let mut len = 0;

    loop {
        let byte = *bytes.get(len).ok_or(DecodeError::UnexpectedEof)?;
        if shift >= 64 {
            return Err(DecodeError::IntegerOverflow);
        }
        result |= u64::from(byte & 0x7F) << shift;
        len += 1;
        if byte & 0x80 == 0 {
            return Ok((result, len));
        }
        shift += 7;
    }
}

/// Decode a signed LEB128 value from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_signed(bytes: &[u8]) -> Result<(i64, usize)> {
    let mut result: i64 = 0;
    let mut shift = 0;
    let mut len = 0;

    loop {
        let byte = *bytes.get(len).ok_or(DecodeError::UnexpectedEof)?;
        if shift >= 64 {
            return Err(DecodeError::IntegerOverflow);
        }
        result |= i64::from(byte & 0x7F) << shift;
        shift += 7;
        len += 1;
        if byte & 0x80 == 0 {
            if shift < 64 && byte & 0x40 != 0 {
                result |= -1i64 << shift;
            }
            return Ok((result, len));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_single_byte() {
        assert_eq!(unsigned(0), vec![0x00]);
        assert_eq!(unsigned(1), vec![0x01]);
        assert_eq!(unsigned(127), vec![0x7F]);
    }

    #[test]
    fn test_unsigned_multi_byte() {
        assert_eq!(unsigned(128), vec![0x80, 0x01]);
        assert_eq!(unsigned(624485), vec![0xE5, 0x8E, 0x26]);
        assert_eq!(unsigned(65536), vec![0x80, 0x80, 0x04]);
    }

    #[test]
    fn test_signed_positive() {
        assert_eq!(signed(0), vec![0x00]);
        assert_eq!(signed(2), vec![0x02]);
        // 63 fits; 64 needs a second byte because bit 6 is the sign
        assert_eq!(signed(63), vec![0x3F]);
        assert_eq!(signed(64), vec![0xC0, 0x00]);
    }

    #[test]
    fn test_signed_negative() {
        assert_eq!(signed(-1), vec![0x7F]);
        assert_eq!(signed(-64), vec![0x40]);
        assert_eq!(signed(-65), vec![0xBF, 0x7F]);
        assert_eq!(signed(-123456), vec![0xC0, 0xBB, 0x78]);
    }

    #[test]
    fn test_read_unsigned() {
        assert_eq!(read_unsigned(&[0x00]).unwrap(), (0, 1));
        assert_eq!(read_unsigned(&[0xE5, 0x8E, 0x26]).unwrap(), (624485, 3));
        // Trailing bytes are not consumed
        assert_eq!(read_unsigned(&[0x7F, 0xFF]).unwrap(), (127, 1));
    }

    #[test]
    fn test_read_signed() {
        assert_eq!(read_signed(&[0x7F]).unwrap(), (-1, 1));
        assert_eq!(read_signed(&[0x40]).unwrap(), (-64, 1));
        assert_eq!(read_signed(&[0xC0, 0xBB, 0x78]).unwrap(), (-123456, 3));
    }

    #[test]
    fn test_read_truncated() {
        assert_eq!(read_unsigned(&[]), Err(DecodeError::UnexpectedEof));
        assert_eq!(read_unsigned(&[0x80]), Err(DecodeError::UnexpectedEof));
        assert_eq!(read_signed(&[0xFF]), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_u32_boundary() {
        let encoded = unsigned(u64::from(u32::MAX));
        assert_eq!(encoded, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(read_unsigned(&encoded).unwrap(), (u64::from(u32::MAX), 5));
    }

    #[test]
    fn test_i32_boundaries() {
        for value in [i64::from(i32::MIN), i64::from(i32::MAX)] {
            let encoded = signed(value);
            assert_eq!(read_signed(&encoded).unwrap(), (value, encoded.len()));
        }
    }
}
