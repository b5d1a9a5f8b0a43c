//! Endian-safe scalar reads and bounds-checked slicing
//!
//! Every function here returns a `Result` internally so a caller that needs
//! to tell "absent" apart from "zero" can (the backwards-varint scanner and
//! the header reader both do); everywhere else, parsers call the `_or_zero`
//! wrappers and let a truncated record degrade to default field values,
//! mirroring the original C++ reader's `read_uint32_le` returning 0 on any
//! out-of-bounds access.

use super::error::ZmdbError;

type Result<T> = std::result::Result<T, ZmdbError>;

pub fn slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    buf.get(offset..offset + len)
        .ok_or(ZmdbError::OutOfBounds {
            offset,
            len,
            buf_len: buf.len(),
        })
}

pub fn read_byte(buf: &[u8], offset: usize) -> Result<u8> {
    buf.get(offset).copied().ok_or(ZmdbError::OutOfBounds {
        offset,
        len: 1,
        buf_len: buf.len(),
    })
}

pub fn read_u16_le(buf: &[u8], offset: usize) -> Result<u16> {
    let b = slice(buf, offset, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

pub fn read_u32_le(buf: &[u8], offset: usize) -> Result<u32> {
    let b = slice(buf, offset, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

pub fn read_u64_le(buf: &[u8], offset: usize) -> Result<u64> {
    let b = slice(buf, offset, 8)?;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

pub fn read_i32_le(buf: &[u8], offset: usize) -> Result<i32> {
    read_u32_le(buf, offset).map(|v| v as i32)
}

pub fn read_u32_le_or_zero(buf: &[u8], offset: usize) -> u32 {
    read_u32_le(buf, offset).unwrap_or(0)
}

pub fn read_u16_le_or_zero(buf: &[u8], offset: usize) -> u16 {
    read_u16_le(buf, offset).unwrap_or(0)
}

pub fn read_u64_le_or_zero(buf: &[u8], offset: usize) -> u64 {
    read_u64_le(buf, offset).unwrap_or(0)
}

pub fn read_i32_le_or_zero(buf: &[u8], offset: usize) -> i32 {
    read_i32_le(buf, offset).unwrap_or(0)
}

pub fn read_byte_or_zero(buf: &[u8], offset: usize) -> u8 {
    read_byte(buf, offset).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_within_bounds() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(read_u16_le(&buf, 0).unwrap(), 0x0201);
        assert_eq!(read_u32_le(&buf, 0).unwrap(), 0x04030201);
        assert_eq!(read_u64_le(&buf, 0).unwrap(), 0x0807060504030201);
    }

    #[test]
    fn out_of_bounds_is_an_error_not_a_panic() {
        let buf = [0x01, 0x02];
        assert!(read_u32_le(&buf, 0).is_err());
        assert_eq!(read_u32_le_or_zero(&buf, 0), 0);
    }

    #[test]
    fn slice_rejects_overrun() {
        let buf = [0u8; 4];
        assert!(slice(&buf, 2, 4).is_err());
        assert!(slice(&buf, 0, 4).is_ok());
    }
}
