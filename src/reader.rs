//! Bounds-checked reads over an immutable byte slice.
//!
//! Every decode step takes the shared slice plus an explicit position instead
//! of consuming a cursor, so neighboring steps can never observe cursor drift.

use byteorder::{ByteOrder, LittleEndian};

use crate::errors::{VgmError, VgmResult};

/// Borrow `len` bytes at `pos`, or fail with the byte counts involved.
pub fn read_bytes<'a>(
    data: &'a [u8],
    pos: usize,
    len: usize,
    context: &'static str,
) -> VgmResult<&'a [u8]> {
    let end = pos.checked_add(len).ok_or(VgmError::OffsetOutOfRange {
        context,
        offset: pos,
        needed: len,
        available: data.len(),
    })?;
    if end > data.len() {
        return Err(VgmError::OffsetOutOfRange {
            context,
            offset: pos,
            needed: len,
            available: data.len(),
        });
    }
    Ok(&data[pos..end])
}

pub fn read_u8(data: &[u8], pos: usize, context: &'static str) -> VgmResult<u8> {
    Ok(read_bytes(data, pos, 1, context)?[0])
}

pub fn read_u16_le(data: &[u8], pos: usize, context: &'static str) -> VgmResult<u16> {
    Ok(LittleEndian::read_u16(read_bytes(data, pos, 2, context)?))
}

pub fn read_u32_le(data: &[u8], pos: usize, context: &'static str) -> VgmResult<u32> {
    Ok(LittleEndian::read_u32(read_bytes(data, pos, 4, context)?))
}
