//! Fixed-layout header decode/encode driven by the format table.

use std::collections::HashMap;

use bytes::BytesMut;
use serde::{Deserialize, Serialize};

use crate::errors::{VgmError, VgmResult};
use crate::format::{Encoding, FieldValue, HeaderField, HEADER_FIELDS, HEADER_SIZE};
use crate::reader::{read_bytes, read_u16_le, read_u32_le, read_u8};
use crate::traits::VgmWriter;

/// Versions the parser accepts, as stored in the version field.
pub const SUPPORTED_VERSIONS: [u32; 2] = [0x0000_0101, 0x0000_0150];

/// Decoded header: one value per format-table field.
///
/// After a successful decode the map holds exactly one entry for every field
/// in [`HEADER_FIELDS`]; nothing is added or removed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    fields: HashMap<HeaderField, FieldValue>,
}

impl Header {
    /// Header with the VGM identifier set and every numeric field zeroed.
    pub fn new() -> Self {
        let mut fields = HashMap::new();
        for field in HEADER_FIELDS {
            let value = match field.spec().encoding {
                None => FieldValue::Bytes(crate::container::VGM_MAGIC.to_vec()),
                Some(_) => FieldValue::Uint(0),
            };
            fields.insert(field, value);
        }
        Header { fields }
    }

    /// Decode every format-table field from the fixed header region.
    ///
    /// Fields are read at their declared offsets, not sequentially, so the
    /// iteration order of the table is irrelevant. A buffer shorter than the
    /// header region fails up front rather than zero-filling.
    pub fn decode(data: &[u8]) -> VgmResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(VgmError::TruncatedHeader {
                needed: HEADER_SIZE,
                available: data.len(),
            });
        }

        let mut fields = HashMap::new();
        for field in HEADER_FIELDS {
            let spec = field.spec();
            let pos = spec.offset as usize;
            let value = match spec.encoding {
                None => {
                    let raw = read_bytes(data, pos, spec.size as usize, field.name())?;
                    FieldValue::Bytes(raw.to_vec())
                },
                Some(Encoding::U32Le) => FieldValue::Uint(read_u32_le(data, pos, field.name())?),
                Some(Encoding::U16Le) => {
                    FieldValue::Uint(read_u16_le(data, pos, field.name())? as u32)
                },
                Some(Encoding::U8) => FieldValue::Uint(read_u8(data, pos, field.name())? as u32),
            };
            fields.insert(field, value);
        }

        Ok(Header { fields })
    }

    pub fn get(&self, field: HeaderField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// Integer value of a numeric field.
    pub fn get_u32(&self, field: HeaderField) -> VgmResult<u32> {
        self.fields
            .get(&field)
            .and_then(FieldValue::as_u32)
            .ok_or(VgmError::MissingHeaderField {
                field: field.name(),
            })
    }

    pub fn set_u32(&mut self, field: HeaderField, value: u32) {
        self.fields.insert(field, FieldValue::Uint(value));
    }

    /// Raw identifier bytes at offset 0.
    pub fn ident(&self) -> VgmResult<&[u8]> {
        self.fields
            .get(&HeaderField::Ident)
            .and_then(FieldValue::as_bytes)
            .ok_or(VgmError::MissingHeaderField {
                field: HeaderField::Ident.name(),
            })
    }

    pub fn version(&self) -> VgmResult<u32> {
        self.get_u32(HeaderField::Version)
    }

    /// Version rendered as `major.minor` hex digits, e.g. 0x150 -> "1.50".
    pub fn version_str(&self) -> VgmResult<String> {
        let version = self.version()?;
        Ok(format!("{:x}.{:02x}", version >> 8, version & 0xFF))
    }

    /// Fail unless the version is in the recognized set.
    pub fn check_version(&self) -> VgmResult<()> {
        let version = self.version()?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(VgmError::UnsupportedVersion {
                version,
                version_str: self.version_str()?,
            });
        }
        Ok(())
    }

    /// Absolute file position for a self-relative offset field.
    ///
    /// The stored value is relative to the field's own position in the
    /// header, so the absolute position is `value + field_offset`.
    pub fn absolute_offset(&self, field: HeaderField) -> VgmResult<usize> {
        let stored = self.get_u32(field)?;
        Ok(stored as usize + field.spec().offset as usize)
    }

    pub fn gd3_start(&self) -> VgmResult<usize> {
        self.absolute_offset(HeaderField::Gd3Offset)
    }

    pub fn data_start(&self) -> VgmResult<usize> {
        self.absolute_offset(HeaderField::DataOffset)
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl VgmWriter for Header {
    /// Re-emit the fixed header region: zero-fill, then write every field at
    /// its declared offset with the same encoding used on decode.
    fn to_bytes(&self, buffer: &mut BytesMut) -> VgmResult<()> {
        let base = buffer.len();
        buffer.resize(base + HEADER_SIZE, 0);

        for field in HEADER_FIELDS {
            let spec = field.spec();
            let start = base + spec.offset as usize;
            let dest = &mut buffer[start..start + spec.size as usize];
            match spec.encoding {
                None => {
                    let raw = self
                        .fields
                        .get(&field)
                        .and_then(FieldValue::as_bytes)
                        .ok_or(VgmError::MissingHeaderField {
                            field: field.name(),
                        })?;
                    dest.copy_from_slice(raw);
                },
                Some(Encoding::U32Le) => {
                    dest.copy_from_slice(&self.get_u32(field)?.to_le_bytes());
                },
                Some(Encoding::U16Le) => {
                    dest.copy_from_slice(&(self.get_u32(field)? as u16).to_le_bytes());
                },
                Some(Encoding::U8) => {
                    dest[0] = self.get_u32(field)? as u8;
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes() -> Vec<u8> {
        let mut header = Header::new();
        header.set_u32(HeaderField::Version, 0x150);
        header.set_u32(HeaderField::Sn76489Clock, 3_579_545);
        header.set_u32(HeaderField::TotalSamples, 44_100);
        header.set_u32(HeaderField::Sn76489Feedback, 0x0009);
        header.set_u32(HeaderField::Sn76489ShiftWidth, 16);
        header.set_u32(HeaderField::Gd3Offset, 0x100);
        header.set_u32(HeaderField::DataOffset, 0x0C);
        let mut buffer = BytesMut::new();
        header.to_bytes(&mut buffer).unwrap();
        buffer.to_vec()
    }

    #[test]
    fn test_decode_reads_fields_at_declared_offsets() {
        let bytes = header_bytes();
        let header = Header::decode(&bytes).unwrap();

        assert_eq!(header.ident().unwrap(), b"Vgm ");
        assert_eq!(header.version().unwrap(), 0x150);
        assert_eq!(header.get_u32(HeaderField::Sn76489Clock).unwrap(), 3_579_545);
        assert_eq!(header.get_u32(HeaderField::TotalSamples).unwrap(), 44_100);
        assert_eq!(header.get_u32(HeaderField::Sn76489Feedback).unwrap(), 0x0009);
        assert_eq!(header.get_u32(HeaderField::Sn76489ShiftWidth).unwrap(), 16);
    }

    #[test]
    fn test_roundtrip_every_field() {
        let bytes = header_bytes();
        let header = Header::decode(&bytes).unwrap();

        let mut buffer = BytesMut::new();
        header.to_bytes(&mut buffer).unwrap();
        assert_eq!(buffer.to_vec(), bytes);

        let reparsed = Header::decode(&buffer).unwrap();
        assert_eq!(reparsed, header);
    }

    #[test]
    fn test_truncated_header_rejected() {
        let bytes = header_bytes();
        let err = Header::decode(&bytes[..0x20]).unwrap_err();
        assert_eq!(
            err,
            VgmError::TruncatedHeader {
                needed: HEADER_SIZE,
                available: 0x20,
            }
        );
    }

    #[test]
    fn test_version_string_rendering() {
        let mut header = Header::new();
        header.set_u32(HeaderField::Version, 0x101);
        assert_eq!(header.version_str().unwrap(), "1.01");

        header.set_u32(HeaderField::Version, 0x150);
        assert_eq!(header.version_str().unwrap(), "1.50");

        header.set_u32(HeaderField::Version, 0x200);
        assert_eq!(header.version_str().unwrap(), "2.00");
    }

    #[test]
    fn test_version_gating() {
        let mut header = Header::new();
        header.set_u32(HeaderField::Version, 0x101);
        assert!(header.check_version().is_ok());

        header.set_u32(HeaderField::Version, 0x150);
        assert!(header.check_version().is_ok());

        header.set_u32(HeaderField::Version, 0x200);
        let err = header.check_version().unwrap_err();
        assert_eq!(
            err,
            VgmError::UnsupportedVersion {
                version: 0x200,
                version_str: "2.00".to_string(),
            }
        );
    }

    #[test]
    fn test_self_relative_offsets() {
        let mut header = Header::new();
        header.set_u32(HeaderField::Gd3Offset, 0x100);
        header.set_u32(HeaderField::DataOffset, 0x0C);
        header.set_u32(HeaderField::LoopOffset, 0x40);

        // stored + position of the field itself
        assert_eq!(header.gd3_start().unwrap(), 0x100 + 0x14);
        assert_eq!(header.data_start().unwrap(), 0x0C + 0x34);
        assert_eq!(
            header.absolute_offset(HeaderField::LoopOffset).unwrap(),
            0x40 + 0x1c
        );
    }
}
