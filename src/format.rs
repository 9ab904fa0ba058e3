//! Static description of the fixed VGM header layout.
//!
//! One table drives both the decode and encode paths, so any field added here
//! round-trips automatically. Offsets `gd3_offset`, `loop_offset` and
//! `data_offset` are self-relative: the stored value plus the field's own
//! offset yields the absolute file position.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Size of the fixed header region covered by the format table.
pub const HEADER_SIZE: usize = 0x38;

/// Numeric encoding of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    U32Le,
    U16Le,
    U8,
}

impl Encoding {
    pub fn width(self) -> usize {
        match self {
            Encoding::U32Le => 4,
            Encoding::U16Le => 2,
            Encoding::U8 => 1,
        }
    }
}

/// Layout of one header field: where it lives and how it is encoded.
///
/// `encoding` of `None` means the field is stored as opaque raw bytes
/// (only the 4-byte identifier uses this).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub offset: u32,
    pub size: u8,
    pub encoding: Option<Encoding>,
}

/// The fixed set of header fields, offsets 0x00-0x37.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderField {
    Ident,
    EofOffset,
    Version,
    Sn76489Clock,
    Ym2413Clock,
    Gd3Offset,
    TotalSamples,
    LoopOffset,
    LoopSamples,
    Rate,
    Sn76489Feedback,
    Sn76489ShiftWidth,
    Ym2612Clock,
    Ym2151Clock,
    DataOffset,
}

impl HeaderField {
    pub fn name(self) -> &'static str {
        match self {
            HeaderField::Ident => "vgm_ident",
            HeaderField::EofOffset => "eof_offset",
            HeaderField::Version => "version",
            HeaderField::Sn76489Clock => "sn76489_clock",
            HeaderField::Ym2413Clock => "ym2413_clock",
            HeaderField::Gd3Offset => "gd3_offset",
            HeaderField::TotalSamples => "total_samples",
            HeaderField::LoopOffset => "loop_offset",
            HeaderField::LoopSamples => "loop_samples",
            HeaderField::Rate => "rate",
            HeaderField::Sn76489Feedback => "sn76489_feedback",
            HeaderField::Sn76489ShiftWidth => "sn76489_shift_register_width",
            HeaderField::Ym2612Clock => "ym2612_clock",
            HeaderField::Ym2151Clock => "ym2151_clock",
            HeaderField::DataOffset => "vgm_data_offset",
        }
    }

    /// Layout entry for this field.
    pub fn spec(self) -> FieldSpec {
        let (offset, size, encoding) = match self {
            HeaderField::Ident => (0x00, 4, None),
            HeaderField::EofOffset => (0x04, 4, Some(Encoding::U32Le)),
            HeaderField::Version => (0x08, 4, Some(Encoding::U32Le)),
            HeaderField::Sn76489Clock => (0x0c, 4, Some(Encoding::U32Le)),
            HeaderField::Ym2413Clock => (0x10, 4, Some(Encoding::U32Le)),
            HeaderField::Gd3Offset => (0x14, 4, Some(Encoding::U32Le)),
            HeaderField::TotalSamples => (0x18, 4, Some(Encoding::U32Le)),
            HeaderField::LoopOffset => (0x1c, 4, Some(Encoding::U32Le)),
            HeaderField::LoopSamples => (0x20, 4, Some(Encoding::U32Le)),
            HeaderField::Rate => (0x24, 4, Some(Encoding::U32Le)),
            HeaderField::Sn76489Feedback => (0x28, 2, Some(Encoding::U16Le)),
            HeaderField::Sn76489ShiftWidth => (0x2a, 1, Some(Encoding::U8)),
            // 0x2b is a reserved byte, left unmapped
            HeaderField::Ym2612Clock => (0x2c, 4, Some(Encoding::U32Le)),
            HeaderField::Ym2151Clock => (0x30, 4, Some(Encoding::U32Le)),
            HeaderField::DataOffset => (0x34, 4, Some(Encoding::U32Le)),
        };
        FieldSpec {
            offset,
            size,
            encoding,
        }
    }
}

/// Fields in file-offset order. Decode and encode both iterate this list,
/// but neither depends on the ordering since every field seeks independently.
pub const HEADER_FIELDS: [HeaderField; 15] = [
    HeaderField::Ident,
    HeaderField::EofOffset,
    HeaderField::Version,
    HeaderField::Sn76489Clock,
    HeaderField::Ym2413Clock,
    HeaderField::Gd3Offset,
    HeaderField::TotalSamples,
    HeaderField::LoopOffset,
    HeaderField::LoopSamples,
    HeaderField::Rate,
    HeaderField::Sn76489Feedback,
    HeaderField::Sn76489ShiftWidth,
    HeaderField::Ym2612Clock,
    HeaderField::Ym2151Clock,
    HeaderField::DataOffset,
];

lazy_static! {
    /// The format table as a map view: field -> offset, width, encoding.
    /// Derived from [`HeaderField::spec`], so the two can never disagree.
    pub static ref HEADER_FORMAT: HashMap<HeaderField, FieldSpec> = HEADER_FIELDS
        .iter()
        .map(|field| (*field, field.spec()))
        .collect();
}

/// Decoded value of one header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Raw bytes, used only for the identifier
    Bytes(Vec<u8>),
    /// Fixed-width unsigned integer
    Uint(u32),
}

impl FieldValue {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            FieldValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            FieldValue::Uint(_) => None,
        }
    }
}
