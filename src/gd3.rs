//! GD3 tag block: eleven UTF-16LE text fields in fixed order.
//!
//! Sub-block layout: 4-byte "Gd3 " ident, 4-byte tag version, 4-byte
//! little-endian payload length, then the payload. Neither the ident nor the
//! tag version is validated on decode; that matches the original format's
//! looseness and real files in the wild.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::errors::{VgmError, VgmResult};
use crate::reader::{read_bytes, read_u32_le};
use crate::traits::VgmWriter;

/// Number of delimited text fields a GD3 payload must contain.
pub const GD3_FIELD_COUNT: usize = 11;

/// Bytes of ident + tag version skipped before the length word.
const GD3_SUBHEADER_SIZE: usize = 8;

const FIELD_NAMES: [&str; GD3_FIELD_COUNT] = [
    "title_en", "title_ja", "game_en", "game_ja", "system_en", "system_ja", "artist_en",
    "artist_ja", "date", "creator", "notes",
];

/// The eleven GD3 fields, in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gd3Tags {
    pub title_en: String,
    pub title_ja: String,
    pub game_en: String,
    pub game_ja: String,
    pub system_en: String,
    pub system_ja: String,
    pub artist_en: String,
    pub artist_ja: String,
    pub date: String,
    pub creator: String,
    pub notes: String,
}

impl Gd3Tags {
    /// Decode the tag block starting at absolute position `start`.
    ///
    /// `start` must already have the self-relative correction applied by the
    /// caller. The payload is split on 2-byte zero markers; anything other
    /// than exactly [`GD3_FIELD_COUNT`] closed fields is an error reporting
    /// the actual count.
    pub fn decode(data: &[u8], start: usize) -> VgmResult<Self> {
        let length = read_u32_le(data, start + GD3_SUBHEADER_SIZE, "gd3_length")?;
        let payload = read_bytes(
            data,
            start + GD3_SUBHEADER_SIZE + 4,
            length as usize,
            "gd3_payload",
        )?;

        let fields = split_fields(payload);
        if fields.len() != GD3_FIELD_COUNT {
            return Err(VgmError::MalformedGd3 {
                expected: GD3_FIELD_COUNT,
                found: fields.len(),
            });
        }

        let mut decoded = Vec::with_capacity(GD3_FIELD_COUNT);
        for (units, name) in fields.iter().zip(FIELD_NAMES) {
            let text =
                String::from_utf16(units).map_err(|_| VgmError::InvalidUtf16 { field: name })?;
            decoded.push(text);
        }
        let mut decoded = decoded.into_iter();

        // next() cannot fail here, the count was checked above
        let mut next = || decoded.next().unwrap_or_default();
        Ok(Gd3Tags {
            title_en: next(),
            title_ja: next(),
            game_en: next(),
            game_ja: next(),
            system_en: next(),
            system_ja: next(),
            artist_en: next(),
            artist_ja: next(),
            date: next(),
            creator: next(),
            notes: next(),
        })
    }

    fn fields_in_order(&self) -> [&str; GD3_FIELD_COUNT] {
        [
            &self.title_en,
            &self.title_ja,
            &self.game_en,
            &self.game_ja,
            &self.system_en,
            &self.system_ja,
            &self.artist_en,
            &self.artist_ja,
            &self.date,
            &self.creator,
            &self.notes,
        ]
    }
}

/// Consume 2-byte code units, closing the current field at each 2-byte zero
/// marker. A trailing odd byte or unterminated run is dropped, as the format
/// prescribes termination for every field.
fn split_fields(payload: &[u8]) -> Vec<Vec<u16>> {
    let mut fields = Vec::new();
    let mut current = Vec::new();
    for pair in payload.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0x0000 {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(unit);
        }
    }
    fields
}

impl VgmWriter for Gd3Tags {
    fn to_bytes(&self, buffer: &mut BytesMut) -> VgmResult<()> {
        buffer.put(&b"Gd3 "[..]);
        buffer.put(&[0x00, 0x01, 0x00, 0x00][..]);

        // reserve the length word, backfill once the payload is written
        let index_length = buffer.len();
        buffer.put_u32_le(0);

        for field in self.fields_in_order() {
            for unit in field.encode_utf16() {
                buffer.put_u16_le(unit);
            }
            buffer.put_u16_le(0x0000);
        }

        let payload_length = (buffer.len() - (index_length + 4)) as u32;
        let loc = &mut buffer[index_length..index_length + 4];
        loc.copy_from_slice(&payload_length.to_le_bytes());
        Ok(())
    }
}
