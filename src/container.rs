//! Container validation: magic-number check with transparent gzip fallback.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::errors::{VgmError, VgmResult};

/// Gzip magic bytes (RFC 1952)
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// VGM magic bytes
pub const VGM_MAGIC: [u8; 4] = [0x56, 0x67, 0x6d, 0x20]; // "Vgm "

/// Detect if data is a VGM stream by checking magic bytes at offset 0
pub fn is_vgm(data: &[u8]) -> bool {
    data.len() >= 4 && data[0..4] == VGM_MAGIC
}

/// Detect if data is gzipped by checking magic bytes
pub fn is_gzipped(data: &[u8]) -> bool {
    data.len() >= 2 && data[0..2] == GZIP_MAGIC
}

fn decompress_gzip(compressed: &[u8]) -> VgmResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| VgmError::InvalidContainer {
            reason: format!("gzip decompression failed: {}", e),
        })?;
    Ok(decompressed)
}

/// Normalize a raw buffer into an uncompressed VGM stream.
///
/// Accepts the buffer as-is when the VGM magic is present at offset 0;
/// otherwise attempts gzip decompression and re-checks the magic on the
/// result. Anything else is not a VGM container.
pub fn normalize(data: &[u8]) -> VgmResult<Vec<u8>> {
    if is_vgm(data) {
        return Ok(data.to_vec());
    }

    if is_gzipped(data) {
        let decompressed = decompress_gzip(data)?;
        if !is_vgm(&decompressed) {
            return Err(VgmError::InvalidContainer {
                reason: "decompressed data does not start with VGM magic bytes".to_string(),
            });
        }
        return Ok(decompressed);
    }

    Err(VgmError::InvalidContainer {
        reason: "neither VGM magic bytes nor a gzip stream found at offset 0".to_string(),
    })
}
