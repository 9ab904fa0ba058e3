use bytes::BytesMut;

use crate::errors::VgmResult;

/// Serialization seam: append this value's byte representation to a buffer.
pub trait VgmWriter {
    fn to_bytes(&self, buffer: &mut BytesMut) -> VgmResult<()>;
}
