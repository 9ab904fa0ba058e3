pub mod commands;
pub mod container;
pub mod errors;
pub mod format;
pub mod gd3;
pub mod header;
pub mod reader;
pub mod traits;

pub use commands::*;
pub use container::*;
pub use errors::*;
pub use format::*;
pub use gd3::*;
pub use header::*;
pub use traits::*;

use std::io::Write;

use bytes::BytesMut;
use serde::{Deserialize, Serialize};

/// A fully parsed VGM file: header metadata map, GD3 tag set, ordered
/// command list, and the extracted data block if the stream carried one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VgmFile {
    pub header: Header,
    pub gd3: Gd3Tags,
    pub commands: Vec<Command>,
    pub data_block: Option<Vec<u8>>,
}

impl VgmFile {
    /// Parse a raw byte buffer, decompressing transparently if it is a
    /// gzipped (.vgz) stream.
    ///
    /// Construction either fully succeeds or fails; no partial result is
    /// published on error.
    pub fn parse(raw: &[u8]) -> VgmResult<Self> {
        let data = container::normalize(raw)?;

        let header = Header::decode(&data)?;
        header.check_version()?;

        let gd3 = Gd3Tags::decode(&data, header.gd3_start()?)?;
        let stream = decode_commands(&data, header.data_start()?)?;

        Ok(VgmFile {
            header,
            gd3,
            commands: stream.commands,
            data_block: stream.data_block,
        })
    }

    /// Read and parse a .vgm or .vgz file from disk.
    pub fn from_path(path: &str) -> VgmResult<Self> {
        let file_data = std::fs::read(path).map_err(|e| VgmError::FileRead {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&file_data)
    }

    /// Version rendered as `major.minor` hex digits, e.g. "1.50".
    pub fn version_str(&self) -> VgmResult<String> {
        self.header.version_str()
    }

    pub fn has_data_block(&self) -> bool {
        self.data_block.is_some()
    }

    /// Serialize header and command list into `buffer`.
    ///
    /// Refuses when a data block was extracted: the serializer does not
    /// re-embed it, and dropping those bytes silently would make the output
    /// look like a faithful copy when it is not.
    pub fn save(&self, buffer: &mut BytesMut) -> VgmResult<()> {
        if self.has_data_block() {
            return Err(VgmError::DataBlockPresent);
        }
        self.header.to_bytes(buffer)?;
        write_commands(buffer, &self.commands);
        Ok(())
    }

    /// Serialize into a caller-provided sink. Write failures propagate as-is;
    /// partially written output is not undone.
    pub fn save_to<W: Write>(&self, sink: &mut W) -> VgmResult<()> {
        let mut buffer = BytesMut::new();
        self.save(&mut buffer)?;
        sink.write_all(&buffer).map_err(|e| VgmError::SinkWrite {
            reason: e.to_string(),
        })
    }
}

impl VgmWriter for VgmFile {
    fn to_bytes(&self, buffer: &mut BytesMut) -> VgmResult<()> {
        self.save(buffer)
    }
}
