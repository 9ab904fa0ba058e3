//! VGM test data builder.
//!
//! Assembles complete file images byte by byte: fixed header region, command
//! stream, then the GD3 block, with the self-relative offset fields computed
//! from the actual layout. Produces raw or gzip-wrapped buffers.

use bytes::BytesMut;
use flate2::{write::GzEncoder, Compression};
use std::io::Write;

use vgmio::{Gd3Tags, Header, HeaderField, VgmWriter, HEADER_SIZE};

/// Fluent builder for raw VGM file images.
#[derive(Debug)]
pub struct VgmBuilder {
    version: u32,
    sn76489_clock: u32,
    total_samples: u32,
    command_bytes: Vec<u8>,
    /// Filler inserted between the command terminator and the GD3 block,
    /// so the stored gd3 offset differs from where a naive absolute read
    /// would land.
    padding_before_gd3: usize,
    gd3: Gd3Tags,
}

impl Default for VgmBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VgmBuilder {
    pub fn new() -> Self {
        Self {
            version: 0x150,
            sn76489_clock: 3_579_545,
            total_samples: 0,
            command_bytes: Vec::new(),
            padding_before_gd3: 0,
            gd3: Gd3Tags::default(),
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn sn76489_clock(mut self, clock: u32) -> Self {
        self.sn76489_clock = clock;
        self
    }

    pub fn total_samples(mut self, samples: u32) -> Self {
        self.total_samples = samples;
        self
    }

    /// Append raw command-stream bytes verbatim.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.command_bytes.extend_from_slice(bytes);
        self
    }

    pub fn psg_write(self, value: u8) -> Self {
        self.raw(&[0x50, value])
    }

    pub fn gg_stereo(self, value: u8) -> Self {
        self.raw(&[0x4F, value])
    }

    pub fn ym2612_port0(self, register: u8, value: u8) -> Self {
        self.raw(&[0x52, register, value])
    }

    pub fn wait(self, samples: u16) -> Self {
        let [lo, hi] = samples.to_le_bytes();
        self.raw(&[0x61, lo, hi])
    }

    pub fn wait_60hz(self) -> Self {
        self.raw(&[0x62])
    }

    pub fn seek_pcm(self, offset: u32) -> Self {
        let [a, b, c, d] = offset.to_le_bytes();
        self.raw(&[0xE0, a, b, c, d])
    }

    /// Embed a data block: 0x67 0x66 tt ss ss ss ss (payload).
    pub fn data_block(mut self, block_type: u8, payload: &[u8]) -> Self {
        self.command_bytes.extend_from_slice(&[0x67, 0x66, block_type]);
        self.command_bytes
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.command_bytes.extend_from_slice(payload);
        self
    }

    /// Append the end-of-sound-data terminator.
    pub fn end(self) -> Self {
        self.raw(&[0x66])
    }

    pub fn pad_before_gd3(mut self, padding: usize) -> Self {
        self.padding_before_gd3 = padding;
        self
    }

    pub fn gd3<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Gd3Tags) -> Gd3Tags,
    {
        self.gd3 = f(self.gd3);
        self
    }

    /// Assemble the file image with offsets computed from the layout.
    pub fn build(self) -> Vec<u8> {
        let mut header = Header::new();
        header.set_u32(HeaderField::Version, self.version);
        header.set_u32(HeaderField::Sn76489Clock, self.sn76489_clock);
        header.set_u32(HeaderField::TotalSamples, self.total_samples);
        header.set_u32(HeaderField::Sn76489Feedback, 0x0009);
        header.set_u32(HeaderField::Sn76489ShiftWidth, 16);
        // commands start right after the fixed header region
        header.set_u32(HeaderField::DataOffset, (HEADER_SIZE - 0x34) as u32);

        let gd3_start = HEADER_SIZE + self.command_bytes.len() + self.padding_before_gd3;
        header.set_u32(HeaderField::Gd3Offset, (gd3_start - 0x14) as u32);

        let mut buffer = BytesMut::new();
        header.to_bytes(&mut buffer).expect("header encode");
        buffer.extend_from_slice(&self.command_bytes);
        buffer.extend_from_slice(&vec![0u8; self.padding_before_gd3]);
        self.gd3.to_bytes(&mut buffer).expect("gd3 encode");

        // eof offset is self-relative to 0x04
        header.set_u32(HeaderField::EofOffset, (buffer.len() - 0x04) as u32);
        let mut rewritten = BytesMut::new();
        header.to_bytes(&mut rewritten).expect("header encode");
        buffer[..HEADER_SIZE].copy_from_slice(&rewritten);

        buffer.to_vec()
    }

    /// Assemble and wrap in a gzip stream (a .vgz image).
    pub fn build_gzipped(self) -> Vec<u8> {
        let raw = self.build();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).expect("gzip write");
        encoder.finish().expect("gzip finish")
    }
}
