//! Opcode-driven command stream decode and re-encode.
//!
//! The decoder is a strictly sequential single pass: one opcode byte selects
//! the operand width, the operand is copied verbatim, and the record order is
//! the playback order. The data-block opcode (0x67) is the one side channel:
//! its payload is extracted into an owned buffer and no record is appended.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::errors::{VgmError, VgmResult};
use crate::reader::{read_bytes, read_u32_le, read_u8};

/// End-of-stream opcode: scanning stops right after recording it.
pub const END_OF_SOUND_DATA: u8 = 0x66;

/// Data-block opcode: 0x67 0x66 tt ss ss ss ss (payload)
pub const DATA_BLOCK: u8 = 0x67;

/// One decoded command: the opcode byte plus its verbatim operand bytes.
///
/// Operand width is fully determined by the opcode (0, 1, 2 or 4 bytes);
/// zero-operand opcodes store `None` and re-emit only the opcode byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub opcode: u8,
    pub operand: Option<Vec<u8>>,
}

impl Command {
    pub fn new(opcode: u8, operand: &[u8]) -> Self {
        let operand = if operand.is_empty() {
            None
        } else {
            Some(operand.to_vec())
        };
        Command { opcode, operand }
    }

    /// Samples this command waits for, if it is a wait variant.
    pub fn wait_samples(&self) -> Option<u32> {
        match self.opcode {
            0x61 => {
                let operand: [u8; 2] = self.operand.as_deref()?.get(..2)?.try_into().ok()?;
                Some(u16::from_le_bytes(operand) as u32)
            },
            0x62 => Some(735),
            0x63 => Some(882),
            0x70..=0x7F => Some((self.opcode - 0x70) as u32 + 1),
            0x80..=0x8F => Some((self.opcode - 0x80) as u32),
            _ => None,
        }
    }
}

/// Result of scanning a command stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStream {
    /// Decoded records in file (= playback) order.
    pub commands: Vec<Command>,
    /// Payload of the last data block encountered, if any.
    pub data_block: Option<Vec<u8>>,
}

/// How an opcode is handled by the scan loop.
enum OpcodeKind {
    /// Fixed operand width in bytes (possibly zero)
    Operand(usize),
    EndOfStream,
    DataBlock,
}

/// Dispatch table keyed on opcode byte ranges. Every opcode value is either
/// classified here or rejected by the decoder as unknown.
fn classify(opcode: u8) -> Option<OpcodeKind> {
    match opcode {
        // Game Gear PSG stereo / PSG write
        0x4F | 0x50 => Some(OpcodeKind::Operand(1)),
        // YM2413 / YM2612 port 0 / YM2612 port 1 / YM2151 register writes
        0x51..=0x54 => Some(OpcodeKind::Operand(2)),
        // wait n samples, n = u16le
        0x61 => Some(OpcodeKind::Operand(2)),
        // wait 735 / 882 samples
        0x62 | 0x63 => Some(OpcodeKind::Operand(0)),
        END_OF_SOUND_DATA => Some(OpcodeKind::EndOfStream),
        DATA_BLOCK => Some(OpcodeKind::DataBlock),
        // short waits and YM2612 bank-write-and-wait variants
        0x70..=0x8F => Some(OpcodeKind::Operand(0)),
        // seek in PCM data bank
        0xE0 => Some(OpcodeKind::Operand(4)),
        _ => None,
    }
}

/// Scan the command stream from absolute position `start` to end of buffer
/// or the end-of-stream opcode.
///
/// `start` must already have the self-relative correction applied. The scan
/// never looks ahead beyond the declared operand width, and an opcode outside
/// every enumerated range fails fast instead of stalling the loop.
pub fn decode_commands(data: &[u8], start: usize) -> VgmResult<CommandStream> {
    let mut stream = CommandStream::default();
    let mut pos = start;

    while pos < data.len() {
        let opcode = read_u8(data, pos, "command_opcode")?;
        let kind = classify(opcode).ok_or(VgmError::UnknownOpcode {
            opcode,
            position: pos,
        })?;

        match kind {
            OpcodeKind::Operand(len) => {
                let operand = read_bytes(data, pos + 1, len, "command_operand").map_err(|_| {
                    VgmError::IncompleteCommand {
                        opcode,
                        position: pos,
                        needed: len,
                        available: data.len() - (pos + 1),
                    }
                })?;
                stream.commands.push(Command::new(opcode, operand));
                pos += 1 + len;
            },
            OpcodeKind::EndOfStream => {
                stream.commands.push(Command::new(opcode, &[]));
                break;
            },
            OpcodeKind::DataBlock => {
                // skip the compatibility byte and the block type marker
                let length = read_u32_le(data, pos + 3, "data_block_length")?;
                let payload =
                    read_bytes(data, pos + 7, length as usize, "data_block_payload").map_err(
                        |_| VgmError::IncompleteCommand {
                            opcode,
                            position: pos,
                            needed: length as usize,
                            available: data.len().saturating_sub(pos + 7),
                        },
                    )?;
                // last block wins; no command record for 0x67
                stream.data_block = Some(payload.to_vec());
                pos += 7 + length as usize;
            },
        }
    }

    Ok(stream)
}

/// Re-emit the command list in order: opcode byte, then operand bytes if any.
pub fn write_commands(buffer: &mut BytesMut, commands: &[Command]) {
    for command in commands {
        buffer.put_u8(command.opcode);
        if let Some(operand) = &command.operand {
            buffer.put(&operand[..]);
        }
    }
}
