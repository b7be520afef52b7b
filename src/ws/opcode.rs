use std::convert::TryFrom;
use std::fmt;

use super::consts::OPCODE_MASK;
use super::error::WsError;

/// Frame opcode, the low 4 bits of the first header byte.
///
/// Reserved values (0x3-0x7, 0xB-0xF) have no variant; decoding them fails
/// with [`WsError::InvalidOpcode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
}

impl Opcode {
    // create an opcode from unchanged input byte
    pub fn decode(byte: u8) -> Result<Self, WsError> {
        Self::try_from(byte & OPCODE_MASK)
    }

    pub const fn encode(self) -> u8 {
        use Opcode::*;
        match self {
            Continuation => 0x0,
            Text => 0x1,
            Binary => 0x2,
            Close => 0x8,
            Ping => 0x9,
            Pong => 0xA,
        }
    }

    /// Close, ping and pong. Never fragmented.
    pub const fn is_control(self) -> bool {
        matches!(self, Opcode::Close | Opcode::Ping | Opcode::Pong)
    }

    /// Text and binary, the opcodes that may open a message.
    pub const fn is_data(self) -> bool {
        matches!(self, Opcode::Text | Opcode::Binary)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = WsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Opcode::*;
        match value {
            0x0 => Ok(Continuation),
            0x1 => Ok(Text),
            0x2 => Ok(Binary),
            0x8 => Ok(Close),
            0x9 => Ok(Ping),
            0xA => Ok(Pong),
            other => Err(WsError::InvalidOpcode(other)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Opcode::Continuation => "continuation",
            Opcode::Text => "text",
            Opcode::Binary => "binary",
            Opcode::Close => "close",
            Opcode::Ping => "ping",
            Opcode::Pong => "pong",
        };
        f.write_str(name)
    }
}
