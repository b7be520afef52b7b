use super::close::CloseCode;
use super::opcode::Opcode;

/// 4 byte masking key. Payload byte `i` is XORed with `mask[i % 4]`.
pub type Mask = [u8; 4];

/// One wire-level WebSocket frame.
///
/// The payload length is not stored separately, it is `payload.len()`.
/// Frames built by the constructors below are final and unmasked, which is
/// what a server sends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub fin: bool,
    pub rsv1: bool,
    pub rsv2: bool,
    pub rsv3: bool,
    pub opcode: Opcode,
    pub mask: Option<Mask>,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(opcode: Opcode, payload: impl Into<Vec<u8>>) -> Self {
        Frame {
            fin: true,
            rsv1: false,
            rsv2: false,
            rsv3: false,
            opcode,
            mask: None,
            payload: payload.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Frame::new(Opcode::Text, text.into().into_bytes())
    }

    pub fn binary(payload: impl Into<Vec<u8>>) -> Self {
        Frame::new(Opcode::Binary, payload)
    }

    pub fn ping(payload: impl Into<Vec<u8>>) -> Self {
        Frame::new(Opcode::Ping, payload)
    }

    pub fn pong(payload: impl Into<Vec<u8>>) -> Self {
        Frame::new(Opcode::Pong, payload)
    }

    pub fn close(code: &CloseCode) -> Self {
        Frame::new(Opcode::Close, code.to_payload())
    }

    pub fn with_fin(mut self, fin: bool) -> Self {
        self.fin = fin;
        self
    }

    /// Marks the frame to be masked with `mask` when encoded, as a client must.
    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }
}
