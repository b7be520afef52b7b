use std::io;

use thiserror::Error;

use super::close::CloseCode;

/// Errors that end a WebSocket session.
///
/// Every variant is terminal for the connection; nothing here is retried.
#[derive(Debug, Error)]
pub enum WsError {
    /// The byte source ended before a frame was complete.
    #[error("connection disconnected")]
    Disconnected,

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("invalid opcode: {0:#X}")]
    InvalidOpcode(u8),

    /// Declared payload length does not fit the platform's signed size.
    #[error("frame length {0} exceeds the maximum representable size")]
    LengthOverflow(u64),

    #[error("unexpected continuation frame")]
    UnexpectedContinuation,

    /// A new text/binary frame arrived while a fragmented message was open.
    #[error("unexpected data frame while a fragmented message is incomplete")]
    UnexpectedIncomplete,

    #[error("control frames must not be fragmented")]
    FragmentedControlFrame,

    #[error("stream ended inside a fragmented message")]
    TruncatedMessage,

    #[error("message of {size} bytes exceeds the limit of {max} bytes")]
    MessageTooLarge { size: usize, max: usize },

    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,

    #[error("invalid close frame payload")]
    InvalidClosePayload,
}

impl WsError {
    /// Close code sent as the best-effort response to this error.
    pub fn close_code(&self) -> CloseCode {
        let code = match self {
            WsError::InvalidUtf8 => CloseCode::INVALID_FRAME_PAYLOAD_DATA,
            WsError::MessageTooLarge { .. } => CloseCode::MESSAGE_TOO_BIG,
            _ => CloseCode::PROTOCOL_ERROR,
        };
        code.with_reason("Protocol Error")
    }

    /// The byte stream itself failed; there is nobody left to send a close to.
    pub fn is_transport(&self) -> bool {
        matches!(self, WsError::Disconnected | WsError::Io(_))
    }
}

impl From<io::Error> for WsError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => WsError::Disconnected,
            _ => WsError::Io(error),
        }
    }
}
