use std::fmt;

use super::error::WsError;

/// Status code and reason carried in a close frame payload.
///
/// The named constants follow the registry at
/// <https://developer.mozilla.org/en-US/docs/Web/API/CloseEvent/code>.
/// The core only carries codes, it never rejects unknown ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CloseCode {
    pub code: u16,
    pub reason: String,
}

impl CloseCode {
    pub const NORMAL_CLOSURE: CloseCode = CloseCode::new(1000);
    pub const GOING_AWAY: CloseCode = CloseCode::new(1001);
    pub const PROTOCOL_ERROR: CloseCode = CloseCode::new(1002);
    pub const UNSUPPORTED_DATA: CloseCode = CloseCode::new(1003);
    pub const NO_STATUS_RECEIVED: CloseCode = CloseCode::new(1005);
    pub const ABNORMAL_CLOSURE: CloseCode = CloseCode::new(1006);
    pub const INVALID_FRAME_PAYLOAD_DATA: CloseCode = CloseCode::new(1007);
    pub const POLICY_VIOLATION: CloseCode = CloseCode::new(1008);
    pub const MESSAGE_TOO_BIG: CloseCode = CloseCode::new(1009);
    pub const MANDATORY_EXTENSION_MISSING: CloseCode = CloseCode::new(1010);
    pub const INTERNAL_SERVER_ERROR: CloseCode = CloseCode::new(1011);
    pub const SERVICE_RESTART: CloseCode = CloseCode::new(1012);
    pub const TRY_AGAIN_LATER: CloseCode = CloseCode::new(1013);
    pub const BAD_GATEWAY: CloseCode = CloseCode::new(1014);
    pub const TLS_HANDSHAKE_FAILURE: CloseCode = CloseCode::new(1015);

    pub const fn new(code: u16) -> Self {
        CloseCode {
            code,
            reason: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Parses a close frame payload.
    ///
    /// An empty payload means the peer sent no status, reported as 1005.
    /// Otherwise the first two bytes are a big-endian code and the rest is
    /// a UTF-8 reason.
    pub fn from_payload(payload: &[u8]) -> Result<Self, WsError> {
        match payload {
            [] => Ok(CloseCode::NO_STATUS_RECEIVED),
            [_] => Err(WsError::InvalidClosePayload),
            [high, low, reason @ ..] => {
                let reason =
                    std::str::from_utf8(reason).map_err(|_| WsError::InvalidClosePayload)?;
                Ok(CloseCode::new(u16::from_be_bytes([*high, *low])).with_reason(reason))
            }
        }
    }

    pub fn to_payload(&self) -> Vec<u8> {
        [&self.code.to_be_bytes()[..], self.reason.as_bytes()].concat()
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} ({})", self.code, self.reason)
        }
    }
}
