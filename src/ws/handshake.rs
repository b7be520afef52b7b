//! Opening handshake, RFC 6455 section 4.2.1.
//!
//! ```text
//! GET /chat HTTP/1.1
//! Host: server.example.com
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==
//! Sec-WebSocket-Version: 13
//!
//! HTTP/1.1 101 Switching Protocols
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=
//! ```

use std::collections::HashSet;

use hyper::header::{self, HeaderName};
use hyper::{HeaderMap, Method, Request};
use sha1::{Digest, Sha1};
use thiserror::Error;
use uuid::Uuid;

use super::consts::{WS_MAGIC_CONST, WS_VERSION};

/// A handshake check that failed. The message is sent back as the body of
/// a `400 Bad Request`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeError {
    #[error("HTTP Request method cannot be upgraded to websocket")]
    MethodNotAccepted,
    #[error("Host header must be present")]
    MissingHost,
    #[error("Upgrade header must be 'websocket'")]
    InvalidUpgrade,
    #[error("Connection header must be present")]
    MissingConnection,
    #[error("Connection header must include 'Upgrade'")]
    ConnectionWithoutUpgrade,
    #[error("Sec-WebSocket-Key header must be present")]
    MissingKey,
    #[error("Sec-WebSocket-Key header must be 16 bytes encoded as base64")]
    InvalidKey,
    #[error("Sec-WebSocket-Version header must be '13'")]
    UnsupportedVersion,
}

fn sha1(msg: &[u8]) -> [u8; 20] {
    let mut hasher = Sha1::new();
    hasher.update(msg);
    hasher.finalize().into()
}

/// `base64(sha1(key + GUID))`, the value of `Sec-WebSocket-Accept`.
pub fn compute_accept_key(key: &str) -> String {
    let concatenated = [key.as_bytes(), WS_MAGIC_CONST.as_bytes()].concat();
    base64::encode(sha1(&concatenated))
}

/// A `Sec-WebSocket-Key` for a client request, built from the 16 bytes of `uuid`.
pub fn make_sec_websocket_key(uuid: Uuid) -> String {
    base64::encode(uuid.as_bytes())
}

pub fn verify_method(method: &Method, accepted: &HashSet<Method>) -> Result<(), HandshakeError> {
    if accepted.contains(method) {
        Ok(())
    } else {
        Err(HandshakeError::MethodNotAccepted)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Checks the upgrade headers in order and returns the client's key.
pub fn verify_headers(headers: &HeaderMap) -> Result<String, HandshakeError> {
    if !headers.contains_key(header::HOST) {
        return Err(HandshakeError::MissingHost);
    }

    match header_str(headers, &header::UPGRADE) {
        Some(upgrade) if upgrade.eq_ignore_ascii_case("websocket") => {}
        _ => return Err(HandshakeError::InvalidUpgrade),
    }

    // repeated field lines are one comma separated list
    let connection = headers.get_all(header::CONNECTION);
    if connection.iter().next().is_none() {
        return Err(HandshakeError::MissingConnection);
    }
    let has_upgrade = connection
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));
    if !has_upgrade {
        return Err(HandshakeError::ConnectionWithoutUpgrade);
    }

    let key = header_str(headers, &header::SEC_WEBSOCKET_KEY).ok_or(HandshakeError::MissingKey)?;
    match base64::decode(key) {
        Ok(decoded) if decoded.len() == 16 => {}
        _ => return Err(HandshakeError::InvalidKey),
    }

    if header_str(headers, &header::SEC_WEBSOCKET_VERSION) != Some(WS_VERSION) {
        return Err(HandshakeError::UnsupportedVersion);
    }

    Ok(key.to_owned())
}

pub fn verify_request<B>(
    request: &Request<B>,
    accepted: &HashSet<Method>,
) -> Result<String, HandshakeError> {
    verify_method(request.method(), accepted)?;
    verify_headers(request.headers())
}
