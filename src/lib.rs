//! WebSocket protocol engine for a hyper server: RFC 6455 handshake,
//! frame codec, fragment reassembly and a message bridge that runs the
//! inbound and outbound halves of a session concurrently.

pub mod config;
pub mod endpoints;
pub mod shared;
pub mod utils;
pub mod ws;

pub use config::WsConfig;
