pub mod close;
pub mod connection;
pub mod consts;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod handler;
pub mod handshake;
pub mod message;
pub mod opcode;
pub mod read;
pub mod validator;
pub mod write;

pub use close::CloseCode;
pub use connection::serve_connection;
pub use error::WsError;
pub use frame::{Frame, Mask};
pub use handler::{FrameHandler, MessageFrameHandler, MessageHandler};
pub use handshake::{compute_accept_key, HandshakeError};
pub use message::Message;
pub use opcode::Opcode;
