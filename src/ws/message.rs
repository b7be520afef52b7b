use super::close::CloseCode;

/// Application-level unit exchanged with a [`MessageHandler`](super::handler::MessageHandler).
///
/// `Close` arrives once when the peer closes the session; sending it ends
/// the session with that code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Text(String),
    Binary(Vec<u8>),
    Close(CloseCode),
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for Message {
    fn from(data: Vec<u8>) -> Self {
        Message::Binary(data)
    }
}
