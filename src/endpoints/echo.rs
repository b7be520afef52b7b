use futures::future;
use futures::StreamExt;
use tracing::debug;

use crate::shared::types::MessageStream;
use crate::ws::handler::MessageHandler;
use crate::ws::message::Message;

/// Sends every text and binary message straight back.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

impl MessageHandler for EchoHandler {
    fn make_messages(&self, messages: MessageStream) -> MessageStream {
        messages
            .filter(|message| {
                if let Message::Close(code) = message {
                    debug!(%code, "client said goodbye");
                }
                future::ready(!matches!(message, Message::Close(_)))
            })
            .boxed()
    }
}
