//! Bridges validated frames to application messages and back.
//!
//! ```text
//!  frames in ──▶ validate ──▶ split ──▶ messages in ──▶ application
//!                               │                           │
//!                         pong / close                      ▼
//!                               │                      messages out
//!                               ▼                           │
//!                           frames out ◀──── merge ◀────────┘
//! ```
//!
//! Split and merge run as two concurrent tasks sharing one outgoing sink.
//! Whichever finishes first cancels the other and closes the sink.

use std::sync::Arc;

use futures::channel::mpsc;
use futures::stream::{self, BoxStream, StreamExt};
use futures::SinkExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

use super::close::CloseCode;
use super::error::WsError;
use super::frame::Frame;
use super::message::Message;
use super::opcode::Opcode;
use super::validator::{validate_frames, FrameValidator};
use crate::config::WsConfig;
use crate::shared::types::*;

/// Turns the decoded frames of one connection into the frames to send back.
pub trait FrameHandler: Send + Sync + 'static {
    fn make_frames(&self, frames: FrameStream) -> BoxStream<'static, Frame>;

    /// Largest data frame payload the decoder should accept, unbounded when `None`.
    fn max_payload_size(&self) -> Option<usize> {
        None
    }
}

/// Application side of a session: consumes inbound messages, produces
/// outbound ones. The session ends when the returned stream ends.
pub trait MessageHandler: Send + Sync + 'static {
    fn make_messages(&self, messages: MessageStream) -> MessageStream;
}

impl<F> MessageHandler for F
where
    F: Fn(MessageStream) -> MessageStream + Send + Sync + 'static,
{
    fn make_messages(&self, messages: MessageStream) -> MessageStream {
        self(messages)
    }
}

/// What an inbound frame turns into.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Message(Message),
    Respond(Frame),
    Discard,
    Close(CloseCode),
}

pub fn route_frame(frame: Frame) -> Result<Inbound, WsError> {
    match frame.opcode {
        Opcode::Text => String::from_utf8(frame.payload)
            .map(|text| Inbound::Message(Message::Text(text)))
            .map_err(|_| WsError::InvalidUtf8),
        Opcode::Binary => Ok(Inbound::Message(Message::Binary(frame.payload))),
        Opcode::Ping => Ok(Inbound::Respond(Frame::pong(frame.payload))),
        Opcode::Pong => Ok(Inbound::Discard),
        Opcode::Close => CloseCode::from_payload(&frame.payload).map(Inbound::Close),
        Opcode::Continuation => Err(WsError::UnexpectedContinuation),
    }
}

pub fn split_message(message: Message, frame_size: usize) -> Vec<Frame> {
    match message {
        Message::Text(text) => make_frames(Opcode::Text, text.into_bytes(), frame_size),
        Message::Binary(data) => make_frames(Opcode::Binary, data, frame_size),
        Message::Close(code) => vec![Frame::close(&code)],
    }
}

/// Splits `payload` into frames of at most `frame_size` bytes. The first
/// frame carries `opcode`, the rest are continuations, only the last is
/// final. An empty payload still makes one frame.
pub fn make_frames(opcode: Opcode, payload: Vec<u8>, frame_size: usize) -> Vec<Frame> {
    let size = frame_size.max(1);
    if payload.len() <= size {
        return vec![Frame::new(opcode, payload)];
    }
    let last = (payload.len() - 1) / size;
    payload
        .chunks(size)
        .enumerate()
        .map(|(i, chunk)| {
            let opcode = if i == 0 { opcode } else { Opcode::Continuation };
            Frame::new(opcode, chunk.to_vec()).with_fin(i == last)
        })
        .collect()
}

/// [`FrameHandler`] that speaks messages to a [`MessageHandler`] and
/// answers pings and closes itself.
pub struct MessageFrameHandler {
    handler: Arc<dyn MessageHandler>,
    config: WsConfig,
}

impl MessageFrameHandler {
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self::with_config(handler, WsConfig::default())
    }

    pub fn with_config(handler: Arc<dyn MessageHandler>, config: WsConfig) -> Self {
        MessageFrameHandler { handler, config }
    }
}

impl FrameHandler for MessageFrameHandler {
    /// Spawns the bridge onto the current tokio runtime. Dropping the
    /// returned stream aborts it.
    fn make_frames(&self, frames: FrameStream) -> BoxStream<'static, Frame> {
        let validator = FrameValidator::new(self.config.max_message_size);
        let frames_in = validate_frames(frames, validator).boxed();

        let (messages_in, messages) = mpsc::channel(self.config.channel_capacity);
        let messages_out = self.handler.make_messages(messages.boxed());

        let (frames_out, server_frames) = mpsc::channel(self.config.channel_capacity);
        let task = tokio::spawn(
            run(
                frames_in,
                frames_out,
                messages_in,
                messages_out,
                self.config.frame_size,
            )
            .in_current_span(),
        );

        protocol_frames(server_frames, TaskGuard(task))
    }

    fn max_payload_size(&self) -> Option<usize> {
        self.config.max_message_size
    }
}

type SharedSink = Arc<Mutex<FrameSender>>;

async fn run(
    frames_in: FrameStream,
    frames_out: FrameSender,
    messages_in: MessageSender,
    messages_out: MessageStream,
    frame_size: usize,
) {
    let sink: SharedSink = Arc::new(Mutex::new(frames_out));
    let inbound = split_frames(frames_in, sink.clone(), messages_in);
    let outbound = merge_messages(messages_out, sink.clone(), frame_size);

    tokio::select! {
        _ = inbound => debug!("inbound frames finished"),
        _ = outbound => debug!("outbound messages finished"),
    }

    sink.lock().await.close_channel();
}

async fn split_frames(mut frames: FrameStream, sink: SharedSink, mut messages_in: MessageSender) {
    while let Some(frame) = frames.next().await {
        match frame.and_then(route_frame) {
            Ok(Inbound::Message(message)) => {
                if messages_in.send(message).await.is_err() {
                    debug!("application stopped reading messages");
                }
            }
            Ok(Inbound::Respond(frame)) => {
                if sink.lock().await.send(Ok(frame)).await.is_err() {
                    return;
                }
            }
            Ok(Inbound::Discard) => {}
            Ok(Inbound::Close(code)) => {
                debug!(%code, "peer closed the session");
                let _ = messages_in.try_send(Message::Close(code));
                let goodbye = CloseCode::NORMAL_CLOSURE.with_reason("Goodbye");
                let _ = sink.lock().await.send(Ok(Frame::close(&goodbye))).await;
                return;
            }
            Err(error) => {
                let _ = sink.lock().await.send(Err(error)).await;
                return;
            }
        }
    }
}

async fn merge_messages(mut messages: MessageStream, sink: SharedSink, frame_size: usize) {
    while let Some(message) = messages.next().await {
        let closing = matches!(message, Message::Close(_));
        let frames = split_message(message, frame_size);

        // held for the whole message so its fragments stay contiguous
        let mut sink = sink.lock().await;
        for frame in frames {
            if sink.send(Ok(frame)).await.is_err() {
                return;
            }
        }
        if closing {
            return;
        }
    }
}

struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Ends the outgoing stream at the first error, with a close frame unless
/// the transport itself failed.
fn protocol_frames(
    frames: mpsc::Receiver<FrameResult>,
    guard: TaskGuard,
) -> BoxStream<'static, Frame> {
    stream::unfold(Some((frames, guard)), |state| async move {
        let (mut frames, guard) = state?;
        match frames.next().await? {
            Ok(frame) => Some((frame, Some((frames, guard)))),
            Err(error) if error.is_transport() => {
                debug!(%error, "transport failed");
                None
            }
            Err(error) => {
                warn!(%error, "closing session after protocol error");
                Some((Frame::close(&error.close_code()), None))
            }
        }
    })
    .boxed()
}
