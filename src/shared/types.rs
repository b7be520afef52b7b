use futures::channel::mpsc::Sender;
use futures::stream::BoxStream;

use crate::ws::error::WsError;
use crate::ws::frame::Frame;
use crate::ws::message::Message;

pub type FrameResult = Result<Frame, WsError>;
pub type FrameStream = BoxStream<'static, FrameResult>;
pub type FrameSender = Sender<FrameResult>;
pub type MessageStream = BoxStream<'static, Message>;
pub type MessageSender = Sender<Message>;
