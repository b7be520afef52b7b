use std::sync::Arc;

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::error::WsError;
use super::handler::FrameHandler;
use super::read::decoding_frames;
use super::write::write_frames;

/// Runs one WebSocket session over an upgraded duplex stream.
///
/// Returns once the outgoing frames end or a close frame has been written.
/// Inbound data frames are held to the handler's
/// [`FrameHandler::max_payload_size`] as soon as their header is read.
pub async fn serve_connection<T>(io: T, handler: Arc<dyn FrameHandler>) -> Result<(), WsError>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, writer) = tokio::io::split(io);

    let frames_in = decoding_frames(reader, handler.max_payload_size()).boxed();
    let frames_out = handler.make_frames(frames_in);
    let result = write_frames(writer, frames_out).await;

    debug!(ok = result.is_ok(), "websocket session ended");
    result
}
