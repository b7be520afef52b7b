use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use super::encoding::encode_frame;
use super::error::WsError;
use super::frame::Frame;
use super::opcode::Opcode;

/// Writes one whole frame and flushes it.
pub async fn write_frame<T: AsyncWrite + Unpin>(writer: &mut T, frame: &Frame) -> Result<(), WsError> {
    let buffer = encode_frame(frame);
    trace!(opcode = %frame.opcode, length = frame.payload.len(), fin = frame.fin, "sending frame");
    writer.write_all(&buffer).await?;
    writer.flush().await?;
    Ok(())
}

/// Writes frames in order until the stream ends or a close frame has been
/// written, then shuts the writer down.
pub async fn write_frames<T, S>(mut writer: T, mut frames: S) -> Result<(), WsError>
where
    T: AsyncWrite + Unpin,
    S: Stream<Item = Frame> + Unpin,
{
    while let Some(frame) = frames.next().await {
        write_frame(&mut writer, &frame).await?;
        if frame.opcode == Opcode::Close {
            debug!("close frame sent");
            break;
        }
    }

    debug!("stopping writing frames");
    writer.shutdown().await?;

    Ok(())
}
