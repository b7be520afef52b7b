use futures::stream::{self, Stream};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use super::consts::*;
use super::encoding::apply_mask;
use super::error::WsError;
use super::frame::{Frame, Mask};
use super::opcode::Opcode;

pub async fn read_length_u16<T: AsyncRead + Unpin>(reader: &mut T) -> Result<usize, WsError> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf).await?;
    Ok(u16::from_be_bytes(buf) as usize)
}

pub async fn read_length_u64<T: AsyncRead + Unpin>(reader: &mut T) -> Result<usize, WsError> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf).await?;
    let length = u64::from_be_bytes(buf);
    if length > isize::MAX as u64 {
        return Err(WsError::LengthOverflow(length));
    }
    Ok(length as usize)
}

pub async fn read_mask<T: AsyncRead + Unpin>(reader: &mut T) -> Result<Mask, WsError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Reads one frame, failing with [`WsError::Disconnected`] if the source
/// ends anywhere before the frame is complete.
pub async fn read_frame<T: AsyncRead + Unpin>(reader: &mut T) -> Result<Frame, WsError> {
    next_frame(reader).await?.ok_or(WsError::Disconnected)
}

/// Reads the next frame, or `None` when the source ends cleanly between frames.
pub async fn next_frame<T: AsyncRead + Unpin>(reader: &mut T) -> Result<Option<Frame>, WsError> {
    next_frame_within(reader, None).await
}

/// Like [`next_frame`], but a data frame declaring a payload longer than
/// `max_payload` fails with [`WsError::MessageTooLarge`] before any of
/// its payload is read.
pub async fn next_frame_within<T: AsyncRead + Unpin>(
    reader: &mut T,
    max_payload: Option<usize>,
) -> Result<Option<Frame>, WsError> {
    let mut byte0 = [0u8; 1];
    if reader.read(&mut byte0).await? == 0 {
        return Ok(None);
    }
    read_frame_after(byte0[0], reader, max_payload).await.map(Some)
}

async fn read_frame_after<T: AsyncRead + Unpin>(
    byte0: u8,
    reader: &mut T,
    max_payload: Option<usize>,
) -> Result<Frame, WsError> {
    let opcode = Opcode::decode(byte0)?;
    let byte1 = reader.read_u8().await?;

    let length = match byte1 & LENGTH_MASK {
        LENGTH_U16 => read_length_u16(reader).await?,
        LENGTH_U64 => read_length_u64(reader).await?,
        value => value as usize,
    };
    if let Some(max) = max_payload {
        if opcode.is_data() && length > max {
            return Err(WsError::MessageTooLarge { size: length, max });
        }
    }
    let mask = if is_mask(byte1) {
        Some(read_mask(reader).await?)
    } else {
        None
    };

    // the buffer grows with the bytes that actually arrive, not the declared length
    let mut payload = Vec::new();
    (&mut *reader)
        .take(length as u64)
        .read_to_end(&mut payload)
        .await?;
    if payload.len() < length {
        return Err(WsError::Disconnected);
    }

    if let Some(mask) = mask {
        apply_mask(&mut payload, mask);
    }

    trace!(%opcode, length, fin = is_fin(byte0), "decoded frame");

    Ok(Frame {
        fin: is_fin(byte0),
        rsv1: is_rsv1(byte0),
        rsv2: is_rsv2(byte0),
        rsv3: is_rsv3(byte0),
        opcode,
        mask,
        payload,
    })
}

/// Decodes frames from `reader` until it ends or the first error.
///
/// A clean end between frames finishes the stream; the stream never yields
/// anything after an error. Data frames longer than `max_payload` are
/// rejected from their header.
pub fn decoding_frames<R>(
    reader: R,
    max_payload: Option<usize>,
) -> impl Stream<Item = Result<Frame, WsError>>
where
    R: AsyncRead + Unpin,
{
    stream::unfold(Some(reader), move |state| async move {
        let mut reader = state?;
        match next_frame_within(&mut reader, max_payload).await {
            Ok(Some(frame)) => Some((Ok(frame), Some(reader))),
            Ok(None) => None,
            Err(error) => Some((Err(error), None)),
        }
    })
}
