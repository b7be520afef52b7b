use futures::stream::{self, Stream, StreamExt};

use super::error::WsError;
use super::frame::Frame;
use super::opcode::Opcode;

/// Reassembly state of one connection. At most one fragmented message is
/// ever open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Assembly {
    #[default]
    Idle,
    Accumulating { opcode: Opcode, payload: Vec<u8> },
}

/// Checks framing legality and joins fragmented data frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameValidator {
    max_message_size: Option<usize>,
}

impl FrameValidator {
    pub fn new(max_message_size: Option<usize>) -> Self {
        FrameValidator { max_message_size }
    }

    /// Advances `state` by one frame, returning the next state and the frame
    /// to emit, if any.
    ///
    /// Control frames pass straight through in either state and leave any
    /// open accumulator untouched.
    pub fn transition(
        &self,
        state: Assembly,
        frame: Frame,
    ) -> Result<(Assembly, Option<Frame>), WsError> {
        if frame.opcode.is_control() {
            if !frame.fin {
                return Err(WsError::FragmentedControlFrame);
            }
            return Ok((state, Some(frame)));
        }

        match (state, frame.opcode) {
            (Assembly::Idle, Opcode::Continuation) => Err(WsError::UnexpectedContinuation),
            (Assembly::Idle, opcode) => {
                self.check_size(frame.payload.len())?;
                if frame.fin {
                    Ok((Assembly::Idle, Some(frame)))
                } else {
                    let payload = frame.payload;
                    Ok((Assembly::Accumulating { opcode, payload }, None))
                }
            }
            (Assembly::Accumulating { opcode, mut payload }, Opcode::Continuation) => {
                self.check_size(payload.len() + frame.payload.len())?;
                payload.extend_from_slice(&frame.payload);
                if frame.fin {
                    Ok((Assembly::Idle, Some(Frame::new(opcode, payload))))
                } else {
                    Ok((Assembly::Accumulating { opcode, payload }, None))
                }
            }
            (Assembly::Accumulating { .. }, _) => Err(WsError::UnexpectedIncomplete),
        }
    }

    fn check_size(&self, size: usize) -> Result<(), WsError> {
        match self.max_message_size {
            Some(max) if size > max => Err(WsError::MessageTooLarge { size, max }),
            _ => Ok(()),
        }
    }
}

/// Validates and defragments a decoded frame stream.
///
/// Ending the input while a message is still open yields
/// [`WsError::TruncatedMessage`]. Nothing is yielded after an error.
pub fn validate_frames<S>(
    frames: S,
    validator: FrameValidator,
) -> impl Stream<Item = Result<Frame, WsError>>
where
    S: Stream<Item = Result<Frame, WsError>> + Unpin,
{
    stream::unfold(Some((frames, Assembly::Idle)), move |state| async move {
        let (mut frames, mut assembly) = state?;
        loop {
            match frames.next().await {
                Some(Ok(frame)) => match validator.transition(assembly, frame) {
                    Ok((next, Some(frame))) => return Some((Ok(frame), Some((frames, next)))),
                    Ok((next, None)) => assembly = next,
                    Err(error) => return Some((Err(error), None)),
                },
                Some(Err(error)) => return Some((Err(error), None)),
                None => {
                    return match assembly {
                        Assembly::Idle => None,
                        Assembly::Accumulating { .. } => {
                            Some((Err(WsError::TruncatedMessage), None))
                        }
                    }
                }
            }
        }
    })
}
