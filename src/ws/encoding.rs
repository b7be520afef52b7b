//! Frame to bytes, RFC 6455 section 5.2.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! +---------------------------------------------------------------+
//! ```

use super::consts::*;
use super::frame::{Frame, Mask};

pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    let byte0: &[u8] = &[encode_byte0(frame)];
    let length = encode_length(frame.payload.len(), frame.mask.is_some());
    match frame.mask {
        Some(mask) => {
            let mut payload = frame.payload.clone();
            apply_mask(&mut payload, mask);
            [byte0, &length[..], &mask[..], &payload[..]].concat()
        }
        None => [byte0, &length[..], &frame.payload[..]].concat(),
    }
}

pub fn encode_byte0(frame: &Frame) -> u8 {
    bit(frame.fin, FIN_MASK)
        | bit(frame.rsv1, RSV1_MASK)
        | bit(frame.rsv2, RSV2_MASK)
        | bit(frame.rsv3, RSV3_MASK)
        | frame.opcode.encode()
}

/// Encodes the second header byte plus any extended length.
///
/// The high bit of the first returned byte is the mask flag.
pub fn encode_length(length: usize, masked: bool) -> Vec<u8> {
    let flag = bit(masked, MASKED_MASK);
    if length <= MAX_SHORT_LENGTH {
        // the first byte is the length
        vec![flag | length as u8]
    } else if length <= u16::MAX as usize {
        // the first byte is 126, the next 2 bytes are a u16 length
        [&[flag | LENGTH_U16][..], &(length as u16).to_be_bytes()[..]].concat()
    } else {
        // the first byte is 127, the next 8 bytes are a u64 length
        [&[flag | LENGTH_U64][..], &(length as u64).to_be_bytes()[..]].concat()
    }
}

/// XORs `payload` with `mask` in place. Applying it twice is a no-op.
pub fn apply_mask(payload: &mut [u8], mask: Mask) {
    for (i, byte) in payload.iter_mut().enumerate() {
        *byte ^= mask[i % 4];
    }
}
