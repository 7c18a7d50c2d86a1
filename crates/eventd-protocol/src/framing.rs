//! Length-prefixed message framing.
//!
//! Every message on the wire is a 4-byte big-endian length followed by a
//! JSON payload:
//!
//! ```text
//! +----------------+------------------+
//! | length (4 BE)  |  JSON payload    |
//! +----------------+------------------+
//! ```
//!
//! Both sides of the socket build outgoing frames with [`encode_message`]
//! and decode incoming payloads with [`decode_payload`] after reading the
//! prefix themselves; [`decode_message`] handles a complete buffered frame.

use serde::{Serialize, de::DeserializeOwned};

use crate::MAX_MESSAGE_SIZE;
use crate::error::{ProtocolError, ProtocolResult};

/// Encodes a message into a complete frame ready for transmission.
pub fn encode_message<T: Serialize>(message: &T) -> ProtocolResult<Vec<u8>> {
    let json = serde_json::to_vec(message)?;
    let len = json.len() as u32;

    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(4 + json.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&json);
    Ok(frame)
}

/// Validates a frame's length prefix.
///
/// Returns the payload length to read next.
pub fn check_frame_len(len: u32) -> ProtocolResult<usize> {
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }
    if len == 0 {
        return Err(ProtocolError::EmptyMessage);
    }
    Ok(len as usize)
}

/// Decodes a message payload (without the length prefix).
pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> ProtocolResult<T> {
    Ok(serde_json::from_slice(payload)?)
}

/// Decodes a complete buffered frame (length prefix included).
pub fn decode_message<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<T> {
    if data.len() < 4 {
        return Err(ProtocolError::IncompleteMessage {
            expected: 4,
            received: data.len(),
        });
    }

    let mut prefix = [0u8; 4];
    prefix.copy_from_slice(&data[0..4]);
    let len = check_frame_len(u32::from_be_bytes(prefix))?;

    if data.len() < 4 + len {
        return Err(ProtocolError::IncompleteMessage {
            expected: 4 + len,
            received: data.len(),
        });
    }

    decode_payload(&data[4..4 + len])
}
