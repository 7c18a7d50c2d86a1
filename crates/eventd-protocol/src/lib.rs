//! IPC framing and request/response types for eventd.
//!
//! Protocol v1: length-prefixed JSON over a Unix socket.
//!
//! - 4 bytes: message length (u32, big-endian)
//! - N bytes: JSON payload
//!
//! Every message is wrapped in an [`Envelope`] carrying the protocol
//! version and a request id for correlation.

mod error;
mod framing;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{check_frame_len, decode_message, decode_payload, encode_message};
pub use types::{Envelope, ErrorCode, ErrorResponse, Request, Response, StatusInfo};

/// Protocol version constant.
pub const PROTOCOL_VERSION: &str = "1";

/// Maximum message size (256 KiB).
pub const MAX_MESSAGE_SIZE: u32 = 256 * 1024;
