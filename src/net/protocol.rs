//! Wire message definitions
//! One JSON object per line, discriminated by `type`

use serde::{Deserialize, Serialize};

use crate::game::{ControlState, NetworkSnapshot};

/// Messages exchanged between host and client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Client controls for the current step
    Input { input: ControlState },

    /// Authoritative state from the host
    State { state: NetworkSnapshot },
}

/// Record decoding errors; the record is dropped, the link stays up
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty record")]
    Empty,

    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encode a message as a newline-terminated record
pub fn encode_line(msg: &WireMessage) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = serde_json::to_vec(msg)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Decode one record (without its terminator)
pub fn decode_line(line: &[u8]) -> Result<WireMessage, ProtocolError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    Ok(serde_json::from_slice(line)?)
}
