//! Newline framing over a growable receive buffer

use bytes::{Buf, BytesMut};

/// Records longer than this without a terminator are discarded
pub const MAX_RECORD_LEN: usize = 64 * 1024;

/// Accumulates stream bytes and yields complete lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
    /// Dropping the tail of an oversized record until its newline
    skipping: bool,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(4096),
            skipping: false,
        }
    }

    /// Buffer for `AsyncReadExt::read_buf`
    pub fn buf_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    /// Pop the next complete line, without its terminator
    pub fn next_line(&mut self) -> Option<BytesMut> {
        loop {
            match self.buf.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    let mut line = self.buf.split_to(pos + 1);
                    line.truncate(pos);
                    if self.skipping {
                        self.skipping = false;
                        continue;
                    }
                    return Some(line);
                }
                None => {
                    if self.buf.len() > MAX_RECORD_LEN {
                        tracing::debug!(len = self.buf.len(), "Discarding oversized record");
                        self.buf.advance(self.buf.len());
                        self.skipping = true;
                    }
                    return None;
                }
            }
        }
    }
}
