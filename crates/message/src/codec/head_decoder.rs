//! Decoder that separates a message head from a byte stream.
//!
//! The decoder scans the buffer for the first empty line, enforces the configured [`Limits`] while
//! doing so, and hands the head text to [`Pdu::parse`]. Bytes after the empty line are left in the
//! buffer untouched: they belong to the body, which is framed by a higher layer.
//!
//! Empty lines before the start line are skipped, as RFC 9112 asks of servers.

use std::marker::PhantomData;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{trace, warn};

use crate::codec::limits::Limits;
use crate::ensure;
use crate::protocol::{Body, ParseError, Pdu, RequestLine, StartLine, StatusLine};

/// Decodes a [`Pdu`] head with an empty body.
#[derive(Debug, Clone)]
pub struct HeadDecoder<L> {
    limits: Limits,
    _start_line: PhantomData<fn() -> L>,
}

pub type RequestHeadDecoder = HeadDecoder<RequestLine>;
pub type ResponseHeadDecoder = HeadDecoder<StatusLine>;

impl<L> HeadDecoder<L> {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits, _start_line: PhantomData }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }
}

impl<L> Default for HeadDecoder<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops the empty lines a peer may send between messages.
fn skip_leading_empty_lines(src: &mut BytesMut) {
    loop {
        if src.starts_with(b"\r\n") {
            src.advance(2);
        } else if src.starts_with(b"\n") {
            src.advance(1);
        } else {
            return;
        }
    }
}

/// Finds the length of the head, terminating empty line included.
///
/// Returns `Ok(None)` if the buffer doesn't hold a complete head yet.
fn find_head_end(src: &[u8], limits: Limits) -> Result<Option<usize>, ParseError> {
    let mut line_start = 0;
    let mut lines = 0;

    for (index, _) in src.iter().enumerate().filter(|&(_, &b)| b == b'\n') {
        let line = &src[line_start..index];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return Ok(Some(index + 1));
        }

        lines += 1;
        // the start line isn't a header
        ensure!(lines - 1 <= limits.max_headers(), ParseError::too_many_headers(limits.max_headers()));
        line_start = index + 1;
    }

    Ok(None)
}

impl<L: StartLine> Decoder for HeadDecoder<L> {
    type Item = Pdu<L>;
    type Error = ParseError;

    /// Attempts to decode one head from `src`.
    ///
    /// - `Ok(Some(pdu))` if a complete head was parsed; the body bytes remain in `src`
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if a limit is exceeded or the head is malformed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        skip_leading_empty_lines(src);
        if src.is_empty() {
            return Ok(None);
        }

        let max_head_bytes = self.limits.max_head_bytes();
        let Some(head_end) = find_head_end(src, self.limits)? else {
            if src.len() > max_head_bytes {
                warn!(current_size = src.len(), max_size = max_head_bytes, "incomplete head exceeds the limit");
                return Err(ParseError::too_large_header(src.len(), max_head_bytes));
            }
            return Ok(None);
        };

        if head_end > max_head_bytes {
            warn!(current_size = head_end, max_size = max_head_bytes, "head exceeds the limit");
            return Err(ParseError::too_large_header(head_end, max_head_bytes));
        }

        let head = src.split_to(head_end).freeze();
        let text = std::str::from_utf8(&head)?;
        trace!(head_size = head_end, remaining = src.len(), "split head from buffer");

        Pdu::parse(text, Body::empty()).map(Some)
    }
}
