use std::io;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{Pdu, StartLine};

/// Writes the canonical head of a [`Pdu`].
///
/// The body is not written, streaming it is up to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadEncoder;

impl<L: StartLine> Encoder<&Pdu<L>> for HeadEncoder {
    type Error = io::Error;

    fn encode(&mut self, item: &Pdu<L>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let head = item.head().as_bytes();
        dst.reserve(head.len());
        dst.put_slice(head);
        Ok(())
    }
}
