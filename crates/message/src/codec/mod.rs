//! `tokio_util` codecs for message heads.
//!
//! - [`HeadDecoder`]: splits a head off a [`BytesMut`](bytes::BytesMut) and parses it into a
//!   [`Pdu`](crate::protocol::Pdu), leaving the body bytes in the buffer
//! - [`HeadEncoder`]: writes the canonical head of a [`Pdu`](crate::protocol::Pdu)
//! - [`Limits`]: the size limits the decoder enforces, 8 KiB and 64 headers by default
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_message::codec::RequestHeadDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut buf = BytesMut::from("POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello");
//! let request = RequestHeadDecoder::new().decode(&mut buf).unwrap().unwrap();
//!
//! assert_eq!(request.content_length(), Some(5));
//! assert_eq!(&buf[..], b"hello");
//! ```

mod head_decoder;
mod head_encoder;
mod limits;

pub use head_decoder::HeadDecoder;
pub use head_decoder::RequestHeadDecoder;
pub use head_decoder::ResponseHeadDecoder;
pub use head_encoder::HeadEncoder;
pub use limits::DEFAULT_MAX_HEAD_BYTES;
pub use limits::DEFAULT_MAX_HEADERS;
pub use limits::Limits;
