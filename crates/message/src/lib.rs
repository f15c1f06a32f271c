//! A typed HTTP/1.x message model
//!
//! This crate turns the text of an HTTP/1.0 or HTTP/1.1 message head into a strongly typed,
//! immutable protocol data unit, and turns programmatically assigned fields back into canonical
//! wire text. It sits between a transport, which separates header text from body bytes, and the
//! application code that inspects and produces messages.
//!
//! # Features
//!
//! - Case-insensitive, multi-valued, insertion ordered header storage
//! - Typed header access through static descriptors that never fail: an unparsable value reads
//!   as absent
//! - Request-line and status-line parsing with the mandatory `Host` check of HTTP/1.1
//! - An open method registry that interns WebDAV and extension methods on first sight
//! - Multi-valued query strings with best-effort typed accessors and include/exclude filters
//! - Quality value driven negotiation for `Accept`, `Accept-Encoding`, `Accept-Language` and
//!   `Accept-Charset`
//! - Immutable messages with a builder that freezes through a serialize/parse round trip
//! - `tokio_util` codecs for message heads
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use micro_message::header::standard;
//! use micro_message::protocol::{Body, Request, Response};
//!
//! let head = "GET /users?fields=name,email HTTP/1.1\r\n\
//!             Host: api.example\r\n\
//!             Accept: text/html;q=0.5, application/json;q=0.9\r\n\r\n";
//! let request = Request::parse(head, Body::empty()).unwrap();
//!
//! let content_type = request.negotiate(&[mime::TEXT_HTML, mime::APPLICATION_JSON]);
//! assert_eq!(content_type, mime::APPLICATION_JSON);
//! assert_eq!(request.query().get("fields").unwrap().len(), 2);
//!
//! let response = Response::builder()
//!     .status(StatusCode::OK)
//!     .typed_header(&standard::CONTENT_TYPE, &content_type)
//!     .body(r#"[{"name":"zava"}]"#)
//!     .freeze()
//!     .unwrap();
//!
//! assert_eq!(response.head(), "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 17\r\n\r\n");
//! ```
//!
//! # Architecture
//!
//! - [`header`]: header storage, descriptors and the standard header registry
//! - [`protocol`]: start lines, methods, queries, bodies and the message types
//! - [`negotiation`]: `Accept` and quality list negotiation
//! - [`codec`]: head decoder and encoder for `tokio_util` framed transports
//!
//! # Error Handling
//!
//! Only structural problems are errors, all of them reported as [`protocol::ParseError`]: a
//! malformed start line, an unsupported protocol version, a missing or malformed `Host` header,
//! a header that can't be written to the wire, and exceeded decoder limits. Anything else
//! degrades: unparsable header values read as absent, unparsable query values fall back to the
//! caller's default, and negotiation always produces an answer.
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - obsolete line folding is not supported, continuation lines are read as separate headers
//! - IPv6 literals in the `Host` header are rejected as malformed
//! - the method registry only grows, every distinct method token received stays registered

pub mod codec;
pub mod header;
pub mod negotiation;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
