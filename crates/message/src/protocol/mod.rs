//! The message model: start lines, methods, queries, bodies and the PDU/builder pair.
//!
//! # Components
//!
//! - **Start lines** ([`StartLine`]): [`RequestLine`] and [`StatusLine`] parsing and
//!   serialization, including the mandatory `Host` check of HTTP/1.1 requests
//! - **Methods** ([`Method`], [`MethodRegistry`]): an open registry that interns every method token
//! - **Queries** ([`QueryString`], [`QueryFilter`]): multi-valued query decoding with typed,
//!   best-effort accessors
//! - **Bodies** ([`Body`]): empty, buffered or streamed content implementing `http_body::Body`
//! - **Messages** ([`Pdu`], [`Builder`]): the immutable message and its mutable counterpart
//! - **Errors** ([`ParseError`]): structural failures while parsing or freezing a head
//!
//! # Lifecycle
//!
//! Messages are created in one of two ways: [`Pdu::parse`] turns a header block into a message, and
//! [`Builder::freeze`] turns programmatically assigned fields into one by serializing them and
//! parsing the result. [`Pdu::into_builder`] goes the other way when a message needs changes.

mod body;
mod builder;
mod error;
mod method;
mod pdu;
mod query;
mod start_line;
mod version;

pub use body::Body;
pub use body::BoxError;
pub use builder::Builder;
pub use error::ParseError;
pub use method::Method;
pub use method::MethodRegistry;
pub use pdu::Pdu;
pub use pdu::Request;
pub use pdu::Response;
pub use query::QueryFilter;
pub use query::QueryString;
pub use start_line::RequestLine;
pub use start_line::StartLine;
pub use start_line::StatusLine;
pub use start_line::reason_phrase;
pub use version::HttpVersion;
