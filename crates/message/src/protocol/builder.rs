//! The mutable side of the [`Pdu`] lifecycle.
//!
//! A [`Builder`] holds the same logical fields as a [`Pdu`] but every one of them can be changed.
//! [`Builder::freeze`] serializes the fields to canonical text and parses that text back, so a
//! frozen message is indistinguishable from one that arrived on the wire.
//!
//! # Example
//!
//! ```
//! use micro_message::header::standard;
//! use micro_message::protocol::{Method, Request};
//!
//! let request = Request::builder()
//!     .method(Method::post())
//!     .path("/orders")
//!     .query_param("dry_run", "true")
//!     .header("Host", "shop.example")
//!     .body("{}")
//!     .freeze()
//!     .unwrap();
//!
//! assert_eq!(request.query().get_or("dry_run", false), true);
//! assert_eq!(request.headers().typed(&standard::CONTENT_LENGTH), Some(2));
//! ```

use std::time::SystemTime;

use http::StatusCode;
use tracing::trace;
use uuid::Uuid;

use crate::ensure;
use crate::header::{HeaderDescriptor, HeaderTable, standard};
use crate::protocol::body::Body;
use crate::protocol::error::ParseError;
use crate::protocol::method::Method;
use crate::protocol::pdu::{Pdu, write_head};
use crate::protocol::start_line::{RequestLine, StartLine, StatusLine, normalize_path, reason_phrase};
use crate::protocol::version::HttpVersion;
use crate::utils::is_line_safe;

#[derive(Debug)]
pub struct Builder<L: StartLine> {
    start_line: L,
    headers: HeaderTable,
    body: Body,
    timestamp: SystemTime,
    correlation_id: Uuid,
}

impl<L: StartLine + Default> Builder<L> {
    /// A builder with the default start line, no headers and an empty body.
    pub fn new() -> Self {
        Self::from_parts(L::default(), HeaderTable::new(), Body::Empty, SystemTime::now(), Uuid::new_v4())
    }
}

impl<L: StartLine + Default> Default for Builder<L> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_header(name: &str, values: &[String]) -> Result<(), ParseError> {
    ensure!(!name.is_empty(), ParseError::invalid_header("empty header name"));
    ensure!(
        !name.bytes().any(|b| b == b':' || b.is_ascii_whitespace()),
        ParseError::invalid_header(format!("header name {name:?} contains a colon or whitespace"))
    );
    ensure!(
        values.iter().all(|value| is_line_safe(value)),
        ParseError::invalid_header(format!("value of header {name} contains a line break"))
    );
    Ok(())
}

impl<L: StartLine> Builder<L> {
    pub(crate) fn from_parts(start_line: L, headers: HeaderTable, body: Body, timestamp: SystemTime, correlation_id: Uuid) -> Self {
        Self { start_line, headers, body, timestamp, correlation_id }
    }

    /// Appends a header value.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.put(name, value);
        self
    }

    /// Replaces all values of a header.
    #[must_use]
    pub fn set_header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Sets a header from its typed value.
    #[must_use]
    pub fn typed_header<T>(mut self, descriptor: &HeaderDescriptor<T>, value: &T) -> Self {
        self.headers.set_typed(descriptor, value);
        self
    }

    #[must_use]
    pub fn remove_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    /// Replaces the body; the last body set wins.
    #[must_use]
    pub fn body<B: Into<Body>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn headers_mut(&mut self) -> &mut HeaderTable {
        &mut self.headers
    }

    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    pub fn start_line(&self) -> &L {
        &self.start_line
    }

    /// Produces the immutable message.
    ///
    /// A non-empty buffered body sets `Content-Length`. The start line checks the builder's own
    /// headers before anything is written. The head is serialized canonically and parsed back,
    /// so every error [`Pdu::parse`] can report is reported here too, plus
    /// [`ParseError::InvalidHeader`] for names or values that can't be written as a header line.
    pub fn freeze(mut self) -> Result<Pdu<L>, ParseError> {
        if let Body::Full(bytes) = &self.body
            && !bytes.is_empty()
        {
            self.headers.set_typed(&standard::CONTENT_LENGTH, &(bytes.len() as u64));
        }

        for (name, values) in self.headers.iter() {
            check_header(name, values)?;
        }
        // a second Host would be joined into one line once written
        self.start_line.validate(&self.headers)?;

        let head = write_head(&self.start_line, &self.headers);
        let start_line_end = head.find("\r\n").unwrap_or(head.len());
        ensure!(is_line_safe(&head[..start_line_end]), ParseError::malformed_start_line("start line contains a line break"));

        let pdu = Pdu::parse_with(&head, self.body, self.timestamp, self.correlation_id)?;
        debug_assert_eq!(pdu.head(), head, "canonical head must survive a parse round trip");
        trace!(correlation_id = %pdu.correlation_id(), "froze message");
        Ok(pdu)
    }
}

impl Builder<RequestLine> {
    #[must_use]
    pub fn method<M: Into<Method>>(mut self, method: M) -> Self {
        self.start_line.method = method.into();
        self
    }

    /// Sets the request target; a `?` starts the query, an absolute URL loses scheme and authority.
    #[must_use]
    pub fn path(mut self, target: &str) -> Self {
        let (path, raw_query) = target.split_once('?').unwrap_or((target, ""));
        normalize_path(path).clone_into(&mut self.start_line.path);
        self.start_line.set_raw_query(raw_query);
        self
    }

    /// Replaces the query with already encoded text.
    #[must_use]
    pub fn raw_query(mut self, raw_query: &str) -> Self {
        self.start_line.set_raw_query(raw_query);
        self
    }

    /// Appends one query value, encoding it as needed.
    #[must_use]
    pub fn query_param(mut self, key: &str, value: &str) -> Self {
        let mut query = self.start_line.query.clone();
        query.insert(key, value);
        self.start_line.set_raw_query(&query.encode());
        self
    }

    #[must_use]
    pub fn version(mut self, version: HttpVersion) -> Self {
        self.start_line.version = version;
        self
    }
}

impl Builder<StatusLine> {
    /// Sets the status code and its standard reason phrase.
    #[must_use]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.start_line.status = status;
        reason_phrase(status).clone_into(&mut self.start_line.reason);
        self
    }

    /// Overrides the reason phrase; runs of whitespace collapse to one space.
    #[must_use]
    pub fn reason(mut self, reason: &str) -> Self {
        self.start_line.reason = reason.split_whitespace().collect::<Vec<_>>().join(" ");
        self
    }

    #[must_use]
    pub fn version(mut self, version: HttpVersion) -> Self {
        self.start_line.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Request, Response};
    use bytes::Bytes;

    #[test]
    fn defaults() {
        let response = Response::builder().freeze().unwrap();
        assert_eq!(response.head(), "HTTP/1.1 200 OK\r\n\r\n");

        let result = Request::builder().freeze();
        assert!(matches!(result, Err(ParseError::MissingHostHeader)));

        let request = Request::builder().header("Host", "localhost").freeze().unwrap();
        assert_eq!(request.head(), "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    }

    #[test]
    fn freeze_keeps_identity() {
        let builder = Response::builder().status(StatusCode::CREATED);
        let timestamp = builder.timestamp;
        let correlation_id = builder.correlation_id;

        let response = builder.freeze().unwrap();
        assert_eq!(response.timestamp(), timestamp);
        assert_eq!(response.correlation_id(), correlation_id);

        let again = response.into_builder().reason("Made It").freeze().unwrap();
        assert_eq!(again.correlation_id(), correlation_id);
        assert_eq!(again.head(), "HTTP/1.1 201 Made It\r\n\r\n");
    }

    #[test]
    fn content_length_from_body() {
        let response = Response::builder()
            .header("Content-Length", "999")
            .body("first")
            .body(Bytes::from_static(b"hello world"))
            .freeze()
            .unwrap();

        assert_eq!(response.content_length(), Some(11));
        assert_eq!(response.headers().values("content-length").map(<[String]>::len), Some(1));
    }

    #[test]
    fn unknown_status_has_empty_reason() {
        let response = Response::builder().status(StatusCode::from_u16(599).unwrap()).freeze().unwrap();
        assert_eq!(response.reason(), "");
        assert_eq!(response.head(), "HTTP/1.1 599 \r\n\r\n");
    }

    #[test]
    fn rejects_unsafe_headers() {
        let result = Response::builder().header("X-Evil", "a\r\nInjected: 1").freeze();
        assert!(matches!(result, Err(ParseError::InvalidHeader { .. })));

        let result = Response::builder().header("Bad Name", "1").freeze();
        assert!(matches!(result, Err(ParseError::InvalidHeader { .. })));

        let result = Response::builder().header("", "1").freeze();
        assert!(matches!(result, Err(ParseError::InvalidHeader { .. })));

        let response = Response::builder().reason("Fine\r\nInjected: 1").freeze().unwrap();
        assert_eq!(response.reason(), "Fine Injected: 1");
    }

    #[test]
    fn request_target() {
        let request = Request::builder()
            .method("PROPFIND")
            .path("http://example.com/dav/?depth=1")
            .query_param("name", "a b&c")
            .header("Host", "example.com")
            .version(HttpVersion::Http11)
            .freeze()
            .unwrap();

        assert_eq!(request.method(), &Method::parse("propfind"));
        assert!(request.method().is_safe());
        assert_eq!(request.path(), "/dav/");
        assert_eq!(request.raw_query(), "depth=1&name=a%20b%26c");
        assert_eq!(request.query().last("name"), Some("a b&c"));
    }

    #[test]
    fn frozen_headers_match_builder() {
        let builder = Request::builder()
            .header("Host", "a")
            .header("Accept", "text/html")
            .header("accept", "*/*")
            .header("X-Trace", "1")
            .header("x-trace", "2")
            .typed_header(&standard::CACHE_CONTROL, &vec!["no-cache".to_owned(), "no-store".to_owned()]);
        let expected = builder.headers().clone();

        let request = builder.freeze().unwrap();

        assert_eq!(request.headers(), &expected);
        assert_eq!(expected.values("accept").map(<[String]>::len), Some(2));
        assert_eq!(request.headers().values("accept"), Some(&["text/html, */*".to_owned()][..]));
        assert_eq!(request.headers().values("x-trace").map(<[String]>::len), Some(2));
    }

    #[test]
    fn second_host_is_rejected() {
        let result = Request::builder().header("Host", "a").header("host", "b").freeze();
        assert!(matches!(result, Err(ParseError::MalformedHostHeader { value }) if value == "a, b"));

        let request = Request::builder().header("Host", "a").set_header("Host", "b").freeze().unwrap();
        assert_eq!(request.host().map(|host| host.name().to_owned()), Some("b".to_owned()));
    }

    #[test]
    fn empty_method_is_not_registered() {
        let result = Request::builder().method("").header("Host", "a").freeze();
        assert!(matches!(result, Err(ParseError::MalformedStartLine { .. })));
        assert!(crate::protocol::MethodRegistry::global().get("").is_none());
    }

    #[test]
    fn empty_bodies_have_no_length() {
        let bodies = [Body::from(""), Body::from(String::new()), Body::from(Vec::new()), Body::full(Bytes::new())];
        for body in bodies {
            let response = Response::builder().body(body).freeze().unwrap();
            assert!(response.body().is_empty());
            assert_eq!(response.content_length(), None);
            assert_eq!(response.head(), "HTTP/1.1 200 OK\r\n\r\n");
        }
    }

    #[test]
    fn whitespace_in_path_is_rejected() {
        let result = Request::builder().path("/a b").header("Host", "x").freeze();
        assert!(matches!(result, Err(ParseError::MalformedStartLine { .. })));
    }
}
