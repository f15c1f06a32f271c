//! The immutable protocol data unit.
//!
//! A [`Pdu`] is produced either by parsing a header block or by freezing a
//! [`Builder`](crate::protocol::Builder). In both cases it holds the canonical head text next to the
//! parsed form, so `pdu.head()` is always what `Builder::freeze` would produce for the same fields.
//!
//! # Example
//!
//! ```
//! use micro_message::protocol::{Body, Request};
//!
//! let head = "GET /search?q=rust&page=2 HTTP/1.1\r\nhost: example.com\r\naccept: text/html\r\n\r\n";
//! let request = Request::parse(head, Body::empty()).unwrap();
//!
//! assert_eq!(request.path(), "/search");
//! assert_eq!(request.query().get_or("page", 1_u32), 2);
//! assert_eq!(request.host().unwrap().name(), "example.com");
//! assert_eq!(request.head(), "GET /search?q=rust&page=2 HTTP/1.1\r\nHost: example.com\r\nAccept: text/html\r\n\r\n");
//! ```

use std::time::SystemTime;

use mime::Mime;
use tracing::trace;
use uuid::Uuid;

use crate::header::{HeaderTable, Host, standard};
use crate::negotiation::AcceptList;
use crate::protocol::body::Body;
use crate::protocol::builder::Builder;
use crate::protocol::error::ParseError;
use crate::protocol::method::Method;
use crate::protocol::query::QueryString;
use crate::protocol::start_line::{RequestLine, StartLine, StatusLine};
use crate::protocol::version::HttpVersion;

/// A parsed, immutable message.
#[derive(Debug)]
pub struct Pdu<L: StartLine> {
    start_line: L,
    headers: HeaderTable,
    body: Body,
    head: String,
    timestamp: SystemTime,
    correlation_id: Uuid,
}

pub type Request = Pdu<RequestLine>;
pub type Response = Pdu<StatusLine>;

/// Splits a header block into lines, accepting CRLF and bare LF, up to the first empty line.
fn head_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)).take_while(|line| !line.is_empty())
}

/// Canonical `start-line CRLF *(header CRLF) CRLF`.
pub(crate) fn write_head<L: StartLine>(start_line: &L, headers: &HeaderTable) -> String {
    let mut head = String::with_capacity(256);
    start_line.write_to(&mut head);
    head.push_str("\r\n");
    headers.write_to(&mut head);
    head.push_str("\r\n");
    head
}

impl<L: StartLine> Pdu<L> {
    /// Parses a header block; `body` is attached as is.
    ///
    /// Anything after the first empty line is ignored.
    pub fn parse(text: &str, body: Body) -> Result<Self, ParseError> {
        Self::parse_with(text, body, SystemTime::now(), Uuid::new_v4())
    }

    pub(crate) fn parse_with(text: &str, body: Body, timestamp: SystemTime, correlation_id: Uuid) -> Result<Self, ParseError> {
        let mut lines = head_lines(text);
        let start_line = L::parse(lines.next().unwrap_or_default())?;

        let mut headers = HeaderTable::new();
        for line in lines {
            headers.put_line(line);
        }

        start_line.validate(&headers)?;

        let head = write_head(&start_line, &headers);
        trace!(%correlation_id, headers = headers.len(), "parsed message head");
        Ok(Self { start_line, headers, body, head, timestamp, correlation_id })
    }

    #[inline]
    pub fn start_line(&self) -> &L {
        &self.start_line
    }

    #[inline]
    pub fn version(&self) -> HttpVersion {
        self.start_line.version()
    }

    #[inline]
    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The canonical head, including the terminating empty line.
    #[inline]
    pub fn head(&self) -> &str {
        &self.head
    }

    /// When the message was created: parse time, or builder creation time for frozen messages.
    #[inline]
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// A random id that tags this message in logs.
    #[inline]
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn content_type(&self) -> Option<Mime> {
        self.headers.typed(&standard::CONTENT_TYPE)
    }

    pub fn content_length(&self) -> Option<u64> {
        self.headers.typed(&standard::CONTENT_LENGTH)
    }

    /// Whether the connection stays open after this message.
    ///
    /// `Connection: close` and `Connection: keep-alive` decide explicitly, otherwise HTTP/1.1
    /// defaults to keep-alive and HTTP/1.0 to close.
    pub fn keep_alive(&self) -> bool {
        let tokens = self.headers.get(&standard::CONNECTION);
        if tokens.iter().any(|token| token.eq_ignore_ascii_case("close")) {
            false
        } else if tokens.iter().any(|token| token.eq_ignore_ascii_case("keep-alive")) {
            true
        } else {
            self.version() == HttpVersion::Http11
        }
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    pub fn into_parts(self) -> (L, HeaderTable, Body) {
        (self.start_line, self.headers, self.body)
    }

    /// Turns the message back into a builder with the same fields, timestamp and correlation id.
    pub fn into_builder(self) -> Builder<L> {
        Builder::from_parts(self.start_line, self.headers, self.body, self.timestamp, self.correlation_id)
    }
}

impl Request {
    pub fn builder() -> Builder<RequestLine> {
        Builder::new()
    }

    #[inline]
    pub fn method(&self) -> &Method {
        self.start_line.method()
    }

    #[inline]
    pub fn path(&self) -> &str {
        self.start_line.path()
    }

    #[inline]
    pub fn raw_query(&self) -> &str {
        self.start_line.raw_query()
    }

    #[inline]
    pub fn query(&self) -> &QueryString {
        self.start_line.query()
    }

    /// The `Host` header; `None` if absent or malformed, which only HTTP/1.0 requests can be.
    pub fn host(&self) -> Option<Host> {
        self.headers.typed(&standard::HOST)
    }

    /// The `Accept` header, empty if absent.
    pub fn accept(&self) -> AcceptList {
        self.headers.get(&standard::ACCEPT)
    }

    /// The content type to respond with, given what the server can produce.
    pub fn negotiate(&self, offered: &[Mime]) -> Mime {
        self.accept().best_match(offered)
    }

    /// True if the client waits for `100 Continue` before sending the body.
    pub fn expects_continue(&self) -> bool {
        self.headers.typed(&standard::EXPECT).is_some_and(|expect| expect.eq_ignore_ascii_case("100-continue"))
    }

    /// Builds the equivalent `http::Request` head for handing the message to `http` based code.
    pub fn to_http_head(&self) -> Result<http::Request<()>, http::Error> {
        let target = if self.raw_query().is_empty() { self.path().to_owned() } else { format!("{}?{}", self.path(), self.raw_query()) };
        let mut builder = http::Request::builder().method(self.method().as_str()).uri(target).version(self.version().into());
        for (name, values) in self.headers.iter() {
            for value in values {
                builder = builder.header(name, value.as_str());
            }
        }
        builder.body(())
    }
}

impl Response {
    pub fn builder() -> Builder<StatusLine> {
        Builder::new()
    }

    #[inline]
    pub fn status(&self) -> http::StatusCode {
        self.start_line.status()
    }

    #[inline]
    pub fn reason(&self) -> &str {
        self.start_line.reason()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use indoc::indoc;

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    #[test]
    fn from_curl() {
        let text = crlf(indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let request = Request::parse(&text, Body::empty()).unwrap();

        assert_eq!(request.method(), &Method::get());
        assert_eq!(request.version(), HttpVersion::Http11);
        assert_eq!(request.path(), "/index.html");
        assert!(request.query().is_empty());
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.host(), Some(Host::new("127.0.0.1", Some(8080))));
        assert_eq!(request.headers().get(&standard::USER_AGENT), "curl/7.79.1");
        assert_eq!(request.head(), text);
        assert!(request.keep_alive());
    }

    #[test]
    fn from_edge() {
        let text = indoc! {r##"
        GET /index/?a=1&b=2&a=3 HTTP/1.1
        Host: 127.0.0.1:8080
        Connection: keep-alive
        Cache-Control: max-age=0
        sec-ch-ua: "#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109"
        sec-ch-ua-mobile: ?0
        sec-ch-ua-platform: "macOS"
        Upgrade-Insecure-Requests: 1
        User-Agent: Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36
        Accept: text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9
        Sec-Fetch-Site: none
        Sec-Fetch-Mode: navigate
        Sec-Fetch-User: ?1
        Sec-Fetch-Dest: document
        Accept-Encoding: gzip, deflate, br
        Accept-Language: zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7

        "##};

        let request = Request::parse(text, Body::empty()).unwrap();

        assert_eq!(request.path(), "/index/");
        assert_eq!(request.raw_query(), "a=1&b=2&a=3");
        assert_eq!(request.query().get("a").map(<[String]>::len), Some(2));
        assert_eq!(request.headers().len(), 15);
        assert_eq!(request.headers().first("sec-ch-ua-platform"), Some("\"macOS\""));
        assert_eq!(request.accept().len(), 7);
        assert_eq!(request.negotiate(&[mime::TEXT_HTML, mime::APPLICATION_JSON]), mime::TEXT_HTML);
        assert_eq!(request.headers().get(&standard::ACCEPT_ENCODING).preferred(&["br", "gzip"]), Some("br"));
        assert_eq!(request.headers().get(&standard::ACCEPT_LANGUAGE).preferred(&["en", "zh"]), Some("zh"));
    }

    #[test]
    fn body_after_blank_line_is_ignored() {
        let request = Request::parse("POST /upload HTTP/1.0\n\nnot a header\n", Body::from("payload")).unwrap();
        assert!(request.headers().is_empty());
        assert_eq!(request.body().as_bytes().map(|bytes| &bytes[..]), Some(&b"payload"[..]));
        assert!(!request.keep_alive());
    }

    #[test]
    fn missing_host() {
        let result = Request::parse("GET / HTTP/1.1\r\nAccept: */*\r\n\r\n", Body::empty());
        assert!(matches!(result, Err(ParseError::MissingHostHeader)));
    }

    #[test]
    fn empty_head() {
        assert!(matches!(Request::parse("", Body::empty()), Err(ParseError::MalformedStartLine { .. })));
        assert!(matches!(Response::parse("\r\n\r\n", Body::empty()), Err(ParseError::MalformedStartLine { .. })));
    }

    #[test]
    fn connection_semantics() {
        let request = Request::parse("GET / HTTP/1.1\r\nHost: a\r\nConnection: Upgrade, close\r\n\r\n", Body::empty()).unwrap();
        assert!(!request.keep_alive());

        let request = Request::parse("GET / HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n", Body::empty()).unwrap();
        assert!(request.keep_alive());
        assert!(request.host().is_none());

        let request = Request::parse("PUT /f HTTP/1.1\r\nHost: a\r\nExpect: 100-Continue\r\n\r\n", Body::empty()).unwrap();
        assert!(request.expects_continue());
    }

    #[test]
    fn parse_response() {
        let text = "HTTP/1.1 404 Not Found\r\ncontent-type: text/plain\r\ncontent-length: 9\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n";
        let response = Response::parse(text, Body::from("not found")).unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.reason(), "Not Found");
        assert_eq!(response.content_type(), Some(mime::TEXT_PLAIN));
        assert_eq!(response.content_length(), Some(9));
        assert_eq!(response.headers().get(&standard::SET_COOKIE).len(), 2);
        assert_eq!(
            response.head(),
            "HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nContent-Length: 9\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n"
        );
    }

    #[test]
    fn to_http_head() {
        let text = "DELETE /items/7?force=true HTTP/1.1\r\nHost: example.com\r\nX-Trace: 1\r\nX-Trace: 2\r\n\r\n";
        let request = Request::parse(text, Body::empty()).unwrap();
        let head = request.to_http_head().unwrap();

        assert_eq!(head.method(), http::Method::DELETE);
        assert_eq!(head.uri().path(), "/items/7");
        assert_eq!(head.uri().query(), Some("force=true"));
        assert_eq!(head.version(), http::Version::HTTP_11);
        assert_eq!(head.headers().get_all("x-trace").iter().count(), 2);
        assert_eq!(head.headers().get(http::header::HOST).unwrap(), "example.com");
    }
}
