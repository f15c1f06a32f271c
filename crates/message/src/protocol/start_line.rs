//! Request-line and status-line parsing and serialization.
//!
//! Both kinds of start line implement [`StartLine`], which is what lets [`Pdu`](crate::protocol::Pdu)
//! and the codec work generically over requests and responses.

use std::fmt;

use http::StatusCode;
use tracing::trace;

use crate::ensure;
use crate::header::{HeaderTable, Host, standard};
use crate::protocol::error::ParseError;
use crate::protocol::method::Method;
use crate::protocol::query::QueryString;
use crate::protocol::version::HttpVersion;

/// The first line of a message.
pub trait StartLine: Sized + Clone + fmt::Debug + Send + Sync + 'static {
    /// Parses the start line, without its line terminator.
    fn parse(line: &str) -> Result<Self, ParseError>;

    /// Appends the canonical form of the line, without its line terminator.
    fn write_to(&self, dst: &mut String);

    fn version(&self) -> HttpVersion;

    /// Checks constraints that involve the headers of the same message.
    fn validate(&self, _headers: &HeaderTable) -> Result<(), ParseError> {
        Ok(())
    }
}

/// `<method> <request-target> <protocol>`
#[derive(Debug, Clone)]
pub struct RequestLine {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) raw_query: String,
    pub(crate) query: QueryString,
    pub(crate) version: HttpVersion,
}

impl RequestLine {
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path without scheme, authority or query; never empty.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query exactly as received, without the leading `?`.
    #[inline]
    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    #[inline]
    pub fn query(&self) -> &QueryString {
        &self.query
    }

    pub(crate) fn set_raw_query(&mut self, raw_query: &str) {
        let raw_query = raw_query.strip_prefix('?').unwrap_or(raw_query);
        self.query = QueryString::parse(raw_query);
        raw_query.clone_into(&mut self.raw_query);
    }
}

impl Default for RequestLine {
    /// `GET / HTTP/1.1`
    fn default() -> Self {
        Self {
            method: Method::get(),
            path: "/".to_owned(),
            raw_query: String::new(),
            query: QueryString::default(),
            version: HttpVersion::Http11,
        }
    }
}

/// Strips scheme and authority from an absolute-form target and maps an empty path to `/`.
pub(crate) fn normalize_path(path: &str) -> &str {
    let path = match path.find("://") {
        Some(index) => {
            let after_scheme = &path[index + 3..];
            after_scheme.find('/').map_or("", |slash| &after_scheme[slash..])
        }
        None => path,
    };

    if path.is_empty() { "/" } else { path }
}

impl StartLine for RequestLine {
    fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let &[method, target, protocol] = tokens.as_slice() else {
            return Err(ParseError::malformed_start_line(format!("expect 3 tokens in request line, found {}", tokens.len())));
        };

        let version = HttpVersion::try_from(protocol)?;
        let method = Method::parse(method);

        let (path, raw_query) = target.split_once('?').unwrap_or((target, ""));
        let path = normalize_path(path).to_owned();
        let query = QueryString::parse(raw_query);

        trace!(method = %method, path = %path, query = raw_query, %version, "parsed request line");
        Ok(Self { method, path, raw_query: raw_query.to_owned(), query, version })
    }

    fn write_to(&self, dst: &mut String) {
        dst.push_str(self.method.as_str());
        dst.push(' ');
        dst.push_str(&self.path);
        if !self.raw_query.is_empty() {
            dst.push('?');
            dst.push_str(&self.raw_query);
        }
        dst.push(' ');
        dst.push_str(HttpVersion::PROTOCOL_NAME);
        dst.push('/');
        dst.push_str(self.version.as_str());
    }

    #[inline]
    fn version(&self) -> HttpVersion {
        self.version
    }

    /// HTTP/1.1 requests must carry exactly one well-formed `Host` header.
    fn validate(&self, headers: &HeaderTable) -> Result<(), ParseError> {
        if self.version != HttpVersion::Http11 {
            return Ok(());
        }

        let values = headers.values(standard::HOST.name()).ok_or(ParseError::MissingHostHeader)?;
        ensure!(values.len() == 1, ParseError::malformed_host_header(values.join(", ")));
        Host::parse(&values[0]).map(|_host| ())
    }
}

/// `<protocol> <status-code> <reason-phrase>`
#[derive(Debug, Clone)]
pub struct StatusLine {
    pub(crate) version: HttpVersion,
    pub(crate) status: StatusCode,
    pub(crate) reason: String,
}

impl StatusLine {
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The reason phrase as it appeared on the wire, or as set on the builder.
    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Default for StatusLine {
    /// `HTTP/1.1 200 OK`
    fn default() -> Self {
        Self { version: HttpVersion::Http11, status: StatusCode::OK, reason: reason_phrase(StatusCode::OK).to_owned() }
    }
}

/// The status descriptor table: the canonical reason of a well-known code, empty otherwise.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

impl StartLine for StatusLine {
    fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        // `HTTP/1.1 599 ` carries an empty reason phrase, the space after the code is still required
        let empty_reason = tokens.len() == 2 && line.ends_with(' ');
        ensure!(
            tokens.len() >= 3 || empty_reason,
            ParseError::malformed_start_line(format!("expect at least 3 tokens in status line, found {}", tokens.len()))
        );

        let version = HttpVersion::try_from(tokens[0])?;
        let status = StatusCode::from_bytes(tokens[1].as_bytes())
            .map_err(|e| ParseError::malformed_start_line(format!("status code {}: {e}", tokens[1])))?;
        let reason = tokens[2..].join(" ");

        trace!(status = status.as_u16(), reason = %reason, %version, "parsed status line");
        Ok(Self { version, status, reason })
    }

    fn write_to(&self, dst: &mut String) {
        dst.push_str(HttpVersion::PROTOCOL_NAME);
        dst.push('/');
        dst.push_str(self.version.as_str());
        dst.push(' ');
        dst.push_str(self.status.as_str());
        dst.push(' ');
        dst.push_str(&self.reason);
    }

    #[inline]
    fn version(&self) -> HttpVersion {
        self.version
    }
}
