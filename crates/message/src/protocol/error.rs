use std::io;
use std::str::Utf8Error;
use thiserror::Error;

/// Structural failures that abort parsing of a message head.
///
/// A header whose value can't be parsed into its typed form is never reported here: it degrades
/// to "absent" at the accessor. Only the shape of the start line, the protocol version, the
/// mandatory `Host` header and the framing limits of the decoder are fatal.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed start line: {reason}")]
    MalformedStartLine { reason: String },

    #[error("unsupported protocol version: {protocol}")]
    UnsupportedVersion { protocol: String },

    #[error("missing host header")]
    MissingHostHeader,

    #[error("malformed host header: {value}")]
    MalformedHostHeader { value: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("header block is not valid utf-8: {source}")]
    InvalidEncoding {
        #[from]
        source: Utf8Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_start_line<S: ToString>(str: S) -> Self {
        Self::MalformedStartLine { reason: str.to_string() }
    }

    pub fn unsupported_version<S: ToString>(protocol: S) -> Self {
        Self::UnsupportedVersion { protocol: protocol.to_string() }
    }

    pub fn malformed_host_header<S: ToString>(value: S) -> Self {
        Self::MalformedHostHeader { value: value.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
