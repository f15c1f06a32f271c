use std::fmt;

use crate::protocol::error::ParseError;

/// The protocol versions the message model accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum HttpVersion {
    Http10,
    #[default]
    Http11,
}

impl HttpVersion {
    /// The only protocol name on the wire.
    pub const PROTOCOL_NAME: &'static str = "HTTP";

    /// The version number, `1.0` or `1.1`.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVersion::Http10 => "1.0",
            HttpVersion::Http11 => "1.1",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", Self::PROTOCOL_NAME, self.as_str())
    }
}

/// Parses a protocol token such as `HTTP/1.1`; the protocol name is matched case-insensitively.
impl TryFrom<&str> for HttpVersion {
    type Error = ParseError;

    fn try_from(str: &str) -> Result<Self, Self::Error> {
        let (name, version) = str.split_once('/').ok_or_else(|| ParseError::unsupported_version(str))?;

        if !name.eq_ignore_ascii_case(Self::PROTOCOL_NAME) {
            return Err(ParseError::unsupported_version(str));
        }

        match version {
            "1.0" => Ok(Self::Http10),
            "1.1" => Ok(Self::Http11),
            _ => Err(ParseError::unsupported_version(str)),
        }
    }
}

impl From<HttpVersion> for http::Version {
    fn from(version: HttpVersion) -> Self {
        match version {
            HttpVersion::Http10 => http::Version::HTTP_10,
            HttpVersion::Http11 => http::Version::HTTP_11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(HttpVersion::try_from("HTTP/1.1").unwrap(), HttpVersion::Http11);
        assert_eq!(HttpVersion::try_from("HTTP/1.0").unwrap(), HttpVersion::Http10);
        assert_eq!(HttpVersion::try_from("http/1.1").unwrap(), HttpVersion::Http11);
    }

    #[test]
    fn test_from_invalid_str() {
        assert!(matches!(HttpVersion::try_from("HTTP1.1"), Err(ParseError::UnsupportedVersion { .. })));
        assert!(matches!(HttpVersion::try_from("HTTP/2.0"), Err(ParseError::UnsupportedVersion { .. })));
        assert!(matches!(HttpVersion::try_from("FTP/1.1"), Err(ParseError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_display() {
        assert_eq!(HttpVersion::Http11.to_string(), "HTTP/1.1");
        assert_eq!(http::Version::from(HttpVersion::Http10), http::Version::HTTP_10);
    }
}
