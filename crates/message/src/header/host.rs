//! The `Host` header value.
//!
//! Validation is deliberately simple: the value is split on `:`. No colon means host only, one
//! colon means host and port, anything else is rejected. Bracketed IPv6 literals such as
//! `[::1]:8080` contain several colons and are therefore rejected as malformed; this is a known
//! limitation of the message model.

use std::fmt;
use std::str::FromStr;

use crate::protocol::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    name: String,
    port: Option<u16>,
}

impl Host {
    pub fn new(name: impl Into<String>, port: Option<u16>) -> Self {
        Self { name: name.into(), port }
    }

    pub fn parse(value: &str) -> Result<Self, ParseError> {
        let value = value.trim();
        let mut parts = value.split(':');
        // split always yields at least one item
        let name = parts.next().unwrap_or_default();

        match (parts.next(), parts.next()) {
            (None, _) => Ok(Self::new(name, None)),
            (Some(port), None) => {
                let port = port.parse::<u16>().map_err(|_e| ParseError::malformed_host_header(value))?;
                Ok(Self::new(name, Some(port)))
            }
            (Some(_), Some(_)) => Err(ParseError::malformed_host_header(value)),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit port, `None` when the default port of the scheme applies.
    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    #[inline]
    pub fn port_or(&self, default_port: u16) -> u16 {
        self.port.unwrap_or(default_port)
    }
}

impl FromStr for Host {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Host::parse(s)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.name, port),
            None => f.write_str(&self.name),
        }
    }
}
