//! The standard header descriptors and the process wide field registry.
//!
//! Every descriptor here is a `static`, created once and immutable afterwards. The registry maps a
//! lower-cased header name to its [`HeaderField`] so that tables can find the registered casing
//! and multiplicity of a header from its name alone. Names without a registered field are
//! treated as [`Multiplicity::Repeated`] and keep the casing they arrived with, unless a table
//! was given their descriptor through `set_typed`.

use std::collections::HashMap;

use mime::Mime;
use once_cell::sync::Lazy;

use crate::header::descriptor::{Applicability, HeaderDescriptor, HeaderField, Multiplicity, Scope};
use crate::header::host::Host;
use crate::negotiation::{AcceptList, QualityList};

use Applicability::{Both, Request, Response};
use Multiplicity::{Joined, Repeated};
use Scope::{EndToEnd, HopByHop};

fn parse_u64(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "signature fixed by HeaderDescriptor")]
fn write_u64(value: &u64) -> String {
    value.to_string()
}

#[allow(clippy::unnecessary_wraps, reason = "signature fixed by HeaderDescriptor")]
fn parse_text(raw: &str) -> Option<String> {
    Some(raw.to_owned())
}

#[allow(clippy::ptr_arg, reason = "signature fixed by HeaderDescriptor")]
fn write_text(value: &String) -> String {
    value.clone()
}

#[allow(clippy::unnecessary_wraps, reason = "signature fixed by HeaderDescriptor")]
fn parse_list(raw: &str) -> Option<Vec<String>> {
    Some(raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_owned).collect())
}

#[allow(clippy::ptr_arg, reason = "signature fixed by HeaderDescriptor")]
fn write_list(value: &Vec<String>) -> String {
    value.join(", ")
}

#[allow(clippy::unnecessary_wraps, reason = "signature fixed by HeaderDescriptor")]
fn parse_lines(raw: &str) -> Option<Vec<String>> {
    Some(raw.split('\n').map(str::trim).filter(|item| !item.is_empty()).map(str::to_owned).collect())
}

#[allow(clippy::ptr_arg, reason = "signature fixed by HeaderDescriptor")]
fn write_lines(value: &Vec<String>) -> String {
    value.join("\n")
}

fn parse_mime(raw: &str) -> Option<Mime> {
    raw.trim().parse().ok()
}

fn write_mime(value: &Mime) -> String {
    value.to_string()
}

fn parse_host(raw: &str) -> Option<Host> {
    Host::parse(raw).ok()
}

fn write_host(value: &Host) -> String {
    value.to_string()
}

#[allow(clippy::unnecessary_wraps, reason = "signature fixed by HeaderDescriptor")]
fn parse_accept(raw: &str) -> Option<AcceptList> {
    Some(AcceptList::parse(raw))
}

fn write_accept(value: &AcceptList) -> String {
    value.to_string()
}

#[allow(clippy::unnecessary_wraps, reason = "signature fixed by HeaderDescriptor")]
fn parse_quality(raw: &str) -> Option<QualityList> {
    Some(QualityList::parse(raw))
}

fn write_quality(value: &QualityList) -> String {
    value.to_string()
}

macro_rules! header_descriptor {
    (
        $(#[$doc:meta])*
        $ident:ident: $ty:ty = $name:literal, $applicability:ident, $scope:ident, $multiplicity:ident, $parse:ident, $write:ident
    ) => {
        $(#[$doc])*
        pub static $ident: HeaderDescriptor<$ty> =
            HeaderDescriptor::new(HeaderField::new($name, $applicability, $scope, $multiplicity), $parse, $write);
    };
}

header_descriptor!(
    /// Mandatory for HTTP/1.1 requests, see [`Host`].
    HOST: Host = "Host", Request, EndToEnd, Joined, parse_host, write_host
);
header_descriptor!(CONTENT_LENGTH: u64 = "Content-Length", Both, EndToEnd, Joined, parse_u64, write_u64);
header_descriptor!(CONTENT_TYPE: Mime = "Content-Type", Both, EndToEnd, Joined, parse_mime, write_mime);
header_descriptor!(CONTENT_ENCODING: Vec<String> = "Content-Encoding", Both, EndToEnd, Joined, parse_list, write_list);
header_descriptor!(TRANSFER_ENCODING: Vec<String> = "Transfer-Encoding", Both, HopByHop, Joined, parse_list, write_list);
header_descriptor!(CONNECTION: Vec<String> = "Connection", Both, HopByHop, Joined, parse_list, write_list);
header_descriptor!(UPGRADE: Vec<String> = "Upgrade", Both, HopByHop, Joined, parse_list, write_list);
header_descriptor!(TE: QualityList = "TE", Request, HopByHop, Joined, parse_quality, write_quality);
header_descriptor!(
    /// Parsed into an [`AcceptList`] for content negotiation.
    ACCEPT: AcceptList = "Accept", Request, EndToEnd, Joined, parse_accept, write_accept
);
header_descriptor!(ACCEPT_ENCODING: QualityList = "Accept-Encoding", Request, EndToEnd, Joined, parse_quality, write_quality);
header_descriptor!(ACCEPT_LANGUAGE: QualityList = "Accept-Language", Request, EndToEnd, Joined, parse_quality, write_quality);
header_descriptor!(ACCEPT_CHARSET: QualityList = "Accept-Charset", Request, EndToEnd, Joined, parse_quality, write_quality);
header_descriptor!(USER_AGENT: String = "User-Agent", Request, EndToEnd, Joined, parse_text, write_text);
header_descriptor!(SERVER: String = "Server", Response, EndToEnd, Joined, parse_text, write_text);
header_descriptor!(DATE: String = "Date", Both, EndToEnd, Joined, parse_text, write_text);
header_descriptor!(LOCATION: String = "Location", Response, EndToEnd, Joined, parse_text, write_text);
header_descriptor!(AUTHORIZATION: String = "Authorization", Request, EndToEnd, Joined, parse_text, write_text);
header_descriptor!(WWW_AUTHENTICATE: Vec<String> = "WWW-Authenticate", Response, EndToEnd, Repeated, parse_lines, write_lines);
header_descriptor!(CACHE_CONTROL: Vec<String> = "Cache-Control", Both, EndToEnd, Joined, parse_list, write_list);
header_descriptor!(
    /// Kept as raw text, cookie semantics belong to a higher layer.
    COOKIE: String = "Cookie", Request, EndToEnd, Joined, parse_text, write_text
);
header_descriptor!(SET_COOKIE: Vec<String> = "Set-Cookie", Response, EndToEnd, Repeated, parse_lines, write_lines);
header_descriptor!(EXPECT: String = "Expect", Request, EndToEnd, Joined, parse_text, write_text);

static FIELDS: Lazy<HashMap<String, &'static HeaderField>> = Lazy::new(|| {
    let fields = [
        HOST.field(),
        CONTENT_LENGTH.field(),
        CONTENT_TYPE.field(),
        CONTENT_ENCODING.field(),
        TRANSFER_ENCODING.field(),
        CONNECTION.field(),
        UPGRADE.field(),
        TE.field(),
        ACCEPT.field(),
        ACCEPT_ENCODING.field(),
        ACCEPT_LANGUAGE.field(),
        ACCEPT_CHARSET.field(),
        USER_AGENT.field(),
        SERVER.field(),
        DATE.field(),
        LOCATION.field(),
        AUTHORIZATION.field(),
        WWW_AUTHENTICATE.field(),
        CACHE_CONTROL.field(),
        COOKIE.field(),
        SET_COOKIE.field(),
        EXPECT.field(),
    ];

    fields.into_iter().map(|field| (field.name().to_ascii_lowercase(), field)).collect()
});

/// Looks up the registered field for a header name, ignoring case.
pub fn lookup(name: &str) -> Option<&'static HeaderField> {
    FIELDS.get(name.to_ascii_lowercase().as_str()).copied()
}
