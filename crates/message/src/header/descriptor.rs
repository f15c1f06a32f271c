//! Typed header field descriptors.
//!
//! A [`HeaderDescriptor`] binds a header name to a value type: it knows how to parse the raw text
//! stored in a [`HeaderTable`](crate::header::HeaderTable) and how to write a typed value back.
//! The type-independent part of the definition lives in [`HeaderField`], which is what the
//! standard field registry hands out when only a name is known.
//!
//! Descriptors are declared as `static` items (see [`standard`](crate::header::standard)) and are
//! never mutated, so they can be shared by every thread without synchronization.

use std::borrow::Cow;
use std::fmt;

/// Which kind of message a header belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Applicability {
    Request,
    Response,
    Both,
}

impl Applicability {
    #[inline]
    pub fn allows_request(self) -> bool {
        matches!(self, Applicability::Request | Applicability::Both)
    }

    #[inline]
    pub fn allows_response(self) -> bool {
        matches!(self, Applicability::Response | Applicability::Both)
    }
}

/// Whether a header travels the whole chain or is consumed by the next hop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scope {
    EndToEnd,
    HopByHop,
}

/// How several occurrences of one header are combined and written.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Multiplicity {
    /// Values form one comma separated list and are written on a single line.
    Joined,
    /// Every value is written on its own line, e.g. `Set-Cookie`.
    Repeated,
}

impl Multiplicity {
    /// The separator used when the stored values are concatenated for parsing.
    ///
    /// `\n` can never be part of a stored value, so repeated values stay unambiguous.
    #[inline]
    pub fn separator(self) -> &'static str {
        match self {
            Multiplicity::Joined => ", ",
            Multiplicity::Repeated => "\n",
        }
    }

    /// Concatenates stored values into the text handed to a descriptor's parser.
    pub fn combine(self, values: &[String]) -> Cow<'_, str> {
        match values {
            [] => Cow::Borrowed(""),
            [single] => Cow::Borrowed(single.as_str()),
            many => Cow::Owned(many.join(self.separator())),
        }
    }
}

/// The type independent part of a header definition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: &'static str,
    applicability: Applicability,
    scope: Scope,
    multiplicity: Multiplicity,
}

impl HeaderField {
    pub const fn new(name: &'static str, applicability: Applicability, scope: Scope, multiplicity: Multiplicity) -> Self {
        Self { name, applicability, scope, multiplicity }
    }

    /// The registered casing, used when the header is written.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn applicability(&self) -> Applicability {
        self.applicability
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    #[inline]
    pub fn is_hop_by_hop(&self) -> bool {
        self.scope == Scope::HopByHop
    }
}

/// A named, typed header definition.
///
/// `parse` returns `None` for text it doesn't understand; callers treat that exactly like a
/// missing header. `serialize` must produce text that `parse` accepts. For
/// [`Multiplicity::Repeated`] fields the serialized text may contain `\n`, each part becoming
/// one header line.
pub struct HeaderDescriptor<T: 'static> {
    field: HeaderField,
    parse: fn(&str) -> Option<T>,
    serialize: fn(&T) -> String,
}

impl<T> HeaderDescriptor<T> {
    pub const fn new(field: HeaderField, parse: fn(&str) -> Option<T>, serialize: fn(&T) -> String) -> Self {
        Self { field, parse, serialize }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.field.name
    }

    #[inline]
    pub fn field(&self) -> &HeaderField {
        &self.field
    }

    #[inline]
    pub fn parse(&self, raw: &str) -> Option<T> {
        (self.parse)(raw)
    }

    #[inline]
    pub fn serialize(&self, value: &T) -> String {
        (self.serialize)(value)
    }
}

impl<T> fmt::Debug for HeaderDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderDescriptor")
            .field("field", &self.field)
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
