//! Case-insensitive, multi-valued, insertion ordered header storage.
//!
//! The table keeps raw text only. Typed access goes through a [`HeaderDescriptor`], which parses
//! the stored values on every read; a value the descriptor can't parse reads as if the header
//! were absent. Presence is tracked independently of parsing, so `contains` stays accurate for
//! headers that were sent with an empty or unparsable value.
//!
//! # Equality and the wire form
//!
//! Every occurrence of a header is stored as its own value. When written, a joined-list header
//! takes one line with its values separated by `", "`, so the parsed text holds a single value
//! where the writer held several. Equality therefore compares each header by its combined text
//! rather than by its value count, and a written table always parses back into an equal one.
//!
//! The field of an entry comes from the standard registry, or from the descriptor last used with
//! [`HeaderTable::set_typed`], so headers declared outside this crate keep their own policy.

use std::borrow::Cow;

use tracing::trace;

use crate::header::descriptor::{HeaderDescriptor, HeaderField, Multiplicity};
use crate::header::standard;

#[derive(Debug, Clone)]
struct Entry {
    /// lower-cased name used for lookups
    key: String,
    /// casing of the first occurrence
    name: String,
    field: Option<HeaderField>,
    values: Vec<String>,
}

impl Entry {
    fn new(name: &str) -> Self {
        let key = name.to_ascii_lowercase();
        let field = standard::lookup(&key).copied();
        Self { key, name: name.to_owned(), field, values: Vec::with_capacity(1) }
    }

    /// Casing of the known field, the received casing otherwise.
    fn canonical_name(&self) -> &str {
        self.field.as_ref().map_or(self.name.as_str(), |field| field.name())
    }

    fn multiplicity(&self) -> Multiplicity {
        self.field.as_ref().map_or(Multiplicity::Repeated, HeaderField::multiplicity)
    }

    fn combined(&self) -> Cow<'_, str> {
        self.multiplicity().combine(&self.values)
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderTable {
    entries: Vec<Entry>,
}

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.entries.iter().position(|entry| entry.key.eq_ignore_ascii_case(name))
    }

    fn entry_mut(&mut self, name: &str) -> &mut Entry {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.entries.push(Entry::new(name.trim()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    /// Appends `value` to the values of `name`, creating the entry if needed.
    pub fn put(&mut self, name: &str, value: &str) {
        self.entry_mut(name).values.push(value.trim().to_owned());
    }

    /// Replaces every value of `name` with `value`.
    pub fn set(&mut self, name: &str, value: &str) {
        let entry = self.entry_mut(name);
        entry.values.clear();
        entry.values.push(value.trim().to_owned());
    }

    /// Removes `name`, returning its values if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).values)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// All stored values of `name` in the order they were added.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|index| self.entries[index].values.as_slice())
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn last(&self, name: &str) -> Option<&str> {
        self.values(name).and_then(|values| values.last()).map(String::as_str)
    }

    /// The stored values concatenated according to the header's multiplicity.
    pub fn combined(&self, name: &str) -> Option<Cow<'_, str>> {
        Some(self.entries[self.position(name)?].combined())
    }

    /// Parses the header described by `descriptor`.
    ///
    /// Returns `None` if the header is absent or its text can't be parsed.
    pub fn typed<T>(&self, descriptor: &HeaderDescriptor<T>) -> Option<T> {
        let entry = &self.entries[self.position(descriptor.name())?];
        let raw = descriptor.field().multiplicity().combine(&entry.values);
        let parsed = descriptor.parse(&raw);
        if parsed.is_none() {
            trace!(header = descriptor.name(), value = %raw, "header value can't be parsed, treat as absent");
        }
        parsed
    }

    /// Like [`typed`](Self::typed), but falls back to `T::default()`.
    pub fn get<T: Default>(&self, descriptor: &HeaderDescriptor<T>) -> T {
        self.typed(descriptor).unwrap_or_default()
    }

    /// Serializes `value` and replaces the header described by `descriptor`.
    ///
    /// The entry adopts the descriptor's field, which decides its casing and join policy from now on.
    pub fn set_typed<T>(&mut self, descriptor: &HeaderDescriptor<T>, value: &T) {
        let text = descriptor.serialize(value);
        let entry = self.entry_mut(descriptor.name());
        entry.field = Some(*descriptor.field());
        entry.values.clear();
        match descriptor.field().multiplicity() {
            Multiplicity::Joined => entry.values.push(text.trim().to_owned()),
            Multiplicity::Repeated => entry.values.extend(text.split('\n').map(|part| part.trim().to_owned())),
        }
    }

    /// Number of distinct header names.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, values)` pairs in insertion order, with names in the casing they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Records one raw header line.
    ///
    /// A line without a colon records the whole line as a name with an empty value.
    pub(crate) fn put_line(&mut self, line: &str) {
        match line.split_once(':') {
            Some((name, value)) => self.put(name, value),
            None => self.put(line, ""),
        }
    }

    /// Writes every header as canonical `Name: value\r\n` lines.
    ///
    /// Joined headers are written on one line, repeated headers get one line per value.
    pub fn write_to(&self, dst: &mut String) {
        for entry in &self.entries {
            let name = entry.canonical_name();
            match entry.multiplicity() {
                Multiplicity::Joined => write_line(dst, name, &entry.combined()),
                Multiplicity::Repeated => {
                    for value in &entry.values {
                        write_line(dst, name, value);
                    }
                }
            }
        }
    }
}

fn write_line(dst: &mut String, name: &str, value: &str) {
    dst.push_str(name);
    dst.push_str(": ");
    dst.push_str(value);
    dst.push_str("\r\n");
}

/// Names compare case-insensitively, values by their combined text and in order.
///
/// `Accept: a` followed by `Accept: b` equals a single `Accept: a, b`. Repeated-line values are
/// combined with `\n`, which no value contains, so they still compare one by one.
impl PartialEq for HeaderTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(&other.entries).all(|(a, b)| a.key == b.key && a.combined() == b.combined())
    }
}

impl Eq for HeaderTable {}
