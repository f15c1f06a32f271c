//! URL query component decoding and encoding.
//!
//! Query values are inherently multi-valued: `a=1,2,3` is three values for `a`, and repeating a
//! key (`a=1&a=2`) appends to the same list. Percent-decoding happens once, at parse time, after
//! the text has been split on `&`, `=` and `,`, so encoded separators stay inside their value.
//!
//! Typed accessors read the **last** value of a key and never fail: a missing or unparsable value
//! yields the default supplied by the caller.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::de::DeserializeOwned;

/// Bytes that must be escaped inside a query key or value.
const QUERY_COMPONENT: &AsciiSet =
    &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'&').add(b'+').add(b',').add(b'<').add(b'=').add(b'>').add(b'?');

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    entries: Vec<(String, Vec<String>)>,
}

fn decode(component: &str) -> String {
    let component: Cow<'_, str> = if component.contains('+') { Cow::Owned(component.replace('+', " ")) } else { Cow::Borrowed(component) };
    percent_decode_str(&component).decode_utf8_lossy().into_owned()
}

impl QueryString {
    /// Parses query text, with or without the leading `?`.
    ///
    /// A key without `=` is recorded with one empty value.
    pub fn parse(str: &str) -> Self {
        let str = str.strip_prefix('?').unwrap_or(str);
        let mut query = Self::default();

        for pair in str.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let values = query.values_mut(decode(key));
            values.extend(value.split(',').map(decode));
        }

        query
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    fn values_mut(&mut self, key: String) -> &mut Vec<String> {
        let index = match self.position(&key) {
            Some(index) => index,
            None => {
                self.entries.push((key, Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// All decoded values of `key`, possibly none.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.position(key).map(|index| self.entries[index].1.as_slice())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(<[String]>::first).map(String::as_str)
    }

    pub fn last(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(<[String]>::last).map(String::as_str)
    }

    /// Parses the last value of `key`, or returns `default` if it is missing or unparsable.
    pub fn get_or<T: FromStr>(&self, key: &str, default: T) -> T {
        self.last(key).and_then(|value| value.parse().ok()).unwrap_or(default)
    }

    /// The last value of `key`, or `default` if the key is missing or has no values.
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.last(key).unwrap_or(default)
    }

    /// Builds an inclusion/exclusion filter from the values of `key`.
    pub fn filter(&self, key: &str) -> QueryFilter {
        QueryFilter::from_values(self.get(key).unwrap_or_default())
    }

    /// Appends a value to `key`.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values_mut(key.to_owned()).push(value.to_owned());
    }

    /// Records `key` as present without adding a value.
    pub fn insert_key(&mut self, key: &str) {
        self.values_mut(key.to_owned());
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let index = self.position(key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Percent-encodes the query, without a leading `?`.
    ///
    /// A key with no values, or with a single empty value, is written as the bare key.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Deserializes the query into `T`, multi-valued keys are presented as their comma joined text.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        let pairs: Vec<(&str, String)> = self.iter().map(|(key, values)| (key, values.join(","))).collect();
        let encoded = serde_urlencoded::to_string(pairs)
            .map_err(|e| <serde_urlencoded::de::Error as serde::de::Error>::custom(e.to_string()))?;
        serde_urlencoded::from_str(&encoded)
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, values)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}", utf8_percent_encode(key, QUERY_COMPONENT))?;

            if values.iter().all(String::is_empty) && values.len() <= 1 {
                continue;
            }

            f.write_str("=")?;
            for (index, value) in values.iter().enumerate() {
                if index > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", utf8_percent_encode(value, QUERY_COMPONENT))?;
            }
        }
        Ok(())
    }
}

impl From<&str> for QueryString {
    fn from(str: &str) -> Self {
        QueryString::parse(str)
    }
}

/// A simple inclusion/exclusion predicate built from query values.
///
/// Values prefixed with `!` are exclusions, all others are inclusions. A candidate matches if it
/// isn't excluded and, when inclusions exist, is one of them. `status=open,!archived` matches
/// `open` only; `status=!archived` matches anything but `archived`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl QueryFilter {
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let mut filter = Self::default();
        for value in values.iter().map(AsRef::as_ref).filter(|value| !value.is_empty()) {
            match value.strip_prefix('!') {
                Some(excluded) => filter.exclude.push(excluded.to_owned()),
                None => filter.include.push(value.to_owned()),
            }
        }
        filter
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// True if the filter doesn't constrain anything.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn matches(&self, candidate: &str) -> bool {
        if self.exclude.iter().any(|value| value == candidate) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|value| value == candidate)
    }
}
