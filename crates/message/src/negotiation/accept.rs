//! `Accept` header parsing and server side content negotiation.
//!
//! The selection rule is deliberately simple and deterministic:
//!
//! 1. an empty list accepts anything, the result is `*/*`
//! 2. only entries that match one of the offered types, or are `*/*`, are considered
//! 3. if nothing is left, the result is `*/*`
//! 4. among the rest, only the highest quality is kept
//! 5. if several entries tie, concrete types win over wildcards
//! 6. of what remains, the entry listed **last** wins
//!
//! Rule 6 differs from RFC 9110, which gives precedence to the more specific media range. It is
//! kept because callers depend on the ordering.

use std::fmt;

use mime::Mime;
use tracing::trace;

/// One media range of an `Accept` header.
#[derive(Debug, Clone)]
pub struct AcceptType {
    content_type: Mime,
    quality: f32,
    index: usize,
}

impl AcceptType {
    /// `quality` is clamped to `[0, 1]`.
    pub fn new(content_type: Mime, quality: f32, index: usize) -> Self {
        Self { content_type, quality: quality.clamp(0.0, 1.0), index }
    }

    /// The media range including its non-`q` parameters.
    #[inline]
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    #[inline]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Position of the entry in the header, starting at 0.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// True for `type/*` and `*/*`.
    pub fn is_wildcard(&self) -> bool {
        self.content_type.subtype() == mime::STAR
    }

    /// True for `*/*`.
    pub fn is_any(&self) -> bool {
        self.content_type.type_() == mime::STAR && self.is_wildcard()
    }

    /// Whether this range accepts `offered`.
    ///
    /// The relation is asymmetric: `text/*` matches `text/html` but `text/html` doesn't match
    /// `text/*`. Parameters are ignored.
    pub fn matches(&self, offered: &Mime) -> bool {
        if self.is_any() {
            return true;
        }
        self.content_type.type_() == offered.type_() && (self.is_wildcard() || self.content_type.subtype() == offered.subtype())
    }
}

impl fmt::Display for AcceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content_type)?;
        if self.quality < 1.0 {
            write!(f, ";q={}", self.quality)?;
        }
        Ok(())
    }
}

/// The parsed media ranges of an `Accept` header, in header order.
#[derive(Debug, Clone, Default)]
pub struct AcceptList {
    types: Vec<AcceptType>,
}

fn parse_quality(value: &str) -> f32 {
    match value.trim().parse::<f32>() {
        Ok(quality) if quality.is_finite() => quality,
        _ => 1.0,
    }
}

fn parse_range(segment: &str, index: usize) -> Option<AcceptType> {
    let mut parts = segment.split(';').map(str::trim);
    let range = match parts.next()? {
        "" => return None,
        // some old clients send a bare `*`
        "*" => "*/*",
        range => range,
    };

    let mut quality = 1.0;
    let mut text = range.to_owned();
    for param in parts.filter(|param| !param.is_empty()) {
        match param.split_once('=') {
            Some((name, value)) if name.trim().eq_ignore_ascii_case("q") => quality = parse_quality(value),
            _ => {
                text.push_str("; ");
                text.push_str(param);
            }
        }
    }

    match text.parse::<Mime>() {
        Ok(content_type) => Some(AcceptType::new(content_type, quality, index)),
        Err(e) => {
            trace!(segment, error = %e, "skip unparsable media range");
            None
        }
    }
}

impl AcceptList {
    /// Parses a comma separated list of media ranges; malformed ranges are skipped.
    pub fn parse(str: &str) -> Self {
        let types = str
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .enumerate()
            .filter_map(|(index, segment)| parse_range(segment, index))
            .collect();
        Self { types }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AcceptType> {
        self.types.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The winning media range for a server that can produce `offered`.
    ///
    /// Always returns a value, `*/*` when nothing specific was negotiated.
    pub fn best_match(&self, offered: &[Mime]) -> Mime {
        self.best_entry(offered).map_or(mime::STAR_STAR, |entry| entry.content_type.clone())
    }

    /// The first offered type accepted by the winning media range.
    ///
    /// With an empty list the first offered type is chosen; `None` if nothing offered is
    /// acceptable.
    pub fn select<'a>(&self, offered: &'a [Mime]) -> Option<&'a Mime> {
        if self.types.is_empty() {
            return offered.first();
        }
        let entry = self.best_entry(offered)?;
        offered.iter().find(|mime| entry.matches(mime))
    }

    fn best_entry(&self, offered: &[Mime]) -> Option<&AcceptType> {
        let candidates: Vec<&AcceptType> =
            self.types.iter().filter(|entry| entry.is_any() || offered.iter().any(|mime| entry.matches(mime))).collect();

        let max_quality = candidates.iter().map(|entry| entry.quality).fold(f32::NEG_INFINITY, f32::max);
        let mut best: Vec<&AcceptType> = candidates.into_iter().filter(|entry| entry.quality >= max_quality).collect();

        if best.len() > 1 && best.iter().any(|entry| !entry.is_wildcard()) {
            best.retain(|entry| !entry.is_wildcard());
        }

        best.into_iter().max_by_key(|entry| entry.index)
    }
}

impl fmt::Display for AcceptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.types.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl From<&str> for AcceptList {
    fn from(str: &str) -> Self {
        AcceptList::parse(str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offered() -> Vec<Mime> {
        vec![mime::TEXT_HTML, mime::APPLICATION_JSON]
    }

    #[test]
    fn parse_quality_and_params() {
        let list = AcceptList::parse("text/html;level=1;q=0.5, application/json ; q=0.9, */*;q=0.1");
        assert_eq!(list.len(), 3);

        let first = list.iter().next().unwrap();
        assert_eq!(first.content_type().essence_str(), "text/html");
        assert_eq!(first.content_type().get_param("level").unwrap(), "1");
        assert!((first.quality() - 0.5).abs() < f32::EPSILON);
        assert_eq!(first.index(), 0);

        let last = list.iter().last().unwrap();
        assert!(last.is_any());
        assert_eq!(last.index(), 2);
    }

    #[test]
    fn quality_fallbacks() {
        let list = AcceptList::parse("text/html;q=abc, text/plain;q=7, image/png;q=-1");
        let qualities: Vec<f32> = list.iter().map(AcceptType::quality).collect();
        assert_eq!(qualities, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn malformed_ranges_are_skipped() {
        let list = AcceptList::parse("text/html, garbage, , application/json");
        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().map(AcceptType::index).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn matching_is_asymmetric() {
        let wildcard = AcceptType::new("text/*".parse().unwrap(), 1.0, 0);
        let html = AcceptType::new(mime::TEXT_HTML, 1.0, 1);
        assert!(wildcard.matches(&mime::TEXT_HTML));
        assert!(!html.matches(&"text/*".parse().unwrap()));
        assert!(!wildcard.matches(&mime::APPLICATION_JSON));
    }

    #[test]
    fn best_match_by_quality() {
        let list = AcceptList::parse("text/html;q=0.5,application/json;q=0.9,*/*;q=0.1");
        assert_eq!(list.best_match(&offered()), mime::APPLICATION_JSON);
        assert_eq!(list.select(&offered()), Some(&mime::APPLICATION_JSON));
    }

    #[test]
    fn empty_or_unmatched_is_any() {
        assert_eq!(AcceptList::default().best_match(&offered()), mime::STAR_STAR);
        assert_eq!(AcceptList::parse("image/png").best_match(&offered()), mime::STAR_STAR);
        assert_eq!(AcceptList::parse("image/png").select(&offered()), None);
        assert_eq!(AcceptList::default().select(&offered()), Some(&mime::TEXT_HTML));
    }

    #[test]
    fn concrete_beats_wildcard_on_tie() {
        let list = AcceptList::parse("application/json, */*");
        assert_eq!(list.best_match(&offered()), mime::APPLICATION_JSON);

        let list = AcceptList::parse("*/*");
        assert_eq!(list.best_match(&offered()), mime::STAR_STAR);
        assert_eq!(list.select(&offered()), Some(&mime::TEXT_HTML));
    }

    #[test]
    fn last_listed_wins_a_tie() {
        let list = AcceptList::parse("text/html, application/json");
        assert_eq!(list.best_match(&offered()), mime::APPLICATION_JSON);

        let list = AcceptList::parse("application/json, text/html");
        assert_eq!(list.best_match(&offered()), mime::TEXT_HTML);
    }

    #[test]
    fn display() {
        let list = AcceptList::parse("text/html, application/json;q=0.5");
        assert_eq!(list.to_string(), "text/html, application/json;q=0.5");
    }
}
