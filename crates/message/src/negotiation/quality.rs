use std::fmt;

/// A token weighted by a quality value, one element of `Accept-Encoding`, `Accept-Language`,
/// `Accept-Charset` or `TE`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityItem {
    token: String,
    quality: f32,
}

impl QualityItem {
    pub fn new<S: Into<String>>(token: S, quality: f32) -> Self {
        Self { token: token.into(), quality: quality.clamp(0.0, 1.0) }
    }

    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[inline]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    fn is_any(&self) -> bool {
        self.token == "*"
    }
}

impl fmt::Display for QualityItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)?;
        if self.quality < 1.0 {
            write!(f, ";q={}", self.quality)?;
        }
        Ok(())
    }
}

/// A comma separated list of [`QualityItem`]s in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityList {
    items: Vec<QualityItem>,
}

impl QualityList {
    /// Parses a list like `gzip, br;q=0.8, *;q=0`.
    ///
    /// Parameters other than `q` are dropped; an unparsable `q` counts as `1`.
    pub fn parse(str: &str) -> Self {
        let items = str
            .split(',')
            .filter_map(|segment| {
                let mut parts = segment.split(';').map(str::trim);
                let token = parts.next().filter(|token| !token.is_empty())?;
                let quality = parts
                    .filter_map(|param| param.split_once('='))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
                    .and_then(|(_, value)| value.trim().parse::<f32>().ok())
                    .filter(|quality| quality.is_finite())
                    .unwrap_or(1.0);
                Some(QualityItem::new(token, quality))
            })
            .collect();
        Self { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualityItem> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The quality the list assigns to `token`.
    ///
    /// An exact, case-insensitive match wins over `*`; a token the list doesn't mention is
    /// unacceptable.
    pub fn quality_of(&self, token: &str) -> f32 {
        self.items
            .iter()
            .find(|item| item.token.eq_ignore_ascii_case(token))
            .or_else(|| self.items.iter().find(|item| item.is_any()))
            .map_or(0.0, QualityItem::quality)
    }

    /// Picks the offered token with the highest non-zero quality; ties go to the earlier offer.
    ///
    /// An empty list accepts anything, so the first offer is returned.
    pub fn preferred<'a>(&self, offered: &[&'a str]) -> Option<&'a str> {
        if self.items.is_empty() {
            return offered.first().copied();
        }

        let mut best: Option<(&'a str, f32)> = None;
        for &token in offered {
            let quality = self.quality_of(token);
            if quality > 0.0 && best.is_none_or(|(_, best_quality)| quality > best_quality) {
                best = Some((token, quality));
            }
        }
        best.map(|(token, _)| token)
    }
}

impl fmt::Display for QualityList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.items.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}
