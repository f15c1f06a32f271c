/// Maximum number of header lines accepted in one head
pub const DEFAULT_MAX_HEADERS: usize = 64;

/// Maximum size in bytes of a head, start line and terminating empty line included
pub const DEFAULT_MAX_HEAD_BYTES: usize = 8 * 1024;

/// Size limits enforced by [`HeadDecoder`](super::HeadDecoder) before a head is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_head_bytes: usize,
    max_headers: usize,
}

impl Limits {
    pub const fn new(max_head_bytes: usize, max_headers: usize) -> Self {
        Self { max_head_bytes, max_headers }
    }

    #[must_use]
    pub const fn with_max_head_bytes(mut self, max_head_bytes: usize) -> Self {
        self.max_head_bytes = max_head_bytes;
        self
    }

    #[must_use]
    pub const fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    #[inline]
    pub const fn max_head_bytes(&self) -> usize {
        self.max_head_bytes
    }

    #[inline]
    pub const fn max_headers(&self) -> usize {
        self.max_headers
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEAD_BYTES, DEFAULT_MAX_HEADERS)
    }
}
