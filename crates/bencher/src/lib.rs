//! Shared fixtures for the `micro-message` benchmarks.

/// One benchmark input: a named fixture file in a size group.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn normal(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Normal, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }
}

/// A message head fixture embedded with `include_str!`.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// Number of header lines, start line and terminating empty line excluded.
    pub fn header_count(&self) -> usize {
        self.content.lines().skip(1).take_while(|line| !line.trim_end_matches('\r').is_empty()).count()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            TestGroup::Small => "small",
            TestGroup::Normal => "normal",
            TestGroup::Large => "large",
        }
    }
}
