/// One benchmark input: a page fed to the scanner in chunks of `chunk_size` bytes.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    page: TestPage,
    chunk_size: usize,
}

impl TestCase {
    pub fn new(name: &'static str, page: TestPage, chunk_size: usize) -> Self {
        Self { name, page, chunk_size: chunk_size.max(1) }
    }

    /// The whole page arrives as a single chunk
    pub fn whole(name: &'static str, page: TestPage) -> Self {
        Self::new(name, page, page.content.len())
    }

    /// Typical socket read size
    pub fn socket(name: &'static str, page: TestPage) -> Self {
        Self::new(name, page, 1460)
    }

    /// Worst case, every byte is its own chunk
    pub fn byte_by_byte(name: &'static str, page: TestPage) -> Self {
        Self::new(name, page, 1)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn page(&self) -> &TestPage {
        &self.page
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunks(&self) -> impl Iterator<Item = &'static [u8]> {
        self.page.content.as_bytes().chunks(self.chunk_size)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestPage {
    file_name: &'static str,
    content: &'static str,
}

impl TestPage {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// Returns the page up to and including `</head>`, or the whole page if it has none
    pub fn head(&self) -> &'static str {
        const CLOSE_TAG: &str = "</head>";
        match (self.content.find("<head>"), self.content.find(CLOSE_TAG)) {
            (Some(start), Some(end)) if start < end => &self.content[start..end + CLOSE_TAG.len()],
            _ => self.content,
        }
    }
}
