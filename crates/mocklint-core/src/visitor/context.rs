//! Visitor context providing file information during AST traversal.

use swc_common::Span;

use crate::parser::ParsedFile;

pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    /// Start and exclusive end of `span` as `(line, column, end_line, end_column)`.
    pub fn span_to_range(&self, span: Span) -> Option<(usize, usize, usize, usize)> {
        let (lo, hi) = self.file.span_to_offsets(span)?;
        let (line, column) = self.file.offset_to_location(lo);
        let (end_line, end_column) = self.file.offset_to_location(hi);
        Some((line, column, end_line, end_column))
    }

    pub fn get_source_text(&self, span: Span) -> Option<&'a str> {
        let (lo, hi) = self.file.span_to_offsets(span)?;
        self.file.source().get(lo..hi)
    }
}
