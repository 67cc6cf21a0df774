//! Parser module for JavaScript/TypeScript source code
//!
//! Integrates with SWC for parsing source files into AST. Spans produced by
//! SWC are positions in a source map; [`ParsedFile`] keeps the file's start
//! position so spans can be turned back into byte offsets of the original text.

use std::sync::OnceLock;

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_module};

use crate::disable_comments::DisableDirectives;

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

impl Language {
    pub fn is_typescript(&self) -> bool {
        matches!(self, Language::TypeScript | Language::Tsx)
    }
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug)]
pub struct ParseResult {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
    /// Source-map position of the first byte of the parsed text.
    pub start_pos: BytePos,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
    pub has_errors: bool,
}

pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
    start_pos: BytePos,
    line_starts: OnceLock<Vec<usize>>,
    disable_directives: DisableDirectives,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let language = detect_language(filename);
        let parser = Parser::for_language(language);
        let parse_result = parser.parse_module_recovering(source);
        let disable_directives = DisableDirectives::from_source(source);

        let line_count = if source.is_empty() {
            0
        } else {
            source.lines().count()
        };

        let metadata = FileMetadata {
            filename: filename.to_string(),
            language,
            line_count,
            has_errors: parse_result.has_errors(),
        };

        Self {
            source: source.to_string(),
            metadata,
            ast_module: parse_result.module,
            errors: parse_result.errors,
            start_pos: parse_result.start_pos,
            line_starts: OnceLock::new(),
            disable_directives,
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn disable_directives(&self) -> &DisableDirectives {
        &self.disable_directives
    }

    /// Byte range of `span` within [`Self::source`], if it lies inside the file.
    pub fn span_to_offsets(&self, span: Span) -> Option<(usize, usize)> {
        let lo = span.lo.0.checked_sub(self.start_pos.0)? as usize;
        let hi = span.hi.0.checked_sub(self.start_pos.0)? as usize;

        if lo <= hi && hi <= self.source.len() {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// 1-based line and character column of a byte offset.
    pub fn offset_to_location(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let starts = self.line_starts();
        let index = starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let line_start = starts[index];

        let column = self
            .source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);

        (index + 1, column + 1)
    }

    /// Byte offset of a 1-based line and character column. A column one past
    /// the last character of the line resolves to the end of that line.
    pub fn location_to_offset(&self, line: usize, column: usize) -> Option<usize> {
        if line == 0 || column == 0 {
            return None;
        }

        let starts = self.line_starts();
        let line_start = *starts.get(line - 1)?;
        let line_end = self.line_end(line - 1);
        let text = &self.source[line_start..line_end];

        let wanted = column - 1;
        match text.char_indices().nth(wanted) {
            Some((idx, _)) => Some(line_start + idx),
            None if text.chars().count() == wanted => Some(line_end),
            None => None,
        }
    }

    fn line_starts(&self) -> &[usize] {
        self.line_starts.get_or_init(|| {
            std::iter::once(0)
                .chain(
                    self.source
                        .char_indices()
                        .filter(|(_, c)| *c == '\n')
                        .map(|(i, _)| i + 1),
                )
                .collect()
        })
    }

    fn line_end(&self, index: usize) -> usize {
        self.line_starts()
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    pub fn for_file(filename: &str) -> Self {
        Self::for_language(detect_language(filename))
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).decorators(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder()
                .typescript(true)
                .jsx(true)
                .decorators(true)
                .build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parses `code` as a module, keeping the AST when SWC recovers from errors.
    pub fn parse_module_recovering(&self, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.ts".into()).into(), code.to_string());

        let mut recovered_errors = Vec::new();

        let result = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let to_parse_error = |e: swc_ecma_parser::error::Error| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            ParseError {
                line: loc.line,
                column: loc.col_display + 1,
                message: e.kind().msg().to_string(),
            }
        };

        let mut errors: Vec<ParseError> = recovered_errors
            .into_iter()
            .map(&to_parse_error)
            .collect();

        let module = match result {
            Ok(module) => Some(module),
            Err(e) => {
                errors.push(to_parse_error(e));
                None
            }
        };

        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "parser reported errors");
        }

        ParseResult {
            module,
            errors,
            start_pos: fm.start_pos,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
