//! mocklint core
//!
//! Parses JavaScript/TypeScript with SWC, runs lint rules over the syntax tree
//! and applies their fixes. The bundled rule, `prefer-mocked`, rewrites
//! `fn as jest.Mock` casts into `jest.mocked(fn)`.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod disable_comments;
pub mod fixer;
pub mod parser;
pub mod rules;
pub mod visitor;

pub use analysis::AnalysisEngine;
pub use diagnostic::{Diagnostic, Fix, FixKind};
pub use parser::ParsedFile;
