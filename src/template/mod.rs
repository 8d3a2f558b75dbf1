//! Template engine
//!
//! A small placeholder-substitution engine built as a proper
//! Lexer + Parser + AST pipeline. Templates contain four constructs:
//!
//! - `{{field}}` — variable substitution
//! - `{{> name}}` — partial inclusion
//! - `{{#if field}}...{{/if}}` — conditional block
//! - `{{#each list}}...{{/each}}` — repeated block
//!
//! Parsed templates are cached by path and invalidated when the source
//! file's modification time changes.

pub mod cache;
pub mod context;
pub mod engine;
pub mod parser;

pub use cache::TemplateCache;
pub use context::{Context, Value};
pub use engine::TemplateEngine;
pub use parser::{parse, Node};

use thiserror::Error;

/// Template parsing and rendering errors
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
