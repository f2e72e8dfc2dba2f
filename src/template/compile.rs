//! Template parsing and rendering.
//!
//! # Responsibilities
//! - Parse `{{ .Field }}` placeholder sources into executable templates
//! - Reject malformed sources at construction time
//! - Render against a request context into an isolated buffer
//!
//! # Design Decisions
//! - Syntax is checked at parse time; field names resolve at render time
//! - Templates are immutable after parse (concurrent renders, no locks)
//! - Error byte offsets point at the opening delimiter
//! - Stray `}}` outside a placeholder is literal text

use thiserror::Error;

use crate::template::context::RequestContext;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Errors that can occur while parsing a template source.
#[derive(Debug, Error)]
pub enum CompileError {
    /// `{{` with no matching `}}`.
    #[error("unclosed placeholder starting at byte {at}")]
    UnclosedPlaceholder { at: usize },

    /// Placeholder with nothing between the delimiters.
    #[error("empty placeholder at byte {at}")]
    EmptyPlaceholder { at: usize },

    /// Placeholder body that is not a `.Field` reference.
    #[error("unknown directive `{directive}` at byte {at}")]
    UnknownDirective { directive: String, at: usize },
}

/// Errors that can occur while rendering a compiled template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template references a field the context does not expose.
    #[error("undefined context field `{field}`")]
    UndefinedField { field: String },
}

/// One parsed piece of a template source.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Verbatim text copied into the output.
    Literal(String),
    /// `{{ .Name }}` placeholder, looked up in the context on each render.
    Field(String),
}

/// A compiled header-value template.
///
/// Parsed once at middleware construction and rendered once per request
/// per entry. Holds no per-render state.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source` into a reusable template.
    ///
    /// `name` disambiguates diagnostics only; it has no runtime effect.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, CompileError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0usize;

        while let Some(open) = rest.find(OPEN) {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let at = offset + open;
            let after_open = &rest[open + OPEN.len()..];
            let close = after_open
                .find(CLOSE)
                .ok_or(CompileError::UnclosedPlaceholder { at })?;
            segments.push(parse_placeholder(&after_open[..close], at)?);

            let consumed = open + OPEN.len() + close + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            name: name.into(),
            source: source.to_string(),
            segments,
        })
    }

    /// Render against `ctx`, producing the header value.
    pub fn render(&self, ctx: &RequestContext) -> Result<String, RenderError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => {
                    let value =
                        ctx.field(field)
                            .ok_or_else(|| RenderError::UndefinedField {
                                field: field.clone(),
                            })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    /// Diagnostic name assigned at parse time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Validate one placeholder body (the text between `{{` and `}}`).
fn parse_placeholder(body: &str, at: usize) -> Result<Segment, CompileError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(CompileError::EmptyPlaceholder { at });
    }

    let field = trimmed
        .strip_prefix('.')
        .ok_or_else(|| CompileError::UnknownDirective {
            directive: trimmed.to_string(),
            at,
        })?;

    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CompileError::UnknownDirective {
            directive: trimmed.to_string(),
            at,
        });
    }

    Ok(Segment::Field(field.to_string()))
}
