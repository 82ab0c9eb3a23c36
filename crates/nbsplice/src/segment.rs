//! Splits a function's body into top-level statement fragments, one per notebook cell.
//!
//! Parsing is done with `ruff_python_parser`; only statement boundaries are used; nothing
//! is evaluated. Fragments are whole lines: each statement owns the blank lines and
//! comments that precede it, so those survive the round trip back into the source file.

use std::ops::Range;

use ruff_python_ast::{ModModule, Stmt, StmtFunctionDef};
use ruff_python_parser::parse_module;
use ruff_text_size::Ranged;

use crate::{
    error::{DebugResult, Error},
    lines::LineIndex,
};

/// One top-level statement of a function body, without the body's indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Source text, lines joined with `\n`, no trailing newline.
    pub source: String,
    /// 0-indexed lines of the callable's source this fragment was taken from.
    pub lines: Range<usize>,
}

/// Line layout of a function definition within the text it was parsed from.
#[derive(Debug, Clone)]
pub(crate) struct FunctionLayout {
    /// First line of the definition, including decorators.
    pub first_line: usize,
    /// Line holding the `:` that ends the signature.
    pub signature_line: usize,
    /// Last line of the body.
    pub last_line: usize,
    /// Leading whitespace of the first body statement; one indentation unit.
    pub body_indent: String,
}

impl FunctionLayout {
    pub fn of(func: &StmtFunctionDef, text: &str, index: &LineIndex<'_>) -> DebugResult<Self> {
        let name = func.name.as_str();
        let def_start = func.decorator_list.first().map_or(func.start(), Ranged::start);

        // the signature ends at the first `:` after the parameters and return annotation,
        // nothing but whitespace, `->` and line continuations can sit in between
        let after = usize::from(func.returns.as_ref().map_or(func.parameters.end(), |returns| returns.end()));
        let colon = text[after..]
            .find(':')
            .map(|i| after + i)
            .ok_or_else(|| Error::UnsupportedCallable {
                name: name.to_owned(),
                reason: "could not find the end of the signature",
            })?;
        let signature_line = index.line_of(colon);

        let (Some(first), Some(last)) = (func.body.first(), func.body.last()) else {
            return Err(Error::UnsupportedCallable {
                name: name.to_owned(),
                reason: "function has no body",
            });
        };
        if index.line_of(usize::from(first.start())) == signature_line {
            return Err(Error::UnsupportedCallable {
                name: name.to_owned(),
                reason: "body starts on the same line as the signature",
            });
        }

        let body_start = usize::from(first.start());
        let body_indent = &text[index.line_start(index.line_of(body_start))..body_start];

        Ok(Self {
            first_line: index.line_of(usize::from(def_start)),
            signature_line,
            last_line: last_line_of(last, index),
            body_indent: body_indent.to_owned(),
        })
    }
}

/// Parses `text` as a Python module, mapping syntax errors to [`Error::Parse`].
pub(crate) fn parse_python(text: &str, index: &LineIndex<'_>) -> DebugResult<ModModule> {
    match parse_module(text) {
        Ok(parsed) => Ok(parsed.into_syntax()),
        Err(e) => Err(Error::Parse {
            line: index.line_of(usize::from(e.location.start())) + 1,
            message: e.error.to_string(),
        }),
    }
}

/// Splits the body of the function defined in `source` into statements.
///
/// `source` is the full definition, signature included, starting at column 0. Up to
/// `indent.len()` characters of leading whitespace are removed from every line.
/// `return` statements get no special treatment.
pub fn segment(source: &str, indent: &str) -> DebugResult<Vec<Statement>> {
    let index = LineIndex::new(source);
    let module = parse_python(source, &index)?;
    let Some(func) = module.body.iter().find_map(|stmt| match stmt {
        Stmt::FunctionDef(func) => Some(func),
        _ => None,
    }) else {
        return Err(Error::Parse {
            line: 1,
            message: "expected a function definition".to_owned(),
        });
    };
    let layout = FunctionLayout::of(func, source, &index)?;

    let mut spans: Vec<Range<usize>> = Vec::with_capacity(func.body.len());
    let mut next_line = layout.signature_line + 1;
    for stmt in &func.body {
        let first = index.line_of(usize::from(stmt.start()));
        let last = last_line_of(stmt, &index);
        // `a = 1; b = 2` - statements sharing a line stay in one cell
        let shared = if first < next_line { spans.last_mut() } else { None };
        if let Some(prev) = shared {
            prev.end = last + 1;
        } else {
            spans.push(next_line..last + 1);
        }
        next_line = last + 1;
    }

    let width = indent.chars().count();
    let statements: Vec<Statement> = spans
        .into_iter()
        .map(|lines| {
            let text = index.slice_lines(lines.start, lines.end - 1);
            let source = text.lines().map(|line| strip_indent(line, width)).collect::<Vec<_>>().join("\n");
            Statement { source, lines }
        })
        .collect();
    tracing::debug!(function = func.name.as_str(), statements = statements.len(), "segmented function body");
    Ok(statements)
}

fn last_line_of(stmt: &Stmt, index: &LineIndex<'_>) -> usize {
    let range = stmt.range();
    let end = usize::from(range.end()).max(usize::from(range.start()) + 1);
    index.line_of(end - 1)
}

/// Removes up to `width` leading whitespace characters.
fn strip_indent(line: &str, width: usize) -> &str {
    let strip = line
        .bytes()
        .take(width)
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[strip..]
}
