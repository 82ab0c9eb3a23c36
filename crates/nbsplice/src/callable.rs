use std::{
    fs,
    ops::Range,
    path::{Path, PathBuf},
};

use ruff_python_ast::Stmt;

use crate::{
    error::{DebugResult, Error},
    lines::LineIndex,
    segment::{FunctionLayout, parse_python},
};

/// Where a function lives in its source file, captured once before any editing.
///
/// The line ranges are never recomputed: if the file changes underneath a session,
/// write-back splices into the stale range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableRef {
    path: PathBuf,
    name: String,
    source: String,
    lines: Range<usize>,
    body_lines: Range<usize>,
    indent: String,
}

impl CallableRef {
    /// Finds the module-level function `name` in the Python file at `path`.
    ///
    /// If the function is defined more than once the last definition is used, as that is
    /// the one bound at runtime. Methods and nested functions are not found.
    pub fn locate(path: impl AsRef<Path>, name: &str) -> DebugResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::locate_in(path, &text, name)
    }

    /// Like [`locate`](Self::locate), for file contents that are already loaded.
    pub fn locate_in(path: impl Into<PathBuf>, text: &str, name: &str) -> DebugResult<Self> {
        let path = path.into();
        let index = LineIndex::new(text);
        let module = parse_python(text, &index)?;
        let func = module
            .body
            .iter()
            .rev()
            .find_map(|stmt| match stmt {
                Stmt::FunctionDef(func) if func.name.as_str() == name => Some(func),
                _ => None,
            })
            .ok_or_else(|| Error::CallableNotFound {
                name: name.to_owned(),
                path: path.clone(),
            })?;

        let layout = FunctionLayout::of(func, text, &index)?;
        let mut source = index.slice_lines(layout.first_line, layout.last_line).to_owned();
        source.push('\n');
        Ok(Self {
            path,
            name: name.to_owned(),
            source,
            lines: layout.first_line..layout.last_line + 1,
            body_lines: layout.signature_line + 1..layout.last_line + 1,
            indent: layout.body_indent,
        })
    }

    /// Builds a reference from a location the caller already knows.
    ///
    /// `lines` and `body_lines` are 0-indexed, half-open line ranges in the file. The body
    /// is assumed to be indented by four spaces; see [`with_indent`](Self::with_indent).
    pub fn from_parts(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        source: impl Into<String>,
        lines: Range<usize>,
        body_lines: Range<usize>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            source: source.into(),
            lines,
            body_lines,
            indent: "    ".to_owned(),
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full definition, decorators and signature included.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 0-indexed, half-open lines of the whole definition.
    pub fn lines(&self) -> Range<usize> {
        self.lines.clone()
    }

    /// 0-indexed, half-open lines of the body; the slice replaced on write-back.
    pub fn body_lines(&self) -> Range<usize> {
        self.body_lines.clone()
    }

    /// Indentation of the body's first statement, e.g. four spaces or a tab.
    pub fn indent(&self) -> &str {
        &self.indent
    }
}
