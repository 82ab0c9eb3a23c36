//! Turning an edited notebook back into a function body inside its source file.

use std::ops::Range;

use crate::{inject::INJECTED_PARAMETERS_TAG, notebook::Notebook};

/// Cells starting with this line are annotations and never written back.
pub const COMMENT_MARKER: &str = "#\n";

/// Sources of the code cells that belong in the function body, in notebook order.
///
/// Skips non-code cells, the injected-parameters cell and comment-marker cells. The
/// marker test is an exact prefix match: `#\n...` is dropped, `# note\n...` is kept.
pub fn kept_cells(notebook: &Notebook) -> Vec<&str> {
    notebook
        .code_cells()
        .filter(|cell| !cell.has_tag(INJECTED_PARAMETERS_TAG) && !cell.source.starts_with(COMMENT_MARKER))
        .map(|cell| cell.source.as_str())
        .collect()
}

/// Prefixes every non-empty line with `indent`; empty lines stay empty.
pub fn indent_cell(code: &str, indent: &str) -> String {
    code.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("{indent}{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces `lines` of `original` with `body`, one entry per cell.
///
/// Each entry may span several lines. The result is joined with `\n`, and keeps a
/// trailing newline if `original` had one. A range past the end of the file is clamped.
pub fn splice(original: &str, lines: Range<usize>, body: &[String]) -> String {
    let content: Vec<&str> = original.lines().collect();
    let end = lines.end.min(content.len());
    let start = lines.start.min(end);

    let mut out: Vec<&str> = Vec::with_capacity(content.len() + body.len());
    out.extend_from_slice(&content[..start]);
    out.extend(body.iter().map(String::as_str));
    out.extend_from_slice(&content[end..]);

    let mut text = out.join("\n");
    if original.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// The new source file text: `notebook`'s kept cells, indented, in place of `body_lines`.
pub fn reconstitute(notebook: &Notebook, original: &str, body_lines: Range<usize>, indent: &str) -> String {
    let body: Vec<String> = kept_cells(notebook)
        .into_iter()
        .map(|code| indent_cell(code, indent))
        .collect();
    tracing::debug!(cells = body.len(), ?body_lines, "reconstituted function body");
    splice(original, body_lines, &body)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notebook::Cell;

    #[test]
    fn indent_leaves_blank_lines_empty() {
        assert_eq!(indent_cell("x = 1", "    "), "    x = 1");
        assert_eq!(indent_cell("if x:\n    y()\n\nz\n", "    "), "    if x:\n        y()\n\n    z");
        assert_eq!(indent_cell("", "    "), "");
    }

    #[test]
    fn marker_matching_is_exact_prefix() {
        let mut nb = Notebook::default();
        nb.cells.push(Cell::code("#\nscratch()"));
        nb.cells.push(Cell::code("# comment\nkept()"));
        nb.cells.push(Cell::code("#"));
        nb.cells.push(Cell::markdown("prose"));
        nb.cells.push(Cell::code("a = 1").with_tag(INJECTED_PARAMETERS_TAG));
        assert_eq!(kept_cells(&nb), vec!["# comment\nkept()", "#"]);
    }

    #[test]
    fn splice_replaces_range() {
        let original = "def f(a):\n    old = 1\n    return old\n\nx = f(1)\n";
        let body = vec!["    new = 2".to_owned(), "    return new".to_owned()];
        assert_eq!(
            splice(original, 1..3, &body),
            "def f(a):\n    new = 2\n    return new\n\nx = f(1)\n"
        );
    }

    #[test]
    fn splice_without_trailing_newline() {
        assert_eq!(splice("a\nb\nc", 1..2, &["B".to_owned()]), "a\nB\nc");
    }

    #[test]
    fn splice_clamps_stale_range() {
        assert_eq!(splice("a\nb\n", 1..10, &["B".to_owned()]), "a\nB\n");
        assert_eq!(splice("a\n", 5..10, &["B".to_owned()]), "a\nB\n");
    }
}
