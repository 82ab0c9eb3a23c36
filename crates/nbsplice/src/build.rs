//! Turning statement fragments into a notebook document.

use std::path::Path;

use crate::{
    error::DebugResult,
    kernel::KernelRegistry,
    notebook::{Cell, Notebook, NotebookMetadata},
    segment::Statement,
};

/// Builds a notebook with one code cell per statement, in order.
///
/// The kernel is resolved first so that an unknown kernel fails before anything is
/// produced.
pub fn build_notebook(
    statements: &[Statement],
    registry: &impl KernelRegistry,
    kernel_name: &str,
) -> DebugResult<Notebook> {
    let kernel = registry.resolve(kernel_name)?;
    let notebook = Notebook {
        cells: statements.iter().map(|stmt| Cell::code(stmt.source.as_str())).collect(),
        metadata: NotebookMetadata {
            kernelspec: Some(kernel.to_record()),
            ..NotebookMetadata::default()
        },
        ..Notebook::default()
    };
    tracing::debug!(cells = notebook.cells.len(), kernel = %kernel.name, "built notebook");
    Ok(notebook)
}

/// [`build_notebook`], then write the result to `path`.
pub fn write_notebook(
    statements: &[Statement],
    registry: &impl KernelRegistry,
    kernel_name: &str,
    path: &Path,
) -> DebugResult<Notebook> {
    let notebook = build_notebook(statements, registry, kernel_name)?;
    notebook.write(path)?;
    Ok(notebook)
}
