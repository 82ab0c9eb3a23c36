//! Parameterization: binding caller-supplied values ahead of a notebook's own cells.

use std::path::Path;

use crate::{
    error::DebugResult,
    notebook::{Cell, Notebook},
    params::ParameterBindings,
};

/// Tag carried by the cell holding injected parameters.
pub const INJECTED_PARAMETERS_TAG: &str = "injected-parameters";

/// Rewrites a notebook in place so that its first cell binds the given parameters.
///
/// Implementations must leave exactly one cell tagged [`INJECTED_PARAMETERS_TAG`], at
/// index 0, and must not alter the content or tags of any other cell.
pub trait ParameterInjector {
    fn inject(&self, notebook: &Path, bindings: &ParameterBindings) -> DebugResult<()>;
}

impl<I: ParameterInjector + ?Sized> ParameterInjector for &I {
    fn inject(&self, notebook: &Path, bindings: &ParameterBindings) -> DebugResult<()> {
        (**self).inject(notebook, bindings)
    }
}

/// Prepare-only parameterization done natively: the notebook is rewritten, never executed.
///
/// The injected cell starts with a `# Parameters` comment followed by one assignment per
/// binding. Any previously injected cell is replaced. With no bindings the notebook is
/// left as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrepareOnlyInjector;

impl PrepareOnlyInjector {
    /// Applies the bindings to an in-memory notebook.
    pub fn apply(notebook: &mut Notebook, bindings: &ParameterBindings) {
        if bindings.is_empty() {
            return;
        }
        notebook.cells.retain(|cell| !cell.has_tag(INJECTED_PARAMETERS_TAG));
        let source = format!("# Parameters\n{}", bindings.to_assignments());
        notebook
            .cells
            .insert(0, Cell::code(source).with_tag(INJECTED_PARAMETERS_TAG));
    }
}

impl ParameterInjector for PrepareOnlyInjector {
    fn inject(&self, path: &Path, bindings: &ParameterBindings) -> DebugResult<()> {
        let mut notebook = Notebook::read(path)?;
        Self::apply(&mut notebook, bindings);
        tracing::debug!(path = %path.display(), parameters = bindings.len(), "injected parameters");
        notebook.write(path)
    }
}
