//! The debug session: function body → temp notebook → edited notebook → function body.
//!
//! A session moves through `Created → Opened → Closed`:
//!
//! * [`DebugSession::open`] segments the function, builds the notebook, injects the
//!   parameters and writes the result to the session's temp path. Opening again
//!   regenerates the notebook from the captured source, discarding edits.
//! * [`DebugSession::close`] reads the (possibly edited) notebook back, splices its cells
//!   into the source file in place of the function body, then deletes the temp notebook.
//!   Closing twice fails with a not-found error because the notebook is gone.
//!
//! Cleanup and write-back are separate: dropping a session removes the temp notebook
//! if it still exists, but only `close` ever writes to the source file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempPath;

use crate::{
    build::write_notebook,
    callable::CallableRef,
    error::{DebugResult, Error},
    inject::{ParameterInjector, PrepareOnlyInjector},
    kernel::{JupyterKernelRegistry, KernelRegistry},
    notebook::Notebook,
    options::DebugOptions,
    params::ParameterBindings,
    reconstitute::reconstitute,
    segment::segment,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Temp path allocated, no notebook written yet.
    Created,
    /// Notebook written and available for editing.
    Opened,
    /// Source file rewritten and notebook deleted.
    Closed,
}

#[derive(Debug)]
pub struct DebugSession<R = JupyterKernelRegistry, I = PrepareOnlyInjector> {
    callable: CallableRef,
    bindings: ParameterBindings,
    registry: R,
    injector: I,
    options: DebugOptions,
    /// Removed on drop if it exists; never written back from there.
    notebook: TempPath,
    state: SessionState,
}

impl DebugSession {
    /// A session using the host's Jupyter kernels and native prepare-only injection.
    pub fn new(callable: CallableRef, bindings: ParameterBindings) -> DebugResult<Self> {
        Self::with_collaborators(
            callable,
            bindings,
            JupyterKernelRegistry::from_env(),
            PrepareOnlyInjector,
            DebugOptions::default(),
        )
    }
}

impl<R: KernelRegistry, I: ParameterInjector> DebugSession<R, I> {
    pub fn with_collaborators(
        callable: CallableRef,
        bindings: ParameterBindings,
        registry: R,
        injector: I,
        options: DebugOptions,
    ) -> DebugResult<Self> {
        let notebook = allocate_temp_path(&options.temp_dir())?;
        tracing::debug!(function = callable.name(), path = %notebook.display(), "created debug session");
        Ok(Self {
            callable,
            bindings,
            registry,
            injector,
            options,
            notebook,
            state: SessionState::Created,
        })
    }

    pub fn callable(&self) -> &CallableRef {
        &self.callable
    }

    pub fn bindings(&self) -> &ParameterBindings {
        &self.bindings
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The indentation unit stripped on open and restored on close.
    pub fn indent(&self) -> &str {
        self.options.indent.as_deref().unwrap_or(self.callable.indent())
    }

    /// Where the session's notebook is (or will be) written.
    pub fn notebook_path(&self) -> &Path {
        &self.notebook
    }

    /// Writes the parameterized notebook and returns its path for editing.
    pub fn open(&mut self) -> DebugResult<&Path> {
        let statements = segment(self.callable.source(), self.indent())?;
        write_notebook(&statements, &self.registry, &self.options.kernel_name, &self.notebook)?;
        self.injector.inject(&self.notebook, &self.bindings)?;
        self.state = SessionState::Opened;
        tracing::info!(
            function = self.callable.name(),
            cells = statements.len(),
            path = %self.notebook.display(),
            "opened debug notebook"
        );
        Ok(&self.notebook)
    }

    /// Writes the notebook's cells back into the source file and deletes the notebook.
    ///
    /// If the source file can't be written the notebook is left in place and the session
    /// stays open. Dropping the session still deletes it; call
    /// [`keep_notebook`](Self::keep_notebook) to hold on to the edits.
    pub fn close(&mut self) -> DebugResult<()> {
        let notebook = Notebook::read(&self.notebook)?;
        let target = self.callable.path();
        let original = fs::read_to_string(target).map_err(|e| Error::io(target, e))?;
        let text = reconstitute(&notebook, &original, self.callable.body_lines(), self.indent());
        if let Err(e) = fs::write(target, text) {
            tracing::warn!(
                target = %target.display(),
                notebook = %self.notebook.display(),
                error = %e,
                "write-back failed, leaving the notebook in place"
            );
            return Err(Error::io(target, e));
        }
        fs::remove_file(&self.notebook).map_err(|e| Error::io(self.notebook.to_path_buf(), e))?;
        self.state = SessionState::Closed;
        tracing::info!(function = self.callable.name(), target = %target.display(), "wrote back debug notebook");
        Ok(())
    }

    /// Opens the notebook, runs `edit` with its path, then closes the session.
    ///
    /// `close` runs whether or not `edit` succeeds. An error from `edit` takes precedence
    /// over one from `close`. If `open` fails, `edit` is not run and nothing is closed.
    pub fn scope<T, E>(&mut self, edit: impl FnOnce(&Path) -> Result<T, E>) -> Result<T, E>
    where
        E: From<Error>,
    {
        let path = self.open()?.to_path_buf();
        let edited = edit(&path);
        let closed = self.close();
        match (edited, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), closed) => {
                if let Err(close_err) = closed {
                    tracing::warn!(error = %close_err, "closing after a failed edit also failed");
                }
                Err(e)
            }
        }
    }

    /// Ends the session without writing back, keeping the notebook on disk.
    ///
    /// Useful after a failed [`close`](Self::close) to recover the edits by hand.
    pub fn keep_notebook(self) -> DebugResult<PathBuf> {
        self.notebook.keep().map_err(|e| Error::io(e.path.to_path_buf(), e.error))
    }
}

/// A unique `nbsplice-*.ipynb` path in `dir`; the file itself is not created.
fn allocate_temp_path(dir: &Path) -> DebugResult<TempPath> {
    let reserved = tempfile::Builder::new()
        .prefix("nbsplice-")
        .suffix(".ipynb")
        .rand_bytes(12)
        .make_in(dir, |_| Ok(()))
        .map_err(|e| Error::io(dir, e))?;
    let ((), path) = reserved.into_parts();
    Ok(path)
}
