#![doc = include_str!("../../../README.md")]

mod build;
mod callable;
mod error;
mod inject;
mod kernel;
mod lines;
mod notebook;
mod options;
mod params;
mod reconstitute;
mod segment;
mod session;

pub use crate::{
    build::{build_notebook, write_notebook},
    callable::CallableRef,
    error::{DebugResult, Error},
    inject::{INJECTED_PARAMETERS_TAG, ParameterInjector, PrepareOnlyInjector},
    kernel::{JupyterKernelRegistry, KernelRegistry, KernelSpec, StaticKernelRegistry},
    notebook::{Cell, CellMetadata, CellType, KernelSpecRecord, NBFORMAT, NBFORMAT_MINOR, Notebook, NotebookMetadata},
    options::DebugOptions,
    params::{ParamValue, ParameterBindings},
    reconstitute::{COMMENT_MARKER, indent_cell, kept_cells, reconstitute, splice},
    segment::{Statement, segment},
    session::{DebugSession, SessionState},
};
