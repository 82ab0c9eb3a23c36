//! Kernel specification lookup.
//!
//! The notebook builder only needs a kernel's display name and language to stamp
//! `metadata.kernelspec`, so lookup is a narrow capability: [`KernelRegistry::resolve`].
//! [`JupyterKernelRegistry`] reads the `kernel.json` files a Jupyter installation keeps
//! on disk; [`StaticKernelRegistry`] is an in-memory table for hosts and tests that
//! don't want to depend on one.

use std::{
    env,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    error::{DebugResult, Error},
    notebook::KernelSpecRecord,
};

/// A registered interactive execution environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSpec {
    pub name: String,
    pub display_name: String,
    pub language: String,
    /// Command line used to start the kernel; informational only.
    pub argv: Vec<String>,
}

impl KernelSpec {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            language: language.into(),
            argv: Vec::new(),
        }
    }

    /// The record stored under a notebook's `metadata.kernelspec`.
    pub fn to_record(&self) -> KernelSpecRecord {
        KernelSpecRecord {
            display_name: self.display_name.clone(),
            language: self.language.clone(),
            name: self.name.clone(),
        }
    }
}

pub trait KernelRegistry {
    /// Looks up a kernel by name, failing with [`Error::KernelNotFound`] if it isn't registered.
    fn resolve(&self, name: &str) -> DebugResult<KernelSpec>;
}

impl<R: KernelRegistry + ?Sized> KernelRegistry for &R {
    fn resolve(&self, name: &str) -> DebugResult<KernelSpec> {
        (**self).resolve(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticKernelRegistry {
    specs: IndexMap<String, KernelSpec>,
}

impl StaticKernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the stock `python3` kernel that ipykernel installs.
    pub fn python3() -> Self {
        let mut registry = Self::new();
        registry.register(KernelSpec {
            argv: ["python", "-m", "ipykernel_launcher", "-f", "{connection_file}"]
                .map(str::to_owned)
                .to_vec(),
            ..KernelSpec::new("python3", "Python 3 (ipykernel)", "python")
        });
        registry
    }

    pub fn register(&mut self, spec: KernelSpec) {
        self.specs.insert(spec.name.clone(), spec);
    }
}

impl KernelRegistry for StaticKernelRegistry {
    fn resolve(&self, name: &str) -> DebugResult<KernelSpec> {
        self.specs.get(name).cloned().ok_or_else(|| Error::KernelNotFound { name: name.to_owned() })
    }
}

/// Resolves kernels from `kernels/<name>/kernel.json` under Jupyter's data directories.
///
/// Names not found on disk fall back to the kernels in `native`, which is how Jupyter
/// makes `python3` available whenever ipykernel is importable.
#[derive(Debug, Clone)]
pub struct JupyterKernelRegistry {
    data_dirs: Vec<PathBuf>,
    native: StaticKernelRegistry,
}

/// The subset of `kernel.json` this crate reads.
#[derive(Debug, Deserialize)]
struct KernelJson {
    display_name: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    argv: Vec<String>,
}

impl JupyterKernelRegistry {
    /// Searches `data_dirs` in order; the first directory containing the kernel wins.
    pub fn new(data_dirs: Vec<PathBuf>) -> Self {
        Self {
            data_dirs,
            native: StaticKernelRegistry::new(),
        }
    }

    /// Jupyter's own search order, read from the process environment. See [`Self::from_vars`].
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var_os(key))
    }

    /// Jupyter's search order with environment variables taken from `var`:
    ///
    /// 1. `JUPYTER_PATH` entries
    /// 2. the user data directory (`JUPYTER_DATA_DIR` if set)
    /// 3. `share/jupyter` under the active environment (`VIRTUAL_ENV`, then `CONDA_PREFIX`)
    /// 4. the system-wide directories
    ///
    /// `python3` resolves to the stock ipykernel spec if no directory has it.
    pub fn from_vars(var: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut data_dirs: Vec<PathBuf> = var("JUPYTER_PATH")
            .map(|paths| env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()).collect())
            .unwrap_or_default();
        if let Some(dir) = var("JUPYTER_DATA_DIR") {
            data_dirs.push(PathBuf::from(dir));
        } else if let Some(dir) = user_data_dir(&var) {
            data_dirs.push(dir);
        }
        for prefix in ["VIRTUAL_ENV", "CONDA_PREFIX"].into_iter().filter_map(&var) {
            let dir = PathBuf::from(prefix).join("share").join("jupyter");
            if !data_dirs.contains(&dir) {
                data_dirs.push(dir);
            }
        }
        data_dirs.extend(system_data_dirs(&var));
        tracing::trace!(?data_dirs, "jupyter kernel search path");
        Self {
            data_dirs,
            native: StaticKernelRegistry::python3(),
        }
    }

    pub fn data_dirs(&self) -> &[PathBuf] {
        &self.data_dirs
    }

    fn load(path: &Path, name: &str) -> DebugResult<KernelSpec> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let json: KernelJson = serde_json::from_str(&text).map_err(|e| Error::InvalidKernelSpec {
            path: path.to_owned(),
            message: e.to_string(),
        })?;
        Ok(KernelSpec {
            name: name.to_owned(),
            display_name: json.display_name,
            language: json.language.unwrap_or_default(),
            argv: json.argv,
        })
    }
}

impl KernelRegistry for JupyterKernelRegistry {
    fn resolve(&self, name: &str) -> DebugResult<KernelSpec> {
        // kernel directory names are case-insensitive
        let name = name.to_lowercase();
        for dir in &self.data_dirs {
            let path = dir.join("kernels").join(&name).join("kernel.json");
            if path.is_file() {
                tracing::debug!(kernel = %name, path = %path.display(), "found kernel spec");
                return Self::load(&path, &name);
            }
        }
        let spec = self.native.resolve(&name)?;
        tracing::debug!(kernel = %name, "no kernel.json found, using the native kernel");
        Ok(spec)
    }
}

fn home_dir(var: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    var(if cfg!(windows) { "USERPROFILE" } else { "HOME" }).map(PathBuf::from)
}

fn user_data_dir(var: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    if cfg!(windows) {
        var("APPDATA").map(|dir| PathBuf::from(dir).join("jupyter"))
    } else if cfg!(target_os = "macos") {
        home_dir(var).map(|home| home.join("Library").join("Jupyter"))
    } else if let Some(xdg) = var("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg).join("jupyter"))
    } else {
        home_dir(var).map(|home| home.join(".local").join("share").join("jupyter"))
    }
}

fn system_data_dirs(var: impl Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    if cfg!(windows) {
        var("PROGRAMDATA")
            .map(|dir| vec![PathBuf::from(dir).join("jupyter")])
            .unwrap_or_default()
    } else {
        vec![
            PathBuf::from("/usr/local/share/jupyter"),
            PathBuf::from("/usr/share/jupyter"),
        ]
    }
}
