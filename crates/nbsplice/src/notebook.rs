//! nbformat v4 notebook documents.
//!
//! Only the parts this crate reads or writes are typed; everything else a notebook
//! carries (outputs, execution counts, attachments, extra metadata) is kept in the
//! `extra` maps so that a read → write cycle leaves it untouched.

use std::{fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, ser::PrettyFormatter};

use crate::error::{DebugResult, Error};

/// Major nbformat version written by this crate.
pub const NBFORMAT: u32 = 4;
/// Minor nbformat version written by this crate; 4.5 introduced cell ids.
pub const NBFORMAT_MINOR: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: NotebookMetadata,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernelspec: Option<KernelSpecRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `metadata.kernelspec` entry telling interactive tools which kernel to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpecRecord {
    pub display_name: String,
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: CellMetadata,
    #[serde(serialize_with = "serialize_source", deserialize_with = "deserialize_source")]
    pub source: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// A fresh, unexecuted code cell with a random id.
    pub fn code(source: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("execution_count".to_owned(), Value::Null);
        extra.insert("outputs".to_owned(), Value::Array(Vec::new()));
        Self {
            cell_type: CellType::Code,
            id: Some(new_cell_id()),
            metadata: CellMetadata::default(),
            source: source.into(),
            extra,
        }
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self {
            cell_type: CellType::Markdown,
            id: Some(new_cell_id()),
            metadata: CellMetadata::default(),
            source: source.into(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    pub fn is_code(&self) -> bool {
        self.cell_type == CellType::Code
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.as_ref().is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            metadata: NotebookMetadata::default(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }
}

impl Notebook {
    pub fn code_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.is_code())
    }

    pub fn read(path: &Path) -> DebugResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text).map_err(|source| Error::Notebook {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serializes the way Jupyter does: one-space indent and a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn write(&self, path: &Path) -> DebugResult<()> {
        let json = self.to_json().map_err(|source| Error::Notebook {
            path: path.to_owned(),
            source,
        })?;
        fs::write(path, json).map_err(|e| Error::io(path, e))
    }
}

/// nbformat cell ids: 8 lowercase hex characters.
fn new_cell_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Multiline strings are stored as a list of lines, each keeping its terminator.
fn serialize_source<S: Serializer>(source: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(source.split_inclusive('\n'))
}

/// Accepts both the list-of-lines form and a plain string.
fn deserialize_source<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Multiline {
        Text(String),
        Lines(Vec<String>),
    }
    Ok(match Multiline::deserialize(deserializer)? {
        Multiline::Text(text) => text,
        Multiline::Lines(lines) => lines.concat(),
    })
}
