//! Durable findings document for one run.
//!
//! The whole document is rewritten on every update. Nothing is cached between
//! calls, so a crash only loses the artifact that was being generated.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use intellidoc_core::ArtifactKind;

use crate::error::StoreError;

/// Typed view of the findings document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsDocument {
    #[serde(default)]
    pub root_summary: String,
    #[serde(default)]
    pub directories: BTreeMap<String, String>,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

pub struct FindingsStore {
    path: PathBuf,
}

impl FindingsStore {
    /// Handle to an existing document. Does not touch the filesystem.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the backing directory and write the empty three-field document.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_owned(),
                source,
            })?;
        }
        let store = Self::open(path);
        let empty = serde_json::to_value(FindingsDocument::default())?;
        store.write_raw(&empty)?;
        debug!("findings document initialized");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the leaf at `keys` to `value`, creating intermediate mappings.
    pub fn update(&self, keys: &[&str], value: &str) -> Result<(), StoreError> {
        let (leaf, parents) = keys
            .split_last()
            .ok_or_else(|| StoreError::InvalidKey("empty key path".into()))?;

        let mut doc = self.read_raw()?;
        let mut current = &mut doc;
        for part in parents {
            let map = current
                .as_object_mut()
                .ok_or_else(|| StoreError::InvalidKey(keys.join(" > ")))?;
            current = map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        current
            .as_object_mut()
            .ok_or_else(|| StoreError::InvalidKey(keys.join(" > ")))?
            .insert(leaf.to_string(), Value::String(value.to_string()));

        self.write_raw(&doc)
    }

    /// Persist one artifact under its level's key.
    pub fn record(&self, kind: &ArtifactKind, summary: &str) -> Result<(), StoreError> {
        self.update(&kind.store_keys(), summary)
    }

    pub fn read(&self) -> Result<FindingsDocument, StoreError> {
        Ok(serde_json::from_value(self.read_raw()?)?)
    }

    /// The document exactly as stored, including any keys outside the typed view.
    pub fn read_raw(&self) -> Result<Value, StoreError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| StoreError::from_io(&self.path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Pretty-print with four-space indentation, via a temp file and rename.
    fn write_raw(&self, doc: &Value) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut ser)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &buf).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
