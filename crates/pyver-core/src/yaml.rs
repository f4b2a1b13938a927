//! Value-level editing of YAML configuration files.
//!
//! Unlike the TOML side there is no format-preserving YAML editor here: the
//! file is parsed into a value tree, edited, and re-serialized. To keep the
//! no-op case from rewriting files, change detection compares against the
//! serialization of the freshly parsed tree rather than the raw input text.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use pyver_util::errors::PyverError;

pub struct YamlDocument {
    path: PathBuf,
    value: Value,
    baseline: String,
}

impl YamlDocument {
    pub fn open(path: &Path) -> Result<Self, PyverError> {
        let content = fs::read_to_string(path)?;
        Self::from_string(path, &content)
    }

    pub fn from_string(path: impl Into<PathBuf>, content: &str) -> Result<Self, PyverError> {
        let path = path.into();
        let value: Value = serde_yaml::from_str(content).map_err(|e| PyverError::Config {
            message: format!("failed to parse {}: {e}", path.display()),
        })?;
        let baseline = render(&path, &value)?;
        Ok(Self {
            path,
            value,
            baseline,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn is_mapping(&self) -> bool {
        self.value.is_mapping()
    }

    pub fn get_path(&self, keys: &[&str]) -> Option<&Value> {
        let mut current = &self.value;
        for key in keys {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Set a string value, creating intermediate mappings as needed. Returns
    /// `false` without touching the document when an existing level on the
    /// path is not a mapping.
    pub fn set_string(&mut self, keys: &[&str], text: &str) -> bool {
        let Some((last, parents)) = keys.split_last() else {
            return false;
        };
        let mut current = &mut self.value;
        for key in parents {
            let Value::Mapping(map) = current else {
                return false;
            };
            current = map
                .entry(Value::String((*key).to_string()))
                .or_insert_with(|| Value::Mapping(Mapping::new()));
        }
        let Value::Mapping(map) = current else {
            return false;
        };
        map.insert(
            Value::String((*last).to_string()),
            Value::String(text.to_string()),
        );
        true
    }

    pub fn is_changed(&self) -> bool {
        match render(&self.path, &self.value) {
            Ok(rendered) => rendered != self.baseline,
            Err(_) => true,
        }
    }

    /// Write back if changed; returns whether a write happened.
    pub fn save(&mut self) -> Result<bool, PyverError> {
        let rendered = render(&self.path, &self.value)?;
        if rendered == self.baseline {
            return Ok(false);
        }
        fs::write(&self.path, &rendered)?;
        self.baseline = rendered;
        Ok(true)
    }
}

fn render(path: &Path, value: &Value) -> Result<String, PyverError> {
    serde_yaml::to_string(value).map_err(|e| PyverError::Config {
        message: format!("failed to serialize {}: {e}", path.display()),
    })
}
