use crate::Result;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Mapping from model class id to the label reported for it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: BTreeMap<usize, String>,
}

/// Accepted JSON layouts: `["apple", ...]` or `{"0": "apple", ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum NamesDocument {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl ClassNames {
    /// Create an empty label set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered list where the position is the class id
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).enumerate().collect(),
        }
    }

    /// Register a label, rejecting empty names and ids already taken
    pub fn insert(&mut self, class_id: usize, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            bail!("Empty label for class id {}", class_id);
        }
        if let Some(existing) = self.names.get(&class_id) {
            bail!(
                "Duplicate class id {}: '{}' already registered, got '{}'",
                class_id,
                existing,
                name
            );
        }
        self.names.insert(class_id, name);
        Ok(())
    }

    /// Label for a class id, if known
    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(&class_id).map(String::as_str)
    }

    pub fn contains(&self, class_id: usize) -> bool {
        self.names.contains_key(&class_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Load a label file.
    ///
    /// Files ending in `.json` hold either an array of names or an object keyed
    /// by class id. Anything else is read as text with one `id: name` entry per
    /// line; blank lines and `#` comments are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read class names: {:?}", path))?;

        let is_json = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let names = if is_json {
            Self::parse_json(&contents)
        } else {
            Self::parse_text(&contents)
        }
        .with_context(|| format!("Invalid class names file: {:?}", path))?;

        info!("Loaded {} class names from {:?}", names.len(), path);
        Ok(names)
    }

    /// Parse the JSON label layouts
    pub fn parse_json(contents: &str) -> Result<Self> {
        let document: NamesDocument =
            serde_json::from_str(contents).context("Failed to parse class names JSON")?;

        let mut names = Self::new();
        match document {
            NamesDocument::List(list) => {
                for (class_id, name) in list.into_iter().enumerate() {
                    names.insert(class_id, name)?;
                }
            }
            NamesDocument::Map(map) => {
                for (key, name) in map {
                    let class_id = key
                        .trim()
                        .parse::<usize>()
                        .with_context(|| format!("Invalid class id key: '{}'", key))?;
                    names.insert(class_id, name)?;
                }
            }
        }
        Ok(names)
    }

    /// Parse the `id: name` text layout
    pub fn parse_text(contents: &str) -> Result<Self> {
        let mut names = Self::new();

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, name) = line.split_once(':').with_context(|| {
                format!(
                    "Invalid line format at line {}: '{}' (expected id: name)",
                    line_num + 1,
                    line
                )
            })?;

            let class_id = id.trim().parse::<usize>().with_context(|| {
                format!("Invalid class id at line {}: '{}'", line_num + 1, id.trim())
            })?;

            names
                .insert(class_id, name.trim())
                .with_context(|| format!("Rejected entry at line {}", line_num + 1))?;
        }

        Ok(names)
    }
}

impl FromIterator<(usize, String)> for ClassNames {
    fn from_iter<T: IntoIterator<Item = (usize, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
