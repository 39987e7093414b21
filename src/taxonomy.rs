//! Emotion taxonomy
//!
//! A fixed catalog of base emotions and their sub-emotions, read once at
//! startup from a JSON document of the form
//! `{"baseEmotions": [{"name": "...", "subemotions": ["...", ...]}]}`.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the taxonomy file. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse taxonomy file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("taxonomy has no base emotions")]
    Empty,
    #[error("taxonomy contains an emotion with an empty name")]
    EmptyName,
    #[error("duplicate base emotion: {0}")]
    DuplicateBase(String),
    #[error("duplicate sub-emotion {sub:?} under {base:?}")]
    DuplicateSub { base: String, sub: String },
}

/// A top-level category with its ordered sub-emotion labels
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseEmotion {
    pub name: String,
    pub subemotions: Vec<String>,
}

#[cfg(test)]
impl BaseEmotion {
    pub fn new(name: impl Into<String>, subemotions: &[&str]) -> Self {
        Self {
            name: name.into(),
            subemotions: subemotions.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaxonomyDocument {
    base_emotions: Vec<BaseEmotion>,
}

/// Immutable, validated catalog of emotions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionCatalog {
    bases: Vec<BaseEmotion>,
}

impl EmotionCatalog {
    /// Build a catalog, rejecting empty or ambiguous entries
    pub fn new(bases: Vec<BaseEmotion>) -> Result<Self, TaxonomyError> {
        if bases.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut seen_bases = HashSet::new();
        for base in &bases {
            if base.name.trim().is_empty() {
                return Err(TaxonomyError::EmptyName);
            }
            if !seen_bases.insert(base.name.as_str()) {
                return Err(TaxonomyError::DuplicateBase(base.name.clone()));
            }

            let mut seen_subs = HashSet::new();
            for sub in &base.subemotions {
                if sub.trim().is_empty() {
                    return Err(TaxonomyError::EmptyName);
                }
                if !seen_subs.insert(sub.as_str()) {
                    return Err(TaxonomyError::DuplicateSub {
                        base: base.name.clone(),
                        sub: sub.clone(),
                    });
                }
            }
        }

        Ok(Self { bases })
    }

    /// Parse and validate a taxonomy document
    pub fn from_json(path: &Path, json: &str) -> Result<Self, TaxonomyError> {
        let doc: TaxonomyDocument =
            serde_json::from_str(json).map_err(|source| TaxonomyError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(doc.base_emotions)
    }

    /// Read the taxonomy file from disk
    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let json = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }

    pub fn bases(&self) -> &[BaseEmotion] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn base(&self, index: usize) -> Option<&BaseEmotion> {
        self.bases.get(index)
    }

    #[cfg(test)]
    pub fn base_by_name(&self, name: &str) -> Option<&BaseEmotion> {
        self.bases.iter().find(|b| b.name == name)
    }

    /// Resolve a `(base, sub)` index pair to its labels
    pub fn sub(&self, base: usize, sub: usize) -> Option<(&str, &str)> {
        let base = self.bases.get(base)?;
        let label = base.subemotions.get(sub)?;
        Some((base.name.as_str(), label.as_str()))
    }
}
