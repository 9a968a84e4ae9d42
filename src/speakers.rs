//! Saved speaker models.
//!
//! A zero-shot cloning run produces a speaker model (embedding plus the
//! prompt features the model extracted) that can be stored and reused
//! instead of the original reference recording. Models are kept as one JSON
//! file per speaker under a speaker directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::PluginConfig;

#[derive(thiserror::Error, Debug)]
pub enum SpeakerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid speaker model file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Speaker model '{0}' not found. Call list() to see saved speakers.")]
    NotFound(String),
    #[error("Invalid speaker name {0:?}")]
    InvalidName(String),
}

/// Speaker conditioning extracted from a reference recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerModel {
    /// Speaker embedding vector.
    pub embedding: Vec<f32>,
    /// Additional named prompt features (flattened).
    #[serde(default)]
    pub features: BTreeMap<String, Vec<f32>>,
    /// Transcript of the reference recording, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
}

/// Directory of saved speaker models.
pub struct SpeakerStore {
    dir: PathBuf,
    extension: String,
}

impl SpeakerStore {
    /// Store rooted at `dir`, using files with `extension` (leading dot optional).
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension: String = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Store at the configured speaker directory and extension.
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(config.speaker_dir.clone(), config.speaker_extension.clone())
    }

    /// Directory holding the speaker files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a speaker model as `<name>.<extension>`, creating the directory
    /// if needed. Returns the written path.
    pub fn save(&self, name: &str, model: &SpeakerModel) -> Result<PathBuf, SpeakerError> {
        let path = self.path_for(name)?;
        log::info!("Saving speaker model {name} to {}", self.dir.display());

        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string(model)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Load a previously saved speaker model.
    pub fn load(&self, name: &str) -> Result<SpeakerModel, SpeakerError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(SpeakerError::NotFound(name.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let model = serde_json::from_str(&content)?;
        log::debug!("Loaded speaker model from {}", path.display());
        Ok(model)
    }

    /// Names of all saved speakers (searched recursively), sorted.
    pub fn list(&self) -> Result<Vec<String>, SpeakerError> {
        let mut names = Vec::new();
        if self.dir.is_dir() {
            self.collect(&self.dir, &mut names)?;
        }
        names.sort_unstable();
        Ok(names)
    }

    fn collect(&self, dir: &Path, names: &mut Vec<String>) -> Result<(), SpeakerError> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.collect(&path, names)?;
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SpeakerError> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(SpeakerError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.{}", self.extension)))
    }
}
