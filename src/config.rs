//! Plugin configuration.
//!
//! Everything the original node hard-coded (rule file name, delimiter glyphs,
//! speaker folder, prompt audio parameters) lives here so it can be set from
//! a JSON file or built in code.
//!
//! ```rust
//! use polyreplace::config::PluginConfigBuilder;
//!
//! let config = PluginConfigBuilder::default()
//!     .node_dir("/opt/nodes/cosyvoice")
//!     .polyreplace(true)
//!     .build()?;
//! assert!(config.rule_file_path().ends_with("多音字纠正配置.txt"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default name of the polyphonic correction rule file.
pub const DEFAULT_RULE_FILE_NAME: &str = "多音字纠正配置.txt";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What to do with a rule line that has a delimiter but does not split into
/// exactly two non-empty parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Fail the whole load.
    #[default]
    Abort,
    /// Log a warning and drop the line.
    Skip,
}

/// Lexical settings for rule files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSyntax {
    /// Glyphs accepted between pattern and replacement. All are equivalent.
    pub delimiters: Vec<char>,
    pub on_malformed: MalformedLinePolicy,
}

impl Default for RuleSyntax {
    fn default() -> Self {
        Self {
            delimiters: vec![',', '，'],
            on_malformed: MalformedLinePolicy::Abort,
        }
    }
}

impl RuleSyntax {
    /// True if `c` separates a pattern from its replacement.
    pub fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(&c)
    }
}

/// Parameters for cleaning up a reference (prompt) recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Rate the cloning model expects for prompt audio.
    pub sample_rate: u32,
    /// Rate of synthesized output. Also sizes the silence pad appended to
    /// prompt audio, whatever the prompt rate.
    pub target_sample_rate: u32,
    /// Frames quieter than this many dB below the loudest frame are silence.
    pub top_db: f32,
    pub frame_length: usize,
    pub hop_length: usize,
    /// Peak amplitude ceiling after normalization.
    pub max_amplitude: f32,
    /// Seconds of silence appended after trimming.
    pub pad_secs: f32,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            target_sample_rate: 22050,
            top_db: 60.0,
            frame_length: 440,
            hop_length: 220,
            max_amplitude: 0.8,
            pad_secs: 0.2,
        }
    }
}

/// Top-level plugin configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct PluginConfig {
    /// Directory holding the rule file.
    pub node_dir: PathBuf,
    pub rule_file_name: String,
    /// Enables polyphonic word replacement before synthesis.
    pub polyreplace: bool,
    pub syntax: RuleSyntax,
    /// Directory for saved speaker models.
    pub speaker_dir: PathBuf,
    /// Extension of speaker model files, without the dot.
    pub speaker_extension: String,
    pub prompt: PromptConfig,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            node_dir: PathBuf::from("."),
            rule_file_name: DEFAULT_RULE_FILE_NAME.to_string(),
            polyreplace: false,
            syntax: RuleSyntax::default(),
            speaker_dir: PathBuf::from("Speaker"),
            speaker_extension: "json".to_string(),
            prompt: PromptConfig::default(),
        }
    }
}

impl PluginConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        log::debug!("Loaded plugin config from {}", path.display());
        Ok(config)
    }

    /// Full path of the rule file.
    pub fn rule_file_path(&self) -> PathBuf {
        self.node_dir.join(&self.rule_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_node_settings() {
        let config = PluginConfig::default();
        assert!(!config.polyreplace);
        assert_eq!(config.rule_file_path(), Path::new(".").join(DEFAULT_RULE_FILE_NAME));
        assert_eq!(config.prompt.sample_rate, 16000);
        assert_eq!(config.prompt.target_sample_rate, 22050);
        assert!(config.syntax.is_delimiter(','));
        assert!(config.syntax.is_delimiter('，'));
        assert!(!config.syntax.is_delimiter(';'));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "polyreplace": true,
            "rule_file_name": "rules.txt",
            "syntax": { "on_malformed": "skip" },
            "prompt": { "top_db": 40.0 }
        }"#;
        let config: PluginConfig = serde_json::from_str(json).unwrap();
        assert!(config.polyreplace);
        assert_eq!(config.rule_file_name, "rules.txt");
        assert_eq!(config.syntax.on_malformed, MalformedLinePolicy::Skip);
        assert_eq!(config.syntax.delimiters, vec![',', '，']);
        assert_eq!(config.prompt.top_db, 40.0);
        assert_eq!(config.prompt.hop_length, 220);
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let config = PluginConfigBuilder::default()
            .node_dir("/tmp/nodes")
            .speaker_extension("spk")
            .build()
            .unwrap();
        assert_eq!(config.node_dir, PathBuf::from("/tmp/nodes"));
        assert_eq!(config.speaker_extension, "spk");
        assert_eq!(config.rule_file_name, DEFAULT_RULE_FILE_NAME);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = PluginConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
