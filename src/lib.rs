//! # polyreplace
//!
//! Text and audio preprocessing for voice-cloning text-to-speech pipelines.
//!
//! ## Features
//!
//! - **Phrase substitution**: ordered literal find-and-replace rules loaded from
//!   a plain text file, used to steer the pronunciation of polyphonic words
//! - **Prompt audio cleanup**: mono downmix, resampling, silence trimming and
//!   peak normalization of reference recordings
//! - **Speaker models**: save, load and list reusable speaker embeddings
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! polyreplace-rs = "2026.2"
//! ```
//!
//! ```ignore
//! use std::path::Path;
//!
//! let text = polyreplace::replace_tts_text("银行行长", Some(Path::new("rules.txt")))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod config;
pub mod rules;
pub mod speakers;

use std::path::Path;

pub use audio::{AudioClip, AudioError};
pub use config::{ConfigError, MalformedLinePolicy, PluginConfig, PluginConfigBuilder, RuleSyntax};
pub use rules::{apply, load_rules, parse_rules, ReplacementRule, RuleError, RuleSet};
pub use speakers::{SpeakerError, SpeakerModel, SpeakerStore};

#[derive(thiserror::Error, Debug)]
pub enum PreprocessError {
    #[error("Text to synthesize must not be empty")]
    EmptyText,
    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// Apply the rules in `rule_file` to `text`.
///
/// With no rule file the text is returned unchanged. Loading errors are
/// returned as is; callers that want to carry on without rules can fall back
/// to the original text.
pub fn replace_tts_text(text: &str, rule_file: Option<&Path>) -> Result<String, RuleError> {
    let rules = load_rules(rule_file, &RuleSyntax::default())?;
    Ok(apply(text, &rules))
}

/// Prepare text for synthesis according to the plugin configuration.
///
/// Substitution only runs when `config.polyreplace` is set, using the rule
/// file at [`PluginConfig::rule_file_path`].
pub fn preprocess_tts_text(text: &str, config: &PluginConfig) -> Result<String, PreprocessError> {
    if text.is_empty() {
        return Err(PreprocessError::EmptyText);
    }
    if !config.polyreplace {
        return Ok(text.to_string());
    }

    log::info!("Polyphonic word replacement enabled");
    let path = config.rule_file_path();
    let rules = load_rules(Some(&path), &config.syntax)?;
    let result = apply(text, &rules);
    log::debug!("Replaced text: {text:?} -> {result:?}");
    Ok(result)
}
