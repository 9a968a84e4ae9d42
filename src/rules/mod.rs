//! Rule-based phrase substitution.
//!
//! Rules are loaded from a plain UTF-8 text file and applied in order to the
//! text sent to the synthesis engine. The typical use is fixing polyphonic
//! characters the model mispronounces by rewriting the phrase around them.
//!
//! # Rule File Format
//!
//! ```text
//! 行长,航长
//! 重庆，崇庆
//! # lines without a delimiter are ignored
//! ```
//!
//! | Part | Meaning |
//! |---|---|
//! | `<pattern>` | literal text to look for (not a regex) |
//! | `,` or `，` | delimiter, ASCII and full-width commas are equivalent |
//! | `<replacement>` | literal text written in place of every match |
//!
//! Both sides are trimmed. There is no escaping, so a pattern can never
//! contain a delimiter. A line with more than one delimiter, or with an empty
//! side, is malformed and by default aborts the whole load.
//!
//! # Examples
//!
//! ```rust
//! use polyreplace::rules::{apply, parse_rules};
//! use polyreplace::config::RuleSyntax;
//!
//! let rules = parse_rules("a,b\nb，c\n", &RuleSyntax::default())?;
//! assert_eq!(apply("ab", &rules), "cc");
//! # Ok::<(), polyreplace::rules::RuleError>(())
//! ```

pub mod parser;
pub mod substitute;

use std::path::PathBuf;

pub use parser::{load_rules, parse_rules, ReplacementRule, RuleSet};
pub use substitute::apply;

#[derive(thiserror::Error, Debug)]
pub enum RuleError {
    #[error("Rule file {path:?} could not be read: {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed rule on line {line_number}: {line:?} (expected `<pattern>,<replacement>`)")]
    MalformedRule { line_number: usize, line: String },
}
