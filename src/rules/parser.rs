use std::path::Path;

use crate::config::{MalformedLinePolicy, RuleSyntax};

use super::RuleError;

/// A single literal substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementRule {
    pub pattern: String,
    pub replacement: String,
}

impl ReplacementRule {
    /// Create a rule replacing `pattern` with `replacement`.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Ordered list of rules, in the order they appeared in the source.
///
/// Order matters: each rule runs on the output of the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<ReplacementRule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; it runs after every rule already in the set.
    pub fn push(&mut self, rule: ReplacementRule) {
        self.rules.push(rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReplacementRule> {
        self.rules.iter()
    }
}

impl FromIterator<ReplacementRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = ReplacementRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a ReplacementRule;
    type IntoIter = std::slice::Iter<'a, ReplacementRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Load a rule set from a UTF-8 rule file.
///
/// `None` means no rule file was configured and yields an empty set. The
/// file is read in one go; any read failure (missing file, permissions,
/// invalid UTF-8) is reported as [`RuleError::SourceNotFound`].
pub fn load_rules(source: Option<&Path>, syntax: &RuleSyntax) -> Result<RuleSet, RuleError> {
    let Some(path) = source else {
        return Ok(RuleSet::new());
    };

    let content = std::fs::read_to_string(path).map_err(|e| RuleError::SourceNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;

    let rules = parse_rules(&content, syntax)?;
    log::info!("Loaded {} replacement rules from {}", rules.len(), path.display());
    Ok(rules)
}

/// Parse rule lines from an in-memory source.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn parse_rules(text: &str, syntax: &RuleSyntax) -> Result<RuleSet, RuleError> {
    let mut rules = RuleSet::new();

    for (idx, raw) in split_lines(text).enumerate() {
        let line = raw.trim();
        if !line.contains(|c: char| syntax.is_delimiter(c)) {
            continue;
        }

        match parse_line(line, syntax) {
            Some(rule) => rules.push(rule),
            None => match syntax.on_malformed {
                MalformedLinePolicy::Abort => {
                    return Err(RuleError::MalformedRule {
                        line_number: idx + 1,
                        line: line.to_string(),
                    });
                }
                MalformedLinePolicy::Skip => {
                    log::warn!("Skipping malformed rule on line {}: {line:?}", idx + 1);
                }
            },
        }
    }

    Ok(rules)
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(['\r', '\n']) else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(line)
    })
}

/// Split a trimmed line into a rule. Every delimiter glyph counts the same,
/// which is equivalent to normalizing them all to the ASCII comma first.
fn parse_line(line: &str, syntax: &RuleSyntax) -> Option<ReplacementRule> {
    let mut parts = line.split(|c: char| syntax.is_delimiter(c));
    let pattern = parts.next()?.trim();
    let replacement = parts.next()?.trim();

    if parts.next().is_some() || pattern.is_empty() || replacement.is_empty() {
        return None;
    }

    Some(ReplacementRule::new(pattern, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax() -> RuleSyntax {
        RuleSyntax::default()
    }

    #[test]
    fn full_width_comma_is_equivalent_to_ascii() {
        let full = parse_rules("旧词，新词", &syntax()).unwrap();
        let ascii = parse_rules("旧词,新词", &syntax()).unwrap();
        assert_eq!(full, ascii);
        assert_eq!(
            full.iter().next(),
            Some(&ReplacementRule::new("旧词", "新词"))
        );
    }

    #[test]
    fn trims_line_and_both_sides() {
        let rules = parse_rules("  foo , bar  \n", &syntax()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.iter().next(), Some(&ReplacementRule::new("foo", "bar")));
    }

    #[test]
    fn handles_crlf_line_endings() {
        let rules = parse_rules("a,b\r\nc,d\r\n", &syntax()).unwrap();
        let pairs: Vec<_> = rules
            .iter()
            .map(|r| (r.pattern.as_str(), r.replacement.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "b"), ("c", "d")]);
    }

    #[test]
    fn lone_carriage_return_ends_a_line() {
        let rules = parse_rules("a,b\rc,d", &syntax()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.iter().nth(1), Some(&ReplacementRule::new("c", "d")));
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let err = parse_rules("x,y\r\n\r\na,b,c", &syntax()).unwrap_err();
        assert!(matches!(err, RuleError::MalformedRule { line_number: 3, .. }));
    }

    #[test]
    fn ignores_lines_without_delimiter() {
        let rules = parse_rules("# comment\n\nfoo,bar\njust text\n", &syntax()).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn keeps_file_order_and_duplicates() {
        let rules = parse_rules("x,1\ny,2\nx,3\n", &syntax()).unwrap();
        let patterns: Vec<_> = rules.iter().map(|r| r.replacement.as_str()).collect();
        assert_eq!(patterns, vec!["1", "2", "3"]);
    }

    #[test]
    fn two_delimiters_abort_the_load() {
        let err = parse_rules("ok,fine\na,b,c\n", &syntax()).unwrap_err();
        match err {
            RuleError::MalformedRule { line_number, line } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "a,b,c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mixed_delimiters_count_together() {
        assert!(parse_rules("a，b,c", &syntax()).is_err());
    }

    #[test]
    fn empty_side_is_malformed() {
        assert!(parse_rules(",bar", &syntax()).is_err());
        assert!(parse_rules("foo, ", &syntax()).is_err());
    }

    #[test]
    fn skip_policy_drops_malformed_lines() {
        let syntax = RuleSyntax {
            on_malformed: MalformedLinePolicy::Skip,
            ..RuleSyntax::default()
        };
        let rules = parse_rules("a,b,c\nfoo,bar\n", &syntax).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.iter().next(), Some(&ReplacementRule::new("foo", "bar")));
    }

    #[test]
    fn custom_delimiters() {
        let syntax = RuleSyntax {
            delimiters: vec!['='],
            ..RuleSyntax::default()
        };
        let rules = parse_rules("a=b\nc,d\n", &syntax).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.iter().next(), Some(&ReplacementRule::new("a", "b")));
    }

    #[test]
    fn no_source_yields_empty_set() {
        let rules = load_rules(None, &syntax()).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let path = Path::new("/nonexistent/polyreplace/rules.txt");
        let err = load_rules(Some(path), &syntax()).unwrap_err();
        assert!(matches!(err, RuleError::SourceNotFound { .. }));
    }
}
