use super::RuleSet;

/// Apply every rule once, in order, to `input`.
///
/// Each rule replaces all non-overlapping occurrences of its pattern in the
/// string produced by the previous rule, so replacements can feed later
/// rules. Matching is literal.
pub fn apply(input: &str, rules: &RuleSet) -> String {
    let mut result = input.to_string();

    for rule in rules {
        if rule.pattern.is_empty() {
            log::debug!("Ignoring rule with empty pattern");
            continue;
        }
        if result.contains(&rule.pattern) {
            result = result.replace(&rule.pattern, &rule.replacement);
        }
    }

    result
}
