//! End-to-end tests: rule files on disk through to substituted text.

use std::fs;

use polyreplace::{
    apply, load_rules, preprocess_tts_text, replace_tts_text, MalformedLinePolicy,
    PluginConfigBuilder, RuleError, RuleSyntax,
};

const RULES: &str = "\
# 多音字纠正
你好,您好
您好吗，你好吗

no delimiter here
  行长 , 杭长  \r
";

#[test]
fn chained_rules_from_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.txt");
    fs::write(&path, RULES).unwrap();

    let rules = load_rules(Some(&path), &RuleSyntax::default()).unwrap();
    assert_eq!(rules.len(), 3);
    assert_eq!(apply("你好吗", &rules), "你好吗");
    assert_eq!(apply("你好", &rules), "您好");
    assert_eq!(apply("银行行长", &rules), "银行杭长");
}

#[test]
fn loaded_rules_can_be_reused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.txt");
    fs::write(&path, "a,b\nb,c\n").unwrap();

    let rules = load_rules(Some(&path), &RuleSyntax::default()).unwrap();
    for _ in 0..3 {
        assert_eq!(apply("ab", &rules), "cc");
    }
}

#[test]
fn malformed_file_returns_no_rules() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.txt");
    fs::write(&path, "good,rule\na,b,c\n").unwrap();

    let err = replace_tts_text("good", Some(&path)).unwrap_err();
    assert!(matches!(err, RuleError::MalformedRule { line_number: 2, .. }));
    assert!(err.to_string().contains("a,b,c"));
}

#[test]
fn invalid_utf8_is_reported_as_unreadable_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.txt");
    fs::write(&path, [0xff, 0xfe, b',', b'a']).unwrap();

    let err = load_rules(Some(&path), &RuleSyntax::default()).unwrap_err();
    assert!(matches!(err, RuleError::SourceNotFound { .. }));
}

#[test]
fn preprocess_reads_rule_file_from_node_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rules.txt"), "重庆,崇庆\nbad,line,here\n").unwrap();

    let config = PluginConfigBuilder::default()
        .node_dir(dir.path())
        .rule_file_name("rules.txt")
        .polyreplace(true)
        .syntax(RuleSyntax {
            on_malformed: MalformedLinePolicy::Skip,
            ..RuleSyntax::default()
        })
        .build()
        .unwrap();

    assert_eq!(
        preprocess_tts_text("我在重庆", &config).unwrap(),
        "我在崇庆"
    );
}
