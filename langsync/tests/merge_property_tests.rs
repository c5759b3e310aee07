use langsync::traits::FromLines;
use langsync::{ExistingEntryIndex, SyncConfig, entry_key, merge};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("valid key regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?]{1,30}").expect("valid value regex")
}

fn table_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..8)
}

fn render(entries: &BTreeMap<String, String>, comment: Option<&str>) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
    if let Some(comment) = comment {
        out.push_str(&format!("    <!-- {} -->\n", comment));
    }
    for (key, value) in entries {
        out.push_str(&format!("    <string name=\"{}\">{}</string>\n", key, value));
    }
    out.push_str("</resources>\n");
    out
}

fn merge_text(source: &str, target: &str) -> String {
    let index = ExistingEntryIndex::from_text(target).unwrap();
    let mut out = Vec::new();
    merge(Cursor::new(source), &index, &mut out, &SyncConfig::default()).unwrap();
    String::from_utf8(out).unwrap()
}

fn entries_of(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("<string"))
        .filter_map(|line| entry_key(line).map(|k| (k.to_string(), line.to_string())))
        .collect()
}

proptest! {
    #[test]
    fn prop_second_merge_is_a_no_op(
        source in table_strategy(),
        target in table_strategy(),
    ) {
        let source = render(&source, Some("generated"));
        let target = render(&target, None);

        let first = merge_text(&source, &target);
        let second = merge_text(&source, &first);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_existing_lines_win_and_new_keys_come_from_source(
        source in table_strategy(),
        target in table_strategy(),
    ) {
        let source_text = render(&source, None);
        let target_text = render(&target, None);
        let merged = entries_of(&merge_text(&source_text, &target_text));
        let source_lines = entries_of(&source_text);
        let target_lines = entries_of(&target_text);

        prop_assert_eq!(merged.len(), source.len());
        for (key, line) in &merged {
            match target_lines.get(key) {
                Some(existing) => prop_assert_eq!(line, existing),
                None => prop_assert_eq!(Some(line), source_lines.get(key)),
            }
        }
    }

    #[test]
    fn prop_structure_follows_source(
        source in table_strategy(),
        target in table_strategy(),
    ) {
        let source_text = render(&source, Some("layout"));
        let merged = merge_text(&source_text, &render(&target, Some("stale#marker")));

        prop_assert_eq!(merged.matches("\r\n").count(), source_text.lines().count());
        prop_assert!(merged.contains("\t<!-- layout -->\r\n"));
        prop_assert!(!merged.contains("stale#marker"));
    }
}
