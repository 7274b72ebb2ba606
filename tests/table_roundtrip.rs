//! Property tests for the table artifact format.

use proptest::prelude::*;

use git_renorm::conventional::{ClassifyOptions, RuleSet};
use git_renorm::data::MappingTable;

/// Message-ish text: printable runs mixed with the characters the escape
/// logic has to survive — quotes, backslashes, newlines, tabs.
fn message_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 .,:;!?#(){}\\[\\]-]{1,12}",
            Just("'".to_string()),
            Just("\"".to_string()),
            Just("\\".to_string()),
            Just("\n".to_string()),
            Just("\t".to_string()),
            Just("é".to_string()),
            Just("日本語".to_string()),
        ],
        1..8,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn render_parse_round_trips(pairs in proptest::collection::vec((message_text(), message_text()), 0..20)) {
        let mut table = MappingTable::new();
        for (k, v) in pairs {
            table.insert(k, v);
        }

        let reparsed = MappingTable::parse(&table.render());
        prop_assert_eq!(reparsed, table);
    }

    #[test]
    fn classify_is_total_and_idempotent(message in message_text()) {
        let rules = RuleSet::default();
        let opts = ClassifyOptions::default();
        let once = git_renorm::conventional::rewrite_message(&message, &rules, opts);
        let twice = git_renorm::conventional::rewrite_message(&once, &rules, opts);
        prop_assert_eq!(once, twice);
    }
}
