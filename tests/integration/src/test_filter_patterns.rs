//! Pattern evaluation against DynamoDB stream records.

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{allows, pattern, prop1_pattern, prop1_record, record};

    fn keys(prop1: &str, prop2: &str) -> streamfilter_model::EventNode {
        record(json!({"dynamodb": {"Keys": {"prop1": {"S": prop1}, "prop2": {"S": prop2}}}}))
    }

    fn check(filter: &Value, cases: &[(Value, bool)]) {
        let p = prop1_pattern(filter.clone());
        for (value, expected) in cases {
            assert_eq!(
                allows(&p, &prop1_record(Some(value.clone()))),
                *expected,
                "pattern {filter} against {value}"
            );
        }
    }

    #[test]
    fn test_should_or_multiple_patterns() {
        let patterns = vec![
            pattern(json!({"eventName": ["FOO"]})),
            pattern(json!({"eventName": ["BAR"]})),
        ];
        assert!(streamfilter_core::allow_event(&patterns, &record(json!({"eventName": "FOO"}))));
        assert!(streamfilter_core::allow_event(&patterns, &record(json!({"eventName": "BAR"}))));
        assert!(!streamfilter_core::allow_event(&patterns, &record(json!({"eventName": "BAZ"}))));
    }

    #[test]
    fn test_should_match_event_name() {
        let cases = [
            (json!(["FOO"]), "FOO", true),
            (json!(["FOO"]), "BAR", false),
            (json!(["BAZ", "FOO", "BAR"]), "FOO", true),
            (json!(["FOO", "BAR"]), "BAZ", false),
        ];
        for (names, event_name, expected) in cases {
            let p = pattern(json!({"eventName": names}));
            let r = record(json!({"eventName": event_name}));
            assert_eq!(allows(&p, &r), expected, "{names} against {event_name}");
        }
    }

    #[test]
    fn test_should_match_single_string_property() {
        check(&json!({"S": ["FOO"]}), &[(json!({"S": "FOO"}), true), (json!({"S": "BAR"}), false)]);
        check(
            &json!({"S": ["BAZ", "FOO", "BAR"]}),
            &[(json!({"S": "FOO"}), true), (json!({"S": "QUX"}), false)],
        );
    }

    #[test]
    fn test_should_and_multiple_properties() {
        let p = pattern(json!({"dynamodb": {"Keys": {"prop1": {"S": ["FOO"]}, "prop2": {"S": ["BAR"]}}}}));
        assert!(allows(&p, &keys("FOO", "BAR")));
        assert!(!allows(&p, &keys("FOOZ", "BAR")));
        assert!(!allows(&p, &keys("FOO", "BARZ")));
    }

    #[test]
    fn test_should_combine_and_with_or_alternatives() {
        let p = pattern(json!({"dynamodb": {"Keys": {
            "prop1": {"S": ["FOO", "BAR"]},
            "prop2": {"S": ["BAR", "BAZ"]}
        }}}));
        for (prop1, prop2) in [("FOO", "BAR"), ("FOO", "BAZ"), ("BAR", "BAR"), ("BAR", "BAZ")] {
            assert!(allows(&p, &keys(prop1, prop2)), "{prop1}/{prop2}");
        }
        for (prop1, prop2) in [
            ("FOOZ", "BAR"),
            ("FOOZ", "BAZ"),
            ("BARZ", "BAR"),
            ("BARZ", "BAZ"),
            ("FOO", "BARZ"),
            ("FOO", "BAZZ"),
            ("BAR", "BARZ"),
            ("BAR", "BAZZ"),
        ] {
            assert!(!allows(&p, &keys(prop1, prop2)), "{prop1}/{prop2}");
        }
    }

    #[test]
    fn test_should_match_numbers() {
        check(&json!({"N": [100]}), &[(json!({"N": 100}), true), (json!({"N": 101}), false)]);
        check(
            &json!({"N": [99, 100, 101]}),
            &[(json!({"N": 100}), true), (json!({"N": "100"}), true), (json!({"N": 102}), false)],
        );
        check(
            &json!({"N": ["1e-20"]}),
            &[(json!({"N": "1e-20"}), true), (json!({"N": "3e-20"}), false)],
        );
        check(&json!([{"numeric": ["=", 0]}]), &[(json!({"N": "0"}), true), (json!({"N": "1e-17"}), false)]);
    }

    #[test]
    fn test_should_match_binary() {
        check(&json!({"B": ["abcd"]}), &[(json!({"B": "abcd"}), true), (json!({"B": "efgh"}), false)]);
        check(
            &json!({"B": ["abcd", "efgh"]}),
            &[
                (json!({"B": "abcd"}), true),
                (json!({"B": "efgh"}), true),
                (json!({"B": "ijkl"}), false),
            ],
        );
    }

    #[test]
    fn test_should_match_booleans() {
        check(&json!({"BOOL": [true]}), &[(json!({"BOOL": true}), true), (json!({"BOOL": false}), false)]);
        check(&json!({"BOOL": [false]}), &[(json!({"BOOL": true}), false)]);
        check(
            &json!({"BOOL": [false, true]}),
            &[(json!({"BOOL": true}), true), (json!({"BOOL": false}), true)],
        );
    }

    #[test]
    fn test_should_match_empty_string() {
        check(&json!({"S": [""]}), &[(json!({"S": ""}), true), (json!({"S": "FOO"}), false)]);
        check(&json!([""]), &[(json!({"S": ""}), true), (json!({"S": "FOO"}), false)]);
    }

    #[test]
    fn test_should_match_null_rule() {
        check(
            &json!([null]),
            &[(json!({"NULL": ""}), true), (json!({"NULL": true}), true), (json!({"S": "FOO"}), false)],
        );
        check(&json!({"NULL": ""}), &[(json!({"NULL": true}), true), (json!({"S": ""}), false)]);
        // An absent attribute is not NULL.
        assert!(!allows(&prop1_pattern(json!([null])), &prop1_record(None)));
    }

    #[test]
    fn test_should_match_anything_but() {
        check(
            &json!([{"anything-but": ["FOO"]}]),
            &[(json!({"S": "BAR"}), true), (json!({"S": "FOO"}), false)],
        );
        check(
            &json!([{"anything-but": ["FOO", "BAZ"]}]),
            &[(json!({"S": "BAR"}), true), (json!({"S": "BAZ"}), false)],
        );
        check(
            &json!([{"anything-but": ["FOO", "BAR"]}]),
            &[(json!({"S": "BAR"}), false)],
        );
        check(
            &json!([{"anything-but": [1, 2]}]),
            &[(json!({"N": "3"}), true), (json!({"N": 2}), false)],
        );
    }

    #[test]
    fn test_should_match_single_numeric_comparisons() {
        #[rustfmt::skip]
        let allowed = [
            ("=", 1, 1), ("=", 0, 0), ("=", -1, -1),
            ("<", 2, 1), ("<", 1, 0), ("<", 0, -1),
            ("<=", 2, 2), ("<=", 2, 1), ("<=", 1, 1), ("<=", 1, 0), ("<=", 0, 0), ("<=", 0, -1), ("<=", -1, -1),
            (">", 1, 2), (">", 0, 1), (">", -1, 0),
            (">=", 2, 2), (">=", 1, 2), (">=", 1, 1), (">=", 0, 1), (">=", 0, 0), (">=", -1, 0), (">=", -1, -1),
        ];
        #[rustfmt::skip]
        let rejected = [
            ("=", 1, 2), ("=", 0, 1), ("=", -1, -2), ("=", -1, 1), ("=", 1, -1),
            ("<", 1, 2), ("<", 1, 1), ("<", 0, 1), ("<", 0, 0), ("<", -1, 0), ("<", -1, -1),
            ("<=", 1, 2), ("<=", 0, 1), ("<=", -1, 0),
            (">", 2, 1), (">", 1, 1), (">", 1, 0), (">", 0, 0), (">", 0, -1), (">", -1, -1),
            (">=", 2, 1), (">=", 1, 0), (">=", 0, -1),
        ];
        for (cases, expected) in [(&allowed[..], true), (&rejected[..], false)] {
            for &(op, operand, value) in cases {
                let p = prop1_pattern(json!([{"numeric": [op, operand]}]));
                assert_eq!(
                    allows(&p, &prop1_record(Some(json!({"N": value})))),
                    expected,
                    "{value} {op} {operand}"
                );
            }
        }
    }

    #[test]
    fn test_should_match_numeric_ranges() {
        #[rustfmt::skip]
        let allowed = [
            (">", 5, "<", 7, 6),
            (">", 5, "<=", 7, 6), (">", 5, "<=", 7, 7),
            (">=", 5, "<", 7, 5), (">=", 5, "<", 7, 6),
            (">=", -1, "<", 2, -1), (">=", -1, "<", 2, 0), (">=", -1, "<", 2, 1),
            (">", -2, "<=", 1, -1), (">", -2, "<=", 1, 0), (">", -2, "<=", 1, 1),
        ];
        #[rustfmt::skip]
        let rejected = [
            (">", 5, "<", 7, 5), (">", 5, "<", 7, 7),
            (">", 5, "<=", 7, 5), (">", 5, "<=", 7, 8),
            (">=", 5, "<", 7, 4), (">=", 5, "<", 7, 7),
            (">=", -1, "<", 2, -2), (">=", -1, "<", 2, 2),
            (">", -2, "<=", 1, -2), (">", -2, "<=", 1, 2),
        ];
        for (cases, expected) in [(&allowed[..], true), (&rejected[..], false)] {
            for &(low_op, low, high_op, high, value) in cases {
                let p = prop1_pattern(json!([{"numeric": [low_op, low, high_op, high]}]));
                assert_eq!(
                    allows(&p, &prop1_record(Some(json!({"N": value})))),
                    expected,
                    "{low_op} {low} {high_op} {high} against {value}"
                );
            }
        }
    }

    #[test]
    fn test_should_match_exists() {
        let cases = [
            (true, Some(json!({"S": "FOO"})), true),
            (true, Some(json!({"N": 1})), true),
            (false, None, true),
            (false, Some(json!({"S": "FOO"})), false),
            (false, Some(json!({"N": 1})), false),
            (true, None, false),
        ];
        for (present, value, expected) in cases {
            let p = prop1_pattern(json!([{"exists": present}]));
            assert_eq!(
                allows(&p, &prop1_record(value.clone())),
                expected,
                "exists {present} against {value:?}"
            );
        }
    }

    #[test]
    fn test_should_match_prefix() {
        check(
            &json!([{"prefix": "FO"}]),
            &[
                (json!({"S": "FOO"}), true),
                (json!({"S": "FO"}), true),
                (json!({"S": "1FOO"}), false),
            ],
        );
        check(
            &json!([{"prefix": "BA"}]),
            &[
                (json!({"S": "BAR"}), true),
                (json!({"S": "BA"}), true),
                (json!({"S": "ABAR"}), false),
            ],
        );
    }

    #[test]
    fn test_should_or_mixed_rule_list() {
        check(
            &json!([null, "", {"numeric": ["=", 100]}]),
            &[
                (json!({"NULL": true}), true),
                (json!({"S": ""}), true),
                (json!({"N": "100"}), true),
                (json!({"N": "101"}), false),
                (json!({"S": "FOO"}), false),
            ],
        );
    }

    #[test]
    fn test_should_match_new_and_old_images() {
        let p = pattern(json!({
            "eventName": ["MODIFY"],
            "dynamodb": {
                "OldImage": {"status": {"S": ["pending"]}},
                "NewImage": {"status": {"S": ["shipped"]}}
            }
        }));
        let shipped = record(json!({
            "eventName": "MODIFY",
            "dynamodb": {
                "Keys": {"id": {"S": "1"}},
                "OldImage": {"id": {"S": "1"}, "status": {"S": "pending"}},
                "NewImage": {"id": {"S": "1"}, "status": {"S": "shipped"}}
            }
        }));
        let cancelled = record(json!({
            "eventName": "MODIFY",
            "dynamodb": {
                "Keys": {"id": {"S": "1"}},
                "OldImage": {"id": {"S": "1"}, "status": {"S": "pending"}},
                "NewImage": {"id": {"S": "1"}, "status": {"S": "cancelled"}}
            }
        }));
        assert!(allows(&p, &shipped));
        assert!(!allows(&p, &cancelled));
    }
}
