//! Grammar acceptance and rejection of filter patterns.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use streamfilter_core::{EventFilter, PatternError, parse_patterns};

    use crate::prop1_pattern;

    #[test]
    fn test_should_accept_every_documented_filter_form() {
        let filters = [
            json!({"S": ["FOO"]}),
            json!({"S": ["FOO", "BAR"]}),
            json!({"N": [1]}),
            json!({"N": [1, 2]}),
            json!({"B": ["abcd"]}),
            json!({"B": ["abcd", "efgh"]}),
            json!({"BOOL": [true]}),
            json!({"BOOL": [false]}),
            json!({"BOOL": [true, false]}),
            json!({"NULL": ""}),
            json!([null]),
            json!([""]),
            json!([{"numeric": ["=", 100]}]),
            json!([{"anything-but": ["FOO"]}]),
            json!([{"anything-but": ["FOO", "BAR"]}]),
            json!([{"anything-but": [1]}]),
            json!([{"anything-but": [1, 2]}]),
            json!([{"exists": true}]),
            json!([{"exists": false}]),
            json!([{"prefix": "FOO"}]),
            json!([null, "", {"numeric": ["=", 100]}]),
        ];
        for filter in filters {
            let pattern = prop1_pattern(filter);
            assert_eq!(pattern.leaf_count(), 1);
        }
    }

    #[test]
    fn test_should_reject_unknown_numeric_operator_at_decode_time() {
        let err = EventFilter::from_json(r#"[{"dynamodb": {"Keys": {"n": [{"numeric": ["!=", 1]}]}}}]"#)
            .unwrap_err();
        assert!(matches!(err, PatternError::UnknownOperator { .. }));
        assert!(err.to_string().contains("!="), "{err}");
    }

    #[test]
    fn test_should_reject_malformed_patterns() {
        let cases = [
            json!({"eventName": "INSERT"}),
            json!({"eventName": []}),
            json!({"p": [{"unknown": 1}]}),
            json!({"p": [{"exists": "yes"}]}),
            json!({"p": [{"prefix": 1}]}),
            json!({"p": [{"numeric": [">", "one"]}]}),
            json!({"p": [{"numeric": [">", 1, "<"]}]}),
            json!({"p": [{"prefix": "a", "exists": true}]}),
            json!({"p": {}}),
            json!({"p": {"S": ["FOO", 1]}}),
            json!({"p": {"N": [1, true]}}),
            json!({"p": {"BOOL": ["true"]}}),
            json!({"p": {"NULL": "x"}}),
            json!(42),
        ];
        for case in cases {
            assert!(parse_patterns(&case).is_err(), "{case} should be rejected");
        }
    }

    #[test]
    fn test_should_name_the_offending_path() {
        let err = parse_patterns(&json!([{"dynamodb": {"NewImage": {"age": [{"numeric": ["<>", 3]}]}}}]))
            .unwrap_err();
        assert!(err.to_string().contains("dynamodb.NewImage.age"), "{err}");
    }
}
