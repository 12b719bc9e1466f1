//! # JSONPath Unit Tests / JSONPath 单元测试
//!
//! Tests the JSONPath subset used by quick API checks.
//!
//! 测试快速接口检查使用的 JSONPath 子集。

use serde_json::{json, Value};
use testengine::runner::jsonpath::{first, parse, select, JsonPathError, Segment};

fn document() -> Value {
    json!({
        "code": 0,
        "data": {
            "user": {"id": 7, "name": "ada"},
            "items": [
                {"id": 1, "tags": ["a"]},
                {"id": 2, "tags": ["b", "c"]},
                {"id": 3, "tags": []}
            ],
            "display name": "Ada L."
        }
    })
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn test_parse_dotted_and_bracketed_segments() {
        assert_eq!(
            parse("$.data.items[0]['id']").unwrap(),
            vec![
                Segment::Child("data".to_string()),
                Segment::Child("items".to_string()),
                Segment::Index(0),
                Segment::Child("id".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_relative_path_reads_from_root() {
        assert_eq!(parse("data.user").unwrap(), parse("$.data.user").unwrap());
        assert_eq!(parse("[0]").unwrap(), vec![Segment::Index(0)]);
    }

    #[test]
    fn test_parse_wildcards_and_descendants() {
        assert_eq!(
            parse("$..id").unwrap(),
            vec![Segment::Descendant("id".to_string())]
        );
        assert_eq!(
            parse("$.data.*").unwrap(),
            vec![Segment::Child("data".to_string()), Segment::Wildcard]
        );
        assert_eq!(parse("$..*").unwrap(), vec![Segment::DescendantAll]);
        assert_eq!(parse("$[*]").unwrap(), vec![Segment::Wildcard]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("  "), Err(JsonPathError::Empty));
        assert_eq!(parse("$.data["), Err(JsonPathError::Unterminated(6)));
        assert_eq!(parse("$.items[abc]"), Err(JsonPathError::InvalidSelector("abc".to_string())));
        assert_eq!(parse("$."), Err(JsonPathError::Truncated));
        assert!(matches!(parse("$x"), Err(JsonPathError::Unexpected { position: 1, found: 'x' })));
    }
}

#[cfg(test)]
mod select_tests {
    use super::*;

    #[test]
    fn test_select_child_and_index() {
        let doc = document();
        assert_eq!(first(&doc, "$.code").unwrap(), Some(&json!(0)));
        assert_eq!(first(&doc, "$.data.user.name").unwrap(), Some(&json!("ada")));
        assert_eq!(first(&doc, "$.data.items[1].id").unwrap(), Some(&json!(2)));
        assert_eq!(first(&doc, "$.data.items[-1].id").unwrap(), Some(&json!(3)));
        assert_eq!(first(&doc, "$.data['display name']").unwrap(), Some(&json!("Ada L.")));
    }

    #[test]
    fn test_select_wildcard_in_document_order() {
        let doc = document();
        let ids = select(&doc, "$.data.items[*].id").unwrap();
        assert_eq!(ids, vec![&json!(1), &json!(2), &json!(3)]);
    }

    #[test]
    fn test_select_descendants() {
        let doc = document();
        let ids = select(&doc, "$..id").unwrap();
        assert_eq!(ids, vec![&json!(7), &json!(1), &json!(2), &json!(3)]);
        let tags = select(&doc, "$..tags[0]").unwrap();
        assert_eq!(tags, vec![&json!("a"), &json!("b")]);
    }

    #[test]
    fn test_missing_values_select_nothing() {
        let doc = document();
        assert_eq!(first(&doc, "$.data.missing").unwrap(), None);
        assert_eq!(first(&doc, "$.data.items[10]").unwrap(), None);
        assert_eq!(first(&doc, "$.code.deeper").unwrap(), None);
    }
}
