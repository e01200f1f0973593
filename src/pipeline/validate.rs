//! Completion parsing and structural validation.
//!
//! The model's text must be a JSON element tree in which every node carries
//! a non-empty string `elType`. Children are reached only through an
//! `elements` array; any other shape under `elements` is left alone.
//!
//! The walk is iterative (explicit stack, depth-first pre-order) so the
//! first reported node is the one a recursive descent would hit first, and
//! a hostile tree cannot exhaust the call stack. The path of the failing
//! node is reported as `$.elements[0].elements[2]`.
//!
//! Nothing is repaired: no fence stripping, no partial recovery. A tree that
//! passes is returned exactly as parsed.

use crate::error::ConvertError;
use crate::prompts::ERROR_KEY;
use serde_json::Value;

/// Field naming an element's kind.
pub const TYPE_TAG: &str = "elType";

/// Field holding an element's ordered children.
pub const CHILDREN: &str = "elements";

/// Parse the completion text and validate the resulting tree.
pub fn parse_completion(text: &str, max_depth: usize) -> Result<Value, ConvertError> {
    let document = parse_tree(text, max_depth, |e| ConvertError::InvalidJsonResponse {
        detail: e.to_string(),
    })?;

    if let Some(message) = rejection_message(&document) {
        return Err(ConvertError::ModelRejected { message });
    }

    validate_tree(&document, max_depth)?;
    Ok(document)
}

/// Parse JSON text into a tree.
///
/// Text nested past serde_json's recursion limit is necessarily deeper than
/// any accepted `max_depth`, so it becomes [`ConvertError::TooDeep`]. Every
/// other parse failure is mapped by `on_syntax`.
pub fn parse_tree<F>(text: &str, max_depth: usize, on_syntax: F) -> Result<Value, ConvertError>
where
    F: FnOnce(serde_json::Error) -> ConvertError,
{
    serde_json::from_str(text).map_err(|e| {
        if is_recursion_limit(&e) {
            ConvertError::TooDeep {
                max_depth,
                path: "$".to_string(),
            }
        } else {
            on_syntax(e)
        }
    })
}

// serde_json has no dedicated category for this; the message is stable.
fn is_recursion_limit(e: &serde_json::Error) -> bool {
    e.is_syntax() && e.to_string().starts_with("recursion limit exceeded")
}

/// `{"error": "..."}` without an `elType` is the model declining to convert.
fn rejection_message(document: &Value) -> Option<String> {
    let object = document.as_object()?;
    if object.contains_key(TYPE_TAG) {
        return None;
    }
    object
        .get(ERROR_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Check that every node reachable through `elements` has a type tag.
pub fn validate_tree(root: &Value, max_depth: usize) -> Result<(), ConvertError> {
    walk(root, max_depth, |node, path| {
        if has_type_tag(node) {
            Ok(())
        } else {
            Err(ConvertError::MissingTypeTag {
                path: path.to_string(),
            })
        }
    })
}

/// Check only the nesting depth of a tree.
pub fn check_depth(root: &Value, max_depth: usize) -> Result<(), ConvertError> {
    walk(root, max_depth, |_, _| Ok(()))
}

fn has_type_tag(node: &Value) -> bool {
    node.get(TYPE_TAG)
        .and_then(Value::as_str)
        .is_some_and(|tag| !tag.is_empty())
}

/// Depth-first pre-order walk over `elements`, root at depth 0.
fn walk<F>(root: &Value, max_depth: usize, mut visit: F) -> Result<(), ConvertError>
where
    F: FnMut(&Value, &str) -> Result<(), ConvertError>,
{
    let mut stack: Vec<(&Value, String, usize)> = vec![(root, "$".to_string(), 0)];

    while let Some((node, path, depth)) = stack.pop() {
        if depth > max_depth {
            return Err(ConvertError::TooDeep { max_depth, path });
        }
        visit(node, &path)?;

        if let Some(Value::Array(children)) = node.get(CHILDREN) {
            // Reversed so the first child is popped first.
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((child, format!("{path}.{CHILDREN}[{i}]"), depth + 1));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH};
    use crate::error::ErrorKind;
    use serde_json::json;

    fn nested(depth: usize) -> Value {
        let mut node = json!({"elType": "widget"});
        for _ in 0..depth {
            node = json!({"elType": "container", "elements": [node]});
        }
        node
    }

    #[test]
    fn valid_tree_is_returned_verbatim() {
        let text = r#"{"id":"a1","elType":"e-flexbox","settings":{"z":1,"a":2},"elements":[{"elType":"widget","widgetType":"e-heading"}]}"#;
        let doc = parse_completion(text, 64).unwrap();
        assert_eq!(serde_json::to_string(&doc).unwrap(), text);
    }

    #[test]
    fn not_json_is_a_parse_error() {
        let err = parse_completion("not json", 64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseParse);
    }

    #[test]
    fn fenced_json_is_not_repaired() {
        let err = parse_completion("```json\n{\"elType\":\"container\"}\n```", 64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseParse);
    }

    #[test]
    fn missing_tag_on_child_is_a_validation_error() {
        let err = parse_completion(
            r#"{"elType":"container","elements":[{"no_type":"x"}]}"#,
            64,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        match err {
            ConvertError::MissingTypeTag { path } => assert_eq!(path, "$.elements[0]"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn first_missing_tag_in_pre_order_is_reported() {
        let doc = json!({
            "elType": "container",
            "elements": [
                {"elType": "container", "elements": [{"elType": "widget"}, {"settings": {}}]},
                {"settings": {}}
            ]
        });
        match validate_tree(&doc, 64).unwrap_err() {
            ConvertError::MissingTypeTag { path } => {
                assert_eq!(path, "$.elements[0].elements[1]")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn root_without_tag_fails() {
        match validate_tree(&json!({"elements": []}), 64).unwrap_err() {
            ConvertError::MissingTypeTag { path } => assert_eq!(path, "$"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_or_non_string_tags_fail() {
        assert!(validate_tree(&json!({"elType": ""}), 64).is_err());
        assert!(validate_tree(&json!({"elType": null}), 64).is_err());
        assert!(validate_tree(&json!({"elType": 3}), 64).is_err());
        assert!(validate_tree(&json!(["elType"]), 64).is_err());
        assert!(validate_tree(&json!({"elType": "c", "elements": ["text"]}), 64).is_err());
    }

    #[test]
    fn non_array_elements_are_not_descended() {
        let doc = json!({"elType": "container", "elements": {"no_type": "x"}});
        assert!(validate_tree(&doc, 64).is_ok());
    }

    #[test]
    fn error_object_is_a_model_rejection() {
        let err = parse_completion(r#"{"error": "input is not a container"}"#, 64).unwrap_err();
        match &err {
            ConvertError::ModelRejected { message } => {
                assert_eq!(message, "input is not a container")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn error_member_on_a_tagged_element_is_ordinary_data() {
        let doc = parse_completion(r#"{"elType":"widget","error":"label text"}"#, 64).unwrap();
        assert_eq!(doc["error"], "label text");
    }

    #[test]
    fn depth_cap_is_enforced() {
        assert!(validate_tree(&nested(4), 4).is_ok());
        let err = validate_tree(&nested(5), 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        match err {
            ConvertError::TooDeep { max_depth, path } => {
                assert_eq!(max_depth, 4);
                assert_eq!(path.matches("elements[0]").count(), 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn completion_at_the_cap_parses() {
        for cap in [DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH] {
            let text = serde_json::to_string(&nested(cap)).unwrap();
            let doc = parse_completion(&text, cap).unwrap();
            assert_eq!(doc, nested(cap));
        }
    }

    #[test]
    fn completion_one_past_the_cap_is_too_deep() {
        for cap in [DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH] {
            let text = serde_json::to_string(&nested(cap + 1)).unwrap();
            let err = parse_completion(&text, cap).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput, "cap {cap}: {err}");
            assert!(matches!(err, ConvertError::TooDeep { max_depth, .. } if max_depth == cap));
        }
    }

    #[test]
    fn completion_past_the_parser_limit_is_too_deep() {
        let text = serde_json::to_string(&nested(100)).unwrap();
        let err = parse_completion(&text, MAX_SUPPORTED_DEPTH).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput, "got: {err}");
    }

    #[test]
    fn check_depth_ignores_tags() {
        let doc = json!({"elements": [{"elements": [{}]}]});
        assert!(check_depth(&doc, 2).is_ok());
        assert!(check_depth(&doc, 1).is_err());
    }
}
