use crate::constants::ANONYMOUS_KEY;
use crate::value::{Map, Value};
use crate::{DecodeOptions, Error, Result};

use super::group::{Group, Signature};
use super::tree;

/// Decodes every group and folds the roots into the final value.
///
/// Namespaced roots land under their name; anonymous object roots are unioned
/// into the same accumulator. An anonymous array root becomes a top-level
/// candidate while the accumulator is still empty and is stored under `""`
/// afterwards. One candidate is returned as is, several as an array.
pub fn assemble(groups: &[Group], options: &DecodeOptions) -> Result<Value> {
    let mut accumulator = Map::new();
    let mut top: Vec<Value> = Vec::new();

    for group in groups {
        let root = tree::build(group, options)?;
        match (&group.signature, root) {
            (Signature::Namespace(name), root) => {
                accumulator.entry(name.to_string()).or_insert(root);
            }
            (_, Value::Object(map)) => {
                for (key, value) in map {
                    accumulator.entry(key).or_insert(value);
                }
            }
            (_, root) if accumulator.is_empty() => top.push(root),
            (_, root) => {
                accumulator.entry(ANONYMOUS_KEY.to_string()).or_insert(root);
            }
        }
    }

    if !accumulator.is_empty() {
        top.push(Value::Object(accumulator));
    }

    match top.len() {
        0 => Err(Error::empty_container()),
        1 => Ok(top.swap_remove(0)),
        _ => Ok(Value::Array(top)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::decode::group::partition;
    use crate::form::FormData;
    use crate::ErrorKind;

    fn assemble_pairs(pairs: &[(&str, &str)]) -> Result<serde_json::Value> {
        let form: FormData = pairs.iter().copied().collect();
        assemble(&partition(&form), &DecodeOptions::default()).map(|value| value.to_json())
    }

    #[rstest::rstest]
    fn test_single_list_root_is_unwrapped() {
        let value = assemble_pairs(&[("[0][a]", "x"), ("[1][a]", "y")]).unwrap();
        assert_eq!(value, json!([{"a": "x"}, {"a": "y"}]));
    }

    #[rstest::rstest]
    fn test_list_root_after_entries_goes_under_empty_key() {
        let value = assemble_pairs(&[("name", "n"), ("[0][a]", "x")]).unwrap();
        assert_eq!(value, json!({"name": "n", "": [{"a": "x"}]}));
    }

    #[rstest::rstest]
    fn test_list_root_before_entries_yields_multiple_results() {
        let value = assemble_pairs(&[("[0][a]", "x"), ("name", "n")]).unwrap();
        assert_eq!(value, json!([[{"a": "x"}], {"name": "n"}]));
    }

    #[rstest::rstest]
    fn test_anonymous_union_keeps_existing_keys() {
        let value = assemble_pairs(&[
            ("color", "red"),
            ("[color][0]", "blue"),
            ("[size][0]", "L"),
        ])
        .unwrap();
        assert_eq!(value, json!({"color": "red", "size": ["L"]}));
    }

    #[rstest::rstest]
    fn test_namespace_is_not_overwritten_by_anonymous_keys() {
        let value = assemble_pairs(&[("item[a]", "1"), ("[item][b]", "2")]).unwrap();
        assert_eq!(value, json!({"item": {"a": 1}}));
    }

    #[rstest::rstest]
    fn test_no_groups_is_an_error() {
        let err = assemble(&[], &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyContainer);
    }
}
