//! Tree operations over a JSON document mirroring the remote store.
//!
//! `null` and a missing key mean the same thing: the node is absent.
//! Writing `null` deletes a node, and objects left empty by a delete are
//! pruned, so an absent node never lingers as `{}`.

use serde_json::{Map, Value};

use crate::error::PathError;
use crate::path::StorePath;

/// Value at `path`, or `None` when absent.
#[must_use]
pub fn get<'a>(tree: &'a Value, path: &StorePath) -> Option<&'a Value> {
    let mut node = tree;
    for segment in path.segments() {
        node = node.as_object()?.get(segment)?;
    }
    (!node.is_null()).then_some(node)
}

/// Replace the node at `path` with `value`.
pub fn set(tree: &mut Value, path: &StorePath, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        *tree = if is_empty_node(&value) { Value::Null } else { value };
        return;
    };

    if is_empty_node(&value) {
        remove(tree, parents, last);
        return;
    }

    let mut node = tree;
    for segment in parents {
        node = ensure_object(node)
            .entry(segment.clone())
            .or_insert(Value::Null);
    }
    ensure_object(node).insert(last.clone(), value);
}

/// Merge `fields` into the node at `path`, leaving siblings untouched.
///
/// Keys may be multi-segment relative paths (`"a/b"`).
///
/// # Errors
///
/// Returns [`PathError`] if a key is not a valid relative path. The tree is
/// left unchanged in that case.
pub fn merge(tree: &mut Value, path: &StorePath, fields: &Map<String, Value>) -> Result<(), PathError> {
    let targets = fields
        .iter()
        .map(|(key, value)| Ok((path.child(key)?, value.clone())))
        .collect::<Result<Vec<_>, PathError>>()?;

    for (target, value) in targets {
        set(tree, &target, value);
    }
    Ok(())
}

/// `null` and `{}` are both stored as nothing.
fn is_empty_node(value: &Value) -> bool {
    value.is_null() || value.as_object().is_some_and(Map::is_empty)
}

/// Coerce `node` into an object (replacing any scalar) and borrow its map.
fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

/// Delete `parents/last` and prune ancestors that become empty.
fn remove(node: &mut Value, parents: &[String], last: &str) -> bool {
    let Some(map) = node.as_object_mut() else {
        return false;
    };

    match parents.split_first() {
        None => {
            map.remove(last);
        }
        Some((head, rest)) => {
            let Some(child) = map.get_mut(head) else {
                return false;
            };
            if remove(child, rest, last) {
                map.remove(head);
            }
        }
    }
    map.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> StorePath {
        StorePath::parse(raw).unwrap()
    }

    #[test]
    fn should_get_nested_value() {
        let tree = json!({"actuators": {"waterPump": true}});
        assert_eq!(get(&tree, &path("actuators/waterPump")), Some(&json!(true)));
    }

    #[test]
    fn should_treat_null_and_missing_as_absent() {
        let tree = json!({"sensors": null});
        assert_eq!(get(&tree, &path("sensors")), None);
        assert_eq!(get(&tree, &path("system")), None);
        assert_eq!(get(&Value::Null, &StorePath::root()), None);
    }

    #[test]
    fn should_not_descend_into_scalars() {
        let tree = json!({"sensors": 3});
        assert_eq!(get(&tree, &path("sensors/moisture")), None);
    }

    #[test]
    fn should_create_intermediate_objects_on_set() {
        let mut tree = Value::Null;
        set(&mut tree, &path("system/mode"), json!("AUTO"));
        assert_eq!(tree, json!({"system": {"mode": "AUTO"}}));
    }

    #[test]
    fn should_replace_whole_node_on_set() {
        let mut tree = json!({"sensors": {"moisture": 40, "light": 1}});
        set(&mut tree, &path("sensors"), json!({"moisture": 20}));
        assert_eq!(tree, json!({"sensors": {"moisture": 20}}));
    }

    #[test]
    fn should_replace_root_on_set() {
        let mut tree = json!({"a": 1});
        set(&mut tree, &StorePath::root(), json!({"b": 2}));
        assert_eq!(tree, json!({"b": 2}));
    }

    #[test]
    fn should_delete_and_prune_on_null_set() {
        let mut tree = json!({"history": {"moisture": {"p1": {"value": 3}}}, "system": {"enabled": true}});
        set(&mut tree, &path("history/moisture/p1"), Value::Null);
        assert_eq!(tree, json!({"system": {"enabled": true}}));
    }

    #[test]
    fn should_treat_empty_object_as_delete() {
        let mut tree = json!({"sensors": {"moisture": 40}});
        set(&mut tree, &path("sensors"), json!({}));
        assert_eq!(get(&tree, &path("sensors")), None);
    }

    #[test]
    fn should_ignore_null_set_on_missing_node() {
        let mut tree = json!({"system": {"enabled": true}});
        set(&mut tree, &path("actuators/waterPump"), Value::Null);
        assert_eq!(tree, json!({"system": {"enabled": true}}));
    }

    #[test]
    fn should_merge_fields_leaving_siblings_untouched() {
        let mut tree = json!({"system": {"enabled": true, "mode": "AUTO"}});
        let fields = json!({"mode": "MANUAL"});
        merge(&mut tree, &path("system"), fields.as_object().unwrap()).unwrap();
        assert_eq!(tree, json!({"system": {"enabled": true, "mode": "MANUAL"}}));
    }

    #[test]
    fn should_merge_multi_segment_keys() {
        let mut tree = json!({});
        let fields = json!({"actuators/waterPump": false, "system/enabled": false});
        merge(&mut tree, &StorePath::root(), fields.as_object().unwrap()).unwrap();
        assert_eq!(
            tree,
            json!({"actuators": {"waterPump": false}, "system": {"enabled": false}})
        );
    }

    #[test]
    fn should_leave_tree_unchanged_when_merge_key_is_invalid() {
        let mut tree = json!({"system": {"enabled": true}});
        let fields = json!({"mode": "AUTO", "bad.key": 1});
        let result = merge(&mut tree, &path("system"), fields.as_object().unwrap());
        assert!(result.is_err());
        assert_eq!(tree, json!({"system": {"enabled": true}}));
    }
}
