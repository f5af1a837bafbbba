use std::collections::HashMap;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::form::FormData;
use crate::key::{self, KeyPath, SegmentKind};
use crate::value::Value;

/// Structural class of a key, used to cut the input into groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    Namespace(SmolStr),
    ListRooted,
    DictRooted,
    Plain,
}

impl Signature {
    pub fn of(key: &str) -> Self {
        if let Some(namespace) = key::namespace_of(key) {
            if key::is_nested(key) {
                return Signature::Namespace(SmolStr::new(namespace));
            }
        }
        match KeyPath::parse(key).and_then(|path| path.first_kind()) {
            Some(SegmentKind::Index | SegmentKind::EmptyList) => Signature::ListRooted,
            Some(SegmentKind::Dict) => Signature::DictRooted,
            None => Signature::Plain,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            Signature::Namespace(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// A run of entries sharing one signature, keys kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub signature: Signature,
    pub entries: IndexMap<String, Value>,
}

impl Group {
    fn new(signature: Signature) -> Self {
        Self {
            signature,
            entries: IndexMap::new(),
        }
    }

    fn insert(&mut self, key: &str, value: &Value) {
        if !self.entries.contains_key(key) {
            self.entries.insert(key.to_string(), value.clone());
        }
    }

    fn absorb(&mut self, other: Group) {
        for (key, value) in other.entries {
            self.entries.entry(key).or_insert(value);
        }
    }
}

/// Cuts the form into maximal same-signature runs, then folds every later run
/// of an already seen namespace into its first run.
pub fn partition(form: &FormData) -> Vec<Group> {
    let mut runs: Vec<Group> = Vec::new();
    let mut current: Option<Group> = None;

    for (key, value) in form {
        let signature = Signature::of(key);
        if let Some(group) = current.as_mut().filter(|g| g.signature == signature) {
            group.insert(key, value);
            continue;
        }
        runs.extend(current.take());
        let mut group = Group::new(signature);
        group.insert(key, value);
        current = Some(group);
    }
    runs.extend(current);

    merge_namespaces(runs)
}

fn merge_namespaces(runs: Vec<Group>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::with_capacity(runs.len());
    let mut seen: HashMap<SmolStr, usize> = HashMap::new();

    for run in runs {
        if let Signature::Namespace(name) = &run.signature {
            if let Some(&idx) = seen.get(name) {
                tracing::trace!(namespace = %name, "merging non-adjacent namespace run");
                groups[idx].absorb(run);
                continue;
            }
            seen.insert(name.clone(), groups.len());
        }
        groups.push(run);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs.iter().copied().collect()
    }

    fn signatures(groups: &[Group]) -> Vec<Signature> {
        groups.iter().map(|g| g.signature.clone()).collect()
    }

    #[rstest::rstest]
    #[case("item[a]", Signature::Namespace(SmolStr::new("item")))]
    #[case("[0][a]", Signature::ListRooted)]
    #[case("[][a]", Signature::ListRooted)]
    #[case("[0]", Signature::ListRooted)]
    #[case("[a][0]", Signature::DictRooted)]
    #[case("plain", Signature::Plain)]
    #[case("a-b[0]", Signature::Plain)]
    fn test_signature_of(#[case] key: &str, #[case] expected: Signature) {
        assert_eq!(Signature::of(key), expected);
    }

    #[rstest::rstest]
    fn test_partition_cuts_on_signature_change() {
        let groups = partition(&form(&[
            ("item[a]", "1"),
            ("item[b]", "2"),
            ("next[a]", "3"),
            ("[variant][]", "color"),
            ("[0][attribute]", "size"),
            ("[1][attribute]", "color"),
            ("plain", "v"),
            ("other", "w"),
        ]));
        assert_eq!(
            signatures(&groups),
            vec![
                Signature::Namespace(SmolStr::new("item")),
                Signature::Namespace(SmolStr::new("next")),
                Signature::DictRooted,
                Signature::ListRooted,
                Signature::Plain,
            ]
        );
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[3].entries.len(), 2);
        assert_eq!(groups[4].entries.len(), 2);
    }

    #[rstest::rstest]
    fn test_partition_merges_recurring_namespace_in_first_seen_order() {
        let groups = partition(&form(&[
            ("item[a]", "1"),
            ("note", "x"),
            ("item[b]", "2"),
            ("next[a]", "3"),
            ("item[c]", "4"),
        ]));
        assert_eq!(
            signatures(&groups),
            vec![
                Signature::Namespace(SmolStr::new("item")),
                Signature::Plain,
                Signature::Namespace(SmolStr::new("next")),
            ]
        );
        let keys: Vec<&str> = groups[0].entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["item[a]", "item[b]", "item[c]"]);
    }

    #[rstest::rstest]
    fn test_partition_keeps_anonymous_runs_apart() {
        let groups = partition(&form(&[
            ("a", "1"),
            ("[0][x]", "2"),
            ("b", "3"),
        ]));
        assert_eq!(
            signatures(&groups),
            vec![Signature::Plain, Signature::ListRooted, Signature::Plain]
        );
    }

    #[rstest::rstest]
    fn test_partition_empty_form() {
        assert!(partition(&FormData::new()).is_empty());
    }
}
