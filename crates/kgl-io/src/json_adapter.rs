//! JSON ingest (spec §6) and the graph-index dump.

use crate::error::IoError;
use kgl_core::{Label, ObjectValue, RawTriple, TripleStore};
use serde_json::Value;

/// Ingests a JSON array of objects. Each object must carry an `Entity` key;
/// every other key is a predicate whose value (string or array of strings)
/// becomes the object.
pub fn ingest(text: &str, store: &mut TripleStore, namespace: &str) -> Result<usize, IoError> {
    let items: Vec<Value> = serde_json::from_str(text)?;
    let mut inserted = 0;

    for item in items {
        let Value::Object(map) = item else {
            return Err(IoError::InvalidJsonInput("expected a JSON object".to_string()));
        };
        let Some(entity) = map.get("Entity").and_then(Value::as_str) else {
            return Err(IoError::InvalidJsonInput(
                "JSON object must have an 'Entity' key".to_string(),
            ));
        };

        for (key, value) in &map {
            if key == "Entity" {
                continue;
            }
            let object = match value {
                Value::String(s) => ObjectValue::Single(s.clone()),
                Value::Array(items) => {
                    let strings: Vec<String> = items
                        .iter()
                        .filter_map(|v| v.as_str().map(|s| s.to_string()))
                        .collect();
                    ObjectValue::List(strings)
                }
                _ => continue,
            };
            inserted += store.add(RawTriple::new(entity, key.as_str(), object), namespace)?;
        }
    }

    Ok(inserted)
}

/// `{ "triples": [...], "adjacency": {...}, "substring_index": {...} }`.
pub fn dump_graph(store: &TripleStore, namespace: &str) -> Value {
    let triples: Vec<Value> = store
        .triples(namespace)
        .iter()
        .map(|t| {
            serde_json::json!({
                "subject": t.subject.as_str(),
                "predicate": t.predicate.as_str(),
                "object": t.object.as_str(),
            })
        })
        .collect();

    let mut adjacency = serde_json::Map::new();
    for label in store.labels(namespace) {
        let neighbors = store.neighbors(label, namespace);
        let mut per_predicate = serde_json::Map::new();
        for (predicate, set) in &neighbors {
            let values: Vec<Value> = set.iter().map(|l| Value::String(l.to_string())).collect();
            per_predicate.insert(predicate.to_string(), Value::Array(values));
        }
        adjacency.insert(label.to_string(), Value::Object(per_predicate));
    }

    let mut substring_index = serde_json::Map::new();
    if store.has_substring_index(namespace) {
        for label in store.labels(namespace) {
            for token in label.as_str().split_whitespace() {
                let matches = store.substring_lookup(&Label::from(token), namespace);
                if matches.is_empty() {
                    continue;
                }
                substring_index
                    .entry(token.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Some(Value::Array(arr)) = substring_index.get_mut(token) {
                    for m in matches {
                        let v = Value::String(m.to_string());
                        if !arr.contains(&v) {
                            arr.push(v);
                        }
                    }
                }
            }
        }
    }

    serde_json::json!({
        "triples": triples,
        "adjacency": Value::Object(adjacency),
        "substring_index": Value::Object(substring_index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgl_core::{StoreConfig, DEFAULT_NAMESPACE};

    #[test]
    fn ingests_string_and_list_values() {
        let mut store = TripleStore::new(StoreConfig::default());
        let json = r#"[{"Entity": "James", "Likes": "Coffee"}, {"Entity": "Anna", "Likes": ["Tea", "Coffee"]}]"#;
        let n = ingest(json, &mut store, DEFAULT_NAMESPACE).unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn missing_entity_fails() {
        let mut store = TripleStore::new(StoreConfig::default());
        let json = r#"[{"Likes": "Coffee"}]"#;
        assert!(ingest(json, &mut store, DEFAULT_NAMESPACE).is_err());
    }

    #[test]
    fn dump_contains_triples_and_adjacency() {
        let mut store = TripleStore::new(StoreConfig::default());
        store
            .add(kgl_core::RawTriple::new("james", "likes", "coffee"), DEFAULT_NAMESPACE)
            .unwrap();
        let dump = dump_graph(&store, DEFAULT_NAMESPACE);
        assert!(dump["triples"].as_array().unwrap().len() == 1);
        assert!(dump["adjacency"]["james"]["likes"].as_array().is_some());
    }
}
