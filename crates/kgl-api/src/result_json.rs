//! Converts an evaluator result into the JSON shape the web UI expects: a
//! list whose entries are either a predicate→values object or a plain list
//! of labels.

use kgl_query::{BlockResult, EvalResult};
use serde_json::{json, Value};

pub fn to_json(result: &EvalResult) -> Value {
    match result {
        EvalResult::Empty => json!([]),
        EvalResult::Count(n) => json!(n),
        EvalResult::Exists(b) => json!(b),
        EvalResult::MostConnected(label, count) => {
            let mut map = serde_json::Map::new();
            map.insert(label.as_str().to_string(), json!(count));
            Value::Array(vec![Value::Object(map)])
        }
        EvalResult::Blocks(blocks) => Value::Array(blocks.iter().map(block_to_json).collect()),
    }
}

fn block_to_json(block: &BlockResult) -> Value {
    match block {
        BlockResult::Dict(_, dict) => {
            let mut map = serde_json::Map::new();
            for (key, values) in dict {
                let values: Vec<Value> = values.iter().map(|v| Value::String(v.to_string())).collect();
                map.insert(key.to_string(), Value::Array(values));
            }
            Value::Object(map)
        }
        BlockResult::Labels(labels) => {
            Value::Array(labels.iter().map(|l| Value::String(l.to_string())).collect())
        }
        BlockResult::Expanded(items) => {
            let mut map = serde_json::Map::new();
            for (subject, dict) in items {
                let mut inner = serde_json::Map::new();
                for (key, values) in dict {
                    let values: Vec<Value> = values.iter().map(|v| Value::String(v.to_string())).collect();
                    inner.insert(key.to_string(), Value::Array(values));
                }
                map.insert(subject.to_string(), Value::Object(inner));
            }
            Value::Object(map)
        }
        BlockResult::Path(path) => {
            Value::Array(path.iter().map(|step| Value::String(step.label.to_string())).collect())
        }
        BlockResult::Count(n) => json!(n),
        BlockResult::Exists(b) => json!(b),
        BlockResult::Empty => json!([]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgl_core::Label;

    #[test]
    fn plain_labels_become_a_json_array() {
        let result = EvalResult::Blocks(vec![BlockResult::Labels(vec![Label::from("coffee")])]);
        assert_eq!(to_json(&result), json!([["coffee"]]));
    }

    #[test]
    fn most_connected_becomes_single_entry_object() {
        let result = EvalResult::MostConnected(Label::from("james"), 3);
        assert_eq!(to_json(&result), json!([{"james": 3}]));
    }
}
