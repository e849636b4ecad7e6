//! Graphviz DOT serialization of an evaluator result (spec §6).

use kgl_query::{BlockResult, EvalResult};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Renders `result` (and the original `query` text as the graph title) as a
/// DOT `digraph`. Plain label sets become unconnected nodes; dict/expanded
/// results add one edge per `subject -> object` pair, labelled with the
/// predicate.
pub fn to_dot(result: &EvalResult, query: &str) -> String {
    let mut nodes: BTreeSet<String> = BTreeSet::new();
    let mut edges: Vec<(String, String, String)> = Vec::new();

    if let EvalResult::Blocks(blocks) = result {
        for block in blocks {
            collect(block, &mut nodes, &mut edges);
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "digraph kgl {{");
    let _ = writeln!(out, "  label=\"{}\";", escape(query));
    for node in &nodes {
        let _ = writeln!(out, "  \"{}\";", escape(node));
    }
    for (from, to, predicate) in &edges {
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"{}\"];",
            escape(from),
            escape(to),
            escape(predicate)
        );
    }
    let _ = writeln!(out, "}}");
    out
}

fn collect(block: &BlockResult, nodes: &mut BTreeSet<String>, edges: &mut Vec<(String, String, String)>) {
    match block {
        BlockResult::Labels(labels) => {
            for label in labels {
                nodes.insert(label.to_string());
            }
        }
        BlockResult::Dict(subject, dict) => {
            nodes.insert(subject.to_string());
            for (predicate, objects) in dict {
                for object in objects {
                    nodes.insert(object.to_string());
                    edges.push((subject.to_string(), object.to_string(), predicate.to_string()));
                }
            }
        }
        BlockResult::Expanded(items) => {
            for (subject, dict) in items {
                nodes.insert(subject.to_string());
                for (predicate, objects) in dict {
                    for object in objects {
                        nodes.insert(object.to_string());
                        edges.push((subject.to_string(), object.to_string(), predicate.to_string()));
                    }
                }
            }
        }
        BlockResult::Path(path) => {
            let mut prev: Option<(&str, Option<String>)> = None;
            for step in path {
                nodes.insert(step.label.to_string());
                if let Some((from, _)) = prev {
                    let predicate = step.via_predicate.as_ref().map(|p| p.to_string()).unwrap_or_default();
                    edges.push((from.to_string(), step.label.to_string(), predicate));
                }
                prev = Some((step.label.as_str(), step.via_predicate.as_ref().map(|p| p.to_string())));
            }
        }
        BlockResult::Count(_) | BlockResult::Exists(_) | BlockResult::Empty => {}
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgl_core::Label;

    #[test]
    fn renders_plain_label_set_as_bare_nodes() {
        let result = EvalResult::Blocks(vec![BlockResult::Labels(vec![
            Label::from("coffee"),
            Label::from("tea"),
        ])]);
        let dot = to_dot(&result, "{ x -> likes }");
        assert!(dot.starts_with("digraph kgl {"));
        assert!(dot.contains("\"coffee\";"));
        assert!(dot.contains("\"tea\";"));
        assert!(!dot.contains("->"));
    }

    #[test]
    fn dict_result_renders_real_subject_as_edge_source() {
        let mut dict = std::collections::HashMap::new();
        dict.insert(Label::from("likes"), vec![Label::from("coffee")]);
        let result = EvalResult::Blocks(vec![BlockResult::Dict(Label::from("james"), dict)]);
        let dot = to_dot(&result, "{ James }");
        assert!(dot.contains("\"james\" -> \"coffee\" [label=\"likes\"];"));
        assert!(!dot.contains("\"?\""));
    }
}
