//! Colorized rendering of evaluator output for the terminal.

use colored::Colorize;
use kgl_query::{BlockResult, EvalResult};

/// Renders a full evaluator result the way the CLI prints it: one line per
/// dict entry (blue key, green comma-joined values), one green CSV line per
/// plain label list, `<label>: <count>` for `most_connected`.
pub fn render_result(result: &EvalResult) -> String {
    match result {
        EvalResult::Empty => "(empty)".to_string(),
        EvalResult::Count(n) => n.to_string(),
        EvalResult::Exists(b) => b.to_string(),
        EvalResult::MostConnected(label, count) => {
            format!("{}: {}", label.as_str(), count)
        }
        EvalResult::Blocks(blocks) => blocks
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_block(block: &BlockResult) -> String {
    match block {
        BlockResult::Dict(_, dict) => render_dict(dict.iter().map(|(k, v)| (k.as_str(), v.as_slice()))),
        BlockResult::Labels(labels) => {
            let line = labels.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(", ");
            line.green().to_string()
        }
        BlockResult::Expanded(items) => items
            .iter()
            .map(|(subject, dict)| {
                let header = subject.as_str().blue().bold();
                let body = render_dict(dict.iter().map(|(k, v)| (k.as_str(), v.as_slice())));
                format!("{header}\n{body}")
            })
            .collect::<Vec<_>>()
            .join("\n"),
        BlockResult::Path(path) => path
            .iter()
            .map(|step| step.label.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
            .green()
            .to_string(),
        BlockResult::Count(n) => n.to_string(),
        BlockResult::Exists(b) => b.to_string(),
        BlockResult::Empty => "(empty)".to_string(),
    }
}

fn render_dict<'a>(entries: impl Iterator<Item = (&'a str, &'a [kgl_core::Label])>) -> String {
    entries
        .map(|(key, values)| {
            let joined = values.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ");
            format!("{}: {}", key.blue(), joined.green())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgl_core::Label;

    #[test]
    fn renders_plain_labels_as_single_line() {
        colored::control::set_override(false);
        let result = EvalResult::Blocks(vec![BlockResult::Labels(vec![
            Label::from("coffee"),
            Label::from("tea"),
        ])]);
        assert!(render_result(&result).contains("coffee, tea"));
    }

    #[test]
    fn renders_most_connected_as_label_colon_count() {
        let result = EvalResult::MostConnected(Label::from("james"), 7);
        assert_eq!(render_result(&result), "james: 7");
    }
}
