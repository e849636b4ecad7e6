use kgl_cli::build_query;
use kgl_cli::render::render_result;
use kgl_core::Label;
use kgl_query::{BlockResult, EvalResult};

#[test]
fn query_words_round_trip_into_braces() {
    let words = vec!["anna".to_string(), "likes".to_string()];
    assert_eq!(build_query(&words), "{ anna likes }");
}

#[test]
fn dict_result_renders_one_line_per_predicate() {
    colored::control::set_override(false);
    let mut dict = std::collections::HashMap::new();
    dict.insert(Label::from("likes"), vec![Label::from("coffee"), Label::from("tea")]);
    let result = EvalResult::Blocks(vec![BlockResult::Dict(Label::from("james"), dict)]);
    let rendered = render_result(&result);
    assert_eq!(rendered, "likes: coffee, tea");
}
