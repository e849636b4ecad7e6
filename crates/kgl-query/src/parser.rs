//! Recursive-descent parser for the KGL query grammar (spec §4.4), built
//! directly on `winnow` combinators over `&str`.

use crate::ast::{Ast, Block, Comparator, Condition, Modifier, NodeFlag, Operand, Step};
use crate::error::QueryError;
use kgl_core::Label;
use winnow::combinator::{alt, delimited, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode};
use winnow::token::take_while;
use winnow::{ModalResult, Parser};

/// Characters that terminate an identifier run. Everything else (including
/// interior whitespace) belongs to the identifier and is trimmed afterward.
const RESERVED: &[char] = &[
    '{', '}', '(', ')', '<', '>', '|', '+', '~', '!', '?', '#', ',', '"', '=', '-', '*',
];

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace).void().parse_next(input)
}

fn ident_no_spaces(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_')
        .map(|s: &str| s.to_string())
        .parse_next(input)
}

fn ident_with_spaces(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| !RESERVED.contains(&c))
        .map(|s: &str| s.trim().to_string())
        .verify(|s: &str| !s.is_empty())
        .parse_next(input)
}

fn quoted_string(input: &mut &str) -> ModalResult<String> {
    let _ = '"'.parse_next(input)?;
    let mut out = String::new();
    loop {
        match input.chars().next() {
            None => return Err(ErrMode::Backtrack(ContextError::new())),
            Some('"') => {
                *input = &input[1..];
                return Ok(out);
            }
            Some('\\') => {
                *input = &input[1..];
                match input.chars().next() {
                    Some(escaped) => {
                        out.push(escaped);
                        *input = &input[escaped.len_utf8()..];
                    }
                    None => return Err(ErrMode::Backtrack(ContextError::new())),
                }
            }
            Some(c) => {
                out.push(c);
                *input = &input[c.len_utf8()..];
            }
        }
    }
}

fn integer(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .map(|s: &str| s.to_string())
        .parse_next(input)
}

fn term_string(input: &mut &str) -> ModalResult<String> {
    alt((quoted_string, integer)).parse_next(input)
}

fn comparator(input: &mut &str) -> ModalResult<Comparator> {
    alt((
        "!=".value(Comparator::Neq),
        "=".value(Comparator::Eq),
        ">".value(Comparator::Gt),
        "<".value(Comparator::Lt),
    ))
    .parse_next(input)
}

fn condition(input: &mut &str) -> ModalResult<Condition> {
    let _ = '('.parse_next(input)?;
    ws.parse_next(input)?;
    let term1 = term_string.parse_next(input)?;
    ws.parse_next(input)?;
    let comparator = comparator.parse_next(input)?;
    ws.parse_next(input)?;
    let term2 = term_string.parse_next(input)?;
    ws.parse_next(input)?;
    let _ = ')'.parse_next(input)?;
    Ok(Condition {
        term1,
        comparator,
        term2,
    })
}

fn node_flag(input: &mut &str) -> ModalResult<NodeFlag> {
    alt((
        "++".value(NodeFlag::Subsequence),
        "+".value(NodeFlag::Enumerate),
        "~".value(NodeFlag::Near),
    ))
    .parse_next(input)
}

fn node(input: &mut &str) -> ModalResult<Step> {
    let label = ident_with_spaces.parse_next(input)?;
    let flag = opt(node_flag).parse_next(input)?.unwrap_or_default();
    let conditions: Vec<Condition> = repeat(0.., preceded(ws, condition)).parse_next(input)?;
    Ok(Step::Node {
        label: Label::normalize(&label),
        flag,
        conditions,
    })
}

fn relation_or_interrelation(input: &mut &str) -> ModalResult<Step> {
    alt(("<->".value(Step::Interrelation), "->".value(Step::Relation))).parse_next(input)
}

fn graph_prefix(input: &mut &str) -> ModalResult<String> {
    terminated(ident_no_spaces, '|').parse_next(input)
}

fn block_modifier(input: &mut &str) -> ModalResult<Modifier> {
    alt((
        '!'.value(Modifier::Expand),
        '?'.value(Modifier::Exists),
        '#'.value(Modifier::Count),
    ))
    .parse_next(input)
}

fn block(input: &mut &str) -> ModalResult<Block> {
    let _ = '{'.parse_next(input)?;
    ws.parse_next(input)?;

    if opt('}').parse_next(input)?.is_some() {
        let modifier = opt(block_modifier).parse_next(input)?;
        return Ok(Block {
            graph: None,
            steps: Vec::new(),
            modifier,
        });
    }

    let graph = opt(graph_prefix).parse_next(input)?;
    ws.parse_next(input)?;

    let mut steps = vec![node.parse_next(input)?];
    loop {
        ws.parse_next(input)?;
        if opt('}').parse_next(input)?.is_some() {
            break;
        }
        let rel = relation_or_interrelation.parse_next(input)?;
        ws.parse_next(input)?;
        steps.push(rel);
        steps.push(node.parse_next(input)?);
    }

    let modifier = opt(block_modifier).parse_next(input)?;
    Ok(Block {
        graph,
        steps,
        modifier,
    })
}

fn operand(input: &mut &str) -> ModalResult<Operand> {
    alt((
        "INTERSECTION".value(Operand::Intersection),
        '+'.value(Operand::Union),
        '-'.value(Operand::Difference),
    ))
    .parse_next(input)
}

fn comma_triple(input: &mut &str) -> ModalResult<Ast> {
    let _ = '{'.parse_next(input)?;
    ws.parse_next(input)?;
    let s = ident_with_spaces.parse_next(input)?;
    ws.parse_next(input)?;
    let _ = ','.parse_next(input)?;
    ws.parse_next(input)?;
    let p = ident_with_spaces.parse_next(input)?;
    ws.parse_next(input)?;
    let _ = ','.parse_next(input)?;
    ws.parse_next(input)?;
    let o = ident_with_spaces.parse_next(input)?;
    ws.parse_next(input)?;
    let _ = '}'.parse_next(input)?;
    Ok(Ast::CommaTriple { s, p, o })
}

fn pipeline(input: &mut &str) -> ModalResult<Ast> {
    let mut blocks = vec![block.parse_next(input)?];
    let mut ops = Vec::new();

    loop {
        ws.parse_next(input)?;
        let checkpoint = *input;
        match opt(operand).parse_next(input)? {
            Some(op) => {
                ws.parse_next(input)?;
                ops.push(op);
                blocks.push(block.parse_next(input)?);
            }
            None => {
                *input = checkpoint;
                break;
            }
        }
    }

    if blocks.len() == 1 && ops.is_empty() && blocks[0].is_empty_query() {
        return Ok(Ast::RandomWalk(blocks.into_iter().next().unwrap()));
    }
    Ok(Ast::Pipeline { blocks, ops })
}

/// Parses `query` into an [`Ast`], or `QueryError::InvalidQuery` with an
/// approximate byte position on failure.
pub fn parse(query: &str) -> Result<Ast, QueryError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Ok(Ast::Empty);
    }
    match trimmed {
        "*" => return Ok(Ast::MostConnected),
        "#" => return Ok(Ast::CountAll),
        "?" => return Ok(Ast::ExistsAny),
        _ => {}
    }

    let mut attempt = trimmed;
    if let Ok(ast) = comma_triple.parse_next(&mut attempt) {
        if attempt.trim().is_empty() {
            return Ok(ast);
        }
    }

    let mut attempt = trimmed;
    match pipeline.parse_next(&mut attempt) {
        Ok(ast) if attempt.trim().is_empty() => Ok(ast),
        Ok(_) => Err(QueryError::InvalidQuery {
            position: trimmed.len().saturating_sub(attempt.len()),
            message: "unexpected trailing input".to_string(),
        }),
        Err(_) => Err(QueryError::InvalidQuery {
            position: trimmed.len().saturating_sub(attempt.len()),
            message: "could not parse query".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeFlag;

    #[test]
    fn parses_single_node_block() {
        let ast = parse("{ James }").unwrap();
        match ast {
            Ast::Pipeline { blocks, ops } => {
                assert!(ops.is_empty());
                assert_eq!(blocks.len(), 1);
                assert_eq!(blocks[0].steps.len(), 1);
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn parses_relation_chain() {
        let ast = parse("{ James -> Likes }").unwrap();
        match ast {
            Ast::Pipeline { blocks, .. } => assert_eq!(blocks[0].steps.len(), 3),
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn parses_interrelation() {
        let ast = parse("{ James <-> Coffee }").unwrap();
        match ast {
            Ast::Pipeline { blocks, .. } => {
                assert!(matches!(blocks[0].steps[1], Step::Interrelation));
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn parses_comma_triple() {
        let ast = parse("{evermore, is, amazing}").unwrap();
        assert_eq!(
            ast,
            Ast::CommaTriple {
                s: "evermore".to_string(),
                p: "is".to_string(),
                o: "amazing".to_string(),
            }
        );
    }

    #[test]
    fn parses_operand_pipeline() {
        let ast = parse("{ James -> Likes } + { Anna -> Likes }").unwrap();
        match ast {
            Ast::Pipeline { blocks, ops } => {
                assert_eq!(blocks.len(), 2);
                assert_eq!(ops, vec![Operand::Union]);
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn parses_enumerate_flag() {
        let ast = parse("{ Taylor+ }").unwrap();
        match ast {
            Ast::Pipeline { blocks, .. } => {
                assert!(matches!(
                    blocks[0].steps[0],
                    Step::Node {
                        flag: NodeFlag::Enumerate,
                        ..
                    }
                ));
            }
            other => panic!("unexpected ast: {other:?}"),
        }
    }

    #[test]
    fn bare_symbols_are_top_level_dispatch() {
        assert_eq!(parse("*").unwrap(), Ast::MostConnected);
        assert_eq!(parse("#").unwrap(), Ast::CountAll);
        assert_eq!(parse("?").unwrap(), Ast::ExistsAny);
        assert_eq!(parse("").unwrap(), Ast::Empty);
    }

    #[test]
    fn empty_braces_are_random_walk() {
        assert!(matches!(parse("{}").unwrap(), Ast::RandomWalk(_)));
    }

    #[test]
    fn rejects_unbalanced_braces() {
        assert!(parse("{ James").is_err());
    }

    #[test]
    fn fuzz_never_panics_on_arbitrary_unicode() {
        let samples = ["{日本語}", "{ }}}", "★☆★", "{{{{", "((()))", "{a->b<->c}"];
        for s in samples {
            let _ = parse(s);
        }
    }
}
