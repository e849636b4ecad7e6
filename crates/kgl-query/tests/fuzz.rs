//! Parser must never panic on arbitrary input: it either parses cleanly or
//! returns a typed `InvalidQuery`.

use kgl_query::parse;
use proptest::prelude::*;

proptest! {
    #[test]
    fn parser_never_panics(s in "\\PC{0,64}") {
        let _ = parse(&s);
    }

    #[test]
    fn parser_never_panics_on_brace_soup(s in "[{}()<>|+~!?#,\"=*a-zA-Z0-9 _-]{0,80}") {
        let _ = parse(&s);
    }
}
