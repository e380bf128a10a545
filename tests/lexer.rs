//! Black-box lexer coverage: unary/binary minus disambiguation, string
//! escapes, and comment handling (`spec.md` §4.2, §8).

use turtlescript_core::error::LogoError;
use turtlescript_core::token::lex_program;
use turtlescript_core::Interpreter;

fn run(src: &str) -> Result<Option<turtlescript_core::value::Value>, LogoError> {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(src))
}

#[test]
fn binary_minus_between_numbers_is_subtraction() {
    let v = run("pr 3-4");
    assert!(v.is_ok());
}

#[test]
fn unary_minus_glued_to_a_following_word_negates_it() {
    // `pr 3 -4` is two words, 3 and -4, passed as two arguments to a
    // one-input PR - so this should fail with "too many" style dispatch
    // rather than silently subtracting; the lexer's job is only to
    // produce the right atom stream, not to fix up the call shape.
    let atoms = lex_program("3 -4").unwrap();
    assert_eq!(atoms.len(), 2);
}

#[test]
fn binary_minus_with_spaces_on_both_sides_is_subtraction() {
    let atoms = lex_program("3 - 4").unwrap();
    // one numeric atom, one operator atom, one numeric atom
    assert_eq!(atoms.len(), 3);
}

#[test]
fn parenthesized_unary_minus_negates_a_single_operand() {
    let result = run("pr (- 4)");
    assert!(result.is_ok());
}

#[test]
fn backslash_escapes_a_following_character_in_a_bare_word() {
    let atoms = lex_program(r"a\ b").unwrap();
    // the escaped space glues "a b" into a single word atom
    assert_eq!(atoms.len(), 1);
}

#[test]
fn semicolon_comment_runs_to_end_of_line() {
    let atoms = lex_program("make \"x 1 ; this is a comment\nmake \"y 2").unwrap();
    let rendered: Vec<String> = atoms
        .iter()
        .filter_map(|a| match a {
            turtlescript_core::ast::Atom::Word(w) => Some(w.clone()),
            _ => None,
        })
        .collect();
    assert!(!rendered.iter().any(|w| w.contains("comment")));
}

#[test]
fn unclosed_bracket_is_a_parse_error() {
    let err = lex_program("[1 2 3").unwrap_err();
    assert!(matches!(err, LogoError::ExpectedCloseBracket));
}

#[test]
fn unclosed_brace_is_a_parse_error() {
    let err = lex_program("{1 2 3").unwrap_err();
    assert!(matches!(err, LogoError::ExpectedCloseBrace));
}

#[test]
fn quoted_word_keeps_operator_characters_as_ordinary_text() {
    // operator chars are ordinary characters inside a "quoted word -
    // only whitespace and grouping chars delimit it (spec.md §4.2).
    let atoms = lex_program(r#""a+b"#).unwrap();
    assert_eq!(atoms.len(), 1);
    match &atoms[0] {
        turtlescript_core::ast::Atom::Word(w) => assert_eq!(w, "\"a+b"),
        other => panic!("expected a single word atom, got {:?}", other),
    }
}

#[test]
fn quoted_word_stops_at_a_bracket() {
    let atoms = lex_program(r#""a[1]"#).unwrap();
    assert_eq!(atoms.len(), 2);
    match &atoms[0] {
        turtlescript_core::ast::Atom::Word(w) => assert_eq!(w, "\"a"),
        other => panic!("expected a word atom, got {:?}", other),
    }
}

#[test]
fn array_literal_accepts_an_explicit_origin() {
    let atoms = lex_program("{1 2 3}@0").unwrap();
    assert_eq!(atoms.len(), 1);
    assert!(matches!(atoms[0], turtlescript_core::ast::Atom::Array(_, 0)));
}
