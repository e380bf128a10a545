//! Character stream and lexer (`spec.md` §4.1, §4.2).
//!
//! Built the way `rhai::token` builds its `TokenIterator`: a single-pass
//! scanner over the source characters with one-character lookahead, no
//! external crate for the grammar (`rhai` hand-rolls its tokenizer too).
//! Unlike `rhai::token`, grouping of `[ ... ]`/`{ ... }` into nested
//! structure happens *during* lexing rather than in a later parse pass,
//! since this language's bracket bodies are just bare-word data, not
//! code needing a grammar (`spec.md` §4.2).

use crate::ast::Atom;
use crate::error::{LogoError, LogoResult};

/// Scans a source string one character at a time, applying the comment /
/// line-continuation / escape skip policy from `spec.md` §4.1.
struct CharReader {
    chars: Vec<char>,
    pos: usize,
}

impl CharReader {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn prev(&self) -> Option<char> {
        if self.pos == 0 {
            None
        } else {
            self.chars.get(self.pos - 1).copied()
        }
    }

    fn is_whitespace(c: char) -> bool {
        c == ' ' || c == '\t' || c == '\n' || c == '\r'
    }

    /// Applies the skip policy: `~` + newline is a line continuation;
    /// `;` runs to end-of-line, and if that line ends in `~`, the
    /// following newline is consumed too (continued comment). Runs
    /// repeatedly so that whitespace, continuations, and comments can
    /// interleave.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if Self::is_whitespace(c) => {
                    self.advance();
                }
                Some('~') if self.peek_at(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                }
                Some('~') if self.peek_at(1) == Some('\r') && self.peek_at(2) == Some('\n') => {
                    self.advance();
                    self.advance();
                    self.advance();
                }
                Some(';') => {
                    self.advance();
                    let mut last_was_tilde = false;
                    loop {
                        match self.peek() {
                            None => break,
                            Some('\n') => {
                                self.advance();
                                if last_was_tilde {
                                    // continued comment: keep skipping
                                    last_was_tilde = false;
                                    continue;
                                }
                                break;
                            }
                            Some('~') => {
                                last_was_tilde = true;
                                self.advance();
                            }
                            Some(_) => {
                                last_was_tilde = false;
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '^' | '=' | '<' | '>' | '[' | ']' | '{' | '}' | '(' | ')')
}

/// Delimiters for a `"quoted-word`'s text (`spec.md` §4.2: "consume until
/// whitespace or one of `[](){}`"). Narrower than [`is_operator_char`] -
/// arithmetic/relational operator characters are ordinary characters
/// inside a quoted word, so `"a+b` is the one word `a+b`, not `"a`, `+`,
/// `b`.
fn is_grouping_char(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | '(' | ')')
}

fn is_arrow_char(c: char) -> bool {
    ('\u{2190}'..='\u{2193}').contains(&c)
}

/// Lexes a whole program into a flat top-level atom sequence, with
/// `[ ... ]`/`{ ... }` bodies already grouped into nested `Atom::List`/
/// `Atom::Array` (`spec.md` §4.2).
pub fn lex_program(src: &str) -> LogoResult<Vec<Atom>> {
    let mut r = CharReader::new(src);
    read_top_level(&mut r)
}

/// Reads a run of top-level atoms to end of input.
fn read_top_level(r: &mut CharReader) -> LogoResult<Vec<Atom>> {
    let mut atoms: Vec<Atom> = Vec::new();
    loop {
        r.skip_trivia();
        match r.peek() {
            None => break,
            Some('[') => {
                r.advance();
                let inner = read_list_body(r)?;
                atoms.push(Atom::List(inner));
            }
            Some('{') => {
                r.advance();
                let (inner, origin) = read_array_body(r)?;
                atoms.push(Atom::Array(inner, origin));
            }
            Some(']') => return Err(LogoError::CouldntParse(']')),
            Some('}') => return Err(LogoError::CouldntParse('}')),
            Some(_) => {
                let atom = read_top_level_atom(r, atoms.last())?;
                atoms.push(atom);
            }
        }
    }
    Ok(atoms)
}

/// Classifies and scans one top-level atom, applying `spec.md` §4.2's
/// first-character dispatch and the unary-minus disambiguation.
fn read_top_level_atom(r: &mut CharReader, prev: Option<&Atom>) -> LogoResult<Atom> {
    let c = r.peek().expect("caller checked peek().is_some()");

    if c == '"' {
        r.advance();
        let text = read_quoted_word_chars(r);
        return Ok(Atom::Word(format!("\"{}", text)));
    }

    if is_arrow_char(c) {
        r.advance();
        return Ok(Atom::Word(c.to_string()));
    }

    if c.is_ascii_digit() {
        return Ok(Atom::Word(read_number(r)));
    }

    if c == '-' {
        // Disambiguate before consuming: was '-' preceded by whitespace,
        // and is it followed by whitespace (spec.md §4.2).
        let space_before = r.prev().map(CharReader::is_whitespace).unwrap_or(true);
        r.advance();
        let space_after = r.peek().map(CharReader::is_whitespace).unwrap_or(true);

        let prev_is_operator_word = matches!(prev, Some(a) if a.operator().is_some());
        let prev_is_lparen = matches!(prev, Some(a) if a.is_lparen());
        let is_first = prev.is_none();

        let is_unary =
            is_first || prev_is_operator_word || prev_is_lparen || (space_before && !space_after);

        return Ok(if is_unary {
            Atom::UnaryMinus
        } else {
            Atom::Word("-".to_string())
        });
    }

    if is_operator_char(c) {
        r.advance();
        // Two-character operators: <= >= <>
        if (c == '<' || c == '>') && r.peek() == Some('=') {
            r.advance();
            return Ok(Atom::Word(format!("{}=", c)));
        }
        if c == '<' && r.peek() == Some('>') {
            r.advance();
            return Ok(Atom::Word("<>".to_string()));
        }
        return Ok(Atom::Word(c.to_string()));
    }

    // Word: consume until whitespace or any operator/grouping character.
    let text = read_word_chars(r);
    if text.is_empty() {
        // Shouldn't happen given the checks above, but surface a clear
        // parse error rather than looping forever.
        r.advance();
        return Err(LogoError::CouldntParse(c));
    }
    Ok(Atom::Word(text))
}

/// Reads a bare top-level word's characters until whitespace or a
/// grouping/operator character. Backslash escapes any single following
/// character (the escaped char is kept literally; the backslash itself
/// is dropped, since its only purpose is to stop that character being
/// read as a delimiter - `spec.md` §4.1). See [`read_quoted_word_chars`]
/// for the narrower `"quoted-word` delimiter set.
fn read_word_chars(r: &mut CharReader) -> String {
    let mut s = String::new();
    loop {
        match r.peek() {
            None => break,
            Some(c) if CharReader::is_whitespace(c) => break,
            Some(c) if is_operator_char(c) => break,
            Some('\\') => {
                r.advance();
                if let Some(escaped) = r.advance() {
                    s.push(escaped);
                }
            }
            Some(c) => {
                s.push(c);
                r.advance();
            }
        }
    }
    s
}

/// Reads the text of a `"quoted-word` (`spec.md` §4.2): unlike a bare
/// word, only whitespace and grouping characters (`[](){}`) delimit it -
/// operator characters like `+ - * / % ^ = < >` are ordinary text here,
/// so `"a+b` reads as the single word `a+b`.
fn read_quoted_word_chars(r: &mut CharReader) -> String {
    let mut s = String::new();
    loop {
        match r.peek() {
            None => break,
            Some(c) if CharReader::is_whitespace(c) => break,
            Some(c) if is_grouping_char(c) => break,
            Some('\\') => {
                r.advance();
                if let Some(escaped) = r.advance() {
                    s.push(escaped);
                }
            }
            Some(c) => {
                s.push(c);
                r.advance();
            }
        }
    }
    s
}

fn read_number(r: &mut CharReader) -> String {
    let mut s = String::new();
    while let Some(c) = r.peek() {
        if c.is_ascii_digit() {
            s.push(c);
            r.advance();
        } else {
            break;
        }
    }
    if r.peek() == Some('.') && r.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false) {
        s.push('.');
        r.advance();
        while let Some(c) = r.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                r.advance();
            } else {
                break;
            }
        }
    }
    if matches!(r.peek(), Some('e') | Some('E')) {
        let save = r.pos;
        let mut exp = String::new();
        exp.push(r.advance().unwrap());
        if matches!(r.peek(), Some('+') | Some('-')) {
            exp.push(r.advance().unwrap());
        }
        let mut saw_digit = false;
        while let Some(c) = r.peek() {
            if c.is_ascii_digit() {
                exp.push(c);
                saw_digit = true;
                r.advance();
            } else {
                break;
            }
        }
        if saw_digit {
            s.push_str(&exp);
        } else {
            r.pos = save;
        }
    }
    s
}

/// Reads the body of a `[ ... ]` literal. Bracket bodies have "no
/// expression structure" (`spec.md` §4.2): whitespace-separated tokens
/// are stored as bare words, with the only further structure being
/// recursively-nested `[ ]`/`{ }` groups.
fn read_list_body(r: &mut CharReader) -> LogoResult<Vec<Atom>> {
    let mut atoms = Vec::new();
    loop {
        r.skip_trivia();
        match r.peek() {
            None => return Err(LogoError::ExpectedCloseBracket),
            Some(']') => {
                r.advance();
                break;
            }
            Some('[') => {
                r.advance();
                atoms.push(Atom::List(read_list_body(r)?));
            }
            Some('{') => {
                r.advance();
                let (inner, origin) = read_array_body(r)?;
                atoms.push(Atom::Array(inner, origin));
            }
            Some('}') => return Err(LogoError::CouldntParse('}')),
            Some(_) => atoms.push(Atom::Word(read_bare_word(r))),
        }
    }
    Ok(atoms)
}

/// As [`read_list_body`], but for `{ ... }` bodies, additionally reading
/// the optional `@origin` suffix (`spec.md` §4.2, §6).
fn read_array_body(r: &mut CharReader) -> LogoResult<(Vec<Atom>, i64)> {
    let mut atoms = Vec::new();
    loop {
        r.skip_trivia();
        match r.peek() {
            None => return Err(LogoError::ExpectedCloseBrace),
            Some('}') => {
                r.advance();
                break;
            }
            Some('[') => {
                r.advance();
                atoms.push(Atom::List(read_list_body(r)?));
            }
            Some('{') => {
                r.advance();
                let (inner, origin) = read_array_body(r)?;
                atoms.push(Atom::Array(inner, origin));
            }
            Some(']') => return Err(LogoError::CouldntParse(']')),
            Some(_) => atoms.push(Atom::Word(read_bare_word(r))),
        }
    }

    let save = r.pos;
    r.skip_trivia();
    if r.peek() == Some('@') {
        r.advance();
        let mut sign = 1i64;
        if r.peek() == Some('-') {
            sign = -1;
            r.advance();
        }
        let mut digits = String::new();
        while let Some(c) = r.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                r.advance();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            r.pos = save;
            Ok((atoms, 1))
        } else {
            let n: i64 = digits.parse().unwrap_or(1);
            Ok((atoms, sign * n))
        }
    } else {
        r.pos = save;
        Ok((atoms, 1))
    }
}

/// Reads one whitespace-delimited bare word inside a list/array body:
/// only whitespace and `[`/`]`/`{`/`}` terminate it; operator characters
/// are ordinary word characters here.
fn read_bare_word(r: &mut CharReader) -> String {
    let mut s = String::new();
    loop {
        match r.peek() {
            None => break,
            Some(c) if CharReader::is_whitespace(c) => break,
            Some('[') | Some(']') | Some('{') | Some('}') => break,
            Some('\\') => {
                r.advance();
                if let Some(escaped) = r.advance() {
                    s.push(escaped);
                }
            }
            Some(c) => {
                s.push(c);
                r.advance();
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(atoms: &[Atom]) -> Vec<String> {
        atoms
            .iter()
            .map(|a| match a {
                Atom::Word(s) => s.clone(),
                Atom::UnaryMinus => "(unary-)".to_string(),
                Atom::List(_) => "[list]".to_string(),
                Atom::Array(..) => "{array}".to_string(),
            })
            .collect()
    }

    #[test]
    fn binary_minus_no_spaces() {
        let atoms = lex_program("pr 3-4").unwrap();
        assert_eq!(words(&atoms), vec!["pr", "3", "-", "4"]);
    }

    #[test]
    fn unary_minus_after_space_no_trailing_space() {
        let atoms = lex_program("pr 3 -4").unwrap();
        assert_eq!(words(&atoms), vec!["pr", "3", "(unary-)", "4"]);
    }

    #[test]
    fn binary_minus_spaced_both_sides() {
        let atoms = lex_program("pr 3 - 4").unwrap();
        assert_eq!(words(&atoms), vec!["pr", "3", "-", "4"]);
    }

    #[test]
    fn unary_minus_after_lparen() {
        let atoms = lex_program("pr (- 4)").unwrap();
        assert_eq!(words(&atoms), vec!["pr", "(", "(unary-)", "4", ")"]);
    }

    #[test]
    fn leading_unary_minus() {
        let atoms = lex_program("-5").unwrap();
        assert_eq!(words(&atoms), vec!["(unary-)", "5"]);
    }

    #[test]
    fn quoted_word_and_var_ref() {
        let atoms = lex_program(r#"make "x :y"#).unwrap();
        assert_eq!(words(&atoms), vec!["make", "\"x", ":y"]);
    }

    #[test]
    fn list_literal_has_no_expression_structure() {
        let atoms = lex_program("[fd :n rt 90+1]").unwrap();
        match &atoms[0] {
            Atom::List(inner) => {
                assert_eq!(words(inner), vec!["fd", ":n", "rt", "90+1"]);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn nested_list_and_array() {
        let atoms = lex_program("[a [b c] {1 2}@0]").unwrap();
        match &atoms[0] {
            Atom::List(inner) => {
                assert!(matches!(inner[0], Atom::Word(ref s) if s == "a"));
                assert!(matches!(inner[1], Atom::List(_)));
                match &inner[2] {
                    Atom::Array(items, origin) => {
                        assert_eq!(*origin, 0);
                        assert_eq!(items.len(), 2);
                    }
                    _ => panic!("expected array"),
                }
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn unclosed_bracket_errors() {
        assert!(matches!(lex_program("[1 2"), Err(LogoError::ExpectedCloseBracket)));
    }

    #[test]
    fn unclosed_brace_errors() {
        assert!(matches!(lex_program("{1 2"), Err(LogoError::ExpectedCloseBrace)));
    }

    #[test]
    fn line_continuation_and_comment() {
        let atoms = lex_program("pr 1 ~\n+ 2 ; a comment\npr 3").unwrap();
        assert_eq!(words(&atoms), vec!["pr", "1", "+", "2", "pr", "3"]);
    }

    #[test]
    fn escape_keeps_delimiter_literal() {
        let atoms = lex_program(r"make \"odd \[bracket").unwrap();
        assert_eq!(words(&atoms), vec!["make", "\"odd", "[bracket"]);
    }

    #[test]
    fn relational_two_char_operators() {
        let atoms = lex_program("1<=2>=3<>4").unwrap();
        assert_eq!(words(&atoms), vec!["1", "<=", "2", ">=", "3", "<>", "4"]);
    }
}
