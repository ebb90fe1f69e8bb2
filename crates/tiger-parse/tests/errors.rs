use tiger_parse::{parse_str, tokenize, LexError, ParseError, Parser, Tag};

fn parse_err(src: &str) -> ParseError {
    let toks = tokenize(src).expect("lex ok");
    Parser::new(toks).parse().expect_err("parse should fail")
}

#[test]
fn expected_names_both_tags() {
    let err = parse_err("if 1 2");
    assert_eq!(
        err,
        ParseError::Expected {
            expected: Tag::Then,
            found: Tag::Num,
            index: 2
        }
    );
    assert!(err.to_string().contains("expected THEN, got NUM"));
}

#[test]
fn var_requires_assign_not_eq() {
    let err = parse_str("<mem>", "var x = 1").unwrap_err().to_string();
    assert!(err.contains("expected ASSIGN, got EQ"), "got: {err}");
}

#[test]
fn missing_expression_at_end() {
    let err = parse_err("if 1 then");
    assert!(matches!(err, ParseError::UnexpectedEof { ref expected, index: 3 } if expected == "expression"));
}

#[test]
fn missing_closing_token_at_end() {
    let err = parse_err("f(1, 2");
    assert!(matches!(err, ParseError::UnexpectedEof { ref expected, .. } if expected == "RPAREN"));
}

#[test]
fn bad_token_in_expression_position() {
    let err = parse_err("1 + then");
    assert_eq!(
        err,
        ParseError::Unexpected {
            found: Tag::Then,
            context: "expression",
            index: 2
        }
    );
}

#[test]
fn bad_type_definition() {
    let err = parse_err("type t = 3");
    assert!(matches!(
        err,
        ParseError::Unexpected {
            found: Tag::Num,
            context: "type definition",
            ..
        }
    ));
}

#[test]
fn invalid_character_surfaces_as_lex_error() {
    let err = parse_err("1 # 2");
    assert_eq!(
        err,
        ParseError::Lex(LexError::InvalidCharacter { ch: '#', offset: 2 })
    );
    assert!(err.to_string().contains("Lexer error"));
}

#[test]
fn unterminated_string_surfaces_as_lex_error() {
    let err = parse_err("print(\"abc");
    assert_eq!(
        err,
        ParseError::Lex(LexError::UnterminatedString { offset: 6 })
    );
}

#[test]
fn unknown_escape_surfaces_as_lex_error() {
    let err = parse_err(r#"var s := "a\qb""#);
    assert!(matches!(
        err,
        ParseError::Lex(LexError::UnknownEscape { escape: 'q', .. })
    ));
}

#[test]
fn malformed_main_surfaces_as_lex_error() {
    let err = parse_err("_mian");
    assert!(matches!(
        err,
        ParseError::Lex(LexError::MalformedIdent { ref text, .. }) if text == "_m"
    ));
}

#[test]
fn fatal_escape_digit_fails_tokenizing() {
    let err = tokenize(r#""\x4g""#).unwrap_err();
    assert_eq!(
        err,
        LexError::BadHexDigit {
            found: 'g',
            offset: 4
        }
    );
    let msg = parse_str("<mem>", r#""\x4g""#).unwrap_err().to_string();
    assert!(msg.contains("not a hex digit"), "got: {msg}");
}

#[test]
fn integer_out_of_range() {
    let err = parse_err("99999999999999999999999");
    assert!(matches!(err, ParseError::IntOutOfRange { index: 0, .. }));
}

#[test]
fn trailing_tokens_after_program() {
    let err = parse_err("var a := 1 a");
    assert_eq!(
        err,
        ParseError::TrailingInput {
            found: Tag::Ident,
            index: 4
        }
    );
    let err = parse_err("1 2");
    assert!(matches!(err, ParseError::TrailingInput { found: Tag::Num, index: 1 }));
}

#[test]
fn index_counts_filtered_tokens() {
    // the comment and line break are gone before parsing, so THEN is token 2
    let err = parse_err("if /* c */\n 1 2");
    assert!(matches!(err, ParseError::Expected { index: 2, .. }));
}

#[test]
fn class_declaration_needs_a_body() {
    let err = parse_err("class C var x := 1");
    assert!(matches!(
        err,
        ParseError::Unexpected {
            found: Tag::Var,
            context: "class body",
            ..
        }
    ));
}
