use ladle::{tokenize, ErrorCode, TokenKind};

#[test]
fn spans_are_half_open_byte_offsets() {
    let tokens = tokenize("ab + 12").unwrap();
    assert_eq!((tokens[0].start, tokens[0].end), (0, 2));
    assert_eq!((tokens[1].start, tokens[1].end), (3, 4));
    assert_eq!((tokens[2].start, tokens[2].end), (5, 7));
}

#[test]
fn tokenizing_twice_is_deterministic() {
    let a = tokenize("a.b.?[x > 1] + 0xFFL").unwrap();
    let b = tokenize("a.b.?[x > 1] + 0xFFL").unwrap();
    assert_eq!(a, b);
}

#[test]
fn whitespace_never_produces_tokens() {
    let tokens = tokenize("  1\t+\n2\r\n").unwrap();
    assert_eq!(tokens.len(), 3);
}

#[test]
fn greedy_multi_char_punctuation() {
    let tokens = tokenize("?: ?. == != <= >= ++ -- && ||").unwrap();
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    assert!(matches!(kinds[0], TokenKind::Elvis));
    assert!(matches!(kinds[1], TokenKind::SafeNavi));
    assert!(matches!(kinds[2], TokenKind::Eq));
    assert!(matches!(kinds[3], TokenKind::Ne));
    assert!(matches!(kinds[4], TokenKind::Le));
    assert!(matches!(kinds[5], TokenKind::Ge));
    assert!(matches!(kinds[6], TokenKind::Inc));
    assert!(matches!(kinds[7], TokenKind::Dec));
    assert!(matches!(kinds[8], TokenKind::SymbolicAnd));
    assert!(matches!(kinds[9], TokenKind::SymbolicOr));
}

#[test]
fn single_char_fallbacks() {
    let tokens = tokenize("? ^ ! & = < > + -").unwrap();
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    assert!(matches!(kinds[0], TokenKind::QMark));
    assert!(matches!(kinds[1], TokenKind::Power));
    assert!(matches!(kinds[2], TokenKind::Not));
    assert!(matches!(kinds[3], TokenKind::FactoryBeanRef));
    assert!(matches!(kinds[4], TokenKind::Assign));
    assert!(matches!(kinds[5], TokenKind::Lt));
    assert!(matches!(kinds[6], TokenKind::Gt));
    assert!(matches!(kinds[7], TokenKind::Plus));
    assert!(matches!(kinds[8], TokenKind::Minus));
}

#[test]
fn identifiers_allow_dollar_and_underscore() {
    let tokens = tokenize("$ref _x a$b").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Identifier("$ref".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::Identifier("_x".to_string()));
    assert_eq!(tokens[2].kind, TokenKind::Identifier("a$b".to_string()));
}

#[test]
fn dot_after_int_is_not_a_fraction_without_digits() {
    let tokens = tokenize("1.abs").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LiteralInt("1".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::Dot);
    assert_eq!(tokens[2].kind, TokenKind::Identifier("abs".to_string()));
}

#[test]
fn float_suffix_requires_dot_or_exponent() {
    // "5F" is an int followed by an identifier, not a float literal
    let tokens = tokenize("5F").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LiteralInt("5".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::Identifier("F".to_string()));
    let tokens = tokenize("5.0F 2e1f").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LiteralRealFloat("5.0".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::LiteralRealFloat("2e1".to_string()));
}

#[test]
fn string_escape_by_doubling() {
    let tokens = tokenize("'a''b' \"x\"\"y\"").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LiteralString("a'b".to_string()));
    assert_eq!(tokens[1].kind, TokenKind::LiteralString("x\"y".to_string()));
}

#[test]
fn unterminated_string_fails_at_opening_quote() {
    let err = tokenize("1 + 'abc").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnterminatedString);
    assert_eq!(err.position, 4);
}

#[test]
fn unrecognized_character_fails_at_offset() {
    let err = tokenize("1 ~ 2").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedCharacter);
    assert_eq!(err.position, 2);

    let err = tokenize("a | b").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedCharacter);
    assert_eq!(err.position, 2);
}

#[test]
fn malformed_numbers_fail_at_lex_time() {
    let err = tokenize("0x").unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedNumber);
    assert_eq!(err.position, 0);

    let err = tokenize("1e+").unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedNumber);
    assert_eq!(err.position, 1);
}
