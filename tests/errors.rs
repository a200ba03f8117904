use ladle::{parse, ErrorCode};

#[test]
fn trailing_operator_is_a_missing_operand() {
    let err = parse("1 +").unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingOperand);
    assert_eq!(err.position, 2);
    assert_eq!(err.to_string(), "missing operand for '+' at position 2");

    let err = parse("a &&").unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingOperand);
    assert_eq!(err.position, 2);

    let err = parse("x ?:").unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingOperand);
}

#[test]
fn unclosed_paren_points_at_the_opener() {
    let err = parse("(1 + 2").unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingCloseBracket);
    assert_eq!(err.position, 0);
}

#[test]
fn empty_input_runs_out_of_data_at_zero() {
    let err = parse("").unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfData);
    assert_eq!(err.position, 0);

    // whitespace lexes to nothing, same outcome at the input's end
    let err = parse("   ").unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfData);
    assert_eq!(err.position, 3);
}

#[test]
fn leftover_tokens_are_reported_as_more_input() {
    let err = parse("1 2").unwrap_err();
    assert_eq!(err.code, ErrorCode::MoreInput);
    assert_eq!(err.position, 2);
}

#[test]
fn dangling_dot_runs_out_of_data() {
    let err = parse("a.").unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfData);
    assert_eq!(err.position, 2);
}

#[test]
fn operator_after_dot_is_rejected() {
    let err = parse("a.+").unwrap_err();
    assert_eq!(err.code, ErrorCode::NotExpectedToken);
    assert_eq!(err.position, 2);
}

#[test]
fn unclosed_argument_list_points_at_the_paren() {
    let err = parse("foo(1,").unwrap_err();
    assert_eq!(err.code, ErrorCode::RanOutOfArguments);
    assert_eq!(err.position, 3);

    let err = parse("foo(").unwrap_err();
    assert_eq!(err.code, ErrorCode::RanOutOfArguments);
    assert_eq!(err.position, 3);
}

#[test]
fn bean_reference_needs_a_name() {
    let err = parse("@").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidBeanReference);
    assert_eq!(err.position, 0);

    let err = parse("@123").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidBeanReference);
    assert_eq!(err.position, 0);
}

#[test]
fn type_reference_needs_a_name() {
    let err = parse("T()").unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyQualifiedIdentifier);
    assert_eq!(err.position, 2);
}

#[test]
fn ternary_without_its_colon() {
    let err = parse("1 ? 2").unwrap_err();
    assert_eq!(err.code, ErrorCode::OutOfData);
    assert_eq!(err.position, 5);

    let err = parse("1 ? 2 ; 3").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedCharacter);
}

#[test]
fn unclosed_inline_collection_points_at_the_opener() {
    let err = parse("{1, 2").unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingCloseBracket);
    assert_eq!(err.position, 0);

    let err = parse("{").unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingCloseBracket);
    assert_eq!(err.position, 0);
}

#[test]
fn lexer_errors_surface_through_parse() {
    let err = parse("1 + ~2").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedCharacter);
    assert_eq!(err.position, 4);

    let err = parse("'open").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnterminatedString);
    assert_eq!(err.position, 0);
}
