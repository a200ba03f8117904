use std::fmt::{Display, Formatter};

/// Machine-checkable category of a parse failure. Tests and callers can
/// match on this instead of scraping the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnexpectedCharacter,
    UnterminatedString,
    MalformedNumber,
    OutOfData,
    MoreInput,
    NotExpectedToken,
    MissingCloseBracket,
    UnmatchedCloseBracket,
    MissingOperand,
    EmptyQualifiedIdentifier,
    MissingSelectionExpression,
    InvalidBeanReference,
    RanOutOfArguments,
    NoExpressionWithinDelimiter,
    MissingTemplateSuffix,
    NonTerminatingQuotedString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new<M: Into<String>>(code: ErrorCode, position: usize, message: M) -> Self {
        Self { code, position, message: message.into() }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}
