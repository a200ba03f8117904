use crate::error::{ErrorCode, ParseError};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literal payloads hold the cleaned lexeme (no 0x prefix, no L/f
    // suffix) so the parser can pick the right parse routine directly.
    LiteralInt(String),
    LiteralLong(String),
    LiteralHexInt(String),
    LiteralHexLong(String),
    LiteralReal(String),
    LiteralRealFloat(String),
    LiteralString(String),
    Identifier(String),
    Dot,
    SafeNavi,
    LParen,
    RParen,
    LSquare,
    RSquare,
    LCurly,
    RCurly,
    Comma,
    Colon,
    Hash,
    BeanRef,
    FactoryBeanRef,
    Plus,
    Minus,
    Star,
    Div,
    Mod,
    Power,
    Inc,
    Dec,
    Not,
    SymbolicAnd,
    SymbolicOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Assign,
    Elvis,
    QMark,
    Project,
    Select,
    SelectFirst,
    SelectLast,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TokenKind::LiteralInt(s)
            | TokenKind::LiteralLong(s)
            | TokenKind::LiteralHexInt(s)
            | TokenKind::LiteralHexLong(s)
            | TokenKind::LiteralReal(s)
            | TokenKind::LiteralRealFloat(s)
            | TokenKind::Identifier(s) => return f.write_str(s),
            TokenKind::LiteralString(s) => return write!(f, "'{}'", s),
            TokenKind::Dot => ".",
            TokenKind::SafeNavi => "?.",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LSquare => "[",
            TokenKind::RSquare => "]",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Hash => "#",
            TokenKind::BeanRef => "@",
            TokenKind::FactoryBeanRef => "&",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Div => "/",
            TokenKind::Mod => "%",
            TokenKind::Power => "^",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Not => "!",
            TokenKind::SymbolicAnd => "&&",
            TokenKind::SymbolicOr => "||",
            TokenKind::Eq => "==",
            TokenKind::Ne => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Assign => "=",
            TokenKind::Elvis => "?:",
            TokenKind::QMark => "?",
            TokenKind::Project => "![",
            TokenKind::Select => "?[",
            TokenKind::SelectFirst => "^[",
            TokenKind::SelectLast => "$[",
        };
        f.write_str(text)
    }
}

/// A classified lexeme with its half-open byte span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { src: input, input: input.as_bytes(), pos: 0 }
    }

    /// Produce the full token sequence up front. Textual operator words
    /// (and, or, eq, instanceof, ...) come out as plain identifiers; the
    /// parser reinterprets them at the point of use.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.src[start..end].to_string()
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;

        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            let digits = self.pos;
            while matches!(self.peek(), Some(b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')) {
                self.pos += 1;
            }
            if self.pos == digits {
                return Err(ParseError::new(
                    ErrorCode::MalformedNumber,
                    start,
                    "malformed hex literal: no digits after '0x'",
                ));
            }
            let payload = self.text(digits, self.pos);
            let kind = if matches!(self.peek(), Some(b'L' | b'l')) {
                self.pos += 1;
                TokenKind::LiteralHexLong(payload)
            } else {
                TokenKind::LiteralHexInt(payload)
            };
            return Ok(Token::new(kind, start, self.pos));
        }

        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let mut real = false;
        // Only consume the dot when a digit follows, so that method and
        // property access on a literal ("1.abs") keeps its dot.
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            real = true;
            self.pos += 1;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let exp = self.pos;
            let mut look = self.pos + 1;
            if matches!(self.input.get(look), Some(b'+' | b'-')) {
                look += 1;
            }
            if !matches!(self.input.get(look), Some(b'0'..=b'9')) {
                return Err(ParseError::new(
                    ErrorCode::MalformedNumber,
                    exp,
                    "malformed number: no digits in exponent",
                ));
            }
            real = true;
            self.pos = look;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }

        let payload_end = self.pos;
        let kind = if real {
            if matches!(self.peek(), Some(b'f' | b'F')) {
                self.pos += 1;
                TokenKind::LiteralRealFloat(self.text(start, payload_end))
            } else {
                TokenKind::LiteralReal(self.text(start, payload_end))
            }
        } else if matches!(self.peek(), Some(b'L' | b'l')) {
            self.pos += 1;
            TokenKind::LiteralLong(self.text(start, payload_end))
        } else {
            TokenKind::LiteralInt(self.text(start, payload_end))
        };
        Ok(Token::new(kind, start, self.pos))
    }

    fn identifier(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while matches!(
            self.peek(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$')
        ) {
            self.pos += 1;
        }
        Token::new(TokenKind::Identifier(self.text(start, self.pos)), start, self.pos)
    }

    fn string(&mut self, quote: u8) -> Result<Token, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut buf: Vec<u8> = Vec::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == quote {
                // A doubled quote inside the literal is one quote character
                if self.peek() == Some(quote) {
                    buf.push(quote);
                    self.pos += 1;
                    continue;
                }
                let text = String::from_utf8(buf).map_err(|_| {
                    ParseError::new(ErrorCode::UnterminatedString, start, "invalid UTF-8 in string literal")
                })?;
                return Ok(Token::new(TokenKind::LiteralString(text), start, self.pos));
            }
            buf.push(c);
        }
        Err(ParseError::new(
            ErrorCode::UnterminatedString,
            start,
            "unterminated string literal",
        ))
    }

    fn unexpected(&self) -> ParseError {
        let ch = self.src[self.pos..].chars().next().unwrap_or('?');
        ParseError::new(
            ErrorCode::UnexpectedCharacter,
            self.pos,
            format!("unexpected character '{}'", ch),
        )
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_ws();
        let start = self.pos;
        let ch = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        // Greedy two-character matches come before their one-character
        // prefixes; `len` is the lexeme length in bytes.
        let (kind, len) = match ch {
            b'0'..=b'9' => return self.number().map(Some),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => return Ok(Some(self.identifier())),
            b'\'' | b'"' => return self.string(ch).map(Some),
            b'$' => {
                if self.peek_at(1) == Some(b'[') {
                    (TokenKind::SelectLast, 2)
                } else {
                    return Ok(Some(self.identifier()));
                }
            }
            b'?' => match self.peek_at(1) {
                Some(b'.') => (TokenKind::SafeNavi, 2),
                Some(b':') => (TokenKind::Elvis, 2),
                Some(b'[') => (TokenKind::Select, 2),
                _ => (TokenKind::QMark, 1),
            },
            b'^' => {
                if self.peek_at(1) == Some(b'[') {
                    (TokenKind::SelectFirst, 2)
                } else {
                    (TokenKind::Power, 1)
                }
            }
            b'!' => match self.peek_at(1) {
                Some(b'=') => (TokenKind::Ne, 2),
                Some(b'[') => (TokenKind::Project, 2),
                _ => (TokenKind::Not, 1),
            },
            b'&' => {
                if self.peek_at(1) == Some(b'&') {
                    (TokenKind::SymbolicAnd, 2)
                } else {
                    (TokenKind::FactoryBeanRef, 1)
                }
            }
            b'|' => {
                if self.peek_at(1) == Some(b'|') {
                    (TokenKind::SymbolicOr, 2)
                } else {
                    return Err(self.unexpected());
                }
            }
            b'=' => {
                if self.peek_at(1) == Some(b'=') {
                    (TokenKind::Eq, 2)
                } else {
                    (TokenKind::Assign, 1)
                }
            }
            b'<' => {
                if self.peek_at(1) == Some(b'=') {
                    (TokenKind::Le, 2)
                } else {
                    (TokenKind::Lt, 1)
                }
            }
            b'>' => {
                if self.peek_at(1) == Some(b'=') {
                    (TokenKind::Ge, 2)
                } else {
                    (TokenKind::Gt, 1)
                }
            }
            b'+' => {
                if self.peek_at(1) == Some(b'+') {
                    (TokenKind::Inc, 2)
                } else {
                    (TokenKind::Plus, 1)
                }
            }
            b'-' => {
                if self.peek_at(1) == Some(b'-') {
                    (TokenKind::Dec, 2)
                } else {
                    (TokenKind::Minus, 1)
                }
            }
            b'.' => (TokenKind::Dot, 1),
            b',' => (TokenKind::Comma, 1),
            b':' => (TokenKind::Colon, 1),
            b'#' => (TokenKind::Hash, 1),
            b'@' => (TokenKind::BeanRef, 1),
            b'*' => (TokenKind::Star, 1),
            b'/' => (TokenKind::Div, 1),
            b'%' => (TokenKind::Mod, 1),
            b'(' => (TokenKind::LParen, 1),
            b')' => (TokenKind::RParen, 1),
            b'[' => (TokenKind::LSquare, 1),
            b']' => (TokenKind::RSquare, 1),
            b'{' => (TokenKind::LCurly, 1),
            b'}' => (TokenKind::RCurly, 1),
            _ => return Err(self.unexpected()),
        };
        self.pos += len;
        Ok(Some(Token::new(kind, start, self.pos)))
    }
}

#[test]
fn composite_openers_and_navigation() {
    let tokens = Lexer::tokenize("a?.b ?[x] ^[x] $[x] ![x]").unwrap();
    let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
    assert!(matches!(kinds[1], TokenKind::SafeNavi));
    assert!(matches!(kinds[3], TokenKind::Select));
    assert!(matches!(kinds[6], TokenKind::SelectFirst));
    assert!(matches!(kinds[9], TokenKind::SelectLast));
    assert!(matches!(kinds[12], TokenKind::Project));
}

#[test]
fn numeric_literal_kinds() {
    let tokens = Lexer::tokenize("1 2L 0xFF 0x2Al 3.5 3.5f 1e3 2E-2").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LiteralInt("1".into()));
    assert_eq!(tokens[1].kind, TokenKind::LiteralLong("2".into()));
    assert_eq!(tokens[2].kind, TokenKind::LiteralHexInt("FF".into()));
    assert_eq!(tokens[3].kind, TokenKind::LiteralHexLong("2A".into()));
    assert_eq!(tokens[4].kind, TokenKind::LiteralReal("3.5".into()));
    assert_eq!(tokens[5].kind, TokenKind::LiteralRealFloat("3.5".into()));
    assert_eq!(tokens[6].kind, TokenKind::LiteralReal("1e3".into()));
    assert_eq!(tokens[7].kind, TokenKind::LiteralReal("2E-2".into()));
}

#[test]
fn doubled_quote_escape() {
    let tokens = Lexer::tokenize("'it''s'").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LiteralString("it's".into()));
    assert_eq!((tokens[0].start, tokens[0].end), (0, 7));
}

#[test]
fn textual_operators_stay_identifiers() {
    let tokens = Lexer::tokenize("1 and 2").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::Identifier("and".into()));
}
