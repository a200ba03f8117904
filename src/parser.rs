use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::{BinaryOp, Expr, ExprKind, IncDecOp, SelectionKind, UnaryOp};
use crate::error::{ErrorCode, ParseError};
use crate::lexer::{Lexer, Token, TokenKind};

lazy_static! {
    static ref TEXTUAL_OPERATORS: HashMap<&'static str, BinaryOp> = {
        let mut m = HashMap::new();
        m.insert("or", BinaryOp::Or);
        m.insert("and", BinaryOp::And);
        m.insert("eq", BinaryOp::Eq);
        m.insert("ne", BinaryOp::Ne);
        m.insert("lt", BinaryOp::Lt);
        m.insert("le", BinaryOp::Le);
        m.insert("gt", BinaryOp::Gt);
        m.insert("ge", BinaryOp::Ge);
        m.insert("instanceof", BinaryOp::InstanceOf);
        m.insert("matches", BinaryOp::Matches);
        m.insert("between", BinaryOp::Between);
        m
    };
}

/// Stateless classification of a token as a binary operator. Textual
/// aliases stay identifiers in the token stream; they are reinterpreted
/// here, only when a grammar rule asks for an operator, and the token
/// itself is never rewritten.
fn classify_operator(token: &Token) -> Option<BinaryOp> {
    match &token.kind {
        TokenKind::SymbolicOr => Some(BinaryOp::Or),
        TokenKind::SymbolicAnd => Some(BinaryOp::And),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::Ne => Some(BinaryOp::Ne),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Le => Some(BinaryOp::Le),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Ge => Some(BinaryOp::Ge),
        TokenKind::Identifier(text) => {
            TEXTUAL_OPERATORS.get(text.to_ascii_lowercase().as_str()).copied()
        }
        _ => None,
    }
}

fn binary(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
    let (start, end) = (lhs.start, rhs.end);
    Expr::new(start, end, ExprKind::Binary(Box::new(lhs), op, Box::new(rhs)))
}

fn malformed(token: &Token, what: &str) -> ParseError {
    ParseError::new(
        ErrorCode::MalformedNumber,
        token.start,
        format!("'{}' cannot be parsed as {}", token.kind, what),
    )
}

/// Recursive-descent parser over the full token sequence. One instance
/// parses one expression; the cursor only ever moves forward.
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    end_of_input: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: Lexer::tokenize(input)?,
            cursor: 0,
            end_of_input: input.len(),
        })
    }

    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.eat_expression()?;
        if let Some(token) = self.peek() {
            return Err(ParseError::new(
                ErrorCode::MoreInput,
                token.start,
                format!("more input after end of expression: '{}'", token.kind),
            ));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.cursor + offset)
    }

    fn lookahead(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind.clone())
    }

    fn lookahead_pos(&self) -> usize {
        self.peek().map_or(self.end_of_input, |t| t.start)
    }

    fn next_tok(&mut self) -> Result<Token, ParseError> {
        match self.tokens.get(self.cursor) {
            Some(token) => {
                let token = token.clone();
                self.cursor += 1;
                Ok(token)
            }
            None => Err(self.out_of_data()),
        }
    }

    fn eat_token(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        match self.tokens.get(self.cursor) {
            Some(token) if token.kind == expected => {
                let token = token.clone();
                self.cursor += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::new(
                ErrorCode::NotExpectedToken,
                token.start,
                format!("not expected token: expected '{}', got '{}'", expected, token.kind),
            )),
            None => Err(self.out_of_data()),
        }
    }

    fn eat_identifier(&mut self) -> Result<(String, usize, usize), ParseError> {
        match self.tokens.get(self.cursor) {
            Some(Token { kind: TokenKind::Identifier(name), start, end }) => {
                let result = (name.clone(), *start, *end);
                self.cursor += 1;
                Ok(result)
            }
            Some(token) => Err(ParseError::new(
                ErrorCode::NotExpectedToken,
                token.start,
                format!("not expected token: expected an identifier, got '{}'", token.kind),
            )),
            None => Err(self.out_of_data()),
        }
    }

    fn out_of_data(&self) -> ParseError {
        ParseError::new(ErrorCode::OutOfData, self.end_of_input, "unexpectedly ran out of input")
    }

    fn require_operand(&self, op: &Token) -> Result<(), ParseError> {
        if self.peek().is_none() {
            return Err(ParseError::new(
                ErrorCode::MissingOperand,
                op.start,
                format!("missing operand for '{}'", op.kind),
            ));
        }
        Ok(())
    }

    // assignment / elvis / ternary; each right-hand side is non-chaining
    fn eat_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = self.eat_logical_or()?;
        match self.lookahead() {
            Some(TokenKind::Assign) => {
                let op = self.next_tok()?;
                self.require_operand(&op)?;
                let value = self.eat_logical_or()?;
                let (start, end) = (expr.start, value.end);
                Ok(Expr::new(
                    start,
                    end,
                    ExprKind::Assign { target: Box::new(expr), value: Box::new(value) },
                ))
            }
            Some(TokenKind::Elvis) => {
                let op = self.next_tok()?;
                self.require_operand(&op)?;
                let default = self.eat_expression()?;
                let (start, end) = (expr.start, default.end);
                Ok(Expr::new(
                    start,
                    end,
                    ExprKind::Elvis { value: Box::new(expr), default: Box::new(default) },
                ))
            }
            Some(TokenKind::QMark) => {
                let op = self.next_tok()?;
                self.require_operand(&op)?;
                let if_true = self.eat_expression()?;
                self.eat_token(TokenKind::Colon)?;
                let if_false = self.eat_expression()?;
                let (start, end) = (expr.start, if_false.end);
                Ok(Expr::new(
                    start,
                    end,
                    ExprKind::Ternary {
                        cond: Box::new(expr),
                        if_true: Box::new(if_true),
                        if_false: Box::new(if_false),
                    },
                ))
            }
            _ => Ok(expr),
        }
    }

    fn eat_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.eat_logical_and()?;
        while self.peek().and_then(classify_operator) == Some(BinaryOp::Or) {
            let op = self.next_tok()?;
            self.require_operand(&op)?;
            let rhs = self.eat_logical_and()?;
            expr = binary(expr, BinaryOp::Or, rhs);
        }
        Ok(expr)
    }

    fn eat_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.eat_relational()?;
        while self.peek().and_then(classify_operator) == Some(BinaryOp::And) {
            let op = self.next_tok()?;
            self.require_operand(&op)?;
            let rhs = self.eat_relational()?;
            expr = binary(expr, BinaryOp::And, rhs);
        }
        Ok(expr)
    }

    // non-chaining: at most one relational operator per invocation
    fn eat_relational(&mut self) -> Result<Expr, ParseError> {
        let expr = self.eat_sum()?;
        let op_kind = match self.peek().and_then(classify_operator) {
            Some(BinaryOp::And | BinaryOp::Or) | None => return Ok(expr),
            Some(op_kind) => op_kind,
        };
        let op = self.next_tok()?;
        self.require_operand(&op)?;
        let rhs = self.eat_sum()?;
        Ok(binary(expr, op_kind, rhs))
    }

    fn eat_sum(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.eat_product()?;
        loop {
            let op_kind = match self.lookahead() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => break,
            };
            let op = self.next_tok()?;
            self.require_operand(&op)?;
            let rhs = self.eat_product()?;
            expr = binary(expr, op_kind, rhs);
        }
        Ok(expr)
    }

    fn eat_product(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.eat_power()?;
        loop {
            let op_kind = match self.lookahead() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Div) => BinaryOp::Div,
                Some(TokenKind::Mod) => BinaryOp::Mod,
                _ => break,
            };
            let op = self.next_tok()?;
            self.require_operand(&op)?;
            let rhs = self.eat_power()?;
            expr = binary(expr, op_kind, rhs);
        }
        Ok(expr)
    }

    fn eat_power(&mut self) -> Result<Expr, ParseError> {
        let expr = self.eat_unary()?;
        match self.lookahead() {
            Some(TokenKind::Power) => {
                let op = self.next_tok()?;
                self.require_operand(&op)?;
                // right recursion: 2^3^2 groups as 2^(3^2)
                let rhs = self.eat_power()?;
                Ok(binary(expr, BinaryOp::Pow, rhs))
            }
            Some(TokenKind::Inc) => {
                let op = self.next_tok()?;
                let (start, end) = (expr.start, op.end);
                Ok(Expr::new(
                    start,
                    end,
                    ExprKind::IncDec { op: IncDecOp::Inc, postfix: true, target: Box::new(expr) },
                ))
            }
            Some(TokenKind::Dec) => {
                let op = self.next_tok()?;
                let (start, end) = (expr.start, op.end);
                Ok(Expr::new(
                    start,
                    end,
                    ExprKind::IncDec { op: IncDecOp::Dec, postfix: true, target: Box::new(expr) },
                ))
            }
            _ => Ok(expr),
        }
    }

    fn eat_unary(&mut self) -> Result<Expr, ParseError> {
        let op_kind = match self.peek() {
            None => return Err(self.out_of_data()),
            Some(token) => match &token.kind {
                TokenKind::Plus => Some(UnaryOp::Plus),
                TokenKind::Minus => Some(UnaryOp::Minus),
                TokenKind::Not => Some(UnaryOp::Not),
                TokenKind::Identifier(text) if text.eq_ignore_ascii_case("not") => {
                    Some(UnaryOp::Not)
                }
                _ => None,
            },
        };
        if let Some(op_kind) = op_kind {
            let op = self.next_tok()?;
            self.require_operand(&op)?;
            let operand = self.eat_unary()?;
            let (start, end) = (op.start, operand.end);
            return Ok(Expr::new(start, end, ExprKind::Unary(op_kind, Box::new(operand))));
        }
        match self.lookahead() {
            Some(TokenKind::Inc) => {
                let op = self.next_tok()?;
                self.require_operand(&op)?;
                let target = self.eat_unary()?;
                let (start, end) = (op.start, target.end);
                Ok(Expr::new(
                    start,
                    end,
                    ExprKind::IncDec { op: IncDecOp::Inc, postfix: false, target: Box::new(target) },
                ))
            }
            Some(TokenKind::Dec) => {
                let op = self.next_tok()?;
                self.require_operand(&op)?;
                let target = self.eat_unary()?;
                let (start, end) = (op.start, target.end);
                Ok(Expr::new(
                    start,
                    end,
                    ExprKind::IncDec { op: IncDecOp::Dec, postfix: false, target: Box::new(target) },
                ))
            }
            _ => self.eat_primary(),
        }
    }

    // a start node followed by dotted/indexed continuations
    fn eat_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.eat_start_node()?;
        let mut pieces = vec![start];
        while let Some(piece) = self.maybe_eat_node()? {
            pieces.push(piece);
        }
        if pieces.len() == 1 {
            return Ok(pieces.remove(0));
        }
        let (start_pos, end_pos) = (pieces[0].start, pieces[pieces.len() - 1].end);
        Ok(Expr::new(start_pos, end_pos, ExprKind::Compound(pieces)))
    }

    fn maybe_eat_node(&mut self) -> Result<Option<Expr>, ParseError> {
        match self.lookahead() {
            Some(TokenKind::Dot | TokenKind::SafeNavi) => self.eat_dotted_node().map(Some),
            Some(TokenKind::LSquare) => self.eat_indexer().map(Some),
            _ => Ok(None),
        }
    }

    // after '.' or '?.': exactly one of method/property, function/variable,
    // projection, selection
    fn eat_dotted_node(&mut self) -> Result<Expr, ParseError> {
        let dot = self.next_tok()?;
        let safe = dot.kind == TokenKind::SafeNavi;
        match self.lookahead() {
            Some(TokenKind::Identifier(_)) => self.eat_method_or_property(dot.start, safe),
            Some(TokenKind::Hash) => self.eat_function_or_var(dot.start),
            Some(TokenKind::Project) => self.eat_projection(dot.start, safe),
            Some(TokenKind::Select | TokenKind::SelectFirst | TokenKind::SelectLast) => {
                self.eat_selection(dot.start, safe)
            }
            Some(kind) => Err(ParseError::new(
                ErrorCode::NotExpectedToken,
                self.lookahead_pos(),
                format!("not expected token after '{}': '{}'", dot.kind, kind),
            )),
            None => Err(self.out_of_data()),
        }
    }

    fn eat_start_node(&mut self) -> Result<Expr, ParseError> {
        let (pos, kind) = match self.peek() {
            Some(token) => (token.start, token.kind.clone()),
            None => return Err(self.out_of_data()),
        };
        match kind {
            TokenKind::LiteralInt(_)
            | TokenKind::LiteralLong(_)
            | TokenKind::LiteralHexInt(_)
            | TokenKind::LiteralHexLong(_)
            | TokenKind::LiteralReal(_)
            | TokenKind::LiteralRealFloat(_)
            | TokenKind::LiteralString(_) => self.eat_literal(),
            TokenKind::LParen => self.eat_paren_expression(),
            TokenKind::Identifier(text) => {
                // "T" opens a type reference only before '('; "new" opens a
                // constructor unless it sits in map-key position before ']'.
                if text == "T"
                    && matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenKind::LParen))
                {
                    return self.eat_type_reference();
                }
                if text.eq_ignore_ascii_case("null") {
                    let token = self.next_tok()?;
                    return Ok(Expr::new(token.start, token.end, ExprKind::Null));
                }
                if text.eq_ignore_ascii_case("true") {
                    let token = self.next_tok()?;
                    return Ok(Expr::new(token.start, token.end, ExprKind::Bool(true)));
                }
                if text.eq_ignore_ascii_case("false") {
                    let token = self.next_tok()?;
                    return Ok(Expr::new(token.start, token.end, ExprKind::Bool(false)));
                }
                if text.eq_ignore_ascii_case("new")
                    && !matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenKind::RSquare))
                {
                    return self.eat_constructor_reference();
                }
                self.eat_method_or_property(pos, false)
            }
            TokenKind::Hash => self.eat_function_or_var(pos),
            TokenKind::BeanRef | TokenKind::FactoryBeanRef => self.eat_bean_reference(),
            TokenKind::Project => self.eat_projection(pos, false),
            TokenKind::Select | TokenKind::SelectFirst | TokenKind::SelectLast => {
                self.eat_selection(pos, false)
            }
            TokenKind::LSquare => self.eat_indexer(),
            TokenKind::LCurly => self.eat_inline_list_or_map(),
            other => Err(ParseError::new(
                ErrorCode::NotExpectedToken,
                pos,
                format!("not expected token: '{}'", other),
            )),
        }
    }

    fn eat_literal(&mut self) -> Result<Expr, ParseError> {
        let token = self.next_tok()?;
        let kind = match &token.kind {
            TokenKind::LiteralInt(raw) => {
                ExprKind::Int(raw.parse::<i32>().map_err(|_| malformed(&token, "an int"))?)
            }
            TokenKind::LiteralLong(raw) => {
                ExprKind::Long(raw.parse::<i64>().map_err(|_| malformed(&token, "a long"))?)
            }
            TokenKind::LiteralHexInt(raw) => ExprKind::Int(
                i32::from_str_radix(raw, 16).map_err(|_| malformed(&token, "an int"))?,
            ),
            TokenKind::LiteralHexLong(raw) => ExprKind::Long(
                i64::from_str_radix(raw, 16).map_err(|_| malformed(&token, "a long"))?,
            ),
            TokenKind::LiteralReal(raw) => {
                ExprKind::Real(raw.parse::<f64>().map_err(|_| malformed(&token, "a real"))?)
            }
            TokenKind::LiteralRealFloat(raw) => {
                ExprKind::Float(raw.parse::<f32>().map_err(|_| malformed(&token, "a float"))?)
            }
            TokenKind::LiteralString(text) => ExprKind::StringLit(text.clone()),
            other => {
                return Err(ParseError::new(
                    ErrorCode::NotExpectedToken,
                    token.start,
                    format!("not expected token: expected a literal, got '{}'", other),
                ))
            }
        };
        Ok(Expr::new(token.start, token.end, kind))
    }

    fn eat_paren_expression(&mut self) -> Result<Expr, ParseError> {
        let lparen = self.eat_token(TokenKind::LParen)?;
        let expr = self.eat_expression()?;
        match self.lookahead() {
            Some(TokenKind::RParen) => {
                self.next_tok()?;
                Ok(expr)
            }
            Some(kind) => Err(ParseError::new(
                ErrorCode::NotExpectedToken,
                self.lookahead_pos(),
                format!("not expected token: expected ')', got '{}'", kind),
            )),
            None => Err(ParseError::new(
                ErrorCode::MissingCloseBracket,
                lparen.start,
                "missing closing ')'",
            )),
        }
    }

    // T(qualified.Type) with optional [] dimensions
    fn eat_type_reference(&mut self) -> Result<Expr, ParseError> {
        let t_token = self.next_tok()?;
        self.eat_token(TokenKind::LParen)?;
        let type_name = self.eat_qualified_id()?;
        let mut dims = 0;
        while matches!(self.lookahead(), Some(TokenKind::LSquare)) {
            self.next_tok()?;
            self.eat_token(TokenKind::RSquare)?;
            dims += 1;
        }
        let rparen = self.eat_token(TokenKind::RParen)?;
        Ok(Expr::new(
            t_token.start,
            rparen.end,
            ExprKind::TypeRef { type_name: Box::new(type_name), dims },
        ))
    }

    // dot-separated identifier run; at least one segment
    fn eat_qualified_id(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token { kind: TokenKind::Identifier(_), .. }) => {}
            Some(token) => {
                return Err(ParseError::new(
                    ErrorCode::EmptyQualifiedIdentifier,
                    token.start,
                    format!("expected a qualified identifier, got '{}'", token.kind),
                ))
            }
            None => return Err(self.out_of_data()),
        }
        let (name, start, end) = self.eat_identifier()?;
        let mut segments = vec![Expr::new(start, end, ExprKind::Identifier(name))];
        while matches!(self.lookahead(), Some(TokenKind::Dot))
            && matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenKind::Identifier(_)))
        {
            self.next_tok()?;
            let (name, start, end) = self.eat_identifier()?;
            segments.push(Expr::new(start, end, ExprKind::Identifier(name)));
        }
        let (start, end) = (segments[0].start, segments[segments.len() - 1].end);
        Ok(Expr::new(start, end, ExprKind::QualifiedId(segments)))
    }

    // new Type(args), new int[3][] and new int[]{1, 2} array forms
    fn eat_constructor_reference(&mut self) -> Result<Expr, ParseError> {
        let new_token = self.next_tok()?;
        let type_name = self.eat_qualified_id()?;
        if !matches!(self.lookahead(), Some(TokenKind::LSquare)) {
            let (args, end) = self.eat_arguments()?;
            return Ok(Expr::new(
                new_token.start,
                end,
                ExprKind::Constructor { type_name: Box::new(type_name), args },
            ));
        }
        let mut dims: Vec<Option<Expr>> = Vec::new();
        let mut end = type_name.end;
        while matches!(self.lookahead(), Some(TokenKind::LSquare)) {
            self.next_tok()?;
            if matches!(self.lookahead(), Some(TokenKind::RSquare)) {
                dims.push(None);
            } else {
                dims.push(Some(self.eat_expression()?));
            }
            let rsquare = self.eat_token(TokenKind::RSquare)?;
            end = rsquare.end;
        }
        let mut initializer = None;
        if matches!(self.lookahead(), Some(TokenKind::LCurly)) {
            let (items, init_end) = self.eat_initializer_list()?;
            initializer = Some(items);
            end = init_end;
        }
        Ok(Expr::new(
            new_token.start,
            end,
            ExprKind::ArrayConstructor { type_name: Box::new(type_name), dims, initializer },
        ))
    }

    fn eat_initializer_list(&mut self) -> Result<(Vec<Expr>, usize), ParseError> {
        let lcurly = self.eat_token(TokenKind::LCurly)?;
        let mut items = Vec::new();
        if matches!(self.lookahead(), Some(TokenKind::RCurly)) {
            let rcurly = self.next_tok()?;
            return Ok((items, rcurly.end));
        }
        loop {
            if self.peek().is_none() {
                return Err(ParseError::new(
                    ErrorCode::MissingCloseBracket,
                    lcurly.start,
                    "missing closing '}'",
                ));
            }
            items.push(self.eat_expression()?);
            match self.lookahead() {
                Some(TokenKind::Comma) => {
                    self.next_tok()?;
                }
                Some(TokenKind::RCurly) => {
                    let rcurly = self.next_tok()?;
                    return Ok((items, rcurly.end));
                }
                Some(kind) => {
                    return Err(ParseError::new(
                        ErrorCode::NotExpectedToken,
                        self.lookahead_pos(),
                        format!("not expected token: expected ',' or '}}', got '{}'", kind),
                    ))
                }
                None => {
                    return Err(ParseError::new(
                        ErrorCode::MissingCloseBracket,
                        lcurly.start,
                        "missing closing '}'",
                    ))
                }
            }
        }
    }

    fn eat_method_or_property(&mut self, start: usize, safe: bool) -> Result<Expr, ParseError> {
        let (name, _, name_end) = self.eat_identifier()?;
        if matches!(self.lookahead(), Some(TokenKind::LParen)) {
            let (args, end) = self.eat_arguments()?;
            return Ok(Expr::new(start, end, ExprKind::Method { name, args, safe }));
        }
        Ok(Expr::new(start, name_end, ExprKind::Property { name, safe }))
    }

    fn eat_function_or_var(&mut self, start: usize) -> Result<Expr, ParseError> {
        self.eat_token(TokenKind::Hash)?;
        let (name, _, name_end) = self.eat_identifier()?;
        if matches!(self.lookahead(), Some(TokenKind::LParen)) {
            let (args, end) = self.eat_arguments()?;
            return Ok(Expr::new(start, end, ExprKind::Function { name, args }));
        }
        Ok(Expr::new(start, name_end, ExprKind::Variable(name)))
    }

    fn eat_bean_reference(&mut self) -> Result<Expr, ParseError> {
        let ref_token = self.next_tok()?;
        let factory = ref_token.kind == TokenKind::FactoryBeanRef;
        match self.lookahead() {
            Some(TokenKind::Identifier(name)) | Some(TokenKind::LiteralString(name)) => {
                let name_token = self.next_tok()?;
                Ok(Expr::new(
                    ref_token.start,
                    name_token.end,
                    ExprKind::BeanRef { name, factory },
                ))
            }
            _ => Err(ParseError::new(
                ErrorCode::InvalidBeanReference,
                ref_token.start,
                format!("invalid bean reference: expected a bean name after '{}'", ref_token.kind),
            )),
        }
    }

    fn eat_projection(&mut self, start: usize, safe: bool) -> Result<Expr, ParseError> {
        self.eat_token(TokenKind::Project)?;
        let body = self.eat_expression()?;
        let rsquare = self.eat_token(TokenKind::RSquare)?;
        Ok(Expr::new(
            start,
            rsquare.end,
            ExprKind::Projection { body: Box::new(body), safe },
        ))
    }

    fn eat_selection(&mut self, start: usize, safe: bool) -> Result<Expr, ParseError> {
        let open = self.next_tok()?;
        let mode = match open.kind {
            TokenKind::Select => SelectionKind::All,
            TokenKind::SelectFirst => SelectionKind::First,
            TokenKind::SelectLast => SelectionKind::Last,
            other => {
                return Err(ParseError::new(
                    ErrorCode::NotExpectedToken,
                    open.start,
                    format!("not expected token: expected a selection opener, got '{}'", other),
                ))
            }
        };
        if matches!(self.lookahead(), Some(TokenKind::RSquare)) {
            return Err(ParseError::new(
                ErrorCode::MissingSelectionExpression,
                self.lookahead_pos(),
                "no expression defined within selection",
            ));
        }
        let body = self.eat_expression()?;
        let rsquare = self.eat_token(TokenKind::RSquare)?;
        Ok(Expr::new(
            start,
            rsquare.end,
            ExprKind::Selection { mode, body: Box::new(body), safe },
        ))
    }

    fn eat_indexer(&mut self) -> Result<Expr, ParseError> {
        let lsquare = self.eat_token(TokenKind::LSquare)?;
        let index = self.eat_expression()?;
        let rsquare = self.eat_token(TokenKind::RSquare)?;
        Ok(Expr::new(lsquare.start, rsquare.end, ExprKind::Indexer(Box::new(index))))
    }

    // {}, {:}, {a, b}, {k: v, ...}
    fn eat_inline_list_or_map(&mut self) -> Result<Expr, ParseError> {
        let lcurly = self.eat_token(TokenKind::LCurly)?;
        match self.lookahead() {
            Some(TokenKind::RCurly) => {
                let rcurly = self.next_tok()?;
                return Ok(Expr::new(lcurly.start, rcurly.end, ExprKind::InlineList(Vec::new())));
            }
            Some(TokenKind::Colon) => {
                self.next_tok()?;
                let rcurly = self.eat_token(TokenKind::RCurly)?;
                return Ok(Expr::new(lcurly.start, rcurly.end, ExprKind::InlineMap(Vec::new())));
            }
            None => {
                return Err(ParseError::new(
                    ErrorCode::MissingCloseBracket,
                    lcurly.start,
                    "missing closing '}'",
                ))
            }
            _ => {}
        }
        let first = self.eat_expression()?;
        if matches!(self.lookahead(), Some(TokenKind::Colon)) {
            self.next_tok()?;
            let value = self.eat_expression()?;
            let mut entries = vec![(first, value)];
            while matches!(self.lookahead(), Some(TokenKind::Comma)) {
                self.next_tok()?;
                let key = self.eat_expression()?;
                self.eat_token(TokenKind::Colon)?;
                let value = self.eat_expression()?;
                entries.push((key, value));
            }
            let rcurly = self.eat_rcurly(&lcurly)?;
            return Ok(Expr::new(lcurly.start, rcurly.end, ExprKind::InlineMap(entries)));
        }
        let mut items = vec![first];
        while matches!(self.lookahead(), Some(TokenKind::Comma)) {
            self.next_tok()?;
            items.push(self.eat_expression()?);
        }
        let rcurly = self.eat_rcurly(&lcurly)?;
        Ok(Expr::new(lcurly.start, rcurly.end, ExprKind::InlineList(items)))
    }

    fn eat_rcurly(&mut self, lcurly: &Token) -> Result<Token, ParseError> {
        match self.lookahead() {
            Some(TokenKind::RCurly) => self.next_tok(),
            Some(kind) => Err(ParseError::new(
                ErrorCode::NotExpectedToken,
                self.lookahead_pos(),
                format!("not expected token: expected ',' or '}}', got '{}'", kind),
            )),
            None => Err(ParseError::new(
                ErrorCode::MissingCloseBracket,
                lcurly.start,
                "missing closing '}'",
            )),
        }
    }

    // shared by method calls, function calls and constructor calls
    fn eat_arguments(&mut self) -> Result<(Vec<Expr>, usize), ParseError> {
        let lparen = self.eat_token(TokenKind::LParen)?;
        let mut args = Vec::new();
        if matches!(self.lookahead(), Some(TokenKind::RParen)) {
            let rparen = self.next_tok()?;
            return Ok((args, rparen.end));
        }
        loop {
            if self.peek().is_none() {
                return Err(ParseError::new(
                    ErrorCode::RanOutOfArguments,
                    lparen.start,
                    "ran out of arguments: no closing ')'",
                ));
            }
            args.push(self.eat_expression()?);
            match self.lookahead() {
                Some(TokenKind::Comma) => {
                    self.next_tok()?;
                }
                Some(TokenKind::RParen) => {
                    let rparen = self.next_tok()?;
                    return Ok((args, rparen.end));
                }
                Some(kind) => {
                    return Err(ParseError::new(
                        ErrorCode::NotExpectedToken,
                        self.lookahead_pos(),
                        format!("not expected token: expected ',' or ')', got '{}'", kind),
                    ))
                }
                None => {
                    return Err(ParseError::new(
                        ErrorCode::RanOutOfArguments,
                        lparen.start,
                        "ran out of arguments: no closing ')'",
                    ))
                }
            }
        }
    }
}

#[test]
fn left_associative_sum() {
    let expr = Parser::new("1-2-3").unwrap().parse().unwrap();
    // (1-2)-3
    match &expr.kind {
        ExprKind::Binary(lhs, BinaryOp::Sub, rhs) => {
            assert!(matches!(lhs.kind, ExprKind::Binary(_, BinaryOp::Sub, _)));
            assert!(matches!(rhs.kind, ExprKind::Int(3)));
        }
        other => panic!("expected binary sub, got {:?}", other),
    }
}

#[test]
fn textual_and_symbolic_operators_agree() {
    let a = Parser::new("1 and 2").unwrap().parse().unwrap();
    let b = Parser::new("1 && 2").unwrap().parse().unwrap();
    match (&a.kind, &b.kind) {
        (ExprKind::Binary(_, op_a, _), ExprKind::Binary(_, op_b, _)) => {
            assert_eq!(*op_a, BinaryOp::And);
            assert_eq!(*op_b, BinaryOp::And);
        }
        other => panic!("expected binary nodes, got {:?}", other),
    }
}

#[test]
fn identifiers_may_reuse_operator_words() {
    // "matches" only becomes an operator when a rule asks for one
    let expr = Parser::new("matches").unwrap().parse().unwrap();
    assert!(matches!(expr.kind, ExprKind::Property { ref name, safe: false } if name == "matches"));
}

#[test]
fn t_and_new_as_map_keys() {
    let expr = Parser::new("{T:1}").unwrap().parse().unwrap();
    match &expr.kind {
        ExprKind::InlineMap(entries) => {
            assert!(matches!(entries[0].0.kind, ExprKind::Property { ref name, .. } if name == "T"));
        }
        other => panic!("expected inline map, got {:?}", other),
    }
}
