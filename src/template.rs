use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::ast::Expr;
use crate::error::{ErrorCode, ParseError};
use crate::parser::Parser;

/// Delimiters marking embedded expressions inside template text.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateContext {
    pub prefix: String,
    pub suffix: String,
}

impl TemplateContext {
    pub fn new<P: Into<String>, S: Into<String>>(prefix: P, suffix: S) -> Self {
        Self { prefix: prefix.into(), suffix: suffix.into() }
    }
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self::new("#{", "}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Fragment {
    Literal(String),
    /// Parsed embedded expression; spans are relative to the text between
    /// its delimiters.
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum Body {
    Literal(String),
    Ast(Expr),
    Composite(Vec<Fragment>),
}

/// A parse result paired with the source text it came from. Immutable
/// once built; the source is retained for diagnostics and Display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    source: String,
    body: Body,
}

impl Expression {
    pub(crate) fn from_literal(text: &str) -> Self {
        Self { source: text.to_string(), body: Body::Literal(text.to_string()) }
    }

    pub(crate) fn from_ast(source: &str, expr: Expr) -> Self {
        Self { source: source.to_string(), body: Body::Ast(expr) }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The AST root, when this is a single parsed expression.
    pub fn ast(&self) -> Option<&Expr> {
        match &self.body {
            Body::Ast(expr) => Some(expr),
            _ => None,
        }
    }

    /// The literal text, when no embedded expression was found.
    pub fn literal_text(&self) -> Option<&str> {
        match &self.body {
            Body::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// The ordered fragments of a mixed literal/expression template.
    pub fn fragments(&self) -> Option<&[Fragment]> {
        match &self.body {
            Body::Composite(fragments) => Some(fragments),
            _ => None,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse a non-template expression, wrapped with its source.
pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
    let expr = Parser::new(input)?.parse()?;
    Ok(Expression::from_ast(input, expr))
}

/// Parse template text with the default `#{`/`}` delimiters.
pub fn parse_template(input: &str) -> Result<Expression, ParseError> {
    parse_template_with(input, &TemplateContext::default())
}

/// Parse template text: literal spans stay literal, each prefix/suffix
/// pair is parsed as an expression. A single expression with no
/// surrounding literal text is returned directly.
pub fn parse_template_with(input: &str, context: &TemplateContext) -> Result<Expression, ParseError> {
    if input.is_empty() {
        return Ok(Expression::from_literal(""));
    }
    let mut fragments = split_fragments(input, context)?;
    if fragments.len() == 1 {
        return Ok(match fragments.remove(0) {
            Fragment::Expr(expr) => Expression::from_ast(input, expr),
            Fragment::Literal(text) => Expression {
                source: input.to_string(),
                body: Body::Literal(text),
            },
        });
    }
    Ok(Expression { source: input.to_string(), body: Body::Composite(fragments) })
}

fn split_fragments(source: &str, context: &TemplateContext) -> Result<Vec<Fragment>, ParseError> {
    let bytes = source.as_bytes();
    let prefix = context.prefix.as_bytes();
    let suffix = context.suffix.as_bytes();
    let mut fragments = Vec::new();
    let mut cursor = 0usize;
    while cursor < bytes.len() {
        let prefix_pos = match find_subslice(bytes, prefix, cursor) {
            Some(pos) => pos,
            None => {
                fragments.push(Fragment::Literal(source[cursor..].to_string()));
                break;
            }
        };
        if prefix_pos > cursor {
            fragments.push(Fragment::Literal(source[cursor..prefix_pos].to_string()));
        }
        let body_start = prefix_pos + prefix.len();
        let suffix_pos = skip_to_suffix(source, body_start, prefix_pos, context)?;
        let body = source[body_start..suffix_pos].trim();
        if body.is_empty() {
            return Err(ParseError::new(
                ErrorCode::NoExpressionWithinDelimiter,
                prefix_pos,
                format!(
                    "no expression defined within delimiter '{}{}'",
                    context.prefix, context.suffix
                ),
            ));
        }
        let expr = Parser::new(body)?.parse()?;
        fragments.push(Fragment::Expr(expr));
        cursor = suffix_pos + suffix.len();
    }
    Ok(fragments)
}

fn find_subslice(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

fn find_byte(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    (from..haystack.len()).find(|&i| haystack[i] == needle)
}

/// Locate the suffix matching the prefix at `prefix_pos`, starting the
/// scan at `from`. A suffix candidate counts only while no bracket is
/// open, so nested delimiter text binds to its own bracket and the
/// outermost prefix pairs with the last unmatched suffix. Quoted runs
/// are skipped without inspection.
fn skip_to_suffix(
    source: &str,
    from: usize,
    prefix_pos: usize,
    context: &TemplateContext,
) -> Result<usize, ParseError> {
    let bytes = source.as_bytes();
    let suffix = context.suffix.as_bytes();
    // (expected closing bracket, position of the opener)
    let mut stack: Vec<(u8, usize)> = Vec::new();
    let mut pos = from;
    while pos < bytes.len() {
        if stack.is_empty()
            && pos + suffix.len() <= bytes.len()
            && &bytes[pos..pos + suffix.len()] == suffix
        {
            return Ok(pos);
        }
        match bytes[pos] {
            b'(' => stack.push((b')', pos)),
            b'[' => stack.push((b']', pos)),
            b'{' => stack.push((b'}', pos)),
            ch @ (b')' | b']' | b'}') => match stack.pop() {
                None => {
                    return Err(ParseError::new(
                        ErrorCode::UnmatchedCloseBracket,
                        pos,
                        format!("unexpected closing '{}'", ch as char),
                    ))
                }
                Some((expected, _)) if expected != ch => {
                    return Err(ParseError::new(
                        ErrorCode::UnmatchedCloseBracket,
                        pos,
                        format!("unexpected closing '{}': expected '{}'", ch as char, expected as char),
                    ))
                }
                Some(_) => {}
            },
            quote @ (b'\'' | b'"') => match find_byte(bytes, quote, pos + 1) {
                Some(close) => pos = close,
                None => {
                    return Err(ParseError::new(
                        ErrorCode::NonTerminatingQuotedString,
                        pos,
                        "non-terminating quoted string in template",
                    ))
                }
            },
            _ => {}
        }
        pos += 1;
    }
    if let Some((expected, open_pos)) = stack.pop() {
        return Err(ParseError::new(
            ErrorCode::MissingCloseBracket,
            open_pos,
            format!("missing closing '{}'", expected as char),
        ));
    }
    Err(ParseError::new(
        ErrorCode::MissingTemplateSuffix,
        prefix_pos,
        format!(
            "no ending suffix '{}' for expression starting at position {}",
            context.suffix, prefix_pos
        ),
    ))
}

#[test]
fn suffix_inside_quotes_is_inert() {
    let result = parse_template_with("a${'}'}b", &TemplateContext::new("${", "}")).unwrap();
    let fragments = result.fragments().unwrap();
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[0], Fragment::Literal("a".to_string()));
    assert_eq!(fragments[2], Fragment::Literal("b".to_string()));
}

#[test]
fn nested_brackets_bind_outer_prefix_to_last_suffix() {
    // the '{' of the inner list opens a bracket, so the first '}' closes
    // it and the final '}' is the real suffix
    let result = parse_template_with("${{1,2}[0]}", &TemplateContext::new("${", "}")).unwrap();
    let expr = result.ast().expect("single expression fragment");
    match &expr.kind {
        crate::ast::ExprKind::Compound(pieces) => {
            assert!(matches!(pieces[0].kind, crate::ast::ExprKind::InlineList(_)));
            assert!(matches!(pieces[1].kind, crate::ast::ExprKind::Indexer(_)));
        }
        other => panic!("expected compound, got {:?}", other),
    }
}

#[test]
fn empty_template_is_empty_literal() {
    let result = parse_template("").unwrap();
    assert_eq!(result.literal_text(), Some(""));
}
