// ABOUTME: Tokenizer turning source text into a positioned token stream

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{anychar, char, digit0, digit1, multispace1, one_of},
    combinator::{map_res, recognize, value},
    multi::many0,
    IResult, Parser,
};

use crate::error::SchemeError;

/// Characters that may open a symbol; digits are only allowed after the
/// first character
const SYMBOL_START: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ*+/!?=<>.-";

const SYMBOL_CONTINUE: &str = "*+/!?=<>.-";

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Quote,           // '
    Quasiquote,      // `
    Unquote,         // ,
    UnquoteSplicing, // ,@
    Symbol(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Character(char),
    String(String),
}

/// A token plus the 1-based source position where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

// ============================================================================
// Token Parsers
// ============================================================================

/// Parse a comment (from ; to end of line)
fn line_comment(input: &str) -> IResult<&str, ()> {
    let (input, _) = char(';')(input)?;
    let (input, _) = take_while(|c| c != '\n')(input)?;
    Ok((input, ()))
}

/// Skip whitespace and comments
fn ws_and_comments(input: &str) -> IResult<&str, ()> {
    many0(alt((value((), multispace1), line_comment)))
        .map(|_| ())
        .parse(input)
}

/// Parse a character literal: #\c, with the spelled names #\space and
/// #\newline
fn character_token(input: &str) -> IResult<&str, TokenKind> {
    let (input, _) = tag("#\\")(input)?;

    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("space")(input) {
        return Ok((rest, TokenKind::Character(' ')));
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("newline")(input) {
        return Ok((rest, TokenKind::Character('\n')));
    }

    let (input, c) = anychar(input)?;
    Ok((input, TokenKind::Character(c)))
}

/// Parse the # forms: #t, #f, and character literals
fn hash_token(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::Boolean(true), tag("#t")),
        value(TokenKind::Boolean(false), tag("#f")),
        character_token,
    ))
    .parse(input)
}

/// Parse a floating point literal: a dot with at least one digit on some
/// side (1.5, 1., .5)
fn float_token(input: &str) -> IResult<&str, TokenKind> {
    map_res(
        alt((
            recognize((digit1, char('.'), digit0)),
            recognize((char('.'), digit1)),
        )),
        |text: &str| text.parse::<f64>(),
    )
    .map(TokenKind::Float)
    .parse(input)
}

/// Parse an integer literal as a signed 64-bit value
fn integer_token(input: &str) -> IResult<&str, TokenKind> {
    map_res(digit1, |text: &str| text.parse::<i64>())
        .map(TokenKind::Integer)
        .parse(input)
}

/// Parse a symbol; a lone `.` is itself a symbol (the dotted-tail marker)
fn symbol_token(input: &str) -> IResult<&str, TokenKind> {
    let (input, first) = one_of(SYMBOL_START)(input)?;
    let (input, rest) = take_while::<_, _, nom::error::Error<&str>>(|c: char| {
        c.is_ascii_alphanumeric() || SYMBOL_CONTINUE.contains(c)
    })(input)?;

    let mut name = String::new();
    name.push(first);
    name.push_str(rest);

    Ok((input, TokenKind::Symbol(name)))
}

/// Parse a string literal. `\"` embeds a quote; strings may not span
/// newlines.
fn string_token(input: &str) -> IResult<&str, TokenKind> {
    let (rest, _) = char('"')(input)?;

    let mut content = String::new();
    let mut chars = rest.char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => return Ok((&rest[offset + 1..], TokenKind::String(content))),
            '\n' => break,
            '\\' => match chars.next() {
                Some((_, '"')) => content.push('"'),
                Some((_, other)) => {
                    content.push('\\');
                    content.push(other);
                }
                None => break,
            },
            _ => content.push(c),
        }
    }

    // unterminated or newline-spanning string
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a single token of any kind
fn token_kind(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::LeftParen, char('(')),
        value(TokenKind::RightParen, char(')')),
        value(TokenKind::Quote, char('\'')),
        value(TokenKind::Quasiquote, char('`')),
        value(TokenKind::UnquoteSplicing, tag(",@")),
        value(TokenKind::Unquote, char(',')),
        hash_token,
        string_token,
        float_token,
        integer_token,
        symbol_token,
    ))
    .parse(input)
}

// ============================================================================
// Entry Point
// ============================================================================

/// Tokenize a whole source string, or fail with a lexical error naming the
/// first unrecognisable character and its position.
pub fn lex(source: &str) -> Result<Vec<Token>, SchemeError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        let (after_ws, _) = ws_and_comments(rest).unwrap_or((rest, ()));
        rest = after_ws;
        if rest.is_empty() {
            break;
        }

        let offset = source.len() - rest.len();
        let (line, column) = position_of(source, offset);

        match token_kind(rest) {
            Ok((next, kind)) => {
                tokens.push(Token { kind, line, column });
                rest = next;
            }
            Err(_) => {
                let character = rest.chars().next().unwrap_or('\0');
                return Err(SchemeError::lexical(character, line, column));
            }
        }
    }

    Ok(tokens)
}

/// Convert a byte offset into a 1-based (line, column) pair
fn position_of(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source[..offset];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}
