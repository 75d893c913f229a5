// ABOUTME: Parser turning the token stream into cons-cell s-expression trees

use crate::error::SchemeError;
use crate::lexer::{lex, Token, TokenKind};
use crate::value::Value;

/// Cursor over the lexed token stream
struct TokenStream<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> TokenStream<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index);
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }
}

/// Parse a whole program into its top-level s-expressions, in order
pub fn parse_program(source: &str) -> Result<Vec<Value>, SchemeError> {
    let tokens = lex(source)?;
    let mut stream = TokenStream {
        tokens: &tokens,
        index: 0,
    };

    let mut forms = Vec::new();
    while !stream.at_end() {
        forms.push(parse_expression(&mut stream)?);
    }
    Ok(forms)
}

/// Parse a source string expected to hold exactly one expression
pub fn parse(source: &str) -> Result<Value, SchemeError> {
    let mut forms = parse_program(source)?;
    match forms.len() {
        1 => Ok(forms.remove(0)),
        0 => Err(SchemeError::syntax("unexpected end of input")),
        _ => Err(SchemeError::syntax("expected a single expression")),
    }
}

fn parse_expression(stream: &mut TokenStream) -> Result<Value, SchemeError> {
    let token = stream
        .next()
        .ok_or_else(|| SchemeError::syntax("unexpected end of input"))?;

    match &token.kind {
        TokenKind::LeftParen => parse_list_tail(stream, token),
        TokenKind::RightParen => Err(syntax_at("unexpected ')'", token)),

        TokenKind::Quote => parse_sugar(stream, token, "quote"),
        TokenKind::Quasiquote => parse_sugar(stream, token, "quasiquote"),
        TokenKind::Unquote => parse_sugar(stream, token, "unquote"),
        TokenKind::UnquoteSplicing => parse_sugar(stream, token, "unquote-splicing"),

        TokenKind::Symbol(name) => Ok(Value::symbol(name)),
        TokenKind::Integer(n) => Ok(Value::Integer(*n)),
        TokenKind::Float(x) => Ok(Value::Float(*x)),
        TokenKind::Boolean(b) => Ok(Value::Boolean(*b)),
        TokenKind::Character(c) => Ok(Value::Character(*c)),
        TokenKind::String(s) => Ok(Value::string(s.clone())),
    }
}

/// Parse list elements after a consumed '(' up to the matching ')'
fn parse_list_tail(stream: &mut TokenStream, open: &Token) -> Result<Value, SchemeError> {
    let mut items = Vec::new();
    loop {
        match stream.peek() {
            None => return Err(syntax_at("unclosed '('", open)),
            Some(token) if token.kind == TokenKind::RightParen => {
                stream.next();
                return Ok(Value::list(items));
            }
            Some(_) => items.push(parse_expression(stream)?),
        }
    }
}

/// Desugar a reader prefix: 'X => (quote X) and friends
fn parse_sugar(
    stream: &mut TokenStream,
    prefix: &Token,
    keyword: &str,
) -> Result<Value, SchemeError> {
    if stream.at_end() {
        return Err(syntax_at(
            &format!("expected an expression after {keyword} prefix"),
            prefix,
        ));
    }
    let expr = parse_expression(stream)?;
    Ok(Value::list(vec![Value::symbol(keyword), expr]))
}

fn syntax_at(message: &str, token: &Token) -> SchemeError {
    SchemeError::syntax(format!(
        "{} at line {}, column {}",
        message, token.line, token.column
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_atoms() {
        assert!(matches!(parse("42"), Ok(Value::Integer(42))));
        assert!(matches!(parse("2.5"), Ok(Value::Float(x)) if (x - 2.5).abs() < 1e-9));
        assert!(matches!(parse("#t"), Ok(Value::Boolean(true))));
        assert!(matches!(parse("#\\a"), Ok(Value::Character('a'))));
        assert!(matches!(parse("foo"), Ok(Value::Symbol(s)) if &*s == "foo"));

        match parse(r#""hello""#) {
            Ok(Value::String(s)) => assert_eq!(&*s.borrow(), "hello"),
            other => panic!("Expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_list_is_nil() {
        assert!(matches!(parse("()"), Ok(Value::Nil)));
        assert!(matches!(parse("(  )"), Ok(Value::Nil)));
    }

    #[test]
    fn test_parse_proper_list_structure() {
        let list = parse("(1 2 3)").unwrap();
        let items = list.list_elements().expect("proper list");
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], Value::Integer(1)));
        assert!(matches!(items[2], Value::Integer(3)));

        // cons chain is Nil-terminated
        match &list {
            Value::Pair(cell) => assert!(matches!(cell.car, Value::Integer(1))),
            _ => panic!("Expected pair"),
        }
    }

    #[test]
    fn test_parse_nested_list() {
        let expr = parse("(define (square x) (* x x))").unwrap();
        let items = expr.list_elements().unwrap();
        assert_eq!(items.len(), 3);
        assert!(matches!(&items[0], Value::Symbol(s) if &**s == "define"));

        let header = items[1].list_elements().unwrap();
        assert!(matches!(&header[0], Value::Symbol(s) if &**s == "square"));

        let body = items[2].list_elements().unwrap();
        assert!(matches!(&body[0], Value::Symbol(s) if &**s == "*"));
    }

    #[test]
    fn test_parse_quote_sugar() {
        let expr = parse("'x").unwrap();
        let items = expr.list_elements().unwrap();
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[0], Value::Symbol(s) if &**s == "quote"));
        assert!(matches!(&items[1], Value::Symbol(s) if &**s == "x"));
    }

    #[test]
    fn test_parse_quasiquote_sugar() {
        let expr = parse("`(1 ,x ,@xs)").unwrap();
        let items = expr.list_elements().unwrap();
        assert!(matches!(&items[0], Value::Symbol(s) if &**s == "quasiquote"));

        let template = items[1].list_elements().unwrap();
        let unquote = template[1].list_elements().unwrap();
        assert!(matches!(&unquote[0], Value::Symbol(s) if &**s == "unquote"));
        let splice = template[2].list_elements().unwrap();
        assert!(matches!(&splice[0], Value::Symbol(s) if &**s == "unquote-splicing"));
    }

    #[test]
    fn test_parse_program_multiple_forms() {
        let forms = parse_program("(define x 1) (+ x 2)").unwrap();
        assert_eq!(forms.len(), 2);
    }

    #[test]
    fn test_parse_program_empty() {
        assert!(parse_program("").unwrap().is_empty());
        assert!(parse_program("; only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_unclosed_list() {
        let result = parse("(1 2");
        match result {
            Err(SchemeError::Syntax { message }) => assert!(message.contains("unclosed")),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_stray_close() {
        let result = parse(")");
        match result {
            Err(SchemeError::Syntax { message }) => {
                assert!(message.contains("unexpected ')'"));
                assert!(message.contains("line 1, column 1"));
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_dangling_quote() {
        assert!(matches!(parse("'"), Err(SchemeError::Syntax { .. })));
    }

    #[test]
    fn test_parse_roundtrip_through_printer() {
        for source in ["(+ 1 2.5 (quote x))", "(a (b c) \"s\" #\\a #t ())", "(1 . 2)"] {
            let first = parse(source).unwrap();
            let printed = first.to_string();
            let second = parse(&printed).unwrap();
            assert_eq!(printed, second.to_string());
        }
    }
}
