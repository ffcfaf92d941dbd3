//! Source text to token sequence.
//!
//! Single-pass, no backtracking, shaped after the teacher's own `Lexer`
//! (`iterator: Peekable<Chars>`, `line` tracked by hand) with a `current`
//! index added for lexeme slicing instead of column tracking.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::Reporter;
use crate::token::{Literal, Token, TokenKind};

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    let mut m = HashMap::new();
    m.insert("and", And);
    m.insert("class", Class);
    m.insert("else", Else);
    m.insert("false", False);
    m.insert("for", For);
    m.insert("fun", Fun);
    m.insert("if", If);
    m.insert("nil", Nil);
    m.insert("or", Or);
    m.insert("print", Print);
    m.insert("return", Return);
    m.insert("super", Super);
    m.insert("this", This);
    m.insert("true", True);
    m.insert("var", Var);
    m.insert("while", While);
    m
});

pub struct Lexer<'a> {
    source: &'a [u8],
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole source, reporting every lexical error it finds
    /// instead of stopping at the first one.
    pub fn scan_tokens(mut self, reporter: &mut Reporter) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(reporter);
        }

        self.tokens.push(Token::eof(self.line));
        self.tokens
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current] as char;
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current] as char
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1] as char
        }
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn lexeme(&self) -> String {
        String::from_utf8_lossy(&self.source[self.start..self.current]).into_owned()
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_token_literal(kind, Literal::None);
    }

    fn add_token_literal(&mut self, kind: TokenKind, literal: Literal) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn scan_token(&mut self, reporter: &mut Reporter) {
        let c = self.advance();
        match c {
            ' ' | '\t' | '\r' => {}
            '\n' => self.line += 1,
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => {
                let kind = if self.matches('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            '"' => self.string(reporter),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            other => {
                reporter.error(self.line, format!("Unexpected character '{other}'."));
            }
        }
    }

    fn string(&mut self, reporter: &mut Reporter) {
        let opening_line = self.line;

        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            reporter.error(opening_line, "Unterminated string.");
            return;
        }

        // consume the closing quote
        self.advance();

        let value = String::from_utf8_lossy(&self.source[self.start + 1..self.current - 1])
            .into_owned();
        self.add_token_literal(TokenKind::String, Literal::Str(value));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let value: f64 = self.lexeme().parse().expect("lexed digits must parse");
        self.add_token_literal(TokenKind::Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = self.lexeme();
        let kind = KEYWORDS.get(text.as_str()).copied().unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut reporter = Reporter::new();
        Lexer::new(src)
            .scan_tokens(&mut reporter)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_single_and_double_char_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("!= == <= >= < > ="),
            vec![BangEqual, EqualEqual, LessEqual, GreaterEqual, Less, Greater, Equal, Eof]
        );
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(kinds("var foo = nil;"), vec![Var, Identifier, Equal, Nil, Semicolon, Eof]);
    }

    #[test]
    fn lexes_number_literal() {
        let mut reporter = Reporter::new();
        let tokens = Lexer::new("1.5").scan_tokens(&mut reporter);
        assert_eq!(tokens[0].literal, Literal::Number(1.5));
    }

    #[test]
    fn lexes_multiline_string() {
        let mut reporter = Reporter::new();
        let tokens = Lexer::new("\"a\nb\"").scan_tokens(&mut reporter);
        assert_eq!(tokens[0].literal, Literal::Str("a\nb".to_string()));
        assert!(!reporter.had_error());
    }

    #[test]
    fn unterminated_string_reports_error_and_continues() {
        let mut reporter = Reporter::new();
        let tokens = Lexer::new("\"oops").scan_tokens(&mut reporter);
        assert!(reporter.had_error());
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn unexpected_character_does_not_stop_the_scan() {
        let mut reporter = Reporter::new();
        let tokens = Lexer::new("@ var a = 1;").scan_tokens(&mut reporter);
        assert!(reporter.had_error());
        assert_eq!(tokens[0].kind, TokenKind::Var);
    }

    #[test]
    fn line_comment_consumed_up_to_newline() {
        use TokenKind::*;
        assert_eq!(kinds("// comment\nvar"), vec![Var, Eof]);
    }
}
