//! Tokenizer for Go declaration text.
//!
//! Produces a flat token stream with automatic statement terminators and a
//! side table of `//` comments keyed by line, which the parser consults for
//! method documentation.

use std::collections::BTreeMap;

use miette::SourceSpan;

use crate::error::{Result, SourceContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    /// String literal with quotes removed and escapes resolved.
    Str(String),
    /// Numeric or rune literal, kept as written.
    Literal(String),
    Punct(char),
    /// Explicit `;` or one inserted at a line end.
    Semi,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub len: usize,
    pub line: usize,
}

impl Token {
    pub fn span(&self) -> SourceSpan {
        (self.offset, self.len.max(1)).into()
    }

    pub fn is_ident(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(s) if s == word)
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) => format!("'{}'", s),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Literal(s) => format!("'{}'", s),
            TokenKind::Punct(c) => format!("'{}'", c),
            TokenKind::Semi => "end of statement".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// Output of [`tokenize`].
#[derive(Debug, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    /// `//` comments that start their line, keyed by 1-based line number.
    pub line_comments: BTreeMap<usize, String>,
}

struct Lexer<'a> {
    ctx: &'a SourceContext,
    src: &'a str,
    pos: usize,
    line: usize,
    out: Lexed,
    /// Whether a token has been emitted on the current line.
    line_has_token: bool,
}

/// Split `ctx`'s source into tokens.
pub fn tokenize(ctx: &SourceContext) -> Result<Lexed> {
    let mut lexer = Lexer {
        ctx,
        src: ctx.src(),
        pos: 0,
        line: 1,
        out: Lexed::default(),
        line_has_token: false,
    };
    lexer.run()?;
    Ok(lexer.out)
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.out.tokens.push(Token {
            kind,
            offset: start,
            len: self.pos - start,
            line: self.line,
        });
        self.line_has_token = true;
    }

    /// Insert a terminator if the last token on the line can end a statement.
    fn end_line(&mut self) {
        let terminates = self.out.tokens.last().is_some_and(|t| {
            matches!(
                t.kind,
                TokenKind::Ident(_)
                    | TokenKind::Str(_)
                    | TokenKind::Literal(_)
                    | TokenKind::Punct(')')
                    | TokenKind::Punct(']')
                    | TokenKind::Punct('}')
            )
        });
        if terminates && self.line_has_token {
            let offset = self.pos;
            self.out.tokens.push(Token {
                kind: TokenKind::Semi,
                offset,
                len: 0,
                line: self.line,
            });
        }
        self.line_has_token = false;
    }

    fn run(&mut self) -> Result<()> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                '\n' => {
                    self.end_line();
                    self.bump();
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('/') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.block_comment()?,
                '"' => self.interpreted_string()?,
                '`' => self.raw_string()?,
                '\'' => self.rune()?,
                ';' => {
                    self.bump();
                    self.push(TokenKind::Semi, start);
                    self.line_has_token = false;
                }
                c if c.is_alphabetic() || c == '_' => {
                    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                        self.bump();
                    }
                    let word = self.src[start..self.pos].to_string();
                    self.push(TokenKind::Ident(word), start);
                }
                c if c.is_ascii_digit() => {
                    while self
                        .peek()
                        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                    {
                        self.bump();
                    }
                    let lit = self.src[start..self.pos].to_string();
                    self.push(TokenKind::Literal(lit), start);
                }
                c => {
                    self.bump();
                    self.push(TokenKind::Punct(c), start);
                }
            }
        }
        self.end_line();
        let offset = self.pos;
        self.out.tokens.push(Token {
            kind: TokenKind::Eof,
            offset,
            len: 0,
            line: self.line,
        });
        Ok(())
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let own_line = !self.line_has_token;
        while self.peek().is_some_and(|c| c != '\n') {
            self.bump();
        }
        if own_line {
            let text = self.src[start..self.pos].trim_end().to_string();
            self.out.line_comments.insert(self.line, text);
        }
    }

    fn block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        self.bump();
        self.bump();
        loop {
            match self.peek() {
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    return Ok(());
                }
                // A block comment spanning lines acts like a newline.
                Some('\n') => {
                    self.end_line();
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
                None => {
                    return Err(self
                        .ctx
                        .syntax_error("unterminated block comment", (start, 2)));
                }
            }
        }
    }

    fn interpreted_string(&mut self) -> Result<()> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('"') => value.push('"'),
                    Some('\\') => value.push('\\'),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                    None => break,
                },
                Some('\n') | None => {
                    return Err(self
                        .ctx
                        .syntax_error("unterminated string literal", (start, 1)));
                }
                Some(c) => value.push(c),
            }
        }
        self.push(TokenKind::Str(value), start);
        Ok(())
    }

    fn raw_string(&mut self) -> Result<()> {
        let start = self.pos;
        self.bump();
        let body_start = self.pos;
        loop {
            match self.peek() {
                Some('`') => break,
                Some(_) => {
                    self.bump();
                }
                None => {
                    return Err(self
                        .ctx
                        .syntax_error("unterminated raw string literal", (start, 1)));
                }
            }
        }
        let value = self.src[body_start..self.pos].replace('\r', "");
        self.bump();
        self.push(TokenKind::Str(value), start);
        Ok(())
    }

    fn rune(&mut self) -> Result<()> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                Some('\'') => break,
                Some('\\') => {
                    self.bump();
                }
                Some('\n') | None => {
                    return Err(self
                        .ctx
                        .syntax_error("unterminated rune literal", (start, 1)));
                }
                Some(_) => {}
            }
        }
        let lit = self.src[start..self.pos].to_string();
        self.push(TokenKind::Literal(lit), start);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let ctx = SourceContext::new(src, "test.go");
        tokenize(&ctx)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    #[test]
    fn test_semicolon_insertion() {
        assert_eq!(
            kinds("package db\n\ntype X int\n"),
            vec![
                ident("package"),
                ident("db"),
                TokenKind::Semi,
                ident("type"),
                ident("X"),
                ident("int"),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_open_brace() {
        assert_eq!(
            kinds("struct {\n}"),
            vec![
                ident("struct"),
                TokenKind::Punct('{'),
                TokenKind::Punct('}'),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            kinds(r#"`json:"id"` "a\"b""#),
            vec![
                TokenKind::Str("json:\"id\"".to_string()),
                TokenKind::Str("a\"b".to_string()),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comments_recorded() {
        let ctx = SourceContext::new("// first\nX // trailing\n  // third  \n", "test.go");
        let lexed = tokenize(&ctx).unwrap();
        assert_eq!(lexed.line_comments.get(&1).map(String::as_str), Some("// first"));
        assert_eq!(lexed.line_comments.get(&2), None);
        assert_eq!(lexed.line_comments.get(&3).map(String::as_str), Some("// third"));
    }

    #[test]
    fn test_braces_in_strings_are_not_punctuation() {
        let tokens = kinds(r#"x := "{" + '}'"#);
        assert!(!tokens.contains(&TokenKind::Punct('{')));
        assert!(!tokens.contains(&TokenKind::Punct('}')));
    }

    #[test]
    fn test_unterminated_string() {
        let ctx = SourceContext::new("\"abc\n", "bad.go");
        assert!(tokenize(&ctx).is_err());
    }
}
