//! Recursive-descent parser for the declaration subset the generator reads:
//! struct types and the distinguished interface. Everything else at the top
//! level is skipped.

use miette::SourceSpan;
use tracing::debug;

use super::lexer::{Lexed, Token, TokenKind, tokenize};
use crate::error::{Result, SourceContext};
use crate::method::MethodSignature;
use crate::record::{Field, RecordType};
use crate::vocab::TypeVocabulary;

/// Declarations found in one file.
#[derive(Debug, Default)]
pub struct FileDecls {
    pub records: Vec<RecordType>,
    /// Methods of the distinguished interface, if the file declares it.
    pub interface: Option<Vec<MethodSignature>>,
}

pub fn parse_file(ctx: &SourceContext, vocab: &TypeVocabulary) -> Result<FileDecls> {
    let lexed = tokenize(ctx)?;
    let mut parser = Parser {
        ctx,
        vocab,
        lexed,
        pos: 0,
        decls: FileDecls::default(),
    };
    parser.file()?;
    Ok(parser.decls)
}

struct Parser<'a> {
    ctx: &'a SourceContext,
    vocab: &'a TypeVocabulary,
    lexed: Lexed,
    pos: usize,
    decls: FileDecls,
}

/// One comma-separated entry of a parameter list before names are resolved.
struct ParamEntry {
    name: Option<String>,
    ty: String,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        let last = self.lexed.tokens.len() - 1;
        &self.lexed.tokens[self.pos.min(last)]
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.lexed.tokens.len() - 1;
        &self.lexed.tokens[(self.pos + n).min(last)]
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at_semi(&self) -> bool {
        self.peek().kind == TokenKind::Semi
    }

    fn skip_semis(&mut self) {
        while self.at_semi() {
            self.next();
        }
    }

    fn unexpected(&self, expected: &str) -> Box<crate::ExtractError> {
        let token = self.peek();
        self.ctx.syntax_error(
            format!("expected {}, found {}", expected, token.describe()),
            token.span(),
        )
    }

    fn expect_punct(&mut self, c: char) -> Result<Token> {
        if self.peek().is_punct(c) {
            Ok(self.next())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Token)> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                Ok((name, self.next()))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Require a statement terminator unless a closing `close` follows.
    fn expect_terminator(&mut self, close: char) -> Result<()> {
        if self.at_semi() {
            self.next();
            Ok(())
        } else if self.peek().is_punct(close) {
            Ok(())
        } else {
            Err(self.unexpected("end of declaration"))
        }
    }

    fn span_from(&self, start: &Token) -> SourceSpan {
        let end = self.lexed.tokens[self.pos.saturating_sub(1)].offset
            + self.lexed.tokens[self.pos.saturating_sub(1)].len;
        (start.offset, end.saturating_sub(start.offset).max(1)).into()
    }

    fn file(&mut self) -> Result<()> {
        self.skip_semis();
        if !self.peek().is_ident("package") {
            return Err(self.unexpected("package clause"));
        }
        self.skip_statement()?;

        loop {
            self.skip_semis();
            let token = self.peek().clone();
            match &token.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Ident(word) => match word.as_str() {
                    "type" => {
                        self.next();
                        self.type_decl()?;
                    }
                    "import" | "func" | "var" | "const" => self.skip_statement()?,
                    _ => return Err(self.unexpected("top-level declaration")),
                },
                _ => return Err(self.unexpected("top-level declaration")),
            }
        }
    }

    /// Consume tokens through the next terminator outside any brackets.
    fn skip_statement(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| self.ctx.syntax_error("unbalanced bracket", token.span()))?;
                }
                TokenKind::Semi if depth == 0 => return Ok(()),
                TokenKind::Eof if depth == 0 => return Ok(()),
                TokenKind::Eof => {
                    return Err(self
                        .ctx
                        .syntax_error("unexpected end of file", token.span()));
                }
                _ => {}
            }
        }
    }

    /// Consume a type spec body up to (not including) a terminator or the
    /// closing paren of a grouped declaration.
    fn skip_type_spec(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Semi | TokenKind::Punct(')') if depth == 0 => return Ok(()),
                TokenKind::Eof => {
                    return Err(self
                        .ctx
                        .syntax_error("unexpected end of file", token.span()));
                }
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next();
        }
    }

    fn type_decl(&mut self) -> Result<()> {
        if self.peek().is_punct('(') {
            self.next();
            loop {
                self.skip_semis();
                if self.peek().is_punct(')') {
                    self.next();
                    return Ok(());
                }
                self.type_spec()?;
                self.expect_terminator(')')?;
            }
        }
        self.type_spec()?;
        self.expect_terminator('}')
    }

    fn type_spec(&mut self) -> Result<()> {
        let (name, name_token) = self.expect_ident()?;

        if self.peek().is_punct('[') && self.is_type_parameter_list() {
            let start = self.peek().clone();
            self.skip_brackets('[', ']')?;
            return Err(self
                .ctx
                .unsupported_type_error("generic", self.span_from(&start)));
        }

        if self.peek().is_punct('=') {
            debug!(name, "skipping type alias");
            return self.skip_type_spec();
        }

        if self.peek().is_ident("struct") {
            self.next();
            let record = self.struct_body(&name)?;
            debug!(name, fields = record.fields.len(), "found record type");
            self.decls.records.push(record);
            return Ok(());
        }

        if self.peek().is_ident("interface") && name == self.vocab.self_type() {
            self.next();
            let methods = self.interface_body(&name)?;
            debug!(name, methods = methods.len(), "found interface");
            if self.decls.interface.is_some() {
                return Err(self
                    .ctx
                    .duplicate_error("type", name, self.ctx.filename(), name_token.span()));
            }
            self.decls.interface = Some(methods);
            return Ok(());
        }

        self.skip_type_spec()
    }

    /// `[T any]` after a type name, as opposed to an array length.
    fn is_type_parameter_list(&self) -> bool {
        matches!(self.peek_nth(1).kind, TokenKind::Ident(_))
            && !self.peek_nth(2).is_punct(']')
    }

    fn skip_brackets(&mut self, open: char, close: char) -> Result<()> {
        self.expect_punct(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next();
            match token.kind {
                TokenKind::Punct(c) if c == open => depth += 1,
                TokenKind::Punct(c) if c == close => depth -= 1,
                TokenKind::Eof => {
                    return Err(self
                        .ctx
                        .syntax_error("unexpected end of file", token.span()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn struct_body(&mut self, name: &str) -> Result<RecordType> {
        self.expect_punct('{')?;
        let mut record = RecordType::new(name);

        loop {
            self.skip_semis();
            if self.peek().is_punct('}') {
                self.next();
                return Ok(record);
            }

            let start = self.peek().clone();
            let (names, ty) = self.field_decl()?;
            let tag = match &self.peek().kind {
                TokenKind::Str(tag) => {
                    let tag = tag.clone();
                    self.next();
                    Some(tag)
                }
                _ => None,
            };
            self.expect_terminator('}')?;

            for field_name in names {
                if record.has_field(&field_name) {
                    return Err(self.ctx.duplicate_error(
                        "field",
                        field_name,
                        name,
                        self.span_from(&start),
                    ));
                }
                let mut field = Field::new(field_name, ty.clone());
                field.tag = tag.clone();
                record.fields.push(field);
            }
        }
    }

    /// Field names plus their shared type. Embedded fields are named after
    /// the last segment of their type.
    fn field_decl(&mut self) -> Result<(Vec<String>, String)> {
        let embedded = self.peek().is_punct('*')
            || matches!(self.peek_nth(1).kind, TokenKind::Semi | TokenKind::Str(_))
            || self.peek_nth(1).is_punct('.')
            || self.peek_nth(1).is_punct('}');

        if embedded {
            let ty = self.type_expr()?;
            let name = ty
                .trim_start_matches('*')
                .rsplit('.')
                .next()
                .unwrap_or(&ty)
                .to_string();
            return Ok((vec![name], ty));
        }

        let mut names = vec![self.expect_ident()?.0];
        while self.peek().is_punct(',') {
            self.next();
            names.push(self.expect_ident()?.0);
        }
        let ty = self.type_expr()?;
        Ok((names, ty))
    }

    fn interface_body(&mut self, name: &str) -> Result<Vec<MethodSignature>> {
        self.expect_punct('{')?;
        let mut methods: Vec<MethodSignature> = Vec::new();

        loop {
            self.skip_semis();
            if self.peek().is_punct('}') {
                self.next();
                return Ok(methods);
            }

            let (method_name, name_token) = self.expect_ident()?;
            if !self.peek().is_punct('(') {
                debug!(interface = name, embedded = method_name, "skipping embedded interface");
                self.skip_type_spec_in_block()?;
                continue;
            }

            if methods.iter().any(|m| m.name == method_name) {
                return Err(self
                    .ctx
                    .duplicate_error("method", method_name, name, name_token.span()));
            }

            let mut method = MethodSignature::new(&method_name);
            for line in self.doc_block(name_token.line) {
                method = method.with_doc(line);
            }

            for entry in self.param_list(true)? {
                method = method.with_param(entry.name.unwrap_or_default(), entry.ty);
            }
            for result in self.results()? {
                method = method.with_return(result);
            }
            self.expect_terminator('}')?;

            methods.push(method.resolve(self.vocab));
        }
    }

    fn skip_type_spec_in_block(&mut self) -> Result<()> {
        while !self.at_semi() && !self.peek().is_punct('}') {
            if self.peek().kind == TokenKind::Eof {
                return Err(self.unexpected("'}'"));
            }
            self.next();
        }
        Ok(())
    }

    /// The contiguous run of own-line `//` comments ending directly above
    /// `line`.
    fn doc_block(&self, line: usize) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current = line;
        while current > 1 {
            match self.lexed.line_comments.get(&(current - 1)) {
                Some(text) => docs.push(text.clone()),
                None => break,
            }
            current -= 1;
        }
        docs.reverse();
        docs
    }

    /// Parse `( ... )`. With `positional_names`, unnamed entries are named
    /// `p0`, `p1`, ...
    fn param_list(&mut self, positional_names: bool) -> Result<Vec<ParamEntry>> {
        self.expect_punct('(')?;
        let mut entries = Vec::new();

        while !self.peek().is_punct(')') {
            entries.push(self.param_entry()?);
            if self.peek().is_punct(',') {
                self.next();
                // trailing comma before a line break
                self.skip_semis();
            } else {
                self.skip_semis();
                if !self.peek().is_punct(')') {
                    return Err(self.unexpected("',' or ')'"));
                }
            }
        }
        self.next();

        if entries.iter().any(|e| e.name.is_some()) {
            // `a, b int64`: bare entries before a named one are names sharing
            // the following type.
            let mut resolved = Vec::with_capacity(entries.len());
            let mut pending: Vec<String> = Vec::new();
            for entry in entries {
                match entry.name {
                    None => pending.push(entry.ty),
                    Some(name) => {
                        for pending_name in pending.drain(..) {
                            resolved.push(ParamEntry {
                                name: Some(pending_name),
                                ty: entry.ty.clone(),
                            });
                        }
                        resolved.push(ParamEntry {
                            name: Some(name),
                            ty: entry.ty,
                        });
                    }
                }
            }
            if let Some(dangling) = pending.first() {
                let token = self.lexed.tokens[self.pos.saturating_sub(1)].clone();
                return Err(self.ctx.syntax_error(
                    format!("parameter '{}' is missing a type", dangling),
                    token.span(),
                ));
            }
            return Ok(resolved);
        }

        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| ParamEntry {
                name: positional_names.then(|| format!("p{}", i)),
                ty: entry.ty,
            })
            .collect())
    }

    fn param_entry(&mut self) -> Result<ParamEntry> {
        let named = matches!(self.peek().kind, TokenKind::Ident(_)) && self.starts_type(1);
        if named {
            let (name, _) = self.expect_ident()?;
            let ty = self.type_expr()?;
            return Ok(ParamEntry {
                name: Some(name),
                ty,
            });
        }
        Ok(ParamEntry {
            name: None,
            ty: self.type_expr()?,
        })
    }

    /// Whether the token `n` ahead can begin a type expression.
    fn starts_type(&self, n: usize) -> bool {
        match self.peek_nth(n).kind {
            TokenKind::Ident(_) | TokenKind::Punct('*' | '[' | '(' | '<') => true,
            TokenKind::Punct('.') => self.is_ellipsis(n),
            _ => false,
        }
    }

    /// `...` starting `n` tokens ahead.
    fn is_ellipsis(&self, n: usize) -> bool {
        (n..n + 3).all(|i| self.peek_nth(i).is_punct('.'))
    }

    fn results(&mut self) -> Result<Vec<String>> {
        if self.peek().is_punct('(') {
            return Ok(self
                .param_list(false)?
                .into_iter()
                .map(|entry| entry.ty)
                .collect());
        }
        if self.at_semi() || self.peek().is_punct('}') {
            return Ok(Vec::new());
        }
        Ok(vec![self.type_expr()?])
    }

    /// Parse a type expression and render it back as canonical text.
    fn type_expr(&mut self) -> Result<String> {
        let start = self.peek().clone();
        match start.kind.clone() {
            TokenKind::Punct('*') => {
                self.next();
                Ok(format!("*{}", self.type_expr()?))
            }
            TokenKind::Punct('(') => {
                self.next();
                let inner = self.type_expr()?;
                self.expect_punct(')')?;
                Ok(inner)
            }
            TokenKind::Punct('[') => {
                self.next();
                let len = match &self.peek().kind {
                    TokenKind::Punct(']') => String::new(),
                    TokenKind::Literal(len) | TokenKind::Ident(len) => {
                        let len = len.clone();
                        self.next();
                        len
                    }
                    _ => return Err(self.unexpected("array length or ']'")),
                };
                self.expect_punct(']')?;
                Ok(format!("[{}]{}", len, self.type_expr()?))
            }
            TokenKind::Punct('<') => {
                self.skip_type_tokens();
                Err(self
                    .ctx
                    .unsupported_type_error("channel", self.span_from(&start)))
            }
            TokenKind::Punct('.') if self.is_ellipsis(0) => {
                self.next();
                self.next();
                self.next();
                let _ = self.type_expr();
                Err(self
                    .ctx
                    .unsupported_type_error("variadic", self.span_from(&start)))
            }
            TokenKind::Ident(word) => match word.as_str() {
                "map" => {
                    self.next();
                    self.expect_punct('[')?;
                    let key = self.type_expr()?;
                    self.expect_punct(']')?;
                    Ok(format!("map[{}]{}", key, self.type_expr()?))
                }
                "interface" => {
                    self.next();
                    self.skip_brackets('{', '}')?;
                    Ok("interface{}".to_string())
                }
                "struct" | "func" | "chan" => {
                    self.next();
                    self.skip_type_tokens();
                    let kind = match word.as_str() {
                        "struct" => "anonymous struct",
                        "func" => "function",
                        _ => "channel",
                    };
                    Err(self.ctx.unsupported_type_error(kind, self.span_from(&start)))
                }
                _ => {
                    self.next();
                    let mut name = word;
                    if self.peek().is_punct('.') {
                        self.next();
                        let (selector, _) = self.expect_ident()?;
                        name = format!("{}.{}", name, selector);
                    }
                    if self.peek().is_punct('[') {
                        self.skip_brackets('[', ']')?;
                        return Err(self
                            .ctx
                            .unsupported_type_error("generic", self.span_from(&start)));
                    }
                    Ok(name)
                }
            },
            _ => Err(self.unexpected("type")),
        }
    }

    /// Advance past the rest of an unsupported type so its span covers it.
    fn skip_type_tokens(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return,
                TokenKind::Semi | TokenKind::Str(_) if depth == 0 => return,
                TokenKind::Punct(',' | ')' | '}') if depth == 0 => return,
                TokenKind::Punct('(' | '[' | '{') => depth += 1,
                TokenKind::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next();
        }
    }
}
