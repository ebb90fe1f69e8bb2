use crate::error::LexError;
use crate::token::{Tag, Tok};
use tiger_ast::span::Span;

/// On-demand tokenizer over a fixed source buffer.
///
/// Spaces and tabs are skipped; line breaks and comments are emitted as tokens
/// so that callers see the full lexical structure. A NUL character ends the input.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        match self.src[self.pos..].chars().next() {
            Some('\0') | None => None,
            c => c,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn span(&self, start: usize) -> Span {
        Span {
            start: start as u32,
            end: self.pos as u32,
        }
    }

    /// Token whose text is exactly the source consumed since `start`.
    fn tok(&self, tag: Tag, start: usize) -> Tok {
        Tok::new(tag, &self.src[start..self.pos], self.span(start))
    }

    fn skip_space(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Tok>, LexError> {
        self.skip_space();
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(None);
        };

        let tok = match c {
            ',' => self.tok(Tag::Comma, start),
            ';' => self.tok(Tag::Semi, start),
            '(' => self.tok(Tag::LParen, start),
            ')' => self.tok(Tag::RParen, start),
            '[' => self.tok(Tag::LBracket, start),
            ']' => self.tok(Tag::RBracket, start),
            '{' => self.tok(Tag::LBrace, start),
            '}' => self.tok(Tag::RBrace, start),
            '.' => self.tok(Tag::Dot, start),
            '+' => self.tok(Tag::Plus, start),
            '-' => self.tok(Tag::Minus, start),
            '*' => self.tok(Tag::Star, start),
            '=' => self.tok(Tag::Eq, start),
            '&' => self.tok(Tag::And, start),
            '|' => self.tok(Tag::Or, start),
            ':' => {
                let tag = if self.eat('=') { Tag::Assign } else { Tag::Colon };
                self.tok(tag, start)
            }
            '<' => {
                let tag = if self.eat('=') {
                    Tag::Le
                } else if self.eat('>') {
                    Tag::Ne
                } else {
                    Tag::Lt
                };
                self.tok(tag, start)
            }
            '>' => {
                let tag = if self.eat('=') { Tag::Ge } else { Tag::Gt };
                self.tok(tag, start)
            }
            '/' => {
                if self.eat('*') {
                    self.scan_comment(start)
                } else {
                    self.tok(Tag::Slash, start)
                }
            }
            // \r, \n, \r\n and \n\r are each one line break
            '\r' => {
                self.eat('\n');
                self.tok(Tag::Eol, start)
            }
            '\n' => {
                self.eat('\r');
                self.tok(Tag::Eol, start)
            }
            '"' => self.scan_string(start)?,
            '_' => self.scan_main(start),
            c if c.is_ascii_alphabetic() => self.scan_ident(start),
            c if c.is_ascii_digit() => self.scan_num(start),
            c => Tok::invalid(
                c.to_string(),
                self.span(start),
                LexError::InvalidCharacter { ch: c, offset: start },
            ),
        };

        tracing::trace!(token = %tok, "lexed");
        Ok(Some(tok))
    }

    /// Drains the lexer.
    pub fn all_tokens(&mut self) -> Result<Vec<Tok>, LexError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        tracing::debug!(count = tokens.len(), bytes = self.pos, "tokenized source");
        Ok(tokens)
    }

    fn scan_ident(&mut self, start: usize) -> Tok {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        let tag = Tag::keyword(text).unwrap_or(Tag::Ident);
        self.tok(tag, start)
    }

    /// `_` may only start the reserved `_main`. Stops at the first mismatch
    /// without giving back what it consumed.
    fn scan_main(&mut self, start: usize) -> Tok {
        for want in "main".chars() {
            if !self.eat(want) {
                let text = self.src[start..self.pos].to_string();
                return Tok::invalid(
                    text.clone(),
                    self.span(start),
                    LexError::MalformedIdent {
                        text,
                        offset: start,
                    },
                );
            }
        }
        self.tok(Tag::Ident, start)
    }

    fn scan_num(&mut self, start: usize) -> Tok {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        self.tok(Tag::Num, start)
    }

    /// Runs to the first `*/`; comments do not nest.
    fn scan_comment(&mut self, start: usize) -> Tok {
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return self.tok(Tag::Comment, start);
                }
                Some(_) => {}
                None => {
                    return Tok::invalid(
                        &self.src[start..self.pos],
                        self.span(start),
                        LexError::UnterminatedComment { offset: start },
                    );
                }
            }
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<Tok, LexError> {
        let mut s = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Ok(Tok::invalid(
                    format!("\"{s}"),
                    self.span(start),
                    LexError::UnterminatedString { offset: start },
                ));
            };
            match c {
                '"' => break,
                '\\' => {
                    let esc_at = self.pos - 1;
                    let Some(esc) = self.bump() else {
                        return Ok(Tok::invalid(
                            format!("\"{s}"),
                            self.span(start),
                            LexError::UnterminatedString { offset: start },
                        ));
                    };
                    let real = match esc {
                        'a' => '\x07',
                        'b' => '\x08',
                        'f' => '\x0c',
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'v' => '\x0b',
                        'x' => self.hex_escape()?,
                        '0'..='9' => self.octal_escape(esc, esc_at + 1)?,
                        '\\' | '"' => esc,
                        other => {
                            s.push(other);
                            return Ok(Tok::invalid(
                                s,
                                self.span(start),
                                LexError::UnknownEscape {
                                    escape: other,
                                    offset: esc_at,
                                },
                            ));
                        }
                    };
                    s.push(real);
                }
                c => s.push(c),
            }
        }
        Ok(Tok::new(Tag::Str, s, self.span(start)))
    }

    /// `\xHH`: exactly two hex digits.
    fn hex_escape(&mut self) -> Result<char, LexError> {
        let mut value = 0u32;
        for _ in 0..2 {
            let offset = self.pos;
            let found = self.bump().unwrap_or('\0');
            let digit = found
                .to_digit(16)
                .ok_or(LexError::BadHexDigit { found, offset })?;
            value = value * 16 + digit;
        }
        Ok(char::from(value as u8))
    }

    /// `\NNN`: the leading digit plus two more, all octal. Wraps to a byte.
    fn octal_escape(&mut self, first: char, first_at: usize) -> Result<char, LexError> {
        let digit = |found: char, offset: usize| {
            found
                .to_digit(8)
                .ok_or(LexError::BadOctalDigit { found, offset })
        };
        let mut value = digit(first, first_at)?;
        for _ in 0..2 {
            let offset = self.pos;
            let found = self.bump().unwrap_or('\0');
            value = value * 8 + digit(found, offset)?;
        }
        Ok(char::from((value & 0xff) as u8))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Tok, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
