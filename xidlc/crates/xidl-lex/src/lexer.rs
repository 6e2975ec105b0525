//! The lexer: a token stream over one IDL source.

use std::io::BufRead;

use xidl_util::{Error, Result};

use crate::charbuf::CharBuffer;
use crate::token::{keyword_from_ident, Token, TokenKind};

/// A byte that ends any token when encountered.
fn is_separator(ch: u8) -> bool {
    matches!(
        ch,
        b' ' | b'\t' | b'\r' | b'\n'
            | b','
            | b';'
            | b'{'
            | b'}'
            | b'('
            | b')'
            | b'<'
            | b'>'
            | b'"' // string literal beginning
            | b'/' // comment beginning
            | b':' // scope specifier handled by the identifier path
    )
}

/// Checks that every `:` in the identifier pairs into an internal `::`.
fn valid_identifier(id: &str) -> bool {
    let mut bytes = id.bytes().peekable();

    while let Some(ch) = bytes.next() {
        if ch == b':' {
            if bytes.next() != Some(b':') {
                return false;
            }
            if bytes.peek().is_none() {
                return false;
            }
        }
    }

    true
}

/// Analyzes an input stream and returns tokens one at a time.
/// Supports one token of push-back.
pub struct Lexer {
    buf: CharBuffer,
    filename: String,
    line: u32,
    last: Token,
    pushed_back: bool,
}

impl Lexer {
    /// A lexer reading the given stream, with `filename` used in
    /// diagnostics.
    pub fn new(input: Box<dyn BufRead>, filename: impl Into<String>) -> Self {
        Self {
            buf: CharBuffer::new(input),
            filename: filename.into(),
            line: 1,
            last: Token::new(TokenKind::Eof, 1),
            pushed_back: false,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Next token; `Eof` once the input is exhausted.
    pub fn next(&mut self) -> Token {
        if self.pushed_back {
            self.pushed_back = false;
            return self.last.clone();
        }

        let token = self.scan();
        self.last = token.clone();
        token
    }

    /// Push back the last returned token (capacity one).
    pub fn unget(&mut self) {
        debug_assert!(!self.pushed_back, "double token push-back");
        self.pushed_back = true;
    }

    /// Next token, erroring out on `Invalid` and `Eof`.
    pub fn expect_any(&mut self) -> Result<Token> {
        let token = self.next();
        match token.kind() {
            TokenKind::Invalid => Err(self.invalid(&token)),
            TokenKind::Eof => Err(self.raise("a token is needed", &token)),
            _ => Ok(token),
        }
    }

    /// Next token, which must have the given kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.next();
        if token.kind() != kind {
            return Err(self.mismatch(&token));
        }
        Ok(token)
    }

    /// Next token, which must have one of the two given kinds.
    pub fn expect_any_of(&mut self, first: TokenKind, second: TokenKind) -> Result<Token> {
        let token = self.next();
        if token.kind() != first && token.kind() != second {
            return Err(self.mismatch(&token));
        }
        Ok(token)
    }

    /// Read and discard a token of the given kind.
    pub fn discard(&mut self, kind: TokenKind) -> Result<()> {
        self.expect(kind).map(|_| ())
    }

    /// A syntax diagnostic at the offending token's position.
    pub fn raise(&self, message: impl Into<String>, offending: &Token) -> Error {
        Error::Syntax {
            filename: self.filename.clone(),
            line: offending.line(),
            message: message.into(),
            found: offending.text().to_owned(),
        }
    }

    /// A semantic diagnostic at the offending token's position.
    pub fn raise_semantic(&self, message: impl Into<String>, offending: &Token) -> Error {
        Error::Semantic {
            filename: self.filename.clone(),
            line: offending.line(),
            message: message.into(),
            offending: offending.text().to_owned(),
        }
    }

    fn invalid(&self, offending: &Token) -> Error {
        Error::Lex {
            filename: self.filename.clone(),
            line: offending.line(),
            text: offending.text().to_owned(),
        }
    }

    fn mismatch(&self, token: &Token) -> Error {
        if token.kind() == TokenKind::Invalid {
            self.invalid(token)
        } else {
            self.raise("unexpected token", token)
        }
    }

    fn scan(&mut self) -> Token {
        while let Some(ch) = self.buf.get() {
            match ch {
                b'\n' => self.line += 1,
                b'\r' | b'\t' | b' ' => {}

                b',' => return Token::new(TokenKind::Comma, self.line),
                b';' => return Token::new(TokenKind::Semicolon, self.line),
                b'(' => return Token::new(TokenKind::LParen, self.line),
                b')' => return Token::new(TokenKind::RParen, self.line),
                b'{' => return Token::new(TokenKind::LCurly, self.line),
                b'}' => return Token::new(TokenKind::RCurly, self.line),
                b'<' => return Token::new(TokenKind::LessThan, self.line),
                b'>' => return Token::new(TokenKind::GreaterThan, self.line),

                b'"' => return self.scan_string_literal(),

                b'/' => match self.scan_comment() {
                    Ok(()) => continue,
                    Err(partial) => {
                        return Token::with_text(
                            TokenKind::Invalid,
                            self.line,
                            format!("/{partial}"),
                        )
                    }
                },

                b'1'..=b'9' => {
                    self.buf.unget();
                    return self.scan_positive_integer();
                }

                first => return self.scan_identifier_or_invalid(first),
            }
        }

        Token::new(TokenKind::Eof, self.line)
    }

    /// Reads an invalid run until the next separator.
    fn consume_invalid(&mut self) -> String {
        let mut run = String::new();

        while let Some(ch) = self.buf.get() {
            if is_separator(ch) {
                self.buf.unget();
                break;
            }
            run.push(ch as char);
        }

        run
    }

    /// Reads a string literal whose opening quote is already consumed.
    /// Embedded newlines are allowed; EOF before the closing quote gives
    /// an `Invalid` token holding the partial run.
    fn scan_string_literal(&mut self) -> Token {
        let mut literal = String::new();

        loop {
            match self.buf.get() {
                None => {
                    return Token::with_text(
                        TokenKind::Invalid,
                        self.line,
                        format!("\"{literal}"),
                    )
                }
                Some(b'\n') => {
                    self.line += 1;
                    literal.push('\n');
                }
                Some(b'"') => return Token::with_text(TokenKind::StringLiteral, self.line, literal),
                Some(ch) => literal.push(ch as char),
            }
        }
    }

    /// Skips a comment whose leading `/` is already consumed. Returns the
    /// partial run on a malformed or unterminated comment.
    fn scan_comment(&mut self) -> std::result::Result<(), String> {
        match self.buf.get() {
            Some(b'/') => {
                // Line comment, discard to end of line.
                while let Some(ch) = self.buf.get() {
                    if ch == b'\n' {
                        self.line += 1;
                        break;
                    }
                }
                Ok(())
            }
            Some(b'*') => {
                let mut run = String::from("*");

                while let Some(ch) = self.buf.get() {
                    if ch == b'\n' {
                        self.line += 1;
                    }
                    run.push(ch as char);

                    if ch == b'*' {
                        match self.buf.get() {
                            Some(b'/') => return Ok(()),
                            Some(next) => {
                                if next == b'\n' {
                                    self.line += 1;
                                }
                                run.push(next as char);
                            }
                            None => break,
                        }
                    }
                }

                Err(run)
            }
            Some(other) => Err((other as char).to_string()),
            None => Err(String::new()),
        }
    }

    /// Reads a positive integer, greedily until a separator. A non-digit,
    /// non-separator byte turns the whole run into an `Invalid` token.
    fn scan_positive_integer(&mut self) -> Token {
        let mut digits = String::new();

        while let Some(ch) = self.buf.get() {
            if ch.is_ascii_digit() {
                digits.push(ch as char);
            } else if is_separator(ch) {
                self.buf.unget();
                break;
            } else {
                self.buf.unget();
                let run = format!("{digits}{}", self.consume_invalid());
                return Token::with_text(TokenKind::Invalid, self.line, run);
            }
        }

        match digits.parse::<u32>() {
            Ok(value) => Token::positive_int(self.line, value),
            Err(_) => Token::with_text(TokenKind::Invalid, self.line, digits),
        }
    }

    /// Reads an identifier or keyword whose first byte is already
    /// consumed. A leading digit never reaches this path.
    fn scan_identifier_or_invalid(&mut self, first: u8) -> Token {
        if first.is_ascii_digit() {
            // Only '0' can arrive here; it cannot start an integer.
            let run = format!("{}{}", first as char, self.consume_invalid());
            return Token::with_text(TokenKind::Invalid, self.line, run);
        }

        let mut text = String::new();
        text.push(first as char);

        while let Some(ch) = self.buf.get() {
            if ch.is_ascii_alphanumeric() || ch == b':' {
                text.push(ch as char);
            } else if is_separator(ch) {
                self.buf.unget();
                break;
            } else {
                self.buf.unget();
                let run = format!("{text}{}", self.consume_invalid());
                return Token::with_text(TokenKind::Invalid, self.line, run);
            }
        }

        if let Some(keyword) = keyword_from_ident(&text) {
            Token::new(keyword, self.line)
        } else if valid_identifier(&text) {
            Token::with_text(TokenKind::Identifier, self.line, text)
        } else {
            Token::with_text(TokenKind::Invalid, self.line, text)
        }
    }
}
