use std::{fmt::Display, iter::Peekable, str::Chars};

use thiserror::Error;

/// Where a token starts.
/// `line` is 1-based; `column` counts the characters of the line consumed up to and including
/// the first character of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Variable(String),
    LeftParen,
    RightParen,
    Not,
    And,
    Or,
    Implies,
    Iff,
    /// End of input
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Variable(name) => write!(f, "{}", name),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Not => write!(f, "!"),
            TokenKind::And => write!(f, "&"),
            TokenKind::Or => write!(f, "|"),
            TokenKind::Implies => write!(f, "->"),
            TokenKind::Iff => write!(f, "<->"),
            TokenKind::End => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

impl Token {
    fn new(kind: TokenKind, pos: Position) -> Self {
        Self { kind, pos }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanErrorKind {
    #[error("expected '-' after '<'")]
    MissingDash,
    #[error("expected '>' after '-'")]
    MissingGreater,
    #[error("variable '{0}' ends with '-'")]
    TrailingDash(String),
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    /// A byte that does not start a valid UTF-8 sequence
    #[error("invalid character '\\x{0:02x}'")]
    InvalidByte(u8),
}

/// A malformed token. Scanning stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pos}: scan error: {kind}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub pos: Position,
}

/// Characters that may appear in a variable name besides ASCII letters and digits.
const VAR_SYMBOLS: [char; 7] = ['-', '_', '.', '[', ']', '$', '@'];

fn is_var_letter(c: char) -> bool {
    c.is_ascii_alphanumeric() || VAR_SYMBOLS.contains(&c)
}

/// Layout characters are the ASCII ones, including vertical tab.
fn is_layout(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Interprets raw input as UTF-8 text.
/// A malformed sequence is reported as an invalid character at its first byte.
pub fn decode(input: &[u8]) -> Result<&str, ScanError> {
    match std::str::from_utf8(input) {
        Ok(text) => Ok(text),
        Err(err) => {
            let valid = &input[..err.valid_up_to()];
            let (line, column) = String::from_utf8_lossy(valid)
                .chars()
                .fold((1, 0), |(line, column), c| {
                    if c == '\n' {
                        (line + 1, 0)
                    } else {
                        (line, column + 1)
                    }
                });
            Err(ScanError {
                kind: ScanErrorKind::InvalidByte(input[err.valid_up_to()]),
                pos: Position::new(line, column + 1),
            })
        }
    }
}

/// Splits a formula into tokens, skipping whitespace and `%` comments.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 0,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn skip_layout(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if is_layout(c) => {
                    self.next_char();
                }
                Some('%') => {
                    // comment until end of line
                    while let Some(c) = self.next_char() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    /// Scans the next token.
    /// Once [`TokenKind::End`] is returned, every further call returns it again.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        self.skip_layout();

        let c = match self.next_char() {
            Some(c) => c,
            // The end of input counts as one more consumed character
            None => {
                return Ok(Token::new(
                    TokenKind::End,
                    Position::new(self.line, self.column + 1),
                ))
            }
        };
        let pos = self.position();
        let err = |kind| Err(ScanError { kind, pos });

        let kind = match c {
            '<' => {
                if self.next_char() != Some('-') {
                    return err(ScanErrorKind::MissingDash);
                }
                if self.next_char() != Some('>') {
                    return err(ScanErrorKind::MissingGreater);
                }
                TokenKind::Iff
            }
            '-' => {
                if self.next_char() != Some('>') {
                    return err(ScanErrorKind::MissingGreater);
                }
                TokenKind::Implies
            }
            '&' => TokenKind::And,
            '|' => TokenKind::Or,
            '!' | '~' => TokenKind::Not,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            c if is_var_letter(c) => {
                let mut name = String::from(c);
                while let Some(c) = self.peek_char().filter(|c| is_var_letter(*c)) {
                    name.push(c);
                    self.next_char();
                }
                if name.ends_with('-') {
                    return err(ScanErrorKind::TrailingDash(name));
                }
                TokenKind::Variable(name)
            }
            c => return err(ScanErrorKind::InvalidCharacter(c)),
        };
        Ok(Token::new(kind, pos))
    }
}
