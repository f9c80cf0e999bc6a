//! Lexer (tokenizer)
//!
//! Produces tokens on demand through the [`TokenSource`] trait. The parser
//! pulls exactly one token at a time and never looks further ahead, so the
//! lexer keeps no token buffer of its own.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token kinds the language knows about.
///
/// `[`, `]`, `.` and `!` are reserved: the lexer produces them but no
/// grammar rule accepts them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Brackets
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]

    // Punctuation
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    Dot,       // .

    // Assignment and comparison
    Eq,    // =
    Bang,  // !
    Lt,    // <
    Gt,    // >
    EqEq,  // ==
    NotEq, // !=
    Le,    // <=
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||

    // Keywords
    If,
    Else,
    While,
    For,
    Return,
    Var,

    // Literals
    BoolLiteral,
    IntLiteral,
    FloatLiteral,
    StringLiteral,

    Ident,

    Eof,
}

impl TokenKind {
    /// Kinds that may begin an expression.
    pub const EXPR_START: [TokenKind; 6] = [
        TokenKind::IntLiteral,
        TokenKind::FloatLiteral,
        TokenKind::BoolLiteral,
        TokenKind::StringLiteral,
        TokenKind::Ident,
        TokenKind::LParen,
    ];
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Var => write!(f, "'var'"),
            TokenKind::BoolLiteral => write!(f, "bool literal"),
            TokenKind::IntLiteral => write!(f, "int literal"),
            TokenKind::FloatLiteral => write!(f, "float literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A token together with the text it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(&self.kind, &self.lexeme))
    }
}

/// Human-readable description of a token for diagnostics.
pub fn describe(kind: &TokenKind, lexeme: &str) -> String {
    match kind {
        TokenKind::Ident => format!("identifier '{}'", lexeme),
        TokenKind::IntLiteral | TokenKind::FloatLiteral | TokenKind::BoolLiteral => {
            format!("{} {}", kind, lexeme)
        }
        TokenKind::StringLiteral => format!("string literal \"{}\"", lexeme),
        _ => kind.to_string(),
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("invalid character at {location}: '{text}'")]
    InvalidCharacter {
        text: String,
        location: SourceLocation,
    },

    #[error("unterminated string literal starting at {location}")]
    UnterminatedString { location: SourceLocation },
}

/// Anything the parser can pull tokens from.
///
/// Once the end of input is reached, every further call returns an
/// [`TokenKind::Eof`] token.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, LexError>;
}

/// Lexer for source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Drain the lexer into a vector ending with the `Eof` token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let loc = self.current_location();
        let start = self.position;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, "$", loc));
        };

        let kind = match ch {
            '"' => return self.string_literal(loc),
            '0'..='9' => return Ok(self.number_literal(start, loc)),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(start, loc)),

            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '=' => self.pick('=', TokenKind::EqEq, TokenKind::Eq),
            '!' => self.pick('=', TokenKind::NotEq, TokenKind::Bang),
            '<' => self.pick('=', TokenKind::Le, TokenKind::Lt),
            '>' => self.pick('=', TokenKind::Ge, TokenKind::Gt),
            '&' if self.peek() == Some('&') => {
                self.advance();
                TokenKind::AndAnd
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                TokenKind::OrOr
            }

            _ => {
                let text: String = self.input[start..].iter().take(10).collect();
                return Err(LexError::InvalidCharacter {
                    text,
                    location: loc,
                });
            }
        };

        Ok(Token::new(kind, self.slice(start), loc))
    }

    /// Consume `next` if it follows and return `double`, else `single`.
    fn pick(&mut self, next: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Parse string literal; the lexeme holds the unescaped contents
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            match ch {
                '"' => return Ok(Token::new(TokenKind::StringLiteral, string, loc)),
                '\\' => {
                    let escaped = self
                        .advance()
                        .ok_or(LexError::UnterminatedString { location: loc })?;
                    string.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                _ => string.push(ch),
            }
        }

        Err(LexError::UnterminatedString { location: loc })
    }

    /// Parse `digits` or `digits.digits*`
    fn number_literal(&mut self, start: usize, loc: SourceLocation) -> Token {
        self.skip_digits();

        if self.peek() == Some('.') {
            self.advance();
            self.skip_digits();
            return Token::new(TokenKind::FloatLiteral, self.slice(start), loc);
        }

        Token::new(TokenKind::IntLiteral, self.slice(start), loc)
    }

    fn identifier_or_keyword(&mut self, start: usize, loc: SourceLocation) -> Token {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let ident = self.slice(start);
        let kind = match ident.as_str() {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "return" => TokenKind::Return,
            "var" => TokenKind::Var,
            "true" | "false" => TokenKind::BoolLiteral,
            _ => TokenKind::Ident,
        };

        Token::new(kind, ident, loc)
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Skip whitespace and `//` comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn slice(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Token, LexError> {
        let token = self.scan()?;
        log::trace!("token {} at {}", token, token.location);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("f(a: int) { return a; }").tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].lexeme, "f");
        assert_eq!(tokens[1].kind, TokenKind::LParen);
        assert_eq!(tokens[2].lexeme, "a");
        assert_eq!(tokens[3].kind, TokenKind::Colon);
        assert_eq!(tokens[4].lexeme, "int");
        assert_eq!(tokens[5].kind, TokenKind::RParen);
        assert_eq!(tokens[6].kind, TokenKind::LBrace);
        assert_eq!(tokens[7].kind, TokenKind::Return);
        assert_eq!(tokens[8].kind, TokenKind::Ident);
        assert_eq!(tokens[9].kind, TokenKind::Semicolon);
        assert_eq!(tokens[10].kind, TokenKind::RBrace);
        assert_eq!(tokens[11].kind, TokenKind::Eof);
    }

    #[test]
    fn test_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("= == ! != < <= > >= && || + - * / [ ] ."),
            vec![
                Eq, EqEq, Bang, NotEq, Lt, Le, Gt, Ge, AndAnd, OrOr, Plus, Minus, Star, Slash,
                LBracket, RBracket, Dot, Eof
            ]
        );
    }

    #[test]
    fn test_literals_and_keywords() {
        let tokens = Lexer::new("var x = 12; 3.25 7. true false while").tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[3].kind, TokenKind::IntLiteral);
        assert_eq!(tokens[3].lexeme, "12");
        assert_eq!(tokens[5].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[5].lexeme, "3.25");
        assert_eq!(tokens[6].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[6].lexeme, "7.");
        assert_eq!(tokens[7].kind, TokenKind::BoolLiteral);
        assert_eq!(tokens[7].lexeme, "true");
        assert_eq!(tokens[8].lexeme, "false");
        assert_eq!(tokens[9].kind, TokenKind::While);
    }

    #[test]
    fn test_string_literal() {
        let tokens = Lexer::new(r#""hello\n\"world\"""#).tokenize().unwrap();

        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, "hello\n\"world\"");
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("var a = 1;\n  // note\n  b").tokenize().unwrap();

        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[5].location, SourceLocation::new(3, 3));
    }

    #[test]
    fn test_eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident);
        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_invalid_character() {
        let err = Lexer::new("var a = 1;\nvar b = a & 2;").tokenize().unwrap_err();

        assert_eq!(
            err,
            LexError::InvalidCharacter {
                text: "& 2;".to_string(),
                location: SourceLocation::new(2, 11),
            }
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"abc").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }
}
