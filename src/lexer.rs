use crate::error::{PseudoError, Span};
use crate::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Single-character tokens
    Newline,
    Plus,
    Minus,
    Multiply,
    Divide,
    Power,
    LeftParen,
    RightParen,
    Comma,

    // One or two character tokens
    Equals,
    Equality,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals and words
    Number,
    Identifier,
    Keyword,

    // Special
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            span,
        }
    }
}

/// Reserved words; every other word is an identifier.
pub const KEYWORDS: &[&str] = &["AND", "OR", "NOT"];

pub struct Lexer {
    chars: Vec<char>,
    pos: Position,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: Position::start(),
        }
    }

    /// Tokenize the whole source in one pass. The first lexical error aborts
    /// the scan; no tokens are returned alongside it.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, PseudoError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.current() {
            match c {
                ' ' => self.pos.advance(Some(' ')),
                '\t' => {
                    return Err(PseudoError::invalid_character(
                        Span::single(self.pos),
                        "contains tabs.".to_string(),
                    ));
                }
                '\n' => tokens.push(self.single(TokenType::Newline, '\n')),
                '+' => tokens.push(self.single(TokenType::Plus, '+')),
                '-' => tokens.push(self.single(TokenType::Minus, '-')),
                '*' => tokens.push(self.single(TokenType::Multiply, '*')),
                '/' => tokens.push(self.single(TokenType::Divide, '/')),
                '^' => tokens.push(self.single(TokenType::Power, '^')),
                '(' => tokens.push(self.single(TokenType::LeftParen, '(')),
                ')' => tokens.push(self.single(TokenType::RightParen, ')')),
                ',' => tokens.push(self.single(TokenType::Comma, ',')),
                '=' | '>' | '<' => tokens.push(self.comparator(c)?),
                c if c.is_ascii_digit() => tokens.push(self.number()?),
                c if c.is_alphabetic() || c == '_' => tokens.push(self.word()),
                c => {
                    return Err(PseudoError::invalid_character(
                        Span::single(self.pos),
                        format!("the character '{c}' is not valid."),
                    ));
                }
            }
        }

        tokens.push(Token::new(
            TokenType::Eof,
            String::new(),
            Span::single(self.pos),
        ));

        Ok(tokens)
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos.index).copied()
    }

    fn single(&mut self, token_type: TokenType, c: char) -> Token {
        let start = self.pos;
        self.pos.advance(Some(c));
        Token::new(token_type, c.to_string(), Span::new(start, self.pos))
    }

    /// `=`, `>` and `<` pair with a following `=`; a bare comparator at the
    /// very end of the source has nothing to compare and is rejected.
    fn comparator(&mut self, c: char) -> Result<Token, PseudoError> {
        if self.pos.index + 1 == self.chars.len() {
            return Err(PseudoError::invalid_character(
                Span::single(self.pos),
                format!("can not end line statement with '{c}'"),
            ));
        }

        let start = self.pos;
        self.pos.advance(Some(c));

        if self.current() == Some('=') {
            self.pos.advance(Some('='));
            let token_type = match c {
                '=' => TokenType::Equality,
                '>' => TokenType::GreaterEqual,
                _ => TokenType::LessEqual,
            };
            Ok(Token::new(token_type, format!("{c}="), Span::new(start, self.pos)))
        } else {
            let token_type = match c {
                '=' => TokenType::Equals,
                '>' => TokenType::Greater,
                _ => TokenType::Less,
            };
            Ok(Token::new(token_type, c.to_string(), Span::new(start, self.pos)))
        }
    }

    fn number(&mut self) -> Result<Token, PseudoError> {
        let start = self.pos;
        let mut lexeme = String::new();
        let mut dots = 0;

        while let Some(c) = self.current() {
            if c.is_ascii_digit() {
                lexeme.push(c);
            } else if c == '.' {
                dots += 1;
                lexeme.push(c);
            } else {
                break;
            }
            self.pos.advance(Some(c));
        }

        if dots > 1 {
            return Err(PseudoError::invalid_character(
                Span::new(start, self.pos),
                "number has more than one decimal point.".to_string(),
            ));
        }

        Ok(Token::new(TokenType::Number, lexeme, Span::new(start, self.pos)))
    }

    fn word(&mut self) -> Token {
        let start = self.pos;
        let mut lexeme = String::new();

        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.pos.advance(Some(c));
            } else {
                break;
            }
        }

        let token_type = if KEYWORDS.contains(&lexeme.as_str()) {
            TokenType::Keyword
        } else {
            TokenType::Identifier
        };

        Token::new(token_type, lexeme, Span::new(start, self.pos))
    }
}
