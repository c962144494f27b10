use logos::Logos;

use crate::ast::Location;
use crate::common::error::{Diagnostic, ErrorKind};

/// Token types for MiniJava
///
/// `System.out.println` and `length` are single tokens; `main` is an ordinary
/// identifier. There is no `/` or `%` in the language, which is what makes the
/// trailing `*/` of a nested block comment a lexical error.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    // Keywords
    #[token("class")]
    Class,
    #[token("public")]
    Public,
    #[token("static")]
    Static,
    #[token("void")]
    Void,
    #[token("String")]
    String,
    #[token("return")]
    Return,
    #[token("int")]
    Int,
    #[token("boolean")]
    Boolean,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("System.out.println")]
    Println,
    #[token("length")]
    Length,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("this")]
    This,
    #[token("new")]
    New,

    // Operators
    #[token("=")]
    Assign,
    #[token("||")]
    OrOr,
    #[token("&&")]
    AndAnd,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("!")]
    Bang,

    // Separators
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Literals: integers lex permissively as a digit run; 32-bit range
    // validation is the type checker's job.
    #[regex(r"[0-9]+")]
    Integer,

    // Identifiers start with a letter; a leading underscore matches no rule
    // and surfaces as a lexical error.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Identifier,

    // Comments and whitespace
    #[regex(r"//[^\r\n]*")]
    LineComment,
    // Non-nesting block comment (C-style comment regex)
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 3)]
    BlockComment,
    #[regex(r"[ \t\x0C\r\n]+", priority = 3)]
    Whitespace,
}

impl Token {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Class
                | Token::Public
                | Token::Static
                | Token::Void
                | Token::String
                | Token::Return
                | Token::Int
                | Token::Boolean
                | Token::If
                | Token::Else
                | Token::While
                | Token::Println
                | Token::Length
                | Token::True
                | Token::False
                | Token::This
                | Token::New
        )
    }

    /// Check if this token is trivia the parser never sees
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::LineComment | Token::BlockComment
        )
    }
}

/// Lexical token with location information
#[derive(Debug, Clone)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub location: Location,
}

impl LexicalToken {
    pub fn new(token: Token, lexeme: String, location: Location) -> Self {
        Self { token, lexeme, location }
    }

    /// Get the token type
    pub fn token_type(&self) -> &Token {
        &self.token
    }

    /// Get the lexeme (actual text)
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Get the location
    pub fn location(&self) -> Location {
        self.location
    }

    /// Check if this token matches the given token type
    pub fn is(&self, token_type: &Token) -> bool {
        self.token == *token_type
    }
}

/// Lexer for MiniJava
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    current_line: usize,
    current_column: usize,
    current_offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
            current_line: 1,
            current_column: 1,
            current_offset: 0,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<Result<LexicalToken, Diagnostic>> {
        let token = self.lexer.next()?;
        let lexeme = self.lexer.slice().to_string();
        let location = Location::new(self.current_line, self.current_column, self.current_offset);

        self.update_position(&lexeme);

        match token {
            Ok(token) => Some(Ok(LexicalToken::new(token, lexeme, location))),
            Err(()) => Some(Err(Diagnostic::new(ErrorKind::LexerError(lexeme), location))),
        }
    }

    /// Update the current position based on the lexeme
    fn update_position(&mut self, lexeme: &str) {
        let mut chars = lexeme.chars().peekable();
        while let Some(ch) = chars.next() {
            self.current_offset += ch.len_utf8();
            match ch {
                '\n' => {
                    self.current_line += 1;
                    self.current_column = 1;
                }
                '\r' => {
                    // \r\n counts as one line ending
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        self.current_offset += 1;
                    }
                    self.current_line += 1;
                    self.current_column = 1;
                }
                _ => {
                    self.current_column += 1;
                }
            }
        }
    }

    /// Get all non-trivia tokens from the source
    ///
    /// Whitespace and comments are filtered; the first invalid token aborts
    /// the scan.
    pub fn tokenize(mut self) -> Result<Vec<LexicalToken>, Diagnostic> {
        let mut tokens = Vec::new();

        while let Some(result) = self.next_token() {
            let token = result?;
            if !token.token.is_trivia() {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<LexicalToken, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
