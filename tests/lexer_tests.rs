use mjc::parser::lexer::Token;
use mjc::parser::Lexer;
use mjc::ErrorKind;

#[test]
fn lexer_keywords() {
    let source = "class public static void String return int boolean \
                  if else while System.out.println length true false this new";
    let tokens = Lexer::new(source).tokenize().expect("Failed to tokenize");

    let expected = [
        Token::Class,
        Token::Public,
        Token::Static,
        Token::Void,
        Token::String,
        Token::Return,
        Token::Int,
        Token::Boolean,
        Token::If,
        Token::Else,
        Token::While,
        Token::Println,
        Token::Length,
        Token::True,
        Token::False,
        Token::This,
        Token::New,
    ];
    assert_eq!(tokens.len(), expected.len());
    for (token, expected) in tokens.iter().zip(expected.iter()) {
        assert!(token.is(expected), "{:?} != {:?}", token, expected);
    }
}

#[test]
fn lexer_identifiers() {
    let tokens = Lexer::new("this_is0_anIdentifier andthis but not this")
        .tokenize()
        .expect("Failed to tokenize");

    assert_eq!(tokens.len(), 5);
    assert!(tokens[0].is(&Token::Identifier));
    assert_eq!(tokens[0].lexeme(), "this_is0_anIdentifier");
    assert!(tokens[1].is(&Token::Identifier));
    assert!(tokens[2].is(&Token::Identifier));
    assert!(tokens[3].is(&Token::Identifier));
    assert!(tokens[4].is(&Token::This));
}

#[test]
fn lexer_rejects_leading_underscore() {
    let err = Lexer::new("_invalid_identifier")
        .tokenize()
        .expect_err("leading underscore must not lex");
    assert!(matches!(err.kind, ErrorKind::LexerError(_)));
    assert_eq!((err.line(), err.column()), (1, 1));
}

#[test]
fn lexer_integers() {
    // `022` is one token; `03foo` splits into an integer and an identifier.
    let tokens = Lexer::new("022 263575432 03foo")
        .tokenize()
        .expect("Failed to tokenize");

    assert_eq!(tokens.len(), 4);
    assert!(tokens[0].is(&Token::Integer));
    assert_eq!(tokens[0].lexeme(), "022");
    assert!(tokens[1].is(&Token::Integer));
    assert!(tokens[2].is(&Token::Integer));
    assert_eq!(tokens[2].lexeme(), "03");
    assert!(tokens[3].is(&Token::Identifier));
    assert_eq!(tokens[3].lexeme(), "foo");
}

#[test]
fn lexer_short_tokens() {
    let tokens = Lexer::new("asddf{ds[*+-}]&&bar! ,,(<).=;")
        .tokenize()
        .expect("Failed to tokenize");

    let expected = [
        Token::Identifier,
        Token::LBrace,
        Token::Identifier,
        Token::LBracket,
        Token::Star,
        Token::Plus,
        Token::Minus,
        Token::RBrace,
        Token::RBracket,
        Token::AndAnd,
        Token::Identifier,
        Token::Bang,
        Token::Comma,
        Token::Comma,
        Token::LParen,
        Token::Lt,
        Token::RParen,
        Token::Dot,
        Token::Assign,
        Token::Semicolon,
    ];
    assert_eq!(tokens.len(), expected.len());
    for (token, expected) in tokens.iter().zip(expected.iter()) {
        assert!(token.is(expected), "{:?} != {:?}", token, expected);
    }
}

#[test]
fn lexer_two_char_operators() {
    let tokens = Lexer::new("== != <= >= || &&")
        .tokenize()
        .expect("Failed to tokenize");

    let expected = [
        Token::Eq,
        Token::Ne,
        Token::Le,
        Token::Ge,
        Token::OrOr,
        Token::AndAnd,
    ];
    assert_eq!(tokens.len(), expected.len());
    for (token, expected) in tokens.iter().zip(expected.iter()) {
        assert!(token.is(expected));
    }
}

#[test]
fn lexer_comments() {
    let tokens = Lexer::new("foo/* Hi + there,{]}[ l // * */bar")
        .tokenize()
        .expect("Failed to tokenize");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].lexeme(), "foo");
    assert_eq!(tokens[1].lexeme(), "bar");

    let tokens = Lexer::new("aa/*  \n  A ,, cool multi-\nline\ncomment*/12")
        .tokenize()
        .expect("Failed to tokenize");
    assert_eq!(tokens.len(), 2);
    assert!(tokens[1].is(&Token::Integer));

    // The terminating newline of a line comment is optional at EOF.
    let tokens = Lexer::new("foo // yea man, the end of line is optional")
        .tokenize()
        .expect("Failed to tokenize");
    assert_eq!(tokens.len(), 1);

    let tokens = Lexer::new("foo// but \nthis_is_not_a_comment")
        .tokenize()
        .expect("Failed to tokenize");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].lexeme(), "this_is_not_a_comment");
}

#[test]
fn lexer_rejects_nested_block_comment() {
    // The inner `*/` closes the comment, leaving a trailing `*/` whose `/`
    // matches no rule.
    let err = Lexer::new("/*/**/*/")
        .tokenize()
        .expect_err("nested comment must not lex");
    assert!(matches!(err.kind, ErrorKind::LexerError(_)));
}

#[test]
fn lexer_counts_lines_and_columns() {
    let tokens = Lexer::new("class\nFoo bar\r\nbaz")
        .tokenize()
        .expect("Failed to tokenize");

    assert_eq!((tokens[0].location().line, tokens[0].location().column), (1, 1));
    assert_eq!((tokens[1].location().line, tokens[1].location().column), (2, 1));
    assert_eq!((tokens[2].location().line, tokens[2].location().column), (2, 5));
    assert_eq!((tokens[3].location().line, tokens[3].location().column), (3, 1));
}
