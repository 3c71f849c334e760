use chumsky::prelude::*;

use crate::token::{BinaryOp, Token};

/// Characters that end a word. `"` is absent: a quote opens a string that
/// joins whatever word is in progress.
const WORD_BREAKS: &str = "()+-*/><=! \"";

/// Tokenizer for a single expression substring.
///
/// Inside quotes every character up to the closing `"` belongs to the
/// string, so spaces, parentheses, operators and digits survive inside a
/// literal. Outside quotes, operator characters and spaces split words;
/// `>`, `<`, `=` and `!` fuse with a following `=`. An unterminated string
/// runs to the end of the input.
pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Token>, extra::Err<Simple<'a, char>>> {
    let quoted = just('"')
        .then(none_of("\"").repeated())
        .then(just('"').or_not())
        .to_slice();

    let word = none_of(WORD_BREAKS)
        .repeated()
        .at_least(1)
        .then(quoted.clone().or_not())
        .to_slice();

    // A word of nothing but tabs or other non-space whitespace yields no token.
    let lexeme = word.or(quoted).map(|s: &str| {
        if s.trim().is_empty() {
            None
        } else {
            Some(Token::from_lexeme(s))
        }
    });

    let operator = choice((
        just(">=").to(Token::Operator(BinaryOp::GreaterEq)),
        just("<=").to(Token::Operator(BinaryOp::LessEq)),
        just("==").to(Token::Operator(BinaryOp::Eq)),
        just("!=").to(Token::Operator(BinaryOp::NotEq)),
        just('>').to(Token::Operator(BinaryOp::Greater)),
        just('<').to(Token::Operator(BinaryOp::Less)),
        just('+').to(Token::Operator(BinaryOp::Add)),
        just('-').to(Token::Operator(BinaryOp::Sub)),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('=').to(Token::Assign),
        just('!').to(Token::Bang),
    ))
    .map(Some);

    let space = just(' ').to(None::<Token>);

    choice((operator, lexeme, space))
        .repeated()
        .collect::<Vec<Option<Token>>>()
        .map(|tokens| tokens.into_iter().flatten().collect::<Vec<Token>>())
        .then_ignore(end())
}

/// Splits an expression into tokens. Every character is accepted by one of
/// the lexer's alternatives, so this never fails.
pub fn tokenize(text: &str) -> Vec<Token> {
    lexer().parse(text).into_output().unwrap_or_default()
}
