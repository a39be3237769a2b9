use logos::{Logos, SpannedIter};

use crate::error::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Token {
    pub(super) kind: TokenKind,
    /// Excludes the quotes of a quoted atom
    pub(super) span: Span,
}

pub(super) struct Tokens<'a> {
    iter: SpannedIter<'a, RawToken>,
}

impl<'a> Tokens<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            iter: RawToken::lexer(input).spanned(),
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let (raw, span) = self.iter.next()?;
        let (kind, span) = match raw {
            Ok(RawToken::Open) => (TokenKind::Open, span),
            Ok(RawToken::Close) => (TokenKind::Close, span),
            Ok(RawToken::Quoted) => (TokenKind::Atom, (span.start + 1)..(span.end - 1)),
            Ok(RawToken::Bare) => (TokenKind::Atom, span),
            Err(()) => (TokenKind::Error, span),
        };
        Some(Token { kind, span })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TokenKind {
    Open,
    Close,
    Atom,
    Error,
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f\n]+")]
enum RawToken {
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[regex(r#""([^"\\]|\\.)*""#)]
    Quoted,
    #[regex(r#"[^"() \t\r\f\n]+"#)]
    Bare,
}
