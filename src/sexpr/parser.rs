use std::iter::Peekable;

use crate::error::ParseError;

use super::{
    lexer::{Token, TokenKind, Tokens},
    SExpr,
};

pub(super) struct Parser<'a> {
    input: &'a str,
    iter: Peekable<Tokens<'a>>,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            input,
            iter: Tokens::new(input).peekable(),
        }
    }

    fn eof(&self) -> ParseError {
        let end = self.input.len();
        ParseError::UnexpectedEof { at: end..end }
    }

    fn get(&mut self) -> Result<Token, ParseError> {
        match self.iter.next() {
            Some(tok) => Ok(tok),
            None => Err(self.eof()),
        }
    }

    fn peek(&mut self) -> Option<TokenKind> {
        self.iter.peek().map(|tok| tok.kind)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let tok = self.get()?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("{:?}", kind),
                found: format!("{:?}", tok.kind),
                at: tok.span,
            })
        }
    }

    /// Parse one `(label child*)` list, recursing into nested lists.
    pub(super) fn parse_list(&mut self) -> Result<SExpr<'a>, ParseError> {
        let input = self.input;
        self.expect(TokenKind::Open)?;
        let label = &input[self.expect(TokenKind::Atom)?.span];

        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some(TokenKind::Close) => {
                    self.get()?;
                    break Ok(SExpr::List(label, children.into_boxed_slice()));
                }
                Some(TokenKind::Open) => {
                    children.push(self.parse_list()?);
                }
                Some(TokenKind::Atom) => {
                    children.push(SExpr::Atom(&input[self.get()?.span]));
                }
                Some(TokenKind::Error) => {
                    break Err(ParseError::UnknownToken {
                        at: self.get()?.span,
                    });
                }
                None => break Err(self.eof()),
            }
        }
    }

    /// Anything after the root list is an error.
    pub(super) fn finish(&mut self) -> Result<(), ParseError> {
        match self.iter.next() {
            None => Ok(()),
            Some(tok) => Err(ParseError::TrailingInput { at: tok.span }),
        }
    }
}
