use std::fmt::Display;

use crate::error::ParseError;

mod lexer;
mod parser;

/// Borrowed S-expression tree, as found in KiCad netlist exports.
///
/// Quoted atoms keep their escapes; only the surrounding quotes are dropped.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SExpr<'a> {
    List(&'a str, Box<[SExpr<'a>]>),
    Atom(&'a str),
}

impl<'a> Display for SExpr<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::List(label, children) => {
                write!(f, "({}", label)?;
                for child in children.iter() {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
            SExpr::Atom(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl<'a> SExpr<'a> {
    pub fn label(&self) -> Option<&'a str> {
        match *self {
            SExpr::List(label, _) => Some(label),
            SExpr::Atom(_) => None,
        }
    }

    /// First atom directly inside the list
    pub fn first_atom(&self) -> Option<&'a str> {
        self.atoms().next()
    }

    pub fn atoms(&self) -> impl Iterator<Item = &'a str> + '_ {
        let children: &[SExpr<'a>] = match self {
            SExpr::List(_, children) => children,
            SExpr::Atom(_) => &[],
        };
        children.iter().filter_map(|child| match child {
            SExpr::Atom(s) => Some(*s),
            SExpr::List(..) => None,
        })
    }

    /// Atom of the first `(label "value")` child
    pub fn value(&self, label: &str) -> Result<&'a str, ParseError> {
        self.child(label)?
            .first_atom()
            .ok_or_else(|| ParseError::MissingValue(label.to_owned()))
    }

    pub fn opt_value(&self, label: &str) -> Option<&'a str> {
        self.children(label).next().and_then(SExpr::first_atom)
    }

    pub fn children<'b, 'c>(&'b self, label: &'c str) -> LabeledChildIterator<'a, 'b, 'c> {
        let iter = match self {
            SExpr::Atom(_) => None,
            SExpr::List(_, children) => Some(children.iter()),
        };
        LabeledChildIterator { iter, label }
    }

    pub fn child<'b>(&self, label: &'b str) -> Result<&SExpr<'a>, ParseError> {
        self.children(label)
            .next()
            .ok_or_else(|| ParseError::MissingChild(label.to_owned()))
    }
}

/// Child lists carrying one label, in source order
#[derive(Debug)]
pub struct LabeledChildIterator<'a, 'b, 'c> {
    iter: Option<std::slice::Iter<'b, SExpr<'a>>>,
    label: &'c str,
}

impl<'a, 'b, 'c> Iterator for LabeledChildIterator<'a, 'b, 'c> {
    type Item = &'b SExpr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let label = self.label;
        self.iter
            .as_mut()?
            .find(|child| matches!(child, SExpr::List(l, _) if *l == label))
    }
}

impl<'a> TryFrom<&'a str> for SExpr<'a> {
    type Error = ParseError;

    fn try_from(input: &'a str) -> Result<Self, Self::Error> {
        let mut parser = parser::Parser::new(input);
        let root = parser.parse_list()?;
        parser.finish()?;
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_data {
        ($fname:expr) => {
            std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/test/",
                $fname
            ))
            .unwrap()
        };
    }

    #[test]
    fn sexpr_can_parse_full_file() {
        let i = test_data!("old.net");
        let root = SExpr::try_from(i.as_str()).unwrap();
        assert_eq!(root.label(), Some("export"));
        assert_eq!(root.child("nets").unwrap().children("net").count(), 4);
    }

    #[test]
    fn labeled_children_and_values() {
        let root = SExpr::try_from(r#"(a (b "1") (c "2") (b "3") "x")"#).unwrap();
        let values: Vec<_> = root.children("b").filter_map(SExpr::first_atom).collect();
        assert_eq!(values, ["1", "3"]);
        assert_eq!(root.value("c").unwrap(), "2");
        assert_eq!(root.first_atom(), Some("x"));
        assert!(root.opt_value("d").is_none());
        assert!(matches!(root.child("d"), Err(ParseError::MissingChild(_))));
    }

    #[test]
    fn empty_list_has_no_value() {
        let root = SExpr::try_from("(a (b))").unwrap();
        assert!(matches!(root.value("b"), Err(ParseError::MissingValue(_))));
    }
}
