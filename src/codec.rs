//! Text codecs for statements.
//!
//! The [`NQuadsCodec`] reads and writes N-Quads, one statement per line.
//! Parsing is done by a pest grammar (`nquads.pest`); the terms found by the
//! grammar are then validated by the same constructors every other caller
//! uses, so a decoded statement is always well-formed.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::error::{Result, TaxomergeError};
use crate::statement::{Context, Statement};
use crate::term::{Literal, Term};

#[derive(Parser)]
#[grammar = "nquads.pest"]
struct NQuadsParser;

/// Converts between a text format and statements.
pub trait TextCodec {
    /// Parses a whole document.
    fn decode(&self, text: &str) -> Result<Vec<Statement>>;
    /// Writes the statements in the order given. Never fails.
    fn encode<'a, I>(&self, statements: I) -> String
    where
        I: IntoIterator<Item = &'a Statement>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NQuadsCodec;

impl TextCodec for NQuadsCodec {
    fn decode(&self, text: &str) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        for document in NQuadsParser::parse(Rule::document, text)? {
            for pair in document.into_inner() {
                if pair.as_rule() == Rule::statement {
                    statements.push(statement(pair)?);
                }
            }
        }
        Ok(statements)
    }

    fn encode<'a, I>(&self, statements: I) -> String
    where
        I: IntoIterator<Item = &'a Statement>,
    {
        let mut text = String::new();
        for statement in statements {
            text.push_str(&statement.to_string());
            text.push('\n');
        }
        text
    }
}

fn malformed(pair: &Pair<Rule>, message: impl Into<String>) -> TaxomergeError {
    let (line, col) = pair.line_col();
    TaxomergeError::Parse {
        message: message.into(),
        line: Some(line),
        col: Some(col),
    }
}

fn statement(pair: Pair<Rule>) -> Result<Statement> {
    let located = pair.clone();
    let mut terms = pair.into_inner();
    let mut next = |position: &str| -> Result<Term> {
        let pair = terms
            .next()
            .ok_or_else(|| malformed(&located, format!("missing {position}")))?;
        term(pair)
    };
    let subject = next("subject")?;
    let predicate = next("predicate")?;
    let object = next("object")?;
    let context = match terms.next() {
        Some(graph) => Context::named(term(graph)?),
        None => Ok(Context::Default),
    };
    context
        .and_then(|context| Statement::in_context(subject, predicate, object, context))
        .map_err(|e| malformed(&located, e.to_string()))
}

fn term(pair: Pair<Rule>) -> Result<Term> {
    let located = pair.clone();
    let invalid = |e: TaxomergeError| malformed(&located, e.to_string());
    match pair.as_rule() {
        Rule::iri_ref => Term::iri(unescape(&located, inner_text(&located)?)?).map_err(invalid),
        Rule::blank_node => Term::blank(inner_text(&located)?).map_err(invalid),
        Rule::graph_label => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| malformed(&located, "empty graph label"))?;
            term(inner)
        }
        Rule::literal => {
            let mut parts = pair.into_inner();
            let body = parts
                .next()
                .ok_or_else(|| malformed(&located, "empty literal"))?;
            let value = unescape(&body, body.as_str())?;
            let literal = match parts.next() {
                None => Ok(Literal::plain(value)),
                Some(tag) if tag.as_rule() == Rule::lang_tag => {
                    Literal::lang(value, tag.as_str().trim_start_matches('@'))
                }
                Some(datatype) => {
                    let iri = unescape(&datatype, inner_text(&datatype)?)?;
                    Literal::typed(value, iri)
                }
            };
            literal.map(Term::Literal).map_err(invalid)
        }
        rule => Err(malformed(&located, format!("unexpected {rule:?}"))),
    }
}

// The text of the single inner pair: the IRI without brackets or the blank
// node label without its prefix.
fn inner_text<'i>(pair: &Pair<'i, Rule>) -> Result<&'i str> {
    pair.clone()
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .ok_or_else(|| malformed(pair, "empty term"))
}

fn unescape(pair: &Pair<Rule>, escaped: &str) -> Result<String> {
    let mut value = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        let unescaped = match chars.next() {
            Some('t') => '\t',
            Some('b') => '\u{8}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('f') => '\u{c}',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some(width @ ('u' | 'U')) => {
                let digits: String = chars.by_ref().take(if width == 'u' { 4 } else { 8 }).collect();
                u32::from_str_radix(&digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| malformed(pair, format!("invalid code point \\{width}{digits}")))?
            }
            other => return Err(malformed(pair, format!("invalid escape \\{}", other.unwrap_or(' ')))),
        };
        value.push(unescaped);
    }
    Ok(value)
}
