use std::fmt;

use serde::Serialize;

use crate::error::{Result, TaxomergeError};
use crate::term::Term;

// ------------- Context -------------
/// The graph a statement belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Context {
    #[default]
    Default,
    Named(Term),
}

impl Context {
    /// A named context; only IRIs and blank nodes can name one.
    pub fn named(term: Term) -> Result<Self> {
        if term.is_literal() {
            return Err(TaxomergeError::InvalidStatement(format!(
                "a literal cannot name a context: {term}"
            )));
        }
        Ok(Context::Named(term))
    }
    pub fn is_default(&self) -> bool {
        matches!(self, Context::Default)
    }
}

// ------------- Statement -------------
/// A (subject, predicate, object, context) quad.
///
/// Statements are immutable values; two statements are equal iff all four
/// positions are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Statement {
    subject: Term,
    predicate: Term,
    object: Term,
    context: Context,
}

impl Statement {
    /// A statement in the default context.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Result<Self> {
        Self::in_context(subject, predicate, object, Context::Default)
    }
    pub fn in_context(subject: Term, predicate: Term, object: Term, context: Context) -> Result<Self> {
        if subject.is_literal() {
            return Err(TaxomergeError::InvalidStatement(format!(
                "a literal cannot be a subject: {subject}"
            )));
        }
        if !predicate.is_iri() {
            return Err(TaxomergeError::InvalidStatement(format!(
                "the predicate must be an IRI: {predicate}"
            )));
        }
        if let Context::Named(term) = &context {
            if term.is_literal() {
                return Err(TaxomergeError::InvalidStatement(format!(
                    "a literal cannot name a context: {term}"
                )));
            }
        }
        Ok(Self {
            subject,
            predicate,
            object,
            context,
        })
    }
    pub fn subject(&self) -> &Term {
        &self.subject
    }
    pub fn predicate(&self) -> &Term {
        &self.predicate
    }
    pub fn object(&self) -> &Term {
        &self.object
    }
    pub fn context(&self) -> &Context {
        &self.context
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Context::Named(term) = &self.context {
            write!(f, " {term}")?;
        }
        f.write_str(" .")
    }
}
