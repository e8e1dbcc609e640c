//! Terms: the values that occupy one position of a statement.
//!
//! A term is one of
//! - an IRI (a globally meaningful identifier),
//! - a blank node (an identifier that only means something inside one document),
//! - a literal (a lexical value with either a language tag or a datatype).
//!
//! Terms are validated when they are constructed, so a [`crate::store::Store`]
//! never has to deal with malformed input.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::{Result, TaxomergeError};
use crate::vocab::{rdf, xsd};

lazy_static! {
    static ref LANGUAGE_TAG: Regex = Regex::new(r"^[A-Za-z]+(-[A-Za-z0-9]+)*$").unwrap();
}

const FORBIDDEN_IRI_CHARS: [char; 8] = ['<', '>', '"', '{', '}', '|', '^', '`'];

fn check_iri(iri: &str) -> Result<()> {
    if iri.is_empty() {
        return Err(TaxomergeError::InvalidTerm("empty IRI".into()));
    }
    if let Some(c) = iri
        .chars()
        .find(|c| c.is_whitespace() || *c == '\\' || FORBIDDEN_IRI_CHARS.contains(c))
    {
        return Err(TaxomergeError::InvalidTerm(format!(
            "IRI '{iri}' contains the character {c:?}"
        )));
    }
    Ok(())
}

// ------------- Literal -------------
/// A literal value. Language tag and datatype are mutually exclusive; the
/// constructors make it impossible to set both.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Literal {
    value: Arc<str>,
    language: Option<Arc<str>>,
    datatype: Option<Arc<str>>,
}

impl Literal {
    /// A plain string literal.
    pub fn plain(value: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(value.as_ref()),
            language: None,
            datatype: None,
        }
    }
    /// A language-tagged literal. The tag is kept as given.
    pub fn lang(value: impl AsRef<str>, language: impl AsRef<str>) -> Result<Self> {
        let language = language.as_ref();
        if !LANGUAGE_TAG.is_match(language) {
            return Err(TaxomergeError::InvalidTerm(format!(
                "invalid language tag '{language}'"
            )));
        }
        Ok(Self {
            value: Arc::from(value.as_ref()),
            language: Some(Arc::from(language)),
            datatype: None,
        })
    }
    /// A typed literal. `xsd:string` is the implied datatype of plain
    /// literals and is normalized away.
    pub fn typed(value: impl AsRef<str>, datatype: impl AsRef<str>) -> Result<Self> {
        let datatype = datatype.as_ref();
        check_iri(datatype)?;
        Ok(Self {
            value: Arc::from(value.as_ref()),
            language: None,
            datatype: (datatype != xsd::STRING).then(|| Arc::from(datatype)),
        })
    }
    pub fn value(&self) -> &str {
        &self.value
    }
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
    /// The explicit datatype, `None` for plain and language-tagged literals.
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }
    /// The effective datatype IRI, including the implied ones.
    pub fn datatype_iri(&self) -> &str {
        match (&self.language, &self.datatype) {
            (Some(_), _) => rdf::LANG_STRING,
            (None, Some(datatype)) => datatype,
            (None, None) => xsd::STRING,
        }
    }
    /// Same language tag and datatype, different value.
    pub fn with_value(&self, value: impl AsRef<str>) -> Self {
        Self {
            value: Arc::from(value.as_ref()),
            language: self.language.clone(),
            datatype: self.datatype.clone(),
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter, value: &str) -> fmt::Result {
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("\"")?;
        write_escaped(f, &self.value)?;
        f.write_str("\"")?;
        match (&self.language, &self.datatype) {
            (Some(language), _) => write!(f, "@{language}"),
            (None, Some(datatype)) => write!(f, "^^<{datatype}>"),
            (None, None) => Ok(()),
        }
    }
}

// ------------- Term -------------
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "termType", rename_all = "camelCase")]
pub enum Term {
    Iri { value: Arc<str> },
    Blank { value: Arc<str> },
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Result<Self> {
        let iri = iri.as_ref();
        check_iri(iri)?;
        Ok(Term::Iri { value: Arc::from(iri) })
    }
    pub fn blank(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(TaxomergeError::InvalidTerm(format!(
                "invalid blank node id '{id}'"
            )));
        }
        Ok(Term::Blank { value: Arc::from(id) })
    }
    pub fn literal(value: impl AsRef<str>) -> Self {
        Term::Literal(Literal::plain(value))
    }
    pub fn lang_literal(value: impl AsRef<str>, language: impl AsRef<str>) -> Result<Self> {
        Literal::lang(value, language).map(Term::Literal)
    }
    pub fn typed_literal(value: impl AsRef<str>, datatype: impl AsRef<str>) -> Result<Self> {
        Literal::typed(value, datatype).map(Term::Literal)
    }
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri { .. })
    }
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank { .. })
    }
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri { value } => Some(value),
            _ => None,
        }
    }
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }
    /// The textual value: the IRI, the blank node id or the literal's lexical form.
    pub fn value(&self) -> &str {
        match self {
            Term::Iri { value } | Term::Blank { value } => value,
            Term::Literal(literal) => literal.value(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Iri { value } => write!(f, "<{value}>"),
            Term::Blank { value } => write!(f, "_:{value}"),
            Term::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}
