//! In-place edits of concept properties.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TaxomergeError};
use crate::statement::Statement;
use crate::store::Store;
use crate::term::{Literal, Term};
use crate::vocab::skos;

/// The properties an editor is allowed to change through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    PrefLabel,
    Definition,
}

impl EditableField {
    pub fn predicate(&self) -> &'static str {
        match self {
            EditableField::PrefLabel => skos::PREF_LABEL,
            EditableField::Definition => skos::DEFINITION,
        }
    }
}

impl FromStr for EditableField {
    type Err = TaxomergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prefLabel" => Ok(EditableField::PrefLabel),
            "definition" => Ok(EditableField::Definition),
            other => Err(TaxomergeError::UnsupportedField(other.to_string())),
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            EditableField::PrefLabel => "prefLabel",
            EditableField::Definition => "definition",
        })
    }
}

/// Replaces every value of `predicate` on `subject` with `new_value`.
///
/// The replacement keeps the language tag (or non-string datatype) of the
/// first value it replaces, and lands in the default context.
pub fn replace_single_valued(store: &mut Store, subject: &Term, predicate: &Term, new_value: &str) {
    let old: Vec<Statement> = store
        .matching(Some(subject), Some(predicate), None, None)
        .cloned()
        .collect();
    let literal = old
        .first()
        .and_then(|statement| statement.object().as_literal())
        .map(|literal| literal.with_value(new_value))
        .unwrap_or_else(|| Literal::plain(new_value));
    for statement in &old {
        store.remove(statement);
    }
    // nothing to write for a literal subject or a non-IRI predicate
    if let Ok(statement) = Statement::new(subject.clone(), predicate.clone(), literal.into()) {
        store.add(statement);
    }
}

/// Links `subject` to `target`. Returns whether the link is new.
pub fn add_relation(store: &mut Store, subject: &Term, relation: &Term, target: &Term) -> Result<bool> {
    let statement = Statement::new(subject.clone(), relation.clone(), target.clone())?;
    Ok(store.add(statement))
}

/// Removes every `subject relation target` statement, in any context.
/// Returns whether anything was removed.
pub fn remove_relation(store: &mut Store, subject: &Term, relation: &Term, target: &Term) -> bool {
    let links: Vec<Statement> = store
        .matching(Some(subject), Some(relation), Some(target), None)
        .cloned()
        .collect();
    links.iter().fold(false, |removed, link| store.remove(link) || removed)
}
