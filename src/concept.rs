//! Read-only views of concepts, assembled from a store on request.

use serde::Serialize;

use crate::statement::Statement;
use crate::store::Store;
use crate::term::Term;
use crate::vocab::{last_segment, local_name, predicates};

const DEFAULT_TYPE_LABEL: &str = "Concept";

/// An outgoing link of a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    #[serde(rename = "type")]
    pub predicate_label: String,
    #[serde(rename = "target")]
    pub target_id: String,
    #[serde(rename = "targetLabel")]
    pub target_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptView {
    pub id: String,
    #[serde(rename = "type")]
    pub type_label: String,
    #[serde(rename = "prefLabel")]
    pub pref_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    pub relations: Vec<Relation>,
}

fn is_descriptive(predicate: &Term) -> bool {
    predicate == &*predicates::PREF_LABEL
        || predicate == &*predicates::DEFINITION
        || predicate == &*predicates::TYPE
}

fn type_label(store: &Store, subject: &Term) -> String {
    store
        .first(subject, &predicates::TYPE)
        .map(|statement| last_segment(statement.object().value()))
        .filter(|label| !label.is_empty())
        .unwrap_or(DEFAULT_TYPE_LABEL)
        .to_string()
}

fn definition(store: &Store, subject: &Term) -> Option<String> {
    store
        .first(subject, &predicates::DEFINITION)
        .map(|statement| statement.object().value().to_string())
}

/// Concepts whose preferred label contains `query`, ignoring case.
///
/// Labels are visited in match order and at most `limit` concepts are
/// returned. The views carry no relations.
pub fn search(store: &Store, query: &str, limit: usize) -> Vec<ConceptView> {
    let query = query.to_lowercase();
    store
        .matching(None, Some(&*predicates::PREF_LABEL), None, None)
        .filter(|statement| statement.object().value().to_lowercase().contains(&query))
        .take(limit)
        .map(|statement| {
            let subject = statement.subject();
            ConceptView {
                id: subject.value().to_string(),
                type_label: type_label(store, subject),
                pref_label: statement.object().value().to_string(),
                definition: definition(store, subject),
                relations: Vec::new(),
            }
        })
        .collect()
}

/// The full view of one concept, `None` when `id` has no preferred label.
pub fn concept_details(store: &Store, id: &str) -> Option<ConceptView> {
    let subject = Term::iri(id).ok()?;
    let pref_label = store.first(&subject, &predicates::PREF_LABEL)?.object().value().to_string();
    let relations = store
        .matching(Some(&subject), None, None, None)
        .filter(|statement| !is_descriptive(statement.predicate()))
        .map(|statement| relation(store, statement))
        .collect();
    Some(ConceptView {
        id: id.to_string(),
        type_label: type_label(store, &subject),
        pref_label,
        definition: definition(store, &subject),
        relations,
    })
}

// labels are only looked up for IRI targets; anything else shows its raw value
fn relation(store: &Store, statement: &Statement) -> Relation {
    let target = statement.object();
    let target_label = target
        .is_iri()
        .then(|| store.first(target, &predicates::PREF_LABEL))
        .flatten()
        .map_or(target.value(), |label| label.object().value())
        .to_string();
    Relation {
        predicate_label: local_name(statement.predicate().value()).to_string(),
        target_id: target.value().to_string(),
        target_label,
    }
}
