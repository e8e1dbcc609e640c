//! Fixed vocabulary IRIs used to classify statements.

/// RDF vocabulary
pub mod rdf {
    /// rdf:type
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// rdf:langString
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// XSD vocabulary
pub mod xsd {
    /// xsd:string, the implied datatype of plain literals
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// SKOS core vocabulary
pub mod skos {
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
    pub const RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";
    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    pub const NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
    pub const EXACT_MATCH: &str = "http://www.w3.org/2004/02/skos/core#exactMatch";
    pub const CLOSE_MATCH: &str = "http://www.w3.org/2004/02/skos/core#closeMatch";
}

/// Relations an editor may add between two concepts, with a short description.
pub const RELATION_TYPES: [(&str, &str); 5] = [
    (skos::RELATED, "Associative relation"),
    (skos::BROADER, "Parent concept"),
    (skos::NARROWER, "Child concept"),
    (skos::EXACT_MATCH, "Exact match"),
    (skos::CLOSE_MATCH, "Close match"),
];

/// Predicates the concept views and the default merge policy look up, as terms.
pub mod predicates {
    use lazy_static::lazy_static;

    use super::{rdf, skos};
    use crate::term::Term;

    lazy_static! {
        pub static ref PREF_LABEL: Term = Term::iri(skos::PREF_LABEL).unwrap();
        pub static ref DEFINITION: Term = Term::iri(skos::DEFINITION).unwrap();
        pub static ref TYPE: Term = Term::iri(rdf::TYPE).unwrap();
    }
}

/// The text after the last `#` or `/` of an IRI, empty when the IRI ends
/// with one of them.
pub fn last_segment(iri: &str) -> &str {
    iri.rfind(['#', '/']).map_or(iri, |i| &iri[i + 1..])
}

/// The text after the last `#` or `/` of an IRI, or the whole IRI when that is empty.
pub fn local_name(iri: &str) -> &str {
    match last_segment(iri) {
        "" => iri,
        name => name,
    }
}
