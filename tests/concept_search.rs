use taxomerge::concept::{concept_details, search};
use taxomerge::statement::Statement;
use taxomerge::store::Store;
use taxomerge::term::Term;
use taxomerge::vocab::{rdf, skos};

const BASE: &str = "http://data.example.org/taxonomy/";

fn iri(value: &str) -> Term {
    Term::iri(value).expect("valid IRI")
}

fn concept(id: &str) -> Term {
    iri(&format!("{BASE}concept/{id}"))
}

fn statement(subject: Term, predicate: &str, object: Term) -> Statement {
    Statement::new(subject, iri(predicate), object).expect("valid statement")
}

fn setup() -> Store {
    [
        statement(concept("java"), skos::PREF_LABEL, Term::lang_literal("Java programming", "en").unwrap()),
        statement(concept("java"), rdf::TYPE, iri(&format!("{BASE}Skill"))),
        statement(concept("java"), skos::DEFINITION, Term::literal("Writing programs in Java.")),
        statement(concept("java"), skos::RELATED, concept("js")),
        statement(concept("java"), skos::BROADER, concept("unlabelled")),
        statement(concept("java"), "http://example.org/note", Term::literal("legacy")),
        statement(concept("js"), skos::PREF_LABEL, Term::literal("JavaScript")),
        statement(concept("py"), skos::PREF_LABEL, Term::literal("Python")),
        statement(concept("py"), rdf::TYPE, iri("http://example.org/types#Language")),
    ]
    .into_iter()
    .collect()
}

#[test]
fn search_matches_labels_case_insensitively() {
    let store = setup();
    let results = search(&store, "java", 10);
    let labels: Vec<_> = results.iter().map(|c| c.pref_label.as_str()).collect();
    assert_eq!(labels, vec!["Java programming", "JavaScript"]);
    assert_eq!(results[0].type_label, "Skill");
    assert_eq!(results[0].definition.as_deref(), Some("Writing programs in Java."));
    assert!(results[0].relations.is_empty());
    assert_eq!(results[1].type_label, "Concept");
    assert_eq!(results[1].definition, None);
}

#[test]
fn search_respects_the_limit() {
    let store = setup();
    assert_eq!(search(&store, "JAVA", 1).len(), 1);
    assert_eq!(search(&store, "a", 0).len(), 0);
    assert_eq!(search(&store, "", 10).len(), 3);
    assert!(search(&store, "cobol", 10).is_empty());
}

#[test]
fn details_resolve_relation_labels() {
    let store = setup();
    let java = concept_details(&store, &format!("{BASE}concept/java")).expect("labelled concept");
    assert_eq!(java.pref_label, "Java programming");
    assert_eq!(java.type_label, "Skill");
    assert_eq!(java.relations.len(), 3);

    let related = &java.relations[0];
    assert_eq!(related.predicate_label, "related");
    assert_eq!(related.target_id, format!("{BASE}concept/js"));
    assert_eq!(related.target_label, "JavaScript");

    // no label: the raw identifier stands in
    let broader = &java.relations[1];
    assert_eq!(broader.predicate_label, "broader");
    assert_eq!(broader.target_label, format!("{BASE}concept/unlabelled"));

    // literal targets are shown as they are
    let note = &java.relations[2];
    assert_eq!(note.predicate_label, "note");
    assert_eq!(note.target_id, "legacy");
    assert_eq!(note.target_label, "legacy");
}

#[test]
fn type_label_uses_the_local_name() {
    let store = setup();
    let py = concept_details(&store, &format!("{BASE}concept/py")).expect("labelled concept");
    assert_eq!(py.type_label, "Language");
    assert!(py.relations.is_empty());
}

#[test]
fn type_without_a_local_name_falls_back_to_concept() {
    let mut store = setup();
    for types in ["http://example.org/types/", "http://example.org/types#"] {
        let go = concept(&format!("go-{}", store.len()));
        store.add(statement(go.clone(), skos::PREF_LABEL, Term::literal("Golang")));
        store.add(statement(go.clone(), rdf::TYPE, iri(types)));
        let details = concept_details(&store, go.value()).expect("labelled concept");
        assert_eq!(details.type_label, "Concept", "type {types}");
    }
    let found = search(&store, "golang", 10);
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|c| c.type_label == "Concept"));
}

#[test]
fn blank_targets_show_their_identifier() {
    let mut store = setup();
    let node = Term::blank("b0").unwrap();
    store.add(statement(concept("js"), "http://example.org/source", node.clone()));
    let js = concept_details(&store, &format!("{BASE}concept/js")).expect("labelled concept");
    assert_eq!(js.relations.len(), 1);
    assert_eq!(js.relations[0].target_label, node.value());
}

#[test]
fn unlabelled_or_unknown_ids_are_not_found() {
    let store = setup();
    assert!(concept_details(&store, &format!("{BASE}concept/unlabelled")).is_none());
    assert!(concept_details(&store, "http://nowhere.example.org/x").is_none());
    assert!(concept_details(&store, "not an iri").is_none());
}

#[test]
fn views_serialize_with_client_field_names() {
    let store = setup();
    let java = concept_details(&store, &format!("{BASE}concept/java")).unwrap();
    let json = serde_json::to_value(&java).expect("serializable");
    assert_eq!(json["type"], "Skill");
    assert_eq!(json["prefLabel"], "Java programming");
    assert_eq!(json["relations"][0]["type"], "related");
    assert_eq!(json["relations"][0]["targetLabel"], "JavaScript");
    assert_eq!(json["relations"][2]["targetLabel"], "legacy");
}
