use taxomerge::merge::{ConflictKind, DELETED, MergePolicy, merge, merge_with_policy};
use taxomerge::statement::Statement;
use taxomerge::store::Store;
use taxomerge::term::Term;
use taxomerge::vocab::skos;

fn iri(value: &str) -> Term {
    Term::iri(value).expect("valid IRI")
}

fn ex(local: &str) -> Term {
    iri(&format!("http://example.org/{local}"))
}

fn fact(subject: &str, predicate: &str, object: &str) -> Statement {
    Statement::new(ex(subject), iri(predicate), Term::literal(object)).expect("valid statement")
}

fn link(subject: &str, predicate: &str, object: &str) -> Statement {
    Statement::new(ex(subject), iri(predicate), ex(object)).expect("valid statement")
}

fn store(statements: &[Statement]) -> Store {
    statements.iter().cloned().collect()
}

#[test]
fn merging_identical_stores_changes_nothing() {
    let s = store(&[
        fact("java", skos::PREF_LABEL, "Java"),
        link("java", skos::RELATED, "python"),
    ]);
    let result = merge(&s, &s, &s);
    assert!(result.auto_merged);
    assert!(result.conflicts.is_empty());
    assert_eq!(result.merged, s);
}

#[test]
fn identical_additions_appear_once() {
    let base = store(&[fact("java", skos::PREF_LABEL, "Java")]);
    let added = link("java", skos::BROADER, "programming");
    let local = store(&[fact("java", skos::PREF_LABEL, "Java"), added.clone()]);
    let remote = local.clone();
    let result = merge(&base, &local, &remote);
    assert!(result.auto_merged);
    assert_eq!(result.merged.len(), 2);
    assert_eq!(result.merged.iter().filter(|s| **s == added).count(), 1);
}

#[test]
fn inputs_are_not_mutated() {
    let base = store(&[fact("java", skos::PREF_LABEL, "Java")]);
    let local = store(&[]);
    let remote = store(&[fact("java", skos::PREF_LABEL, "Java"), link("java", skos::RELATED, "c")]);
    let (b, l, r) = (base.clone(), local.clone(), remote.clone());
    let _ = merge(&base, &local, &remote);
    assert_eq!((base, local, remote), (b, l, r));
}

#[test]
fn deletion_against_an_unchanged_remote_applies() {
    let label = fact("java", skos::PREF_LABEL, "Java");
    let relation = link("java", skos::RELATED, "python");
    let base = store(&[label.clone(), relation.clone()]);
    let local = store(&[label.clone()]);
    let result = merge(&base, &local, &base);
    assert!(result.auto_merged);
    assert!(!result.merged.contains(&relation));
    assert!(result.merged.contains(&label));
}

#[test]
fn deletions_made_by_both_sides_apply() {
    let label = fact("java", skos::PREF_LABEL, "Java");
    let relation = link("java", skos::RELATED, "python");
    let base = store(&[label.clone(), relation.clone()]);
    let both = store(&[label.clone()]);
    let result = merge(&base, &both, &both);
    assert!(result.auto_merged);
    assert_eq!(result.merged, both);
}

#[test]
fn local_deletion_against_remote_modification_conflicts() {
    let old = fact("java", skos::DEFINITION, "A language.");
    let new = fact("java", skos::DEFINITION, "An OO language.");
    let base = store(&[old.clone()]);
    let local = store(&[]);
    // the remote wrote its new definition above the old one
    let remote = store(&[new, old]);
    let result = merge(&base, &local, &remote);
    assert!(!result.auto_merged);
    assert_eq!(result.conflicts.len(), 1);
    let conflict = &result.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::Modification);
    assert_eq!(conflict.subject, ex("java"));
    assert_eq!(conflict.predicate, iri(skos::DEFINITION));
    assert_eq!(conflict.local_value, DELETED);
    assert_eq!(conflict.remote_value, "An OO language.");
    assert!(conflict.local_statements.is_empty());
    assert_eq!(conflict.remote_statements.len(), 2);
}

#[test]
fn remote_deletion_against_local_modification_conflicts() {
    let old = link("java", skos::BROADER, "languages");
    let base = store(&[old.clone()]);
    let local = store(&[link("java", skos::BROADER, "programming"), old]);
    let remote = store(&[]);
    let result = merge(&base, &local, &remote);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].local_value, "http://example.org/programming");
    assert_eq!(result.conflicts[0].remote_value, DELETED);
}

#[test]
fn rename_and_remote_relation_merge_cleanly() {
    let base = store(&[fact("java", skos::PREF_LABEL, "Java")]);
    let local = store(&[fact("java", skos::PREF_LABEL, "Java (language)")]);
    let relation = link("java", skos::RELATED, "python");
    let remote = store(&[fact("java", skos::PREF_LABEL, "Java"), relation.clone()]);
    let result = merge(&base, &local, &remote);
    assert!(result.auto_merged);
    assert!(result.conflicts.is_empty());
    assert!(result.merged.contains(&fact("java", skos::PREF_LABEL, "Java (language)")));
    assert!(result.merged.contains(&relation));
    assert!(!result.merged.contains(&fact("java", skos::PREF_LABEL, "Java")));
    assert_eq!(result.merged.len(), 2);
}

#[test]
fn competing_definitions_conflict() {
    let base = store(&[fact("java", skos::DEFINITION, "A language.")]);
    let local = store(&[fact("java", skos::DEFINITION, "A programming language.")]);
    let remote = store(&[fact("java", skos::DEFINITION, "An OO language.")]);
    let result = merge(&base, &local, &remote);
    assert!(!result.auto_merged);
    assert_eq!(result.conflicts.len(), 1);
    let conflict = &result.conflicts[0];
    assert_eq!(conflict.kind, ConflictKind::Modification);
    assert_eq!(conflict.local_value, "A programming language.");
    assert_eq!(conflict.remote_value, "An OO language.");
    // both candidates stay in the merged store until a side is chosen
    assert_eq!(result.merged.len(), 2);
}

#[test]
fn parity_policy_keeps_both_definitions() {
    let base = store(&[fact("java", skos::DEFINITION, "A language.")]);
    let local = store(&[fact("java", skos::DEFINITION, "A programming language.")]);
    let remote = store(&[fact("java", skos::DEFINITION, "An OO language.")]);
    let result = merge_with_policy(&base, &local, &remote, &MergePolicy::parity());
    assert!(result.auto_merged);
    assert_eq!(result.merged.len(), 2);
    assert!(!result.merged.contains(&fact("java", skos::DEFINITION, "A language.")));
}

#[test]
fn agreeing_single_valued_additions_do_not_conflict() {
    let base = store(&[fact("java", skos::PREF_LABEL, "Java")]);
    let renamed = store(&[fact("java", skos::PREF_LABEL, "Java (language)")]);
    let result = merge(&base, &renamed, &renamed);
    assert!(result.auto_merged);
    assert_eq!(result.merged, renamed);
}

#[test]
fn multi_valued_predicates_accumulate() {
    let base = store(&[fact("java", skos::PREF_LABEL, "Java")]);
    let mut local = base.clone();
    local.add(link("java", skos::RELATED, "kotlin"));
    let mut remote = base.clone();
    remote.add(link("java", skos::RELATED, "scala"));
    let result = merge(&base, &local, &remote);
    assert!(result.auto_merged);
    assert_eq!(result.merged.len(), 3);
}

#[test]
fn custom_policy_from_iris() {
    let policy = MergePolicy::from_iris([skos::BROADER]).expect("valid IRIs");
    assert!(policy.is_single_valued(&iri(skos::BROADER)));
    assert!(!policy.is_single_valued(&iri(skos::PREF_LABEL)));
    assert!(MergePolicy::from_iris(["not an iri"]).is_err());

    let base = store(&[]);
    let local = store(&[link("java", skos::BROADER, "languages")]);
    let remote = store(&[link("java", skos::BROADER, "platforms")]);
    let result = merge_with_policy(&base, &local, &remote, &policy);
    assert_eq!(result.conflicts.len(), 1);
}

#[test]
fn conflicts_serialize_for_clients() {
    let base = store(&[fact("java", skos::DEFINITION, "A language.")]);
    let local = store(&[fact("java", skos::DEFINITION, "A programming language.")]);
    let remote = store(&[fact("java", skos::DEFINITION, "An OO language.")]);
    let result = merge(&base, &local, &remote);
    let json = serde_json::to_value(&result.conflicts[0]).expect("serializable");
    assert_eq!(json["kind"], "modification");
    assert_eq!(json["localValue"], "A programming language.");
    assert_eq!(json["remoteValue"], "An OO language.");
    assert_eq!(json["subject"]["value"], "http://example.org/java");
    assert_eq!(serde_json::to_value(ConflictKind::Deletion).unwrap(), "deletion");
}

#[test]
fn conflict_values_show_the_disagreement() {
    let base = store(&[fact("java", skos::DEFINITION, "A")]);
    let local = store(&[fact("java", skos::DEFINITION, "B")]);
    let remote = store(&[fact("java", skos::DEFINITION, "B"), fact("java", skos::DEFINITION, "C")]);
    let result = merge(&base, &local, &remote);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].local_value, "B");
    assert_eq!(result.conflicts[0].remote_value, "C");

    let result = merge(&base, &remote, &local);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].local_value, "C");
    assert_eq!(result.conflicts[0].remote_value, "B");
}

#[test]
fn labels_in_different_languages_do_not_compete() {
    let label = |value: &str, language: &str| {
        Statement::new(ex("java"), iri(skos::PREF_LABEL), Term::lang_literal(value, language).unwrap())
            .expect("valid statement")
    };
    let base = store(&[label("Java", "en")]);
    let local = store(&[label("Java", "en"), label("Java", "sv")]);
    let remote = store(&[label("Java", "en"), label("Java", "de")]);
    let result = merge(&base, &local, &remote);
    assert!(result.auto_merged);
    assert_eq!(result.merged.len(), 3);

    // the same language still competes
    let local = store(&[label("Java", "en"), label("Java-språket", "sv")]);
    let remote = store(&[label("Java", "en"), label("Javaspråket", "sv")]);
    let result = merge(&base, &local, &remote);
    assert_eq!(result.conflicts.len(), 1);
    assert_eq!(result.conflicts[0].local_value, "Java-språket");
    assert_eq!(result.conflicts[0].remote_value, "Javaspråket");
}
