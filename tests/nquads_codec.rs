use taxomerge::codec::{NQuadsCodec, TextCodec};
use taxomerge::error::TaxomergeError;
use taxomerge::statement::Context;
use taxomerge::store::Store;
use taxomerge::term::Term;

const DOCUMENT: &str = r#"# skills
<http://ex.org/java> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org/Skill> .
<http://ex.org/java> <http://www.w3.org/2004/02/skos/core#prefLabel> "Java"@en .
<http://ex.org/java> <http://www.w3.org/2004/02/skos/core#definition> "Line one\nLine \"two\"" .

_:b0 <http://ex.org/weight> "1.5"^^<http://www.w3.org/2001/XMLSchema#decimal> <http://ex.org/graph> .
<http://ex.org/java> <http://ex.org/plain> "typed"^^<http://www.w3.org/2001/XMLSchema#string> . # trailing comment
"#;

#[test]
fn decodes_every_term_kind() {
    let statements = NQuadsCodec.decode(DOCUMENT).expect("valid document");
    assert_eq!(statements.len(), 5);
    assert_eq!(statements[0].object(), &Term::iri("http://ex.org/Skill").unwrap());
    assert_eq!(statements[1].object(), &Term::lang_literal("Java", "en").unwrap());
    assert_eq!(statements[2].object().value(), "Line one\nLine \"two\"");
    assert_eq!(statements[3].subject(), &Term::blank("b0").unwrap());
    assert_eq!(
        statements[3].object(),
        &Term::typed_literal("1.5", "http://www.w3.org/2001/XMLSchema#decimal").unwrap()
    );
    assert_eq!(
        statements[3].context(),
        &Context::named(Term::iri("http://ex.org/graph").unwrap()).unwrap()
    );
    assert!(statements[0].context().is_default());
    // an explicit xsd:string is the same as no datatype
    assert_eq!(statements[4].object(), &Term::literal("typed"));
}

#[test]
fn encoding_decodes_to_the_same_store() {
    let store: Store = NQuadsCodec.decode(DOCUMENT).unwrap().into_iter().collect();
    let text = NQuadsCodec.encode(store.iter());
    assert_eq!(text.lines().count(), store.len());
    assert!(text.contains("\"Java\"@en ."));
    assert!(text.contains("<http://ex.org/graph> ."));
    let again: Store = NQuadsCodec.decode(&text).unwrap().into_iter().collect();
    assert_eq!(again, store);
    // encoding follows iteration order, so equal stores built the same way encode the same
    assert_eq!(NQuadsCodec.encode(again.iter()), text);
}

#[test]
fn empty_and_comment_only_documents() {
    assert!(NQuadsCodec.decode("").unwrap().is_empty());
    assert!(NQuadsCodec.decode("# nothing here\n\n   \n").unwrap().is_empty());
    assert_eq!(NQuadsCodec.encode(Vec::new().iter()), "");
}

#[test]
fn windows_line_endings() {
    let text = "<http://ex.org/a> <http://ex.org/p> \"1\" .\r\n<http://ex.org/b> <http://ex.org/p> \"2\" .\r\n";
    assert_eq!(NQuadsCodec.decode(text).unwrap().len(), 2);
}

#[test]
fn syntax_errors_carry_a_position() {
    let text = "<http://ex.org/a> <http://ex.org/p> \"1\" .\n<http://ex.org/b> <http://ex.org/p> \"unterminated .\n";
    match NQuadsCodec.decode(text) {
        Err(TaxomergeError::Parse { line, col, .. }) => {
            assert_eq!(line, Some(2));
            assert!(col.is_some());
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn invalid_terms_are_parse_errors() {
    // a literal cannot be a subject
    let literal_subject = "\"a\" <http://ex.org/p> \"1\" .";
    assert!(matches!(NQuadsCodec.decode(literal_subject), Err(TaxomergeError::Parse { .. })));
    // spaces are not allowed inside IRIs
    let spaced = "<http://ex.org/a b> <http://ex.org/p> \"1\" .";
    assert!(matches!(NQuadsCodec.decode(spaced), Err(TaxomergeError::Parse { line: Some(1), .. })));
    let blank_predicate = "<http://ex.org/a> _:p \"1\" .";
    assert!(NQuadsCodec.decode(blank_predicate).is_err());
    let missing_dot = "<http://ex.org/a> <http://ex.org/p> \"1\"";
    assert!(NQuadsCodec.decode(missing_dot).is_err());
}

#[test]
fn unicode_escapes() {
    let text = r#"<http://ex.org/a> <http://ex.org/p> "café \U0001F600" ."#;
    let statements = NQuadsCodec.decode(text).unwrap();
    assert_eq!(statements[0].object().value(), "café 😀");
    let bad = r#"<http://ex.org/a> <http://ex.org/p> "\uD800" ."#;
    assert!(NQuadsCodec.decode(bad).is_err());
}
