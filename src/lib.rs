//! Taxomerge – browse, edit and merge taxonomies kept as statement files under version control.
//!
//! A taxonomy is a set of *statements*: `(subject, predicate, object, context)`
//! quads whose positions are [`term::Term`]s, where:
//! * A [`term::Term::Iri`] is a globally meaningful name.
//! * A [`term::Term::Blank`] is an anonymous node that only means something inside one document.
//! * A [`term::Literal`] is a value with an optional language tag or datatype.
//! * A [`statement::Context`] is either the default graph or a named one.
//!
//! Statements are owned and deduplicated by a [`store::Store`], which interns
//! terms into numeric ids and keeps bitmap indexes by subject, predicate,
//! object, context and (subject, predicate), so pattern matching is a matter
//! of intersecting postings.
//!
//! ## Modules
//! * [`term`] and [`statement`] – validated building blocks.
//! * [`store`] – the indexed statement set and its pattern matching.
//! * [`diff`] – set differences between snapshots.
//! * [`merge`] – three-way merge with conflict detection, steered by a [`merge::MergePolicy`].
//! * [`resolve`] – applying a chosen side to every conflict.
//! * [`editor`] – in-place edits of single-valued properties and relations.
//! * [`concept`] – search and detail views for concepts.
//! * [`codec`] – the N-Quads text format, parsed with pest (`nquads.pest`).
//! * [`repository`] – where documents are fetched from and committed to.
//! * [`save`] – the save workflow: commit directly, merge then commit, or hand back conflicts.
//! * [`cache`] – a single-flight cache of the loaded taxonomy.
//! * [`settings`] – configuration from file and environment.
//! * [`server`] – the HTTP API.
//!
//! ## Merging
//! Editors work on a copy decoded from some earlier text of a file. When they
//! save, whatever was committed in the meantime is merged in: additions from
//! both sides are kept, deletions are applied unless the other side changed
//! the same subject and predicate, and predicates that only carry one value
//! (such as `skos:prefLabel`) are reported as conflicts when both sides set
//! different values.
//!
//! ## Quick Start
//! ```
//! use taxomerge::codec::{NQuadsCodec, TextCodec};
//! use taxomerge::merge::merge;
//! use taxomerge::store::Store;
//!
//! let base: Store = NQuadsCodec
//!     .decode(r#"<http://ex.org/a> <http://www.w3.org/2004/02/skos/core#prefLabel> "A" ."#)
//!     .unwrap()
//!     .into_iter()
//!     .collect();
//! let result = merge(&base, &base, &base);
//! assert!(result.auto_merged);
//! assert_eq!(result.merged, base);
//! ```

pub mod cache;
pub mod codec;
pub mod concept;
pub mod diff;
pub mod editor;
pub mod error;
pub mod merge;
pub mod repository;
pub mod resolve;
pub mod save;
pub mod server;
pub mod settings;
pub mod statement;
pub mod store;
pub mod term;
pub mod vocab;
