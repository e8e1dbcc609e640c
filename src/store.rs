//! The statement store.
//!
//! A [`Store`] owns a deduplicated set of statements. Terms are interned by a
//! keeper into numeric ids, statements get ids of their own, and a handful of
//! lookups (similar to database indexes) map term ids to roaring bitmaps of
//! statement ids. A pattern match intersects the bitmaps of its bound
//! positions and yields the surviving statements in id order.
//!
//! Statement ids are handed out by a monotonically increasing counter and
//! never reused, so iteration follows insertion order and is stable for as
//! long as the store is not mutated.

use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

// used to keep the one-to-one mappings between terms/statements and their ids
use bimap::BiMap;
// used for the index postings
use roaring::RoaringTreemap;
use seahash::SeaHasher;

use crate::statement::{Context, Statement};
use crate::term::Term;

pub type TermId = u64;
pub type StatementId = u64;

pub type IndexHasher = BuildHasherDefault<SeaHasher>;

/// The id every store uses for the default context.
pub const DEFAULT_CONTEXT: TermId = 0;

type QuadKey = (TermId, TermId, TermId, TermId);

// ------------- Terms -------------
#[derive(Clone, Debug, Default)]
struct TermKeeper {
    kept: BiMap<Term, TermId>,
    lower_bound: TermId,
}
impl TermKeeper {
    fn keep(&mut self, term: &Term) -> TermId {
        if let Some(id) = self.kept.get_by_left(term) {
            return *id;
        }
        self.lower_bound += 1;
        self.kept.insert(term.clone(), self.lower_bound);
        self.lower_bound
    }
    fn keep_context(&mut self, context: &Context) -> TermId {
        match context {
            Context::Default => DEFAULT_CONTEXT,
            Context::Named(term) => self.keep(term),
        }
    }
    fn id(&self, term: &Term) -> Option<TermId> {
        self.kept.get_by_left(term).copied()
    }
    fn context_id(&self, context: &Context) -> Option<TermId> {
        match context {
            Context::Default => Some(DEFAULT_CONTEXT),
            Context::Named(term) => self.id(term),
        }
    }
    fn len(&self) -> usize {
        self.kept.len()
    }
}

// ------------- Lookups -------------
#[derive(Clone, Debug)]
pub struct Lookup<K, H = IndexHasher> {
    index: HashMap<K, RoaringTreemap, H>,
}
impl<K: Eq + Hash, H: BuildHasher + Default> Lookup<K, H> {
    pub fn new() -> Self {
        Self {
            index: HashMap::<K, RoaringTreemap, H>::default(),
        }
    }
    pub fn insert(&mut self, key: K, statement: StatementId) {
        self.index.entry(key).or_default().insert(statement);
    }
    pub fn remove(&mut self, key: &K, statement: StatementId) {
        if let Some(posting) = self.index.get_mut(key) {
            posting.remove(statement);
            if posting.is_empty() {
                self.index.remove(key);
            }
        }
    }
    pub fn lookup(&self, key: &K) -> Option<&RoaringTreemap> {
        self.index.get(key)
    }
    pub fn len(&self) -> usize {
        self.index.len()
    }
}
impl<K: Eq + Hash, H: BuildHasher + Default> Default for Lookup<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- Store -------------
#[derive(Clone, Default)]
pub struct Store {
    terms: TermKeeper,
    statements: BiMap<Statement, StatementId>,
    // every live statement id, in insertion order
    live: RoaringTreemap,
    lower_bound: StatementId,
    by_subject: Lookup<TermId>,
    by_predicate: Lookup<TermId>,
    by_object: Lookup<TermId>,
    by_context: Lookup<TermId>,
    by_subject_predicate: Lookup<(TermId, TermId)>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a statement unless an equal one is already kept.
    /// Returns whether the statement was new.
    pub fn add(&mut self, statement: Statement) -> bool {
        if self.statements.contains_left(&statement) {
            return false;
        }
        let (s, p, o, c) = self.keep_key(&statement);
        self.lower_bound += 1;
        let id = self.lower_bound;
        self.by_subject.insert(s, id);
        self.by_predicate.insert(p, id);
        self.by_object.insert(o, id);
        self.by_context.insert(c, id);
        self.by_subject_predicate.insert((s, p), id);
        self.statements.insert(statement, id);
        self.live.insert(id);
        true
    }

    /// Removes a statement if it is kept. Returns whether anything was removed.
    pub fn remove(&mut self, statement: &Statement) -> bool {
        let Some((statement, id)) = self.statements.remove_by_left(statement) else {
            return false;
        };
        self.live.remove(id);
        // interned terms are kept
        if let Some((s, p, o, c)) = self.key(&statement) {
            self.by_subject.remove(&s, id);
            self.by_predicate.remove(&p, id);
            self.by_object.remove(&o, id);
            self.by_context.remove(&c, id);
            self.by_subject_predicate.remove(&(s, p), id);
        }
        true
    }

    pub fn contains(&self, statement: &Statement) -> bool {
        self.statements.contains_left(statement)
    }

    /// Number of distinct statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Statements matching every bound position; `None` is a wildcard.
    ///
    /// The iterator borrows the store, so the store cannot be mutated while
    /// a match is being consumed.
    pub fn matching<'a>(
        &'a self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        context: Option<&Context>,
    ) -> impl Iterator<Item = &'a Statement> + use<'a> {
        let candidates = self.candidates(subject, predicate, object, context);
        candidates
            .into_iter()
            .filter_map(move |id| self.statements.get_by_right(&id))
    }

    /// The first statement with the given subject and predicate, if any.
    pub fn first(&self, subject: &Term, predicate: &Term) -> Option<&Statement> {
        self.matching(Some(subject), Some(predicate), None, None).next()
    }

    /// Every statement, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> + '_ {
        self.matching(None, None, None, None)
    }

    fn keep_key(&mut self, statement: &Statement) -> QuadKey {
        (
            self.terms.keep(statement.subject()),
            self.terms.keep(statement.predicate()),
            self.terms.keep(statement.object()),
            self.terms.keep_context(statement.context()),
        )
    }

    fn key(&self, statement: &Statement) -> Option<QuadKey> {
        Some((
            self.terms.id(statement.subject())?,
            self.terms.id(statement.predicate())?,
            self.terms.id(statement.object())?,
            self.terms.context_id(statement.context())?,
        ))
    }

    fn candidates(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        context: Option<&Context>,
    ) -> RoaringTreemap {
        // one entry per bound position, None when the bound term is unknown
        let mut bound: Vec<Option<&RoaringTreemap>> = Vec::with_capacity(4);
        match (subject, predicate) {
            (Some(s), Some(p)) => bound.push(
                self.terms
                    .id(s)
                    .zip(self.terms.id(p))
                    .and_then(|key| self.by_subject_predicate.lookup(&key)),
            ),
            (s, p) => {
                if let Some(s) = s {
                    bound.push(self.terms.id(s).and_then(|id| self.by_subject.lookup(&id)));
                }
                if let Some(p) = p {
                    bound.push(self.terms.id(p).and_then(|id| self.by_predicate.lookup(&id)));
                }
            }
        }
        if let Some(o) = object {
            bound.push(self.terms.id(o).and_then(|id| self.by_object.lookup(&id)));
        }
        if let Some(c) = context {
            bound.push(self.terms.context_id(c).and_then(|id| self.by_context.lookup(&id)));
        }
        if bound.is_empty() {
            return self.live.clone();
        }
        let Some(mut postings) = bound.into_iter().collect::<Option<Vec<_>>>() else {
            return RoaringTreemap::new();
        };
        // smallest posting first
        postings.sort_unstable_by_key(|posting| posting.len());
        let mut result = postings[0].clone();
        for posting in &postings[1..] {
            result &= *posting;
        }
        result
    }
}

impl PartialEq for Store {
    /// Set equality of the kept statements; ids and interned terms are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|statement| other.contains(statement))
    }
}
impl Eq for Store {}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Store")
            .field("statements", &self.len())
            .field("terms", &self.terms.len())
            .field("subjects", &self.by_subject.len())
            .finish()
    }
}

impl Extend<Statement> for Store {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        for statement in iter {
            self.add(statement);
        }
    }
}

impl FromIterator<Statement> for Store {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        let mut store = Store::new();
        store.extend(iter);
        store
    }
}
