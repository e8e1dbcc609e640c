//! Three-way merge of statement stores.
//!
//! Given the common `base` snapshot and two descendants (`local` and
//! `remote`), [`merge`] computes what each side added and removed, replays
//! both sets of additions onto a copy of the base and applies the removals
//! that do not compete with a change made on the other side. Competing
//! changes are reported as [`Conflict`]s; they are an outcome, not an error.
//!
//! Which predicates may only carry one value per subject is decided by a
//! [`MergePolicy`]. When both sides add different values for such a
//! predicate in the same language, the merge reports a conflict instead of
//! keeping both values side by side.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::diff::{Delta, intersection, subtract};
use crate::error::Result;
use crate::statement::Statement;
use crate::store::Store;
use crate::term::{Literal, Term};
use crate::vocab::predicates;

/// Stands in for the value of a side that deleted the statement.
pub const DELETED: &str = "(deleted)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Modification,
    Deletion,
}

/// Two competing changes to the same subject and predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub kind: ConflictKind,
    pub subject: Term,
    pub predicate: Term,
    pub local_value: String,
    pub remote_value: String,
    /// What the local side holds for (subject, predicate).
    pub local_statements: Vec<Statement>,
    /// What the remote side holds for (subject, predicate).
    pub remote_statements: Vec<Statement>,
}

impl Conflict {
    fn modification(
        subject: &Term,
        predicate: &Term,
        local_value: impl Into<String>,
        remote_value: impl Into<String>,
        local: &Store,
        remote: &Store,
    ) -> Self {
        Self {
            kind: ConflictKind::Modification,
            subject: subject.clone(),
            predicate: predicate.clone(),
            local_value: local_value.into(),
            remote_value: remote_value.into(),
            local_statements: holding(local, subject, predicate),
            remote_statements: holding(remote, subject, predicate),
        }
    }
    fn concerns(&self, subject: &Term, predicate: &Term) -> bool {
        &self.subject == subject && &self.predicate == predicate
    }
}

fn holding(store: &Store, subject: &Term, predicate: &Term) -> Vec<Statement> {
    store
        .matching(Some(subject), Some(predicate), None, None)
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
pub struct MergeResult {
    pub merged: Store,
    pub conflicts: Vec<Conflict>,
    pub auto_merged: bool,
}

// ------------- Policy -------------
/// Predicate cardinality knowledge used while merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicy {
    single_valued: HashSet<Term>,
}

impl MergePolicy {
    /// Treats every predicate as multi-valued, so concurrent additions are
    /// always kept side by side.
    pub fn parity() -> Self {
        Self {
            single_valued: HashSet::new(),
        }
    }
    pub fn from_iris<I, S>(iris: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let single_valued = iris
            .into_iter()
            .map(Term::iri)
            .collect::<Result<HashSet<_>>>()?;
        Ok(Self { single_valued })
    }
    pub fn is_single_valued(&self, predicate: &Term) -> bool {
        self.single_valued.contains(predicate)
    }
}

impl Default for MergePolicy {
    /// `skos:prefLabel` and `skos:definition` are single-valued. Values in
    /// different languages do not compete with each other.
    fn default() -> Self {
        let single_valued = [&*predicates::PREF_LABEL, &*predicates::DEFINITION]
            .into_iter()
            .cloned()
            .collect();
        Self { single_valued }
    }
}

// ------------- Merge -------------
/// Merges with the default policy.
pub fn merge(base: &Store, local: &Store, remote: &Store) -> MergeResult {
    merge_with_policy(base, local, remote, &MergePolicy::default())
}

pub fn merge_with_policy(
    base: &Store,
    local: &Store,
    remote: &Store,
    policy: &MergePolicy,
) -> MergeResult {
    let ours = Delta::between(base, local);
    let theirs = Delta::between(base, remote);

    let mut merged = base.clone();
    merged.extend(ours.added.iter().cloned());
    merged.extend(theirs.added.iter().cloned());

    for statement in intersection(&ours.removed, &theirs.removed) {
        merged.remove(&statement);
    }

    let mut conflicts = Vec::new();

    // deleted here, possibly changed there
    for statement in subtract(&ours.removed, &theirs.removed) {
        match competing(remote, &statement) {
            Some(object) => conflicts.push(Conflict::modification(
                statement.subject(),
                statement.predicate(),
                DELETED,
                object.value(),
                local,
                remote,
            )),
            None => {
                merged.remove(&statement);
            }
        }
    }
    // deleted there, possibly changed here
    for statement in subtract(&theirs.removed, &ours.removed) {
        match competing(local, &statement) {
            Some(object) => conflicts.push(Conflict::modification(
                statement.subject(),
                statement.predicate(),
                object.value(),
                DELETED,
                local,
                remote,
            )),
            None => {
                merged.remove(&statement);
            }
        }
    }

    // both sides set a single-valued predicate to different values, per language
    let mut seen: HashSet<(&Term, &Term, Option<&str>)> = HashSet::new();
    for statement in &ours.added {
        let (subject, predicate) = (statement.subject(), statement.predicate());
        let language = language(statement.object());
        if !policy.is_single_valued(predicate) || !seen.insert((subject, predicate, language)) {
            continue;
        }
        if conflicts.iter().any(|c| c.concerns(subject, predicate)) {
            continue;
        }
        let local_objects = added_objects(&ours.added, subject, predicate, language);
        let remote_objects = added_objects(&theirs.added, subject, predicate, language);
        if remote_objects.is_empty() || same_objects(&local_objects, &remote_objects) {
            continue;
        }
        conflicts.push(Conflict::modification(
            subject,
            predicate,
            distinct_value(&local_objects, &remote_objects),
            distinct_value(&remote_objects, &local_objects),
            local,
            remote,
        ));
    }

    debug!(
        local_added = ours.added.len(),
        local_removed = ours.removed.len(),
        remote_added = theirs.added.len(),
        remote_removed = theirs.removed.len(),
        conflicts = conflicts.len(),
        "merged"
    );

    let auto_merged = conflicts.is_empty();
    MergeResult {
        merged,
        conflicts,
        auto_merged,
    }
}

/// The object of the first statement in `other` that shares subject and
/// predicate with `removed`, when it differs from the removed object.
fn competing<'a>(other: &'a Store, removed: &Statement) -> Option<&'a Term> {
    other
        .first(removed.subject(), removed.predicate())
        .map(Statement::object)
        .filter(|object| *object != removed.object())
}

fn language(term: &Term) -> Option<&str> {
    term.as_literal().and_then(Literal::language)
}

/// Objects added for (subject, predicate) in one language, in addition order.
fn added_objects<'a>(
    added: &'a [Statement],
    subject: &Term,
    predicate: &Term,
    lang: Option<&str>,
) -> Vec<&'a Term> {
    added
        .iter()
        .filter(|s| s.subject() == subject && s.predicate() == predicate)
        .map(Statement::object)
        .filter(|object| language(object) == lang)
        .collect()
}

fn same_objects(ours: &[&Term], theirs: &[&Term]) -> bool {
    ours.iter().collect::<HashSet<_>>() == theirs.iter().collect::<HashSet<_>>()
}

/// The first of `objects` the other side did not add, else the first of `objects`.
fn distinct_value<'a>(objects: &[&'a Term], other: &[&Term]) -> &'a str {
    objects
        .iter()
        .find(|&&object| !other.iter().any(|&o| o == object))
        .or(objects.first())
        .map_or("", |object| object.value())
}
