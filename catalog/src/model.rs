//! Core catalog model types.
//!
//! A catalog is described as an RDF graph: an ordered set of [`Triple`]s built
//! through a [`GraphBuilder`] and then frozen into an immutable [`Graph`].
//! The graph travels to the content negotiator inside a [`ResponseEnvelope`]
//! together with the namespace table used to abbreviate IRIs.

use std::collections::{HashMap, HashSet};

use crate::namespaces::Namespace;

/// A dataset as listed by the platform's dataset store.
///
/// Timestamps are kept in the lexical form the store returned them in; the
/// catalog builder parses them and reports malformed values per record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetSummary {
    /// Resource name, the last path segment of the dataset URI (e.g. `"rainfall"`).
    pub resource_name: String,
    /// Collection path the resource is published under (e.g. `"weather"`).
    pub collection_uri: String,
    /// Free-text description of the dataset.
    pub description: String,
    /// Creation timestamp as stored (RFC 3339 or `YYYY-MM-DD HH:MM:SS`).
    pub created_at: String,
    /// Last-update timestamp as stored (RFC 3339 or `YYYY-MM-DD HH:MM:SS`).
    pub updated_at: String,
}

impl DatasetSummary {
    /// Returns the identifier used when reporting problems with this record:
    /// `collection/resource`.
    #[must_use]
    pub fn record_id(&self) -> String {
        format!("{}/{}", self.collection_uri, self.resource_name)
    }
}

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An absolute IRI reference.
    Iri(String),
    /// A plain string literal.
    Literal(String),
}

/// A single RDF statement. Subjects and predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    /// Subject IRI.
    pub subject: String,
    /// Predicate IRI.
    pub predicate: String,
    /// Object IRI or literal.
    pub object: Term,
}

/// Append-only builder for a [`Graph`].
///
/// Triples keep their insertion order; appending a triple that is already
/// present leaves the builder unchanged.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
}

impl GraphBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `triple`. Returns `false` if it was already present.
    pub fn push(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Appends a statement whose object is an IRI.
    pub fn add_resource(&mut self, subject: &str, predicate: &str, object: &str) -> bool {
        self.push(Triple {
            subject: subject.to_owned(),
            predicate: predicate.to_owned(),
            object: Term::Iri(object.to_owned()),
        })
    }

    /// Appends a statement whose object is a plain literal.
    pub fn add_literal(&mut self, subject: &str, predicate: &str, value: &str) -> bool {
        self.push(Triple {
            subject: subject.to_owned(),
            predicate: predicate.to_owned(),
            object: Term::Literal(value.to_owned()),
        })
    }

    /// Number of triples appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns `true` if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Freezes the builder into an immutable graph.
    #[must_use]
    pub fn freeze(self) -> Graph {
        Graph {
            triples: self.triples,
        }
    }
}

/// An immutable, ordered set of triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    /// All triples in insertion order.
    #[must_use]
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns `true` if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns `true` if the exact statement is in the graph.
    #[must_use]
    pub fn contains(&self, subject: &str, predicate: &str, object: &Term) -> bool {
        self.triples
            .iter()
            .any(|t| t.subject == subject && t.predicate == predicate && &t.object == object)
    }

    /// Objects of every statement matching `(subject, predicate, _)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Subjects of every statement matching `(_, predicate, object)`.
    ///
    /// `object` is only borrowed for the call; the iterator owns a copy.
    pub fn subjects_with<'a>(
        &'a self,
        predicate: &'a str,
        object: &Term,
    ) -> impl Iterator<Item = &'a str> + 'a {
        let object = object.clone();
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && t.object == object)
            .map(|t| t.subject.as_str())
    }

    /// Groups the triples by subject, subjects in order of first appearance.
    ///
    /// Serializers use this to write one node per subject while keeping the
    /// output independent of hashing order.
    #[must_use]
    pub fn by_subject(&self) -> Vec<(&str, Vec<&Triple>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&Triple>)> = Vec::new();
        for triple in &self.triples {
            let slot = *index.entry(triple.subject.as_str()).or_insert_with(|| {
                groups.push((triple.subject.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(triple);
        }
        groups
    }
}

/// Serialization hints handed to the negotiator alongside a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticConf {
    /// Prefix table used to abbreviate IRIs, in declaration order.
    pub namespaces: Vec<Namespace>,
}

/// A negotiable response: the graph plus everything needed to render it.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    /// The frozen catalog graph.
    pub graph: Graph,
    /// Namespace hints for the serializers.
    pub semantic: SemanticConf,
    /// Label of the resource being rendered (e.g. `"dcat"`), used for file names.
    pub resource_label: String,
}
