//! Namespace table and vocabulary IRIs used in DCAT documents.
//!
//! The prefix table is fixed: existing catalog consumers match on these exact
//! prefixes, so the order and spelling here are part of the output format.

/// A prefix bound to a namespace IRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    /// The prefix (e.g. `"dcat"`).
    pub prefix: &'static str,
    /// The namespace IRI (e.g. `"http://www.w3.org/ns/dcat#"`).
    pub iri: &'static str,
}

/// Every namespace that may appear in a DCAT document, in declaration order.
pub const DCAT_NAMESPACES: &[Namespace] = &[
    Namespace {
        prefix: "dcat",
        iri: "http://www.w3.org/ns/dcat#",
    },
    Namespace {
        prefix: "dct",
        iri: "http://purl.org/dc/terms/",
    },
    Namespace {
        prefix: "foaf",
        iri: "http://xmlns.com/foaf/0.1/",
    },
    Namespace {
        prefix: "rdf",
        iri: "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    },
    Namespace {
        prefix: "rdfs",
        iri: "http://www.w3.org/2000/01/rdf-schema#",
    },
    Namespace {
        prefix: "owl",
        iri: "http://www.w3.org/2002/07/owl#",
    },
];

/// Splits `iri` into the longest matching namespace and its local part.
///
/// Returns `None` when no namespace in `namespaces` is a prefix of `iri`.
/// The local part may be empty or contain characters a given syntax cannot
/// abbreviate; callers validate it for their format.
#[must_use]
pub fn split_iri<'n, 'i>(
    iri: &'i str,
    namespaces: &'n [Namespace],
) -> Option<(&'n Namespace, &'i str)> {
    namespaces
        .iter()
        .filter_map(|ns| iri.strip_prefix(ns.iri).map(|local| (ns, local)))
        .max_by_key(|(ns, _)| ns.iri.len())
}

/// Standard IRI constants used by the catalog builder.
pub mod iris {
    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// `dcat:Catalog`.
    pub const DCAT_CATALOG: &str = "http://www.w3.org/ns/dcat#Catalog";
    /// `dcat:Dataset`. Also used as the catalog-to-dataset membership predicate.
    pub const DCAT_DATASET: &str = "http://www.w3.org/ns/dcat#Dataset";

    /// `dct:title`.
    pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";
    /// `dct:description`.
    pub const DCT_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    /// `dct:issued`.
    pub const DCT_ISSUED: &str = "http://purl.org/dc/terms/issued";
    /// `dct:modified`.
    pub const DCT_MODIFIED: &str = "http://purl.org/dc/terms/modified";

    /// `foaf:homepage`.
    pub const FOAF_HOMEPAGE: &str = "http://xmlns.com/foaf/0.1/homepage";
}
