//! Serializers for catalog graphs.
//!
//! Four formats are supported:
//! - **Turtle** ([`turtle`]): the default rendering, prefixed and grouped by subject
//! - **N-Triples** ([`ntriples`]): one absolute triple per line
//! - **JSON-LD** ([`jsonld`]): `@context` from the namespace table plus an `@graph` array
//! - **RDF/XML** ([`rdfxml`]): one `rdf:Description` per subject
//!
//! Every serializer walks the graph in insertion order, so the same graph
//! always yields the same bytes.

pub mod jsonld;
pub mod ntriples;
pub mod rdfxml;
pub mod turtle;
