//! JSON-LD 1.1 serializer for catalog graphs.
//!
//! Produces a single document with an `@context` built from the namespace
//! table and an `@graph` array holding one node object per subject.

use serde_json::{json, Map, Value};

use crate::model::{Graph, Term, Triple};
use crate::namespaces::{iris, split_iri, Namespace};

/// Serializes `graph` to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(graph: &Graph, namespaces: &[Namespace]) -> Value {
    let mut context = Map::new();
    for ns in namespaces {
        context.insert(ns.prefix.to_owned(), json!(ns.iri));
    }

    let nodes: Vec<Value> = graph
        .by_subject()
        .into_iter()
        .map(|(subject, triples)| node(subject, &triples, namespaces))
        .collect();

    json!({
        "@context": Value::Object(context),
        "@graph": nodes
    })
}

fn node(subject: &str, triples: &[&Triple], namespaces: &[Namespace]) -> Value {
    let mut map = Map::new();
    map.insert("@id".to_owned(), json!(subject));

    for t in triples {
        let (key, value) = match (&t.object, t.predicate.as_str()) {
            (Term::Iri(class), iris::RDF_TYPE) => ("@type".to_owned(), json!(shorten(class, namespaces))),
            (Term::Iri(target), predicate) => (shorten(predicate, namespaces), json!({ "@id": target })),
            (Term::Literal(value), predicate) => (shorten(predicate, namespaces), json!(value)),
        };
        // Repeated keys are promoted to an array rather than overwritten.
        match map.get_mut(&key) {
            Some(existing) => {
                let prev = std::mem::replace(existing, Value::Null);
                *existing = match prev {
                    Value::Array(mut arr) => {
                        arr.push(value);
                        Value::Array(arr)
                    }
                    other => json!([other, value]),
                };
            }
            None => {
                map.insert(key, value);
            }
        }
    }

    Value::Object(map)
}

/// Shortens an IRI to a compact IRI using the namespace table.
fn shorten(iri: &str, namespaces: &[Namespace]) -> String {
    match split_iri(iri, namespaces) {
        Some((ns, local)) if !local.is_empty() && !local.starts_with("//") => {
            format!("{}:{}", ns.prefix, local)
        }
        _ => iri.to_owned(),
    }
}
