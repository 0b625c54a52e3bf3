//! Turtle 1.1 serializer for catalog graphs.
//!
//! Declares every namespace of the envelope, then writes one block per
//! subject in order of first appearance. IRIs inside a declared namespace are
//! abbreviated when their local part is a plain name.

use crate::model::{Graph, Term};
use crate::namespaces::{iris, split_iri, Namespace};
use crate::serializer::ntriples::{iri, literal};

/// Serializes `graph` to a Turtle string using `namespaces` for prefixes.
#[must_use]
pub fn to_turtle(graph: &Graph, namespaces: &[Namespace]) -> String {
    let mut out = String::with_capacity(graph.len() * 96 + 512);

    let width = namespaces.iter().map(|ns| ns.prefix.len()).max().unwrap_or(0);
    for ns in namespaces {
        out.push_str(&format!(
            "@prefix {:<width$} <{}> .\n",
            format!("{}:", ns.prefix),
            ns.iri,
            width = width + 1
        ));
    }

    for (subject, triples) in graph.by_subject() {
        out.push('\n');
        out.push_str(&name(subject, namespaces));
        let mut first = true;
        for t in triples {
            out.push_str(if first { "\n  " } else { " ;\n  " });
            first = false;
            if t.predicate == iris::RDF_TYPE {
                out.push('a');
            } else {
                out.push_str(&name(&t.predicate, namespaces));
            }
            out.push(' ');
            match &t.object {
                Term::Iri(value) => out.push_str(&name(value, namespaces)),
                Term::Literal(value) => out.push_str(&literal(value)),
            }
        }
        out.push_str(" .\n");
    }

    out
}

fn name(value: &str, namespaces: &[Namespace]) -> String {
    match split_iri(value, namespaces) {
        Some((ns, local)) if is_plain_local(local) => format!("{}:{}", ns.prefix, local),
        _ => iri(value),
    }
}

/// A conservative subset of PN_LOCAL that needs no escaping.
fn is_plain_local(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
