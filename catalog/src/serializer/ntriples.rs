//! N-Triples serializer for catalog graphs.
//!
//! Produces one triple per line with absolute IRIs. Literals are plain
//! strings, matching the Turtle rendering.

use crate::model::{Graph, Term};

/// Serializes `graph` to an N-Triples string.
#[must_use]
pub fn to_ntriples(graph: &Graph) -> String {
    let mut out = String::with_capacity(graph.len() * 128);
    for t in graph.triples() {
        out.push_str(&iri(&t.subject));
        out.push(' ');
        out.push_str(&iri(&t.predicate));
        out.push(' ');
        out.push_str(&object(&t.object));
        out.push_str(" .\n");
    }
    out
}

/// Writes `s` as an IRIREF, escaping characters IRIREF does not allow.
pub(crate) fn iri(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('<');
    for c in s.chars() {
        match c {
            '\u{0}'..='\u{20}' | '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                out.push_str(&format!("\\u{:04X}", u32::from(c)));
            }
            _ => out.push(c),
        }
    }
    out.push('>');
    out
}

/// Writes `s` as a double-quoted string literal.
pub(crate) fn literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn object(term: &Term) -> String {
    match term {
        Term::Iri(value) => iri(value),
        Term::Literal(value) => literal(value),
    }
}
