//! RDF/XML serializer for catalog graphs.
//!
//! Writes an `rdf:RDF` root declaring every namespace of the envelope and one
//! `rdf:Description` per subject. Predicates outside the namespace table get
//! a local `ns0` declaration on their own element.

use crate::model::{Graph, Term};
use crate::namespaces::{split_iri, Namespace};

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Serializes `graph` to an RDF/XML string using `namespaces` for element names.
#[must_use]
pub fn to_rdf_xml(graph: &Graph, namespaces: &[Namespace]) -> String {
    let mut out = String::with_capacity(graph.len() * 128 + 512);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rdf:RDF");

    if !namespaces.iter().any(|ns| ns.prefix == "rdf") {
        out.push_str(&format!("\n  xmlns:rdf=\"{RDF_NS}\""));
    }
    for ns in namespaces {
        out.push_str(&format!("\n  xmlns:{}=\"{}\"", ns.prefix, escape(ns.iri)));
    }
    out.push_str(">\n");

    for (subject, triples) in graph.by_subject() {
        out.push_str(&format!(
            "  <rdf:Description rdf:about=\"{}\">\n",
            escape(subject)
        ));
        for t in triples {
            let Some(element) = element(&t.predicate, namespaces) else {
                tracing::warn!(predicate = %t.predicate, "predicate has no XML name; dropped from RDF/XML output");
                continue;
            };
            let (open, close) = match &element {
                Element::Prefixed(qname) => (qname.clone(), qname.clone()),
                Element::Local { local, ns } => (
                    format!("ns0:{local} xmlns:ns0=\"{}\"", escape(ns)),
                    format!("ns0:{local}"),
                ),
            };
            match &t.object {
                Term::Iri(value) => {
                    out.push_str(&format!("    <{open} rdf:resource=\"{}\"/>\n", escape(value)));
                }
                Term::Literal(value) => {
                    out.push_str(&format!("    <{open}>{}</{close}>\n", escape(value)));
                }
            }
        }
        out.push_str("  </rdf:Description>\n");
    }

    out.push_str("</rdf:RDF>\n");
    out
}

enum Element<'a> {
    Prefixed(String),
    Local { local: &'a str, ns: &'a str },
}

fn element<'a>(predicate: &'a str, namespaces: &[Namespace]) -> Option<Element<'a>> {
    if let Some((ns, local)) = split_iri(predicate, namespaces) {
        if is_ncname(local) {
            return Some(Element::Prefixed(format!("{}:{}", ns.prefix, local)));
        }
    }
    if let Some(local) = predicate.strip_prefix(RDF_NS) {
        if is_ncname(local) {
            return Some(Element::Prefixed(format!("rdf:{local}")));
        }
    }
    // Split after the last '#' or '/' and declare the namespace inline.
    let cut = predicate.rfind(['#', '/'])? + 1;
    let (ns, local) = predicate.split_at(cut);
    is_ncname(local).then_some(Element::Local { local, ns })
}

/// A conservative subset of XML NCName.
fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Escapes text for element content and attribute values.
///
/// Tab, newline and carriage return become character references so parsers
/// do not normalize them away. Characters XML 1.0 cannot carry at all are
/// replaced with U+FFFD.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    !matches!(c, '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}
