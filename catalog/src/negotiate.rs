//! Content negotiation for catalog responses.
//!
//! A format is chosen from, in order: an explicit path suffix, the `Accept`
//! header, and finally a configured default. An `Accept` header naming
//! nothing we serve falls back to the default. Negotiation fails for an
//! unknown explicit suffix, or when the header refuses every format with
//! `q=0`.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ResponseEnvelope;
use crate::serializer::{jsonld, ntriples, rdfxml, turtle};

/// RDF serializations the catalog can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Turtle 1.1.
    Turtle,
    /// RDF/XML.
    RdfXml,
    /// JSON-LD 1.1.
    JsonLd,
    /// N-Triples.
    NTriples,
}

/// Errors raised while negotiating or rendering a response.
#[derive(Debug, Error)]
pub enum NegotiateError {
    /// The requested suffix names no supported format.
    #[error("the format '{0}' is not supported; use one of ttl, rdf, json, nt")]
    UnsupportedFormat(String),
    /// The `Accept` header refuses every format we serve.
    #[error("none of the supported formats is acceptable for '{0}'")]
    NotAcceptable(String),
    /// The JSON-LD document could not be written.
    #[error("failed to serialize JSON-LD")]
    Serialization(#[from] serde_json::Error),
}

impl Format {
    /// Every supported format, in preference order for wildcard requests.
    pub const ALL: [Format; 4] = [
        Format::Turtle,
        Format::RdfXml,
        Format::JsonLd,
        Format::NTriples,
    ];

    fn suffixes(self) -> &'static [&'static str] {
        match self {
            Format::Turtle => &["ttl", "turtle"],
            Format::RdfXml => &["rdf", "xml", "rdfxml"],
            Format::JsonLd => &["json", "jsonld"],
            Format::NTriples => &["nt", "ntriples"],
        }
    }

    fn media_types(self) -> &'static [&'static str] {
        match self {
            Format::Turtle => &["text/turtle", "application/x-turtle"],
            Format::RdfXml => &["application/rdf+xml", "application/xml", "text/xml"],
            Format::JsonLd => &["application/ld+json", "application/json"],
            Format::NTriples => &["application/n-triples", "text/plain"],
        }
    }

    /// Canonical path suffix (e.g. `"ttl"`).
    #[must_use]
    pub fn suffix(self) -> &'static str {
        self.suffixes()[0]
    }

    /// Canonical media type (e.g. `"text/turtle"`).
    #[must_use]
    pub fn media_type(self) -> &'static str {
        self.media_types()[0]
    }

    /// Value of the `Content-Type` header for this format.
    #[must_use]
    pub fn content_type(self) -> String {
        format!("{}; charset=utf-8", self.media_type())
    }

    /// Looks up a format by path suffix, ignoring case.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Format> {
        Format::ALL.into_iter().find(|f| {
            f.suffixes()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(suffix))
        })
    }

    /// Renders `envelope` in this format.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiateError::Serialization`] if the JSON-LD document
    /// cannot be written.
    pub fn render(self, envelope: &ResponseEnvelope) -> Result<Vec<u8>, NegotiateError> {
        let graph = &envelope.graph;
        let namespaces = &envelope.semantic.namespaces;
        Ok(match self {
            Format::Turtle => turtle::to_turtle(graph, namespaces).into_bytes(),
            Format::NTriples => ntriples::to_ntriples(graph).into_bytes(),
            Format::RdfXml => rdfxml::to_rdf_xml(graph, namespaces).into_bytes(),
            Format::JsonLd => {
                let mut body = serde_json::to_vec_pretty(&jsonld::to_json_ld(graph, namespaces))?;
                body.push(b'\n');
                body
            }
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Turtle => "turtle",
            Format::RdfXml => "rdfxml",
            Format::JsonLd => "jsonld",
            Format::NTriples => "ntriples",
        })
    }
}

impl FromStr for Format {
    type Err = NegotiateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_suffix(s.trim()).ok_or_else(|| NegotiateError::UnsupportedFormat(s.to_owned()))
    }
}

/// A rendered response body and the format it was rendered in.
#[derive(Debug, Clone)]
pub struct Negotiated {
    /// The chosen format.
    pub format: Format,
    /// Serialized graph.
    pub body: Vec<u8>,
}

/// Picks the response format.
///
/// # Errors
///
/// Returns [`NegotiateError::UnsupportedFormat`] if `explicit` is present but
/// unrecognized, or [`NegotiateError::NotAcceptable`] if `accept` refuses
/// every format.
pub fn select_format(
    explicit: Option<&str>,
    accept: Option<&str>,
    default: Format,
) -> Result<Format, NegotiateError> {
    if let Some(suffix) = explicit {
        return suffix.parse();
    }
    let Some(header) = accept else {
        return Ok(default);
    };

    let acceptance = rank_accepted(header, default);
    if let Some(format) = acceptance.best {
        return Ok(format);
    }
    // Nothing matched positively: the default stands unless it was refused.
    std::iter::once(default)
        .chain(Format::ALL)
        .find(|format| !acceptance.refused.contains(format))
        .ok_or_else(|| NegotiateError::NotAcceptable(header.to_owned()))
}

/// Selects a format and renders `envelope` in it.
///
/// # Errors
///
/// Returns the [`select_format`] errors, or [`NegotiateError::Serialization`]
/// if rendering fails.
pub fn negotiate(
    envelope: &ResponseEnvelope,
    explicit: Option<&str>,
    accept: Option<&str>,
    default: Format,
) -> Result<Negotiated, NegotiateError> {
    let format = select_format(explicit, accept, default)?;
    let body = format.render(envelope)?;
    Ok(Negotiated { format, body })
}

/// One entry of an `Accept` header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MediaRange {
    type_: String,
    subtype: String,
    /// Quality in thousandths, 0..=1000.
    q: u16,
}

impl MediaRange {
    /// 2 for `type/subtype`, 1 for `type/*`, 0 for `*/*`; `None` if no match.
    fn specificity(&self, media_type: &str) -> Option<u8> {
        let (type_, subtype) = media_type.split_once('/')?;
        match (self.type_.as_str(), self.subtype.as_str()) {
            ("*", "*") => Some(0),
            (t, "*") if t.eq_ignore_ascii_case(type_) => Some(1),
            (t, s) if t.eq_ignore_ascii_case(type_) && s.eq_ignore_ascii_case(subtype) => Some(2),
            _ => None,
        }
    }
}

fn parse_accept(header: &str) -> Vec<MediaRange> {
    header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let (type_, subtype) = parts.next()?.trim().split_once('/')?;
            let (type_, subtype) = (type_.trim(), subtype.trim());
            if type_.is_empty() || subtype.is_empty() {
                return None;
            }
            let mut q = 1000;
            for param in parts {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if key.trim().eq_ignore_ascii_case("q") {
                    q = parse_quality(value.trim())?;
                    break;
                }
            }
            Some(MediaRange {
                type_: type_.to_owned(),
                subtype: subtype.to_owned(),
                q,
            })
        })
        .collect()
}

fn parse_quality(value: &str) -> Option<u16> {
    let q: f32 = value.parse().ok()?;
    if !(0.0..=1.0).contains(&q) {
        return None;
    }
    // Bounded to 0..=1000 by the range check above.
    Some((q * 1000.0).round() as u16)
}

/// Ranking key of a match: quality, specificity, earlier header position.
type Score = (u16, u8, Reverse<usize>);

/// Outcome of ranking the formats against an `Accept` header.
#[derive(Debug, Default)]
struct Acceptance {
    /// Highest-ranked format with a positive quality.
    best: Option<Format>,
    /// Formats the header excludes with `q=0`.
    refused: Vec<Format>,
}

/// Ranks every format against `header`.
///
/// Each media type takes the quality of the most specific range matching it.
/// A format is refused when one of its media types is named exactly with
/// `q=0`, or when every one of its media types resolves to `q=0` (as under
/// `*/*;q=0`). The rest are ranked by quality, then by how specific the match
/// was, then by the position of the matching range in the header; `default`
/// wins remaining ties.
fn rank_accepted(header: &str, default: Format) -> Acceptance {
    let ranges = parse_accept(header);
    let candidates =
        std::iter::once(default).chain(Format::ALL.into_iter().filter(|f| *f != default));

    let mut acceptance = Acceptance::default();
    let mut best_score: Option<Score> = None;
    for format in candidates {
        let matches: Vec<Option<Score>> = format
            .media_types()
            .iter()
            .map(|media_type| {
                ranges
                    .iter()
                    .enumerate()
                    .filter_map(|(pos, range)| {
                        range
                            .specificity(media_type)
                            .map(|s| (range.q, s, Reverse(pos)))
                    })
                    .max_by_key(|(_, s, pos)| (*s, *pos))
            })
            .collect();
        let named_zero = matches.iter().flatten().any(|(q, s, _)| *q == 0 && *s == 2);
        let all_zero = matches.iter().all(|m| matches!(m, Some((0, _, _))));
        if named_zero || all_zero {
            acceptance.refused.push(format);
            continue;
        }
        let Some(score) = matches.into_iter().flatten().filter(|(q, _, _)| *q > 0).max() else {
            continue;
        };
        if best_score.map_or(true, |current| score > current) {
            best_score = Some(score);
            acceptance.best = Some(format);
        }
    }
    acceptance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::dcat_envelope;
    use crate::model::DatasetSummary;

    fn envelope() -> ResponseEnvelope {
        let datasets = [DatasetSummary {
            resource_name: "rainfall".to_owned(),
            collection_uri: "weather".to_owned(),
            description: "Rain data".to_owned(),
            created_at: "2020-01-01T00:00:00Z".to_owned(),
            updated_at: "2020-06-01T00:00:00Z".to_owned(),
        }];
        dcat_envelope("http://example.org", &datasets).expect("valid input")
    }

    #[test]
    fn explicit_suffix_wins_over_accept() {
        let format = select_format(Some("json"), Some("text/turtle"), Format::Turtle)
            .expect("json is supported");
        assert_eq!(format, Format::JsonLd);
        assert_eq!(
            select_format(Some("NT"), None, Format::Turtle).expect("nt is supported"),
            Format::NTriples
        );
    }

    #[test]
    fn unknown_suffix_is_rejected() {
        let err = select_format(Some("csv"), Some("text/turtle"), Format::Turtle)
            .expect_err("csv is not an RDF format");
        assert!(matches!(err, NegotiateError::UnsupportedFormat(ref s) if s == "csv"));
    }

    #[test]
    fn accept_header_is_used_without_suffix() {
        let pick = |accept| select_format(None, Some(accept), Format::JsonLd).expect("no suffix");
        assert_eq!(pick("text/turtle"), Format::Turtle);
        assert_eq!(pick("application/rdf+xml"), Format::RdfXml);
        assert_eq!(pick("application/n-triples"), Format::NTriples);
        assert_eq!(pick("TEXT/Turtle; charset=utf-8"), Format::Turtle);
    }

    #[test]
    fn quality_values_order_the_choice() {
        let pick = |accept| select_format(None, Some(accept), Format::Turtle).expect("no suffix");
        assert_eq!(
            pick("text/turtle;q=0.5, application/ld+json;q=0.9"),
            Format::JsonLd
        );
        assert_eq!(
            pick("application/ld+json;q=0, */*;q=0.1"),
            Format::Turtle
        );
        assert_eq!(
            pick("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
            Format::RdfXml
        );
    }

    #[test]
    fn specific_range_overrides_wildcard() {
        let format = select_format(
            None,
            Some("*/*;q=0.9, text/turtle;q=0"),
            Format::Turtle,
        )
        .expect("no suffix");
        assert_ne!(format, Format::Turtle);
    }

    #[test]
    fn wildcards_and_unknown_types_fall_back_to_default() {
        for accept in ["*/*", "text/html", "", "garbage", "text/turtle;q=nope"] {
            assert_eq!(
                select_format(None, Some(accept), Format::NTriples).expect("no suffix"),
                Format::NTriples,
                "accept header {accept:?}"
            );
        }
        assert_eq!(
            select_format(None, None, Format::RdfXml).expect("no suffix"),
            Format::RdfXml
        );
    }

    #[test]
    fn refused_default_is_not_served() {
        let turtle = select_format(None, Some("text/turtle;q=0"), Format::Turtle)
            .expect("other formats remain acceptable");
        assert_ne!(turtle, Format::Turtle);
        assert_eq!(turtle, Format::RdfXml);

        let json = select_format(None, Some("application/ld+json;q=0"), Format::JsonLd)
            .expect("other formats remain acceptable");
        assert_eq!(json, Format::Turtle);
    }

    #[test]
    fn refusing_everything_is_not_acceptable() {
        for accept in ["*/*;q=0", "text/*;q=0, application/*;q=0"] {
            let err = select_format(None, Some(accept), Format::Turtle)
                .expect_err("every format is refused");
            assert!(matches!(err, NegotiateError::NotAcceptable(_)), "{accept:?}");
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let envelope = envelope();
        for format in Format::ALL {
            let first = format.render(&envelope).expect("renders");
            let second = format.render(&envelope).expect("renders");
            assert_eq!(first, second, "{format} output differs between runs");
        }
    }

    #[test]
    fn negotiate_reports_chosen_format() {
        let negotiated =
            negotiate(&envelope(), Some("json"), None, Format::Turtle).expect("json is supported");
        assert_eq!(negotiated.format, Format::JsonLd);
        assert_eq!(negotiated.format.content_type(), "application/ld+json; charset=utf-8");
        let body: serde_json::Value =
            serde_json::from_slice(&negotiated.body).expect("body is JSON");
        assert!(body["@graph"].is_array());
    }

    #[test]
    fn canonical_names_round_trip() {
        for format in Format::ALL {
            assert_eq!(Format::from_suffix(format.suffix()), Some(format));
            assert_eq!(
                select_format(None, Some(format.media_type()), Format::Turtle)
                    .expect("canonical media type is accepted"),
                format
            );
        }
    }
}
