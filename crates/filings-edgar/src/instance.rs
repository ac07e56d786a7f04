//! XBRL instance document parser.
//!
//! Reads `context` definitions (period plus explicit dimension members) and
//! every element carrying a `contextRef` with a numeric body. Facts may appear
//! before their context, so they are buffered and resolved at end of input.

use chrono::NaiveDate;
use filings_core::{
    FactParser, FactRecord, FilingDescriptor, FilingsError, Period, Result, Segment,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Joins the other members of a multi-axis context into a business segment label.
const MEMBER_SEPARATOR: &str = "+";

/// Streaming parser for XBRL instance documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstanceParser;

impl InstanceParser {
    /// Creates a parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FactParser for InstanceParser {
    fn parse_facts(&self, document: &[u8], filing: &FilingDescriptor) -> Result<Vec<FactRecord>> {
        let raw = scan(document)?;
        if raw.contexts.is_empty() {
            return Err(FilingsError::Parse(format!(
                "No contexts in instance document for {}",
                filing.accession
            )));
        }

        let mut contexts = HashMap::with_capacity(raw.contexts.len());
        let mut unusable = 0usize;
        for context in raw.contexts {
            match context.resolve() {
                Some(resolved) => {
                    contexts.insert(context.id, resolved);
                }
                None => unusable += 1,
            }
        }
        if unusable > 0 {
            warn!(
                accession = %filing.accession,
                unusable,
                "Skipped contexts without a usable period"
            );
        }

        let source_form = filing.form.source_form();
        let mut records = Vec::with_capacity(raw.facts.len());
        let mut orphaned = 0usize;
        for fact in raw.facts {
            let Some(context) = contexts.get(&fact.context_ref) else {
                orphaned += 1;
                continue;
            };
            let base = FactRecord::new(fact.concept, fact.value, context.period, source_form)
                .with_provenance(filing);

            if context.members.is_empty() {
                records.push(base);
                continue;
            }
            for (index, (axis, member)) in context.members.iter().enumerate() {
                let mut record = base
                    .clone()
                    .with_segment(Segment::on_axis(axis.as_str(), member.as_str()));
                if context.members.len() > 1 {
                    let others: Vec<&str> = context
                        .members
                        .iter()
                        .enumerate()
                        .filter(|(other, _)| *other != index)
                        .map(|(_, (_, m))| m.as_str())
                        .collect();
                    record = record.with_business_segment(others.join(MEMBER_SEPARATOR));
                }
                records.push(record);
            }
        }
        if orphaned > 0 {
            debug!(accession = %filing.accession, orphaned, "Facts without a usable context");
        }

        debug!(
            accession = %filing.accession,
            contexts = contexts.len(),
            records = records.len(),
            "Parsed instance document"
        );
        Ok(records)
    }
}

// ============================================================================
// Scanning
// ============================================================================

#[derive(Debug, Default)]
struct RawContext {
    id: String,
    instant: Option<String>,
    start: Option<String>,
    end: Option<String>,
    members: Vec<(String, String)>,
}

#[derive(Debug)]
struct ResolvedContext {
    period: Period,
    members: Vec<(String, String)>,
}

impl RawContext {
    fn resolve(&self) -> Option<ResolvedContext> {
        let period = if let Some(instant) = &self.instant {
            Period::instant(parse_date(instant)?)
        } else {
            let start = parse_date(self.start.as_deref()?)?;
            let end = parse_date(self.end.as_deref()?)?;
            match Period::duration(start, end) {
                Ok(period) => period,
                Err(e) => {
                    debug!(context = %self.id, error = %e, "Rejected context period");
                    return None;
                }
            }
        };
        Some(ResolvedContext {
            period,
            members: self.members.clone(),
        })
    }
}

#[derive(Debug)]
struct RawFact {
    concept: String,
    context_ref: String,
    value: f64,
}

#[derive(Debug, Default)]
struct Scan {
    contexts: Vec<RawContext>,
    facts: Vec<RawFact>,
}

/// Element whose text body is being read.
#[derive(Debug)]
enum Target {
    Instant,
    StartDate,
    EndDate,
    Member { axis: String },
    Fact { concept: String, context_ref: String },
}

fn scan(document: &[u8]) -> Result<Scan> {
    let mut reader = Reader::from_reader(document);
    reader.config_mut().trim_text(true);

    let mut scan = Scan::default();
    let mut context: Option<RawContext> = None;
    let mut target: Option<Target> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            FilingsError::Parse(format!(
                "Invalid XML at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = local_name(&e);
                let in_context = context.is_some();
                target = None;
                match (name.as_str(), in_context) {
                    ("context", _) => {
                        context = Some(RawContext {
                            id: attribute(&e, b"id")?.unwrap_or_default(),
                            ..RawContext::default()
                        });
                    }
                    ("instant", true) => target = Some(Target::Instant),
                    ("startDate", true) => target = Some(Target::StartDate),
                    ("endDate", true) => target = Some(Target::EndDate),
                    ("explicitMember", true) => {
                        if let Some(dimension) = attribute(&e, b"dimension")? {
                            target = Some(Target::Member {
                                axis: strip_prefix(&dimension).to_string(),
                            });
                        }
                    }
                    (_, false) => {
                        if let Some(context_ref) = attribute(&e, b"contextRef")? {
                            target = Some(Target::Fact {
                                concept: name.clone(),
                                context_ref,
                            });
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some(current) = target.take() {
                    let text = t
                        .unescape()
                        .map_err(|e| FilingsError::Parse(format!("Invalid text: {e}")))?;
                    let text = text.trim();
                    match (current, context.as_mut()) {
                        (Target::Instant, Some(c)) => c.instant = Some(text.to_string()),
                        (Target::StartDate, Some(c)) => c.start = Some(text.to_string()),
                        (Target::EndDate, Some(c)) => c.end = Some(text.to_string()),
                        (Target::Member { axis }, Some(c)) => {
                            c.members.push((axis, strip_prefix(text).to_string()));
                        }
                        (
                            Target::Fact {
                                concept,
                                context_ref,
                            },
                            _,
                        ) => {
                            // Text blocks and other non-numeric facts are ignored
                            if let Ok(value) = text.parse::<f64>()
                                && value.is_finite()
                            {
                                scan.facts.push(RawFact {
                                    concept,
                                    context_ref,
                                    value,
                                });
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                target = None;
                if e.local_name().as_ref() == b"context"
                    && let Some(finished) = context.take()
                {
                    scan.contexts.push(finished);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(scan)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| FilingsError::Parse(format!("Invalid attribute: {e}")))?;
        if attr.key.local_name().as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| FilingsError::Parse(format!("Invalid attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Drops a namespace prefix (`us-gaap:Revenues` -> `Revenues`).
fn strip_prefix(qualified: &str) -> &str {
    qualified
        .split_once(':')
        .map_or(qualified, |(_, local)| local)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

// ============================================================================
// Tests
// ============================================================================
