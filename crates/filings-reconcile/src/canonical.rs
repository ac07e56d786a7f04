//! Grouping and duplicate resolution.
//!
//! Raw facts are grouped by concept and segment, then by reporting slot
//! (source form and period). A slot can hold several records: the same figure
//! repeated as a comparative in later filings, a restatement, or one member
//! reported on two axes. Exactly one record per slot feeds the computations.

use filings_core::period::fiscal_year;
use filings_core::{AxisPriority, CONSOLIDATED, FactRecord, Period, SourceForm};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::report::{Diagnostic, DiagnosticKind};

/// Identity of a reconciled series.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// Concept name.
    pub concept: String,
    /// Segment label.
    pub segment: String,
    /// Secondary business segment label.
    pub business_segment: Option<String>,
}

impl GroupKey {
    /// Key of the series a record belongs to.
    #[must_use]
    pub fn of(fact: &FactRecord) -> Self {
        Self {
            concept: fact.concept().to_string(),
            segment: fact.segment().label().to_string(),
            business_segment: fact.business_segment().map(str::to_string),
        }
    }

    /// Returns true for the whole-company series.
    #[must_use]
    pub fn is_consolidated(&self) -> bool {
        self.segment == CONSOLIDATED && self.business_segment.is_none()
    }
}

/// One series with a single chosen record per slot.
#[derive(Clone, Debug)]
pub struct CanonicalGroup<'a> {
    /// Series identity.
    pub key: GroupKey,
    /// Chosen records ordered by source form, then period.
    pub facts: Vec<&'a FactRecord>,
}

impl<'a> CanonicalGroup<'a> {
    /// Chosen records of one source form.
    pub fn from_source(&self, form: SourceForm) -> impl Iterator<Item = &'a FactRecord> + '_ {
        self.facts
            .iter()
            .copied()
            .filter(move |f| f.source_form() == form)
    }
}

type Slot = (SourceForm, Period);

/// Groups raw facts and picks one record per slot.
///
/// The winner of a slot has the lowest axis rank, then the latest filing
/// date, then the earliest position in `facts`. Slots whose members disagree
/// on the value add a [`DiagnosticKind::DuplicateConflict`].
pub fn canonicalize<'a>(
    facts: &'a [FactRecord],
    priority: &AxisPriority,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<CanonicalGroup<'a>> {
    let mut grouped: BTreeMap<GroupKey, BTreeMap<Slot, Vec<(usize, &'a FactRecord)>>> =
        BTreeMap::new();
    for (index, fact) in facts.iter().enumerate() {
        grouped
            .entry(GroupKey::of(fact))
            .or_default()
            .entry((fact.source_form(), *fact.period()))
            .or_default()
            .push((index, fact));
    }

    let mut groups = Vec::with_capacity(grouped.len());
    for (key, slots) in grouped {
        let mut chosen = Vec::with_capacity(slots.len());
        for ((_, period), members) in slots {
            let Some(&(_, winner)) = members.iter().min_by_key(|(index, fact)| {
                (
                    priority.rank(fact.segment().axis()),
                    Reverse(fact.filing_date()),
                    *index,
                )
            }) else {
                continue;
            };

            let mut distinct: Vec<f64> = Vec::new();
            for (_, fact) in &members {
                if !distinct.contains(&fact.value()) {
                    distinct.push(fact.value());
                }
            }
            if distinct.len() > 1 {
                let message = format!(
                    "{} competing values for period ending {}; kept {} from {}",
                    distinct.len(),
                    period.end(),
                    winner.value(),
                    winner.filing_id().unwrap_or("unknown filing"),
                );
                warn!(concept = %key.concept, segment = %key.segment, "{message}");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateConflict {
                        values: distinct.len(),
                    },
                    &key,
                    Some(fiscal_year(period.end())),
                    message,
                ));
            } else if members.len() > 1 {
                debug!(
                    concept = %key.concept,
                    segment = %key.segment,
                    repeats = members.len(),
                    "Collapsed repeated fact"
                );
            }
            chosen.push(winner);
        }
        groups.push(CanonicalGroup {
            key,
            facts: chosen,
        });
    }
    groups
}
