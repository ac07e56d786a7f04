//! Year-to-date to discrete quarter normalization.

use chrono::{Days, NaiveDate};
use filings_core::period::{DISCRETE_MAX_DAYS, fiscal_year, span_days};
use filings_core::{FactRecord, Period, PeriodClass, SourceForm};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::canonical::CanonicalGroup;
use crate::report::{Diagnostic, DiagnosticKind};

/// Differences cumulative quarterly figures into discrete quarters.
///
/// Works per calendar year of the period end. Each year-to-date figure,
/// ordered by end date, is reduced by the previous year-to-date figure and by
/// any reported discrete quarters ending in between. The first one of a year
/// is only reduced by the discrete quarters inside it. No record is produced
/// for an end date that already has a directly reported discrete quarter.
///
/// A result still spanning more than one quarter means a quarter is missing.
/// For the first figure of a year the value is kept as-is with a
/// [`DiagnosticKind::MissingCumulativeBaseline`]; later in the year no record
/// is produced and a [`DiagnosticKind::QuarterGap`] is raised.
pub fn normalize_group(
    group: &CanonicalGroup<'_>,
    out: &mut Vec<FactRecord>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut years: BTreeMap<i32, Vec<&FactRecord>> = BTreeMap::new();
    for fact in group.from_source(SourceForm::QuarterReport) {
        if fact.period().is_duration() {
            years.entry(fiscal_year(fact.end_date())).or_default().push(fact);
        }
    }

    for (year, facts) in years {
        let mut cumulative: Vec<&FactRecord> = facts
            .iter()
            .copied()
            .filter(|f| f.class() == Some(PeriodClass::YearToDate))
            .collect();
        if cumulative.is_empty() {
            continue;
        }
        cumulative.sort_by_key(|f| f.end_date());
        cumulative.dedup_by_key(|f| f.end_date());

        let mut reported: BTreeMap<NaiveDate, &FactRecord> = BTreeMap::new();
        for fact in facts
            .iter()
            .copied()
            .filter(|f| f.class() == Some(PeriodClass::Discrete))
        {
            reported.entry(fact.end_date()).or_insert(fact);
        }

        let mut previous: Option<&FactRecord> = None;
        for current in cumulative {
            let end = current.end_date();
            let prior = previous.replace(current);

            if reported.contains_key(&end) {
                debug!(
                    concept = %group.key.concept,
                    %end,
                    "Reported discrete quarter kept over differenced value"
                );
                continue;
            }

            let Some(lower) = (match prior {
                Some(prev) => Some(prev.end_date() + Days::new(1)),
                None => current.period().start(),
            }) else {
                continue;
            };
            let between: Vec<&FactRecord> =
                reported.range(lower..end).map(|(_, f)| *f).collect();

            let value = current.value()
                - prior.map_or(0.0, FactRecord::value)
                - between.iter().map(|f| f.value()).sum::<f64>();
            let start = between
                .last()
                .map_or(lower, |f| f.end_date() + Days::new(1));
            let Ok(period) = Period::duration(start, end) else {
                continue;
            };

            let days = span_days(start, end);
            if days > DISCRETE_MAX_DAYS {
                if prior.is_none() && between.is_empty() {
                    let message = format!(
                        "First cumulative figure ends {end} and spans {days} days; earlier quarters unknown"
                    );
                    warn!(concept = %group.key.concept, segment = %group.key.segment, year, "{message}");
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MissingCumulativeBaseline,
                        &group.key,
                        Some(year),
                        message,
                    ));
                    out.push(current.derive(value, period, SourceForm::NormalizedDiscreteQuarter));
                } else {
                    let message = format!(
                        "Difference from {start} to {end} spans {days} days; a quarter is missing"
                    );
                    warn!(concept = %group.key.concept, segment = %group.key.segment, year, "{message}");
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::QuarterGap { days },
                        &group.key,
                        Some(year),
                        message,
                    ));
                }
                continue;
            }

            out.push(current.derive(value, period, SourceForm::NormalizedDiscreteQuarter));
        }
    }
}
