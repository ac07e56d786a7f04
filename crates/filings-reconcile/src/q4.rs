//! Fourth-quarter synthesis.
//!
//! Annual reports carry full-year figures only, so the fourth quarter never
//! appears as a reported quarter. Balances are copied forward from the
//! year-end instant; flows are the annual total minus the first three quarters.

use chrono::{Days, NaiveDate};
use filings_core::period::fiscal_year;
use filings_core::{FactRecord, Period, PeriodClass, SourceForm};
use tracing::{debug, warn};

use crate::canonical::CanonicalGroup;
use crate::report::{Diagnostic, DiagnosticKind};

/// Quarters a full year is expected to report before the fourth.
pub const QUARTERS_BEFORE_Q4: usize = 3;

const DAYS_PER_QUARTER: i64 = 91;

/// Copies every annual instant forward as a Q4 balance.
pub fn carry_forward_balances(group: &CanonicalGroup<'_>, out: &mut Vec<FactRecord>) {
    for annual in group.from_source(SourceForm::AnnualReport) {
        if annual.period().is_instant() {
            out.push(annual.derive(
                annual.value(),
                *annual.period(),
                SourceForm::SyntheticQ4Balance,
            ));
        }
    }
}

/// Derives Q4 flows from annual totals and the quarters inside each year.
pub fn derive_flows(
    group: &CanonicalGroup<'_>,
    out: &mut Vec<FactRecord>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let quarterly: Vec<&FactRecord> = group
        .from_source(SourceForm::QuarterReport)
        .filter(|f| f.period().is_duration())
        .collect();

    for annual in group.from_source(SourceForm::AnnualReport) {
        let Some(range) = annual.period().range() else {
            continue;
        };
        if range.class().is_discrete() {
            continue;
        }
        let year = fiscal_year(range.end());

        let in_year: Vec<&FactRecord> = quarterly
            .iter()
            .copied()
            .filter(|f| f.end_date() >= range.start() && f.end_date() <= range.end())
            .collect();

        let Some(baseline) = Baseline::from_quarters(&in_year) else {
            debug!(
                concept = %group.key.concept,
                segment = %group.key.segment,
                year,
                "No quarterly figures inside annual period, skipping Q4"
            );
            continue;
        };

        if baseline.quarters != QUARTERS_BEFORE_Q4 {
            let message = format!(
                "Q4 derived from {} of {} prior quarters",
                baseline.quarters, QUARTERS_BEFORE_Q4
            );
            warn!(concept = %group.key.concept, segment = %group.key.segment, year, "{message}");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::IncompleteQuarters {
                    found: baseline.quarters,
                    expected: QUARTERS_BEFORE_Q4,
                },
                &group.key,
                Some(year),
                message,
            ));
        }

        let q4_start = baseline.last_end + Days::new(1);
        let Ok(period) = Period::duration(q4_start, range.end()) else {
            let message = format!(
                "Quarterly figures end {} which leaves no room for a Q4 before {}",
                baseline.last_end,
                range.end()
            );
            warn!(concept = %group.key.concept, segment = %group.key.segment, year, "{message}");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::Q4PeriodUndeterminable,
                &group.key,
                Some(year),
                message,
            ));
            continue;
        };

        let value = annual.value() - baseline.total;
        debug!(
            concept = %group.key.concept,
            segment = %group.key.segment,
            year,
            annual = annual.value(),
            baseline = baseline.total,
            q4 = value,
            "Derived Q4"
        );
        out.push(annual.derive(value, period, SourceForm::SyntheticQ4Flow));
    }
}

/// Sum of the quarters preceding Q4.
#[derive(Debug)]
struct Baseline {
    total: f64,
    quarters: usize,
    last_end: NaiveDate,
}

impl Baseline {
    /// Builds the baseline from the quarterly durations of one year.
    ///
    /// With any year-to-date figure present, the latest one is the baseline
    /// plus the discrete quarters that end after it. Otherwise the discrete
    /// quarters are summed. Spans of any other shape are ignored.
    fn from_quarters(quarters: &[&FactRecord]) -> Option<Self> {
        let latest_ytd = quarters
            .iter()
            .copied()
            .filter(|f| f.class() == Some(PeriodClass::YearToDate))
            .max_by_key(|f| f.end_date());
        let discrete = quarters
            .iter()
            .copied()
            .filter(|f| f.class() == Some(PeriodClass::Discrete));

        let (mut total, mut covered, mut last_end, cutoff) = match latest_ytd {
            Some(ytd) => {
                let days = ytd.period().range().map_or(0, |r| r.days());
                (
                    ytd.value(),
                    quarters_spanned(days),
                    Some(ytd.end_date()),
                    Some(ytd.end_date()),
                )
            }
            None => (0.0, 0, None, None),
        };

        for quarter in discrete {
            if cutoff.is_some_and(|c| quarter.end_date() <= c) {
                continue;
            }
            total += quarter.value();
            covered += 1;
            last_end = last_end.max(Some(quarter.end_date()));
        }

        last_end.map(|last_end| Self {
            total,
            quarters: covered,
            last_end,
        })
    }
}

/// Number of quarters a cumulative span of `days` covers.
fn quarters_spanned(days: i64) -> usize {
    ((days + DAYS_PER_QUARTER / 2) / DAYS_PER_QUARTER).max(1) as usize
}
