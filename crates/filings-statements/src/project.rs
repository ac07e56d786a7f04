//! Projection of reconciled facts onto a statement schema.

use chrono::NaiveDate;
use filings_core::period::{DISCRETE_MAX_DAYS, span_days};
use filings_core::{AxisPriority, FactRecord, FactStore, PeriodClass, SourceForm};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

use crate::catalog::TagCatalog;
use crate::schema::{LineItem, PeriodAxis, SchemaLine, StatementSchema};
use crate::table::{RowKind, Table, TableRow};

/// Builds the line item by period table of one statement.
///
/// Only quarterly figures are shown: reported discrete quarters, quarters
/// differenced out of year-to-date values and synthesized Q4 records. Raw
/// annual and year-to-date figures never appear. For every line the catalog
/// candidates are tried in order, first against the exact segment label, then
/// as a case-insensitive substring of it; subtotal lines finally match any
/// concept containing the base concept name. When several records land on
/// the same period the best one wins by preferring records without a
/// secondary business segment, then axis precedence, then reported over
/// derived, then the latest filing.
#[instrument(skip_all, fields(statement = %schema.name))]
pub fn project(
    facts: &FactStore,
    schema: &StatementSchema,
    catalog: &TagCatalog,
    axis_priority: &AxisPriority,
) -> Table {
    let priority = schema.axis_priority.as_ref().unwrap_or(axis_priority);
    let axis = schema.kind.axis();
    let pool: Vec<(usize, &FactRecord)> = facts
        .iter()
        .enumerate()
        .filter(|(_, f)| is_projectable(f, axis, schema.include_q4))
        .collect();

    let mut resolved: Vec<Option<BTreeMap<NaiveDate, f64>>> = Vec::with_capacity(schema.lines.len());
    for line in &schema.lines {
        let cells = match line {
            SchemaLine::Spacer { .. } => None,
            SchemaLine::Item(item) => {
                let matches = resolve(&pool, item, catalog);
                if matches.is_empty() {
                    debug!(concept = %item.concept, segment = item.segment.label(), "Unresolved line");
                }
                Some(best_per_period(&matches, priority))
            }
        };
        resolved.push(cells);
    }

    let columns: Vec<NaiveDate> = resolved
        .iter()
        .flatten()
        .flat_map(|cells| cells.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect();

    let rows = schema
        .lines
        .iter()
        .zip(resolved)
        .map(|(line, cells)| TableRow {
            label: line.label().to_string(),
            kind: match line {
                SchemaLine::Spacer { .. } => RowKind::Spacer,
                SchemaLine::Item(_) => RowKind::Item,
            },
            cells: columns
                .iter()
                .map(|date| cells.as_ref().and_then(|c| c.get(date).copied()))
                .collect(),
        })
        .collect();

    Table {
        name: schema.name.clone(),
        columns,
        rows,
    }
}

fn is_projectable(fact: &FactRecord, axis: PeriodAxis, include_q4: bool) -> bool {
    match axis {
        PeriodAxis::Duration => match fact.source_form() {
            SourceForm::QuarterReport => fact.class() == Some(PeriodClass::Discrete),
            SourceForm::NormalizedDiscreteQuarter => fact
                .period()
                .range()
                .is_some_and(|r| span_days(r.start(), r.end()) <= DISCRETE_MAX_DAYS),
            SourceForm::SyntheticQ4Flow => include_q4,
            SourceForm::AnnualReport | SourceForm::SyntheticQ4Balance => false,
        },
        PeriodAxis::Instant => {
            fact.period().is_instant()
                && match fact.source_form() {
                    SourceForm::QuarterReport => true,
                    SourceForm::SyntheticQ4Balance => include_q4,
                    _ => false,
                }
        }
    }
}

fn resolve<'a>(
    pool: &[(usize, &'a FactRecord)],
    item: &LineItem,
    catalog: &TagCatalog,
) -> Vec<(usize, &'a FactRecord)> {
    let target = item.segment.label();
    let target_lower = target.to_lowercase();
    let candidates = catalog.candidates(&item.concept);

    for candidate in &candidates {
        let found = select(pool, |c| c == *candidate, |s| s == target);
        if !found.is_empty() {
            return found;
        }
    }
    for candidate in &candidates {
        let found = select(pool, |c| c == *candidate, |s| {
            s.to_lowercase().contains(&target_lower)
        });
        if !found.is_empty() {
            debug!(concept = %item.concept, segment = target, "Resolved by segment substring");
            return found;
        }
    }
    if item.total {
        let base = item.concept.to_lowercase();
        let found = select(pool, |c| c.to_lowercase().contains(&base), |s| s == target);
        if !found.is_empty() {
            debug!(concept = %item.concept, "Resolved total by concept substring");
        }
        return found;
    }
    Vec::new()
}

fn select<'a>(
    pool: &[(usize, &'a FactRecord)],
    concept_matches: impl Fn(&str) -> bool,
    segment_matches: impl Fn(&str) -> bool,
) -> Vec<(usize, &'a FactRecord)> {
    pool.iter()
        .copied()
        .filter(|(_, f)| concept_matches(f.concept()) && segment_matches(f.segment().label()))
        .collect()
}

fn source_rank(form: SourceForm) -> u8 {
    match form {
        SourceForm::AnnualReport | SourceForm::QuarterReport => 0,
        SourceForm::NormalizedDiscreteQuarter => 1,
        SourceForm::SyntheticQ4Flow | SourceForm::SyntheticQ4Balance => 2,
    }
}

type Rank = (bool, usize, u8, Reverse<Option<NaiveDate>>, usize);

fn rank(priority: &AxisPriority, (index, fact): &(usize, &FactRecord)) -> Rank {
    (
        fact.business_segment().is_some(),
        priority.rank(fact.segment().axis()),
        source_rank(fact.source_form()),
        Reverse(fact.filing_date()),
        *index,
    )
}

fn best_per_period(
    matches: &[(usize, &FactRecord)],
    priority: &AxisPriority,
) -> BTreeMap<NaiveDate, f64> {
    let mut best: BTreeMap<NaiveDate, (usize, &FactRecord)> = BTreeMap::new();
    for entry in matches {
        best.entry(entry.1.end_date())
            .and_modify(|current| {
                if rank(priority, entry) < rank(priority, current) {
                    *current = *entry;
                }
            })
            .or_insert(*entry);
    }
    best.into_iter()
        .map(|(date, (_, fact))| (date, fact.value()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SegmentAliases;
    use crate::schema::StatementKind;
    use filings_core::{Period, Segment};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quarter(concept: &str, end_month: u32, value: f64, form: SourceForm) -> FactRecord {
        let end = match end_month {
            3 => date(2023, 3, 31),
            6 => date(2023, 6, 30),
            9 => date(2023, 9, 30),
            _ => date(2023, 12, 31),
        };
        let start = match end_month {
            3 => date(2023, 1, 2),
            6 => date(2023, 4, 1),
            9 => date(2023, 7, 1),
            _ => date(2023, 10, 1),
        };
        FactRecord::new(concept, value, Period::duration(start, end).unwrap(), form)
    }

    fn income(lines: Vec<SchemaLine>) -> StatementSchema {
        StatementSchema::new("Income Statement", StatementKind::Income).with_lines(lines)
    }

    #[test]
    fn test_columns_descending_and_spacers_kept() {
        let store = FactStore::from(vec![
            quarter("Revenues", 3, 200.0, SourceForm::QuarterReport),
            quarter("Revenues", 6, 250.0, SourceForm::QuarterReport),
            quarter("Revenues", 12, 300.0, SourceForm::SyntheticQ4Flow),
        ]);
        let schema = income(vec![
            SchemaLine::spacer("Sales and revenues:"),
            SchemaLine::item("Revenues", "Total sales and revenues"),
            SchemaLine::item("Goodwill", "Unresolved"),
        ]);
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert_eq!(
            table.columns,
            vec![date(2023, 12, 31), date(2023, 6, 30), date(2023, 3, 31)]
        );
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].kind, RowKind::Spacer);
        assert_eq!(
            table.rows[1].cells,
            vec![Some(300.0), Some(250.0), Some(200.0)]
        );
        assert!(!table.rows[2].is_resolved());
    }

    #[test]
    fn test_annual_and_ytd_never_displayed() {
        let store = FactStore::from(vec![
            FactRecord::new(
                "Revenues",
                1000.0,
                Period::duration(date(2023, 1, 1), date(2023, 12, 31)).unwrap(),
                SourceForm::AnnualReport,
            ),
            FactRecord::new(
                "Revenues",
                450.0,
                Period::duration(date(2023, 1, 1), date(2023, 6, 30)).unwrap(),
                SourceForm::QuarterReport,
            ),
        ]);
        let schema = income(vec![SchemaLine::item("Revenues", "Revenue")]);
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_candidates_tried_in_order() {
        let store = FactStore::from(vec![
            quarter("SalesRevenueNet", 6, 111.0, SourceForm::QuarterReport),
            quarter(
                "RevenueFromContractWithCustomerExcludingAssessedTax",
                6,
                222.0,
                SourceForm::QuarterReport,
            ),
        ]);
        let catalog = TagCatalog::new().with_candidates(
            "Revenues",
            [
                "Revenues",
                "SalesRevenueNet",
                "RevenueFromContractWithCustomerExcludingAssessedTax",
            ],
        );
        let schema = income(vec![SchemaLine::item("Revenues", "Revenue")]);
        let table = project(&store, &schema, &catalog, &AxisPriority::default());
        assert_eq!(table.value("Revenue", date(2023, 6, 30)), Some(111.0));
    }

    #[test]
    fn test_reported_beats_synthetic_on_same_date() {
        let store = FactStore::from(vec![
            quarter("Revenues", 6, 249.0, SourceForm::NormalizedDiscreteQuarter),
            quarter("Revenues", 6, 250.0, SourceForm::QuarterReport),
        ]);
        let schema = income(vec![SchemaLine::item("Revenues", "Revenue")]);
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert_eq!(table.value("Revenue", date(2023, 6, 30)), Some(250.0));
    }

    #[test]
    fn test_segment_axis_duplicate_resolution() {
        let on_axis = |axis: &str, value: f64| {
            quarter("Revenues", 6, value, SourceForm::QuarterReport)
                .with_segment(Segment::on_axis(axis, "FinancialProductsMember"))
        };
        let store = FactStore::from(vec![
            on_axis("ConsolidationItemsAxis", 900.0),
            on_axis("StatementBusinessSegmentsAxis", 120.0),
        ]);
        let aliases = SegmentAliases::new().with_alias("FP", "FinancialProductsMember");
        let schema = income(vec![SchemaLine::from_key("Revenues_FP", "FP revenue", &aliases)]);
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert_eq!(table.value("FP revenue", date(2023, 6, 30)), Some(120.0));
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn test_single_axis_record_beats_business_segment_record() {
        let store = FactStore::from(vec![
            quarter("Revenues", 6, 40.0, SourceForm::QuarterReport)
                .with_segment(Segment::on_axis(
                    "StatementBusinessSegmentsAxis",
                    "FinancialProductsMember",
                ))
                .with_business_segment("ConstructionIndustriesMember"),
            quarter("Revenues", 6, 900.0, SourceForm::QuarterReport).with_segment(
                Segment::on_axis("ConsolidationItemsAxis", "FinancialProductsMember"),
            ),
        ]);
        let aliases = SegmentAliases::new().with_alias("FP", "FinancialProductsMember");
        let schema = income(vec![SchemaLine::from_key("Revenues_FP", "FP revenue", &aliases)]);
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert_eq!(table.value("FP revenue", date(2023, 6, 30)), Some(900.0));
    }

    #[test]
    fn test_multi_quarter_normalized_record_not_displayed() {
        let store = FactStore::from(vec![FactRecord::new(
            "Revenues",
            450.0,
            Period::duration(date(2023, 1, 1), date(2023, 6, 30)).unwrap(),
            SourceForm::NormalizedDiscreteQuarter,
        )]);
        let schema = income(vec![SchemaLine::item("Revenues", "Revenue")]);
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_segment_substring_fallback() {
        let store = FactStore::from(vec![
            quarter("ShortTermBorrowings", 6, 55.0, SourceForm::QuarterReport)
                .with_segment(Segment::member("FinancialProductsMember")),
        ]);
        let schema = income(vec![SchemaLine::Item(LineItem {
            concept: "ShortTermBorrowings".into(),
            segment: crate::schema::SegmentSelector::Member("financialproducts".into()),
            label: "Borrowings".into(),
            total: false,
        })]);
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert_eq!(table.value("Borrowings", date(2023, 6, 30)), Some(55.0));
    }

    #[test]
    fn test_total_line_concept_substring_fallback() {
        let store = FactStore::from(vec![quarter(
            "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
            9,
            75.0,
            SourceForm::QuarterReport,
        )]);
        let plain = income(vec![SchemaLine::item(
            "NetCashProvidedByUsedInOperatingActivities",
            "Operating cash",
        )]);
        let total = income(vec![
            SchemaLine::item("NetCashProvidedByUsedInOperatingActivities", "Operating cash")
                .as_total(),
        ]);
        let catalog = TagCatalog::new();
        let priority = AxisPriority::default();
        assert!(project(&store, &plain, &catalog, &priority).is_empty());
        assert_eq!(
            project(&store, &total, &catalog, &priority).value("Operating cash", date(2023, 9, 30)),
            Some(75.0)
        );
    }

    #[test]
    fn test_without_q4_hides_synthetic_quarter() {
        let store = FactStore::from(vec![
            quarter("Revenues", 9, 250.0, SourceForm::QuarterReport),
            quarter("Revenues", 12, 300.0, SourceForm::SyntheticQ4Flow),
        ]);
        let schema = income(vec![SchemaLine::item("Revenues", "Revenue")]).without_q4();
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert_eq!(table.columns, vec![date(2023, 9, 30)]);
    }

    #[test]
    fn test_balance_sheet_uses_instants() {
        let store = FactStore::from(vec![
            FactRecord::new(
                "Assets",
                4800.0,
                Period::instant(date(2023, 9, 30)),
                SourceForm::QuarterReport,
            ),
            FactRecord::new(
                "Assets",
                5000.0,
                Period::instant(date(2023, 12, 31)),
                SourceForm::AnnualReport,
            ),
            FactRecord::new(
                "Assets",
                5000.0,
                Period::instant(date(2023, 12, 31)),
                SourceForm::SyntheticQ4Balance,
            ),
        ]);
        let schema = StatementSchema::new("Balance Sheet", StatementKind::BalanceSheet)
            .with_line(SchemaLine::item("Assets", "Total assets"));
        let table = project(&store, &schema, &TagCatalog::new(), &AxisPriority::default());
        assert_eq!(
            table.rows[0].cells,
            vec![Some(5000.0), Some(4800.0)]
        );
    }
}
