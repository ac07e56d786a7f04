//! Projected statement tables.

use chrono::NaiveDate;
use filings_core::{FilingsError, Result, quarter_label};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    /// Grouping row without values.
    Spacer,
    /// Line item row.
    Item,
}

/// One statement row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Display label.
    pub label: String,
    /// Row kind.
    pub kind: RowKind,
    /// One cell per table column; `None` where nothing resolved.
    pub cells: Vec<Option<f64>>,
}

impl TableRow {
    /// Returns true if any cell holds a value.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.cells.iter().any(Option::is_some)
    }
}

/// Line item by period table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Statement name.
    pub name: String,
    /// Period end dates, most recent first.
    pub columns: Vec<NaiveDate>,
    /// Rows in schema order.
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Column headers formatted `YYYY-MM-DD`.
    #[must_use]
    pub fn column_labels(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect()
    }

    /// Calendar quarter of each column (`Q1`..`Q4`).
    #[must_use]
    pub fn quarter_labels(&self) -> Vec<&'static str> {
        self.columns.iter().map(|d| quarter_label(*d)).collect()
    }

    /// First row with the given label.
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Cell value by row label and column date.
    #[must_use]
    pub fn value(&self, label: &str, date: NaiveDate) -> Option<f64> {
        let column = self.columns.iter().position(|c| *c == date)?;
        self.row(label)?.cells.get(column).copied().flatten()
    }

    /// Returns true if no row resolved any value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.rows.iter().any(TableRow::is_resolved)
    }

    /// Converts to a DataFrame with a `line_item` column followed by one
    /// `Float64` column per period, named `YYYY-MM-DD`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let labels: Vec<&str> = self.rows.iter().map(|r| r.label.as_str()).collect();
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new("line_item".into(), labels));

        for (index, name) in self.column_labels().into_iter().enumerate() {
            let values: Vec<Option<f64>> = self
                .rows
                .iter()
                .map(|r| r.cells.get(index).copied().flatten())
                .collect();
            columns.push(Column::new(name.into(), values));
        }

        DataFrame::new(columns).map_err(|e| FilingsError::Other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Table {
        Table {
            name: "Income Statement".into(),
            columns: vec![date(2023, 12, 31), date(2023, 9, 30)],
            rows: vec![
                TableRow {
                    label: "Sales and revenues:".into(),
                    kind: RowKind::Spacer,
                    cells: vec![None, None],
                },
                TableRow {
                    label: "Total sales and revenues".into(),
                    kind: RowKind::Item,
                    cells: vec![Some(300.0), Some(250.0)],
                },
            ],
        }
    }

    #[test]
    fn test_labels() {
        let table = sample();
        assert_eq!(table.column_labels(), vec!["2023-12-31", "2023-09-30"]);
        assert_eq!(table.quarter_labels(), vec!["Q4", "Q3"]);
    }

    #[test]
    fn test_value_lookup() {
        let table = sample();
        assert_eq!(
            table.value("Total sales and revenues", date(2023, 9, 30)),
            Some(250.0)
        );
        assert_eq!(table.value("Sales and revenues:", date(2023, 9, 30)), None);
        assert_eq!(table.value("Missing", date(2023, 9, 30)), None);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_to_dataframe() {
        let df = sample().to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, 3));
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["line_item", "2023-12-31", "2023-09-30"]);
        assert_eq!(df.column("2023-12-31").unwrap().dtype(), &DataType::Float64);
    }
}
