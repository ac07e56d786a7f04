//! Statement schemas.
//!
//! A schema is an ordered list of lines. Each line is either a spacer row or
//! an item naming a base concept, a segment and a display label. Lines are
//! kept as an explicit sequence so two items with the same concept stay
//! visible as two rows.

use filings_core::{AxisPriority, CONSOLIDATED};
use serde::{Deserialize, Serialize};

use crate::catalog::SegmentAliases;

/// Statement family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    BalanceSheet,
    /// Cash flow statement.
    CashFlow,
    /// Business segment breakdown.
    Segment,
}

/// Period shape a statement is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeriodAxis {
    /// Point-in-time balances.
    Instant,
    /// Flows over a quarter.
    Duration,
}

impl StatementKind {
    /// Period shape of this statement family.
    #[must_use]
    pub const fn axis(&self) -> PeriodAxis {
        match self {
            Self::BalanceSheet => PeriodAxis::Instant,
            Self::Income | Self::CashFlow | Self::Segment => PeriodAxis::Duration,
        }
    }
}

/// Segment a line item is read from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSelector {
    /// Whole-company facts.
    #[default]
    Consolidated,
    /// Facts whose segment label matches this member name.
    Member(String),
}

impl SegmentSelector {
    /// Segment label to match against.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Consolidated => CONSOLIDATED,
            Self::Member(name) => name,
        }
    }
}

/// A statement row bound to facts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Base concept, expanded through the tag catalog.
    pub concept: String,
    /// Segment to read.
    #[serde(default)]
    pub segment: SegmentSelector,
    /// Display label.
    pub label: String,
    /// Subtotal line; enables the concept-substring fallback.
    #[serde(default)]
    pub total: bool,
}

/// One row of a statement schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaLine {
    /// Blank row used for visual grouping.
    Spacer {
        /// Row label, usually a section heading or empty.
        label: String,
    },
    /// A line item.
    Item(LineItem),
}

impl SchemaLine {
    /// Creates a spacer row.
    #[must_use]
    pub fn spacer(label: impl Into<String>) -> Self {
        Self::Spacer {
            label: label.into(),
        }
    }

    /// Creates a consolidated line item.
    #[must_use]
    pub fn item(concept: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Item(LineItem {
            concept: concept.into(),
            segment: SegmentSelector::Consolidated,
            label: label.into(),
            total: false,
        })
    }

    /// Parses the `concept_SEGMENTCODE` key form.
    ///
    /// The key is split at the first underscore. The code is resolved through
    /// `aliases`; unknown codes are used as the member name directly.
    #[must_use]
    pub fn from_key(key: &str, label: impl Into<String>, aliases: &SegmentAliases) -> Self {
        let (concept, segment) = match key.split_once('_') {
            Some((concept, code)) => (concept, aliases.resolve(code)),
            None => (key, SegmentSelector::Consolidated),
        };
        Self::Item(LineItem {
            concept: concept.to_string(),
            segment,
            label: label.into(),
            total: false,
        })
    }

    /// Marks an item as a subtotal line. Spacers are returned unchanged.
    #[must_use]
    pub fn as_total(mut self) -> Self {
        if let Self::Item(item) = &mut self {
            item.total = true;
        }
        self
    }

    /// Row label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Spacer { label } => label,
            Self::Item(item) => &item.label,
        }
    }
}

/// Ordered description of one statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSchema {
    /// Statement name, used as the table name.
    pub name: String,
    /// Statement family.
    pub kind: StatementKind,
    /// Rows in display order.
    pub lines: Vec<SchemaLine>,
    /// Whether synthesized Q4 records are shown.
    #[serde(default = "default_true")]
    pub include_q4: bool,
    /// Axis precedence overriding the pipeline default for this statement.
    #[serde(default)]
    pub axis_priority: Option<AxisPriority>,
}

const fn default_true() -> bool {
    true
}

impl StatementSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: StatementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            lines: Vec::new(),
            include_q4: true,
            axis_priority: None,
        }
    }

    /// Appends a line.
    #[must_use]
    pub fn with_line(mut self, line: SchemaLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Appends several lines.
    #[must_use]
    pub fn with_lines(mut self, lines: impl IntoIterator<Item = SchemaLine>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Hides synthesized Q4 records.
    #[must_use]
    pub const fn without_q4(mut self) -> Self {
        self.include_q4 = false;
        self
    }

    /// Sets a statement-specific axis precedence.
    #[must_use]
    pub fn with_axis_priority(mut self, priority: AxisPriority) -> Self {
        self.axis_priority = Some(priority);
        self
    }

    /// Line items, skipping spacers.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter_map(|line| match line {
            SchemaLine::Item(item) => Some(item),
            SchemaLine::Spacer { .. } => None,
        })
    }
}
