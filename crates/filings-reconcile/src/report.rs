//! Options, diagnostics and the reconciliation result.

use filings_core::{AxisPriority, FactStore};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::GroupKey;

/// Which groups get fourth-quarter records synthesized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Q4Scope {
    /// Every (concept, segment) group is reconciled in isolation.
    #[default]
    AllGroups,
    /// Only consolidated groups; segment series keep their reported quarters.
    ConsolidatedOnly,
}

impl Q4Scope {
    /// Returns true if Q4 records should be synthesized for `key`.
    #[must_use]
    pub fn includes(&self, key: &GroupKey) -> bool {
        match self {
            Self::AllGroups => true,
            Self::ConsolidatedOnly => key.is_consolidated(),
        }
    }
}

/// Reconciliation settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Scope of Q4 synthesis.
    pub q4_scope: Q4Scope,
    /// Axis precedence used to pick between competing duplicates.
    pub axis_priority: AxisPriority,
}

impl ReconcileOptions {
    /// Sets the Q4 scope.
    #[must_use]
    pub const fn with_q4_scope(mut self, scope: Q4Scope) -> Self {
        self.q4_scope = scope;
        self
    }

    /// Sets the axis precedence.
    #[must_use]
    pub fn with_axis_priority(mut self, priority: AxisPriority) -> Self {
        self.axis_priority = priority;
        self
    }
}

/// Kind of degraded result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Two reported values competed for the same period; one was chosen.
    DuplicateConflict {
        /// Number of distinct values seen.
        values: usize,
    },
    /// Q4 was derived from a quarter set other than three quarters.
    IncompleteQuarters {
        /// Quarters covered by the reported figures.
        found: usize,
        /// Quarters expected before the fourth.
        expected: usize,
    },
    /// The Q4 date range would be empty, so no Q4 record was produced.
    Q4PeriodUndeterminable,
    /// The first year-to-date value spans more than one quarter, so the
    /// earlier quarters cannot be separated out.
    MissingCumulativeBaseline,
    /// Differencing two year-to-date values left more than one quarter,
    /// so no discrete quarter was produced.
    QuarterGap {
        /// Days covered by the difference.
        days: i64,
    },
}

/// A degraded-result notice attached to a reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Concept of the affected group.
    pub concept: String,
    /// Segment label of the affected group.
    pub segment: String,
    /// Fiscal year involved, when known.
    pub fiscal_year: Option<i32>,
    /// Human readable detail.
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(
        kind: DiagnosticKind,
        key: &GroupKey,
        fiscal_year: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            concept: key.concept.clone(),
            segment: key.segment.clone(),
            fiscal_year,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.concept, self.segment)?;
        if let Some(year) = self.fiscal_year {
            write!(f, " FY{year}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Output of [`reconcile`](crate::reconcile).
#[derive(Clone, Debug, Default)]
pub struct Reconciliation {
    /// Every input record followed by the synthesized ones.
    pub facts: FactStore,
    /// Degraded results encountered along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl Reconciliation {
    /// Diagnostics matching a predicate on their kind.
    pub fn diagnostics_where<'a>(
        &'a self,
        pred: impl Fn(&DiagnosticKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| pred(&d.kind))
    }
}
