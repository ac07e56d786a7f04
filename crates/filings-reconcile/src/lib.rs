#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Quarter reconciliation engine.
//!
//! Turns the raw facts of many filings into a consistent discrete-quarter
//! series:
//!
//! - [`canonical`] - Groups facts per series and resolves duplicate reports
//! - [`q4`] - Synthesizes fourth-quarter balances and flows
//! - [`normalize`] - Differences year-to-date figures into discrete quarters
//! - [`report`] - Options, diagnostics and the [`Reconciliation`] result

pub mod canonical;
pub mod normalize;
pub mod q4;
pub mod report;

pub use canonical::{CanonicalGroup, GroupKey, canonicalize};
pub use report::{Diagnostic, DiagnosticKind, Q4Scope, ReconcileOptions, Reconciliation};

use filings_core::{FactRecord, FactStore, FilingsError, Result};
use tracing::{info, instrument};

/// Reconciles raw facts into a store of raw plus synthesized records.
///
/// The input must contain reported facts only. Handing back records that a
/// previous reconciliation produced is rejected with
/// [`FilingsError::InvalidInput`]. Sparse or inconsistent data never fails;
/// it shows up in [`Reconciliation::diagnostics`].
#[instrument(skip_all, fields(facts = facts.len()))]
pub fn reconcile(facts: &[FactRecord], options: &ReconcileOptions) -> Result<Reconciliation> {
    if let Some(fact) = facts.iter().find(|f| f.source_form().is_synthetic()) {
        return Err(FilingsError::InvalidInput(format!(
            "Synthetic record {} ({}) cannot be reconciled again",
            fact.concept(),
            fact.source_form()
        )));
    }

    let mut diagnostics = Vec::new();
    let groups = canonicalize(facts, &options.axis_priority, &mut diagnostics);

    let mut synthetic = Vec::new();
    for group in &groups {
        if options.q4_scope.includes(&group.key) {
            q4::carry_forward_balances(group, &mut synthetic);
            q4::derive_flows(group, &mut synthetic, &mut diagnostics);
        }
        normalize::normalize_group(group, &mut synthetic, &mut diagnostics);
    }

    info!(
        groups = groups.len(),
        synthesized = synthetic.len(),
        diagnostics = diagnostics.len(),
        "Reconciled facts"
    );

    let mut store = FactStore::from(facts.to_vec());
    store.extend(synthetic);
    Ok(Reconciliation {
        facts: store,
        diagnostics,
    })
}
