//! Dimensional axis precedence.
//!
//! The same member can be reported on several axes in one filing (for example
//! `FinancialProductsMember` under both `StatementBusinessSegmentsAxis` and
//! `ConsolidationItemsAxis`). [`AxisPriority`] decides which one is kept.

use serde::{Deserialize, Serialize};

/// Axis preferred for individual business segments.
pub const BUSINESS_SEGMENTS_AXIS: &str = "StatementBusinessSegmentsAxis";

/// Axis used for consolidation items such as operating segment totals.
pub const CONSOLIDATION_ITEMS_AXIS: &str = "ConsolidationItemsAxis";

/// Ordered list of axis names; earlier entries win.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisPriority {
    axes: Vec<String>,
}

impl Default for AxisPriority {
    fn default() -> Self {
        Self::new([BUSINESS_SEGMENTS_AXIS, CONSOLIDATION_ITEMS_AXIS])
    }
}

impl AxisPriority {
    /// Creates a priority list from axis names in precedence order.
    pub fn new<I, S>(axes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            axes: axes.into_iter().map(Into::into).collect(),
        }
    }

    /// Rank of an axis; lower is better. Unlisted axes and facts without an
    /// axis rank after every listed axis.
    #[must_use]
    pub fn rank(&self, axis: Option<&str>) -> usize {
        axis.and_then(|name| self.axes.iter().position(|a| a == name))
            .unwrap_or(self.axes.len())
    }

    /// Axis names in precedence order.
    #[must_use]
    pub fn axes(&self) -> &[String] {
        &self.axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefers_business_segments() {
        let priority = AxisPriority::default();
        assert_eq!(priority.rank(Some(BUSINESS_SEGMENTS_AXIS)), 0);
        assert_eq!(priority.rank(Some(CONSOLIDATION_ITEMS_AXIS)), 1);
        assert_eq!(priority.rank(Some("ProductOrServiceAxis")), 2);
        assert_eq!(priority.rank(None), 2);
    }

    #[test]
    fn test_serde_as_list() {
        let priority: AxisPriority =
            serde_json::from_str(r#"["ConsolidationItemsAxis"]"#).unwrap();
        assert_eq!(priority.rank(Some(CONSOLIDATION_ITEMS_AXIS)), 0);
        assert_eq!(priority.rank(Some(BUSINESS_SEGMENTS_AXIS)), 1);
        assert_eq!(
            serde_json::to_string(&priority).unwrap(),
            r#"["ConsolidationItemsAxis"]"#
        );
    }
}
