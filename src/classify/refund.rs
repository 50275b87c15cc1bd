use std::fmt::Debug;

use crate::ir::NormalizedRecord;

/// Decides whether an outcome-only record is the refund of an earlier expense.
pub trait RefundPolicy: Debug + Send + Sync {
    fn is_refund(&self, record: &NormalizedRecord) -> bool;
}

/// Never classifies anything as refund
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRefunds;

impl RefundPolicy for NoRefunds {
    fn is_refund(&self, _record: &NormalizedRecord) -> bool {
        false
    }
}

/// Classifies a record as refund if its category or memo contains one of the markers, ignoring case.
#[derive(Debug, Clone)]
pub struct MarkerRefundPolicy {
    markers: Vec<String>,
}

impl MarkerRefundPolicy {
    pub fn new(markers: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .map(|marker| marker.as_ref().trim().to_lowercase())
                .filter(|marker| !marker.is_empty())
                .collect(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.markers.iter().any(|marker| text.contains(marker))
    }
}

impl RefundPolicy for MarkerRefundPolicy {
    fn is_refund(&self, record: &NormalizedRecord) -> bool {
        let category_matches = record
            .category
            .as_ref()
            .is_some_and(|category| self.matches(&category.to_string()));
        let memo_matches = record
            .memo
            .as_deref()
            .is_some_and(|memo| self.matches(memo));
        category_matches || memo_matches
    }
}
