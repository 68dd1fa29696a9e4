use crate::identity::IdentityRecord;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of identity records seen for one user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationEntry {
    pub user_id: String,
    pub count: usize,
}

impl AggregationEntry {
    /// Ascending count, then ascending user id (byte order).
    pub fn rank_order(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| self.user_id.as_bytes().cmp(other.user_id.as_bytes()))
    }
}

/// Counts records per user id. An empty user id is a group like any other.
pub fn aggregate(records: &[IdentityRecord]) -> Vec<AggregationEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.user_id.as_str()).or_default() += 1;
    }

    let mut entries: Vec<AggregationEntry> = counts
        .into_iter()
        .map(|(user_id, count)| AggregationEntry {
            user_id: user_id.to_string(),
            count,
        })
        .collect();
    entries.sort_by(AggregationEntry::rank_order);
    entries
}

/// Logs the ranked per-user summary.
pub fn log_summary(entries: &[AggregationEntry]) {
    for (rank, entry) in entries.iter().enumerate() {
        tracing::info!(rank, user_id = %entry.user_id, count = entry.count, "User summary");
    }
}
