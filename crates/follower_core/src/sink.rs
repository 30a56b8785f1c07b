use std::collections::HashSet;

use crate::FollowerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddStats {
    pub added: usize,
    pub total: usize,
}

/// Accumulates unique follower names in first-seen order.
///
/// Members are never removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DedupSink {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl DedupSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records without a non-empty name are skipped.
    pub fn add(&mut self, records: &[FollowerRecord]) -> AddStats {
        let mut added = 0;
        for name in records.iter().filter_map(|record| record.name.as_deref()) {
            if name.is_empty() {
                continue;
            }
            if self.seen.insert(name.to_string()) {
                self.order.push(name.to_string());
                added += 1;
            }
        }
        AddStats {
            added,
            total: self.order.len(),
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_names(self) -> Vec<String> {
        self.order
    }
}
