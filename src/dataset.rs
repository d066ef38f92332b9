//! Append-only collector for finished per-page batches.
//!
//! Traversal tasks push normalized batches here as pages complete; the
//! relational persistence step reads the whole accumulated output back once
//! traversal is done.

use tokio::sync::Mutex;
use tracing::debug;

use crate::normalize::NormalizedProductRecord;

#[derive(Debug, Default)]
pub struct Dataset {
    records: Mutex<Vec<NormalizedProductRecord>>,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page's batch.
    pub async fn push_batch(&self, batch: Vec<NormalizedProductRecord>) {
        let mut records = self.records.lock().await;
        records.extend(batch);
        debug!("dataset holds {} records", records.len());
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drain the accumulated records for persistence.
    pub async fn take_all(&self) -> Vec<NormalizedProductRecord> {
        std::mem::take(&mut *self.records.lock().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> NormalizedProductRecord {
        NormalizedProductRecord {
            title: title.to_string(),
            ..NormalizedProductRecord::default()
        }
    }

    #[tokio::test]
    async fn batches_accumulate_in_push_order() {
        let dataset = Dataset::new();
        dataset.push_batch(vec![record("a"), record("b")]).await;
        dataset.push_batch(vec![record("c")]).await;
        assert_eq!(dataset.len().await, 3);

        let all = dataset.take_all().await;
        let titles: Vec<_> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn take_all_drains_the_dataset() {
        let dataset = Dataset::new();
        dataset.push_batch(vec![record("a")]).await;
        assert_eq!(dataset.take_all().await.len(), 1);
        assert!(dataset.is_empty().await);
    }
}
